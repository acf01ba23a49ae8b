//! Configuration error types.

use thiserror::Error;

use crate::types::Objective;

/// Result type alias for configuration parsing and validation.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised for structurally invalid autopilot configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown weekday: {0}")]
    UnknownWeekday(String),

    #[error("unknown objective: {0}")]
    UnknownObjective(String),

    #[error("invalid slot time {0:?}, expected HH:MM")]
    InvalidTime(String),

    #[error("objective {objective} has a negative percentage ({value})")]
    NegativePercentage { objective: Objective, value: f64 },

    #[error("objective {objective} has a non-finite percentage")]
    NonFinitePercentage { objective: Objective },

    #[error("objective percentages sum to zero")]
    ZeroObjectiveSum,
}
