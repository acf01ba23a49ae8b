//! Planning error types.

use postaja_core::ConfigError;
use thiserror::Error;

/// Errors that abort a planning run before any slot is processed.
///
/// Stock shortages, repetition conflicts and promotional caps are never
/// errors; they surface as plan diagnostics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("invalid autopilot configuration: {0}")]
    Configuration(#[from] ConfigError),
}

pub type PlanResult<T> = Result<T, PlanError>;
