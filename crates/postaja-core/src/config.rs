//! autopilot.toml configuration parser.
//!
//! The same structure is accepted as JSON in the camelCase shape the web
//! app stores (`productRotation`, `avoidRepetitionDays`, ...).

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::types::{Objective, ObjectiveMix, RotationStrategy, SlotTime, Weekday};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutopilotConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, alias = "productRotation")]
    pub product_rotation: RotationStrategy,
    /// Minimum days before the same product may be featured again.
    #[serde(default = "default_avoid_repetition_days", alias = "avoidRepetitionDays")]
    pub avoid_repetition_days: u32,
    /// Cap on promotional-product slots in any 7-day window.
    #[serde(default = "default_max_promotional", alias = "maxPromotionalPerWeek")]
    pub max_promotional_per_week: u32,
    pub schedule: ScheduleConfig,
    pub objectives: ObjectiveMix,
}

fn default_enabled() -> bool {
    true
}

fn default_avoid_repetition_days() -> u32 {
    14
}

fn default_max_promotional() -> u32 {
    10
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default)]
    pub days: BTreeSet<Weekday>,
    #[serde(default)]
    pub times: BTreeSet<SlotTime>,
}

impl Default for AutopilotConfig {
    fn default() -> Self {
        AutopilotConfig {
            id: None,
            name: None,
            enabled: default_enabled(),
            product_rotation: RotationStrategy::Balanced,
            avoid_repetition_days: default_avoid_repetition_days(),
            max_promotional_per_week: default_max_promotional(),
            schedule: ScheduleConfig {
                days: [Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri]
                    .into_iter()
                    .collect(),
                times: [(10, 0), (14, 0), (19, 0)]
                    .into_iter()
                    .filter_map(|(h, m)| SlotTime::new(h, m))
                    .collect(),
            },
            objectives: ObjectiveMix::new()
                .with(Objective::Sell, 50.0)
                .with(Objective::Engage, 30.0)
                .with(Objective::Grow, 15.0)
                .with(Objective::SocialProof, 5.0),
        }
    }
}

impl AutopilotConfig {
    /// Load from a file; `.json` is read as JSON, anything else as TOML.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AutopilotConfig = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            _ => toml::from_str(&content)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Scaffold a named config carrying the default posting rule.
    pub fn scaffold(name: &str) -> Self {
        AutopilotConfig {
            id: Some("main".to_string()),
            name: Some(name.to_string()),
            ..AutopilotConfig::default()
        }
    }

    /// Reject objective mixes that can't be normalized.
    ///
    /// Empty days or times are allowed; they just produce no slots.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_objectives(&self.objectives)
    }
}

pub fn validate_objectives(mix: &ObjectiveMix) -> ConfigResult<()> {
    for (objective, value) in mix.iter() {
        if !value.is_finite() {
            return Err(ConfigError::NonFinitePercentage { objective });
        }
        if value < 0.0 {
            return Err(ConfigError::NegativePercentage { objective, value });
        }
    }
    if !mix.is_empty() && mix.total() <= 0.0 {
        return Err(ConfigError::ZeroObjectiveSum);
    }
    Ok(())
}
