//! Shared types used across PostaJá crates.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Day of the week a schedule may post on.
///
/// Accepts English names as well as the Portuguese tags stored by the
/// web app (`seg`, `ter`, `qua`, `qui`, `sex`, `sab`, `dom`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Mon => "mon",
            Weekday::Tue => "tue",
            Weekday::Wed => "wed",
            Weekday::Thu => "thu",
            Weekday::Fri => "fri",
            Weekday::Sat => "sat",
            Weekday::Sun => "sun",
        }
    }

    pub fn from_chrono(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Mon,
            chrono::Weekday::Tue => Weekday::Tue,
            chrono::Weekday::Wed => Weekday::Wed,
            chrono::Weekday::Thu => Weekday::Thu,
            chrono::Weekday::Fri => Weekday::Fri,
            chrono::Weekday::Sat => Weekday::Sat,
            chrono::Weekday::Sun => Weekday::Sun,
        }
    }
}

impl FromStr for Weekday {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let day = match s.trim().to_lowercase().as_str() {
            "mon" | "monday" | "seg" | "segunda" => Weekday::Mon,
            "tue" | "tuesday" | "ter" | "terça" | "terca" => Weekday::Tue,
            "wed" | "wednesday" | "qua" | "quarta" => Weekday::Wed,
            "thu" | "thursday" | "qui" | "quinta" => Weekday::Thu,
            "fri" | "friday" | "sex" | "sexta" => Weekday::Fri,
            "sat" | "saturday" | "sab" | "sáb" | "sábado" | "sabado" => Weekday::Sat,
            "sun" | "sunday" | "dom" | "domingo" => Weekday::Sun,
            _ => return Err(ConfigError::UnknownWeekday(s.to_string())),
        };
        Ok(day)
    }
}

impl TryFrom<String> for Weekday {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for Weekday {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wall-clock posting time, written as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct SlotTime(NaiveTime);

impl SlotTime {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(SlotTime)
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }
}

impl FromStr for SlotTime {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // chrono accepts single-digit fields; the UI always writes two.
        if trimmed.len() != 5 {
            return Err(ConfigError::InvalidTime(s.to_string()));
        }
        NaiveTime::parse_from_str(trimmed, "%H:%M")
            .map(SlotTime)
            .map_err(|_| ConfigError::InvalidTime(s.to_string()))
    }
}

impl TryFrom<String> for SlotTime {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for SlotTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

/// Marketing intent of a post.
///
/// Declaration order is the fixed tie-break order used by the allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Objective {
    Sell,
    Engage,
    Grow,
    #[serde(alias = "socialProof", alias = "social_proof")]
    SocialProof,
    Reactivate,
}

impl Objective {
    pub const ALL: [Objective; 5] = [
        Objective::Sell,
        Objective::Engage,
        Objective::Grow,
        Objective::SocialProof,
        Objective::Reactivate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Objective::Sell => "sell",
            Objective::Engage => "engage",
            Objective::Grow => "grow",
            Objective::SocialProof => "social-proof",
            Objective::Reactivate => "reactivate",
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Objective {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let objective = match s.trim() {
            "sell" => Objective::Sell,
            "engage" => Objective::Engage,
            "grow" => Objective::Grow,
            "social-proof" | "socialProof" | "social_proof" => Objective::SocialProof,
            "reactivate" => Objective::Reactivate,
            _ => return Err(ConfigError::UnknownObjective(s.to_string())),
        };
        Ok(objective)
    }
}

/// Objective → configured percentage of the posting mix.
///
/// Keyed by string on the wire so it reads the same from TOML and from
/// the web app's JSON (`socialProof`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct ObjectiveMix(BTreeMap<Objective, f64>);

impl ObjectiveMix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, objective: Objective, percentage: f64) -> Self {
        self.0.insert(objective, percentage);
        self
    }

    pub fn insert(&mut self, objective: Objective, percentage: f64) {
        self.0.insert(objective, percentage);
    }

    pub fn get(&self, objective: Objective) -> Option<f64> {
        self.0.get(&objective).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Objective, f64)> + '_ {
        self.0.iter().map(|(objective, pct)| (*objective, *pct))
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<(Objective, f64)> for ObjectiveMix {
    fn from_iter<I: IntoIterator<Item = (Objective, f64)>>(iter: I) -> Self {
        ObjectiveMix(iter.into_iter().collect())
    }
}

impl TryFrom<BTreeMap<String, f64>> for ObjectiveMix {
    type Error = ConfigError;

    fn try_from(raw: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        raw.into_iter()
            .map(|(key, pct)| Ok((key.parse::<Objective>()?, pct)))
            .collect()
    }
}

impl From<ObjectiveMix> for BTreeMap<String, f64> {
    fn from(mix: ObjectiveMix) -> Self {
        mix.0
            .into_iter()
            .map(|(objective, pct)| (objective.as_str().to_string(), pct))
            .collect()
    }
}

/// Which product is preferred when several are eligible for a slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RotationStrategy {
    /// Best historical engagement first.
    Champions,
    /// Highest stock first, recently posted items pushed back.
    RotateStock,
    /// Never-posted and longest-idle first.
    NewFirst,
    /// Weighted blend of performance, stock and idle time.
    #[default]
    Balanced,
}

impl RotationStrategy {
    pub fn label(&self) -> &'static str {
        match self {
            RotationStrategy::Champions => "champions",
            RotationStrategy::RotateStock => "rotate-stock",
            RotationStrategy::NewFirst => "new-first",
            RotationStrategy::Balanced => "balanced",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
    Archived,
}

/// Read-only catalog entry as seen by a single planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub stock: u32,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub original_price: Option<f64>,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_posted_at: Option<DateTime<Utc>>,
    /// Historical engagement; higher is better.
    #[serde(default)]
    pub performance_score: f64,
}

impl Product {
    /// A product is promotional while it carries a discounted price.
    pub fn is_promotional(&self) -> bool {
        self.original_price.is_some_and(|original| original > self.price)
    }

    /// Only active, in-stock products may be scheduled.
    pub fn is_eligible(&self) -> bool {
        self.stock > 0 && self.status == ProductStatus::Active
    }
}
