use std::path::Path;

use chrono::NaiveDate;
use clap::Args;

use postaja_autopilot::{DEFAULT_HORIZON_DAYS, Slot, generate_slots};
use postaja_core::AutopilotConfig;

pub mod init;
pub mod inspect;
pub mod plan;

/// Longest horizon the CLI will plan in one run.
pub const MAX_HORIZON_DAYS: u32 = 3660;

/// Which config to read and which days to cover.
#[derive(Args, Debug, Clone)]
pub struct HorizonArgs {
    /// Path to autopilot.toml (or a .json rule exported from the app)
    #[arg(short, long, default_value = "autopilot.toml")]
    pub config: String,
    /// First day of the horizon, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub start: Option<NaiveDate>,
    /// Number of days to cover
    #[arg(
        long,
        default_value_t = DEFAULT_HORIZON_DAYS,
        value_parser = clap::value_parser!(u32).range(..=i64::from(MAX_HORIZON_DAYS))
    )]
    pub days: u32,
}

impl HorizonArgs {
    pub fn load_config(&self) -> anyhow::Result<AutopilotConfig> {
        AutopilotConfig::from_file(Path::new(&self.config))
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// Slots the config's cadence generates over this horizon.
    pub fn slots(&self, config: &AutopilotConfig) -> Vec<Slot> {
        let schedule = &config.schedule;
        generate_slots(&schedule.days, &schedule.times, self.start_date(), self.days)
    }
}

/// Horizon plus the catalog and history inputs of a planning run.
#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    #[command(flatten)]
    pub horizon: HorizonArgs,
    /// Catalog snapshot (JSON)
    #[arg(long)]
    pub catalog: String,
    /// Posting history: product id → last post timestamp (JSON)
    #[arg(long)]
    pub history: Option<String>,
}
