pub mod catalog;
pub mod config;
pub mod error;
pub mod history;
pub mod roles;
pub mod types;

pub use catalog::{CatalogSource, HistorySource, JsonFileCatalog, JsonFileHistory, StaticCatalog};
pub use config::{AutopilotConfig, ScheduleConfig};
pub use error::{ConfigError, ConfigResult};
pub use history::History;
pub use roles::{Capability, Role};
pub use types::*;
