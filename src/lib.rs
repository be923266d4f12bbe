mod consts;
mod prelude;
mod range;
mod types;

pub mod anchor;
pub mod calendar;
pub mod config;
pub mod snapshot;
pub mod sprint;
pub mod store;

pub use anchor::FiscalYearAnchor;
pub use calendar::{FiscalPeriod, QuarterInfo, calculate_fiscal_period, get_all_quarters, get_quarter_progress};
pub use config::FiscalConfig;
pub use consts::*;
pub use range::{DateSpan, RangeError};
pub use snapshot::FiscalSnapshot;
pub use sprint::{SprintDates, SprintGrid, get_current_sprint_dates, get_sprint_progress};
pub use store::{ConfigError, KeyValueStore, MemoryStore, SchemaVersion, StoredConfig, load_config, parse_config, save_config};
pub use types::{Quarter, SprintLength, Theme};

use crate::prelude::*;

/// Errors from constructing validated calendar values.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ValueError {
    #[display(fmt = "Invalid quarter: {} (must be 1-{})", "_0", "QUARTERS_PER_YEAR")]
    InvalidQuarter(u8),
    #[display(fmt = "Unknown theme: {}", "_0")]
    UnknownTheme(String),
}

impl std::error::Error for ValueError {}
