/// Number of quarters in a fiscal year
pub const QUARTERS_PER_YEAR: u8 = 4;

/// Approximate quarter length in days (365 / 4)
pub const QUARTER_LENGTH_DAYS: f64 = 91.25;

/// Approximate quarter length in weeks, used to size sprint grids
pub const WEEKS_PER_QUARTER: u32 = 13;

/// Days in a week
pub const DAYS_PER_WEEK: u32 = 7;

/// Milliseconds in a wall-clock day
pub const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// Month of the fiscal-year anchor used when none is configured (July)
pub const DEFAULT_START_MONTH: u32 = 7;
/// Day of the fiscal-year anchor used when none is configured
pub const DEFAULT_START_DAY: u32 = 28;

/// Sprint length assumed when the stored value is missing or zero
pub const DEFAULT_SPRINT_LENGTH_WEEKS: u32 = 3;
/// Shortest sprint the calculator will work with
pub const MIN_SPRINT_LENGTH_WEEKS: u32 = 1;

/// Key under which the configuration is persisted
pub const CONFIG_STORAGE_KEY: &str = "fiscal-config";

/// Schema version written by `save_config`
pub const CURRENT_SCHEMA_VERSION: u8 = 3;

/// Separator used in human-readable quarter summaries
pub const DISPLAY_SEPARATOR: &str = " – ";

/// `strftime` pattern for long-form dates ("July 28, 2024")
pub const LONG_DATE_FORMAT: &str = "%B %-d, %Y";
