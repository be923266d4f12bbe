use std::collections::HashMap;

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{FiscalConfig, default_start_date};
use crate::consts::{CONFIG_STORAGE_KEY, CURRENT_SCHEMA_VERSION, MAX_MONTH};
use crate::types::{SprintLength, Theme};

/// Errors raised while reading or writing the stored configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The payload is not a JSON object of the expected shape.
    #[error("malformed stored config: {0}")]
    Json(#[from] serde_json::Error),
}

/// String key-value storage the configuration is persisted in.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
}

/// In-memory [`KeyValueStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_owned(), value);
    }
}

/// Permissive view of any stored shape. Every field is optional and untyped so
/// that a bad value in one field never prevents reading the others.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version:                 Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiscal_year_start_month: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiscal_year_start_date:  Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprint_length_weeks:     Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme:                   Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_sprint_date:       Option<Value>,
}

/// Known stored shapes, oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SchemaVersion {
    /// Month-only fiscal year start
    V1,
    /// Date-based start with optional sprint anchor
    V2,
    /// V2 plus theme, written with an explicit version
    V3,
}

impl SchemaVersion {
    /// Infers the shape of `stored`. An explicit `version` wins; otherwise a
    /// month without a date means v1 and a missing theme means v2.
    pub fn detect(stored: &StoredConfig) -> Self {
        if let Some(version) = stored.version.as_ref().and_then(Value::as_u64) {
            return match version {
                0 | 1 => Self::V1,
                2 => Self::V2,
                _ => Self::V3,
            };
        }

        let has_month = stored.fiscal_year_start_month.as_ref().is_some_and(is_truthy);
        let has_date = stored.fiscal_year_start_date.as_ref().is_some_and(is_truthy);
        if has_month && !has_date {
            Self::V1
        } else if stored.theme.is_none() {
            Self::V2
        } else {
            Self::V3
        }
    }
}

/// Upgrades `stored` to the current schema and validates it.
///
/// `today` supplies the year for the legacy month migration and for the
/// default start date.
pub fn migrate(stored: StoredConfig, today: NaiveDate) -> FiscalConfig {
    let version = SchemaVersion::detect(&stored);
    debug!(?version, "migrating stored fiscal config");

    // a leftover month is honoured whatever version the payload declares
    let stored = upgrade_v1(stored, today);
    let stored = match version {
        SchemaVersion::V1 | SchemaVersion::V2 => upgrade_v2(stored),
        SchemaVersion::V3 => stored,
    };
    validate(stored, today)
}

/// v1 -> v2: day 1 of the stored month, in `today`'s year
fn upgrade_v1(mut stored: StoredConfig, today: NaiveDate) -> StoredConfig {
    let Some(month) = stored.fiscal_year_start_month.take() else {
        return stored;
    };
    if stored.fiscal_year_start_date.as_ref().is_some_and(is_truthy) {
        return stored;
    }

    match as_number(&month).and_then(|m| month_start(today.year(), m)) {
        Some(start) => {
            debug!(%start, "migrated fiscalYearStartMonth");
            stored.fiscal_year_start_date = Some(Value::String(start.to_string()));
        },
        None => warn!(%month, "ignoring invalid fiscalYearStartMonth"),
    }
    stored
}

/// v2 -> v3: themes were introduced with the default `cool`
fn upgrade_v2(mut stored: StoredConfig) -> StoredConfig {
    if stored.theme.is_none() {
        stored.theme = Some(Value::String(Theme::default().to_string()));
    }
    stored
}

fn validate(stored: StoredConfig, today: NaiveDate) -> FiscalConfig {
    let fiscal_year_start_date = stored
        .fiscal_year_start_date
        .as_ref()
        .and_then(|value| {
            let parsed = parse_stored_date(value);
            if parsed.is_none() {
                warn!(%value, "invalid fiscalYearStartDate, using default");
            }
            parsed
        })
        .or_else(|| default_start_date(today.year()));

    let sprint_length_weeks = stored
        .sprint_length_weeks
        .as_ref()
        .filter(|value| is_truthy(value))
        .and_then(|value| as_number(value).and_then(SprintLength::from_raw))
        .unwrap_or_default();

    let theme = stored
        .theme
        .as_ref()
        .and_then(|value| {
            let parsed = value.as_str().and_then(|s| s.parse::<Theme>().ok());
            if parsed.is_none() {
                warn!(%value, "unknown theme, using default");
            }
            parsed
        })
        .unwrap_or_default();

    let first_sprint_date = stored.first_sprint_date.as_ref().filter(|value| is_truthy(value)).and_then(|value| {
        let parsed = parse_stored_date(value);
        if parsed.is_none() {
            warn!(%value, "dropping invalid firstSprintDate");
        }
        parsed
    });

    FiscalConfig {
        fiscal_year_start_date,
        sprint_length_weeks,
        theme,
        first_sprint_date,
    }
}

/// Parses `json` in any known shape into the current schema.
///
/// # Errors
/// Returns `ConfigError::Json` if `json` is not a JSON object.
pub fn parse_config(json: &str, today: NaiveDate) -> Result<FiscalConfig, ConfigError> {
    let stored: StoredConfig = serde_json::from_str(json)?;
    Ok(migrate(stored, today))
}

/// Loads the configuration from `store`, falling back to the defaults when
/// nothing is stored or the payload cannot be parsed.
pub fn load_config<S: KeyValueStore + ?Sized>(store: &S, today: NaiveDate) -> FiscalConfig {
    let Some(raw) = store.get(CONFIG_STORAGE_KEY) else {
        debug!("no stored fiscal config, using defaults");
        return FiscalConfig::default_for(today);
    };

    parse_config(&raw, today).unwrap_or_else(|err| {
        warn!(%err, "error loading saved config, using defaults");
        FiscalConfig::default_for(today)
    })
}

#[derive(Serialize)]
struct SavedConfig<'a> {
    version: u8,
    #[serde(flatten)]
    config:  &'a FiscalConfig,
}

/// Writes `config` to `store` in the current schema.
///
/// # Errors
/// Returns `ConfigError::Json` if serialization fails.
pub fn save_config<S: KeyValueStore + ?Sized>(store: &mut S, config: &FiscalConfig) -> Result<(), ConfigError> {
    let json = serde_json::to_string(&SavedConfig {
        version: CURRENT_SCHEMA_VERSION,
        config,
    })?;
    store.set(CONFIG_STORAGE_KEY, json);
    Ok(())
}

/// Accepts `YYYY-MM-DD`, naive `YYYY-MM-DDTHH:MM:SS[.fff]` and RFC 3339
/// timestamps. Zoned timestamps are read in local time, matching how they were
/// written from a local wall-clock date.
fn parse_stored_date(value: &Value) -> Option<NaiveDate> {
    let text = value.as_str()?.trim();

    if let Ok(date) = text.parse::<NaiveDate>() {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(text) {
        return Some(stamp.with_timezone(&Local).date_naive());
    }
    text.parse::<NaiveDateTime>().ok().map(|stamp| stamp.date())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn month_start(year: i32, month: f64) -> Option<NaiveDate> {
    if month.fract() != 0.0 || !(1.0..=f64::from(MAX_MONTH)).contains(&month) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month as u32, 1)
}

/// Numbers, or strings holding numbers
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Whether a stored value counts as set: not null, false, zero or empty.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
