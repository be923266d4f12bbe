use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_START_DAY, DEFAULT_START_MONTH};
use crate::types::{SprintLength, Theme};

/// Fiscal calendar configuration, read by every calculator operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiscalConfig {
    /// First day of the fiscal year. Only month and day matter for recurrence;
    /// `None` falls back to July 28.
    pub fiscal_year_start_date: Option<NaiveDate>,
    pub sprint_length_weeks: SprintLength,
    #[serde(default)]
    pub theme: Theme,
    /// Absolute start of sprint #1. When set, sprints run as one continuous
    /// grid instead of restarting every quarter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_sprint_date: Option<NaiveDate>,
}

impl FiscalConfig {
    /// Creates a config anchored on `start` with no sprint anchor and the default theme.
    pub fn new(start: NaiveDate, sprint_length_weeks: u32) -> Self {
        Self {
            fiscal_year_start_date: Some(start),
            sprint_length_weeks: SprintLength::from_weeks(sprint_length_weeks),
            theme: Theme::default(),
            first_sprint_date: None,
        }
    }

    /// Default configuration with the start date pinned to `today`'s year.
    pub fn default_for(today: NaiveDate) -> Self {
        Self {
            fiscal_year_start_date: default_start_date(today.year()),
            ..Self::default()
        }
    }

    /// Builder-style setter for the sprint anchor
    #[must_use]
    pub fn with_first_sprint_date(mut self, first: NaiveDate) -> Self {
        self.first_sprint_date = Some(first);
        self
    }

    /// Builder-style setter for the theme
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// `(month, day)` of the yearly anchor, substituting July 28 when unset
    pub fn anchor_month_day(&self) -> (u32, u32) {
        self.fiscal_year_start_date.map_or_else(
            || {
                tracing::debug!("fiscal year start date missing, using default anchor");
                (DEFAULT_START_MONTH, DEFAULT_START_DAY)
            },
            |d| (d.month(), d.day()),
        )
    }

    /// Returns true when sprints follow a continuous grid from `first_sprint_date`
    pub const fn is_sprint_anchored(&self) -> bool {
        self.first_sprint_date.is_some()
    }
}

impl Default for FiscalConfig {
    /// July 28 (year 2000 placeholder; only month/day are read), 3-week sprints,
    /// cool theme, no sprint anchor.
    fn default() -> Self {
        Self {
            fiscal_year_start_date: default_start_date(2000),
            sprint_length_weeks: SprintLength::default(),
            theme: Theme::default(),
            first_sprint_date: None,
        }
    }
}

/// July 28 of `year`
pub(crate) fn default_start_date(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, DEFAULT_START_MONTH, DEFAULT_START_DAY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::date;

    #[test]
    fn test_default_config() {
        let config = FiscalConfig::default();
        assert_eq!(config.anchor_month_day(), (7, 28));
        assert_eq!(config.sprint_length_weeks.weeks(), 3);
        assert_eq!(config.theme, Theme::Cool);
        assert!(!config.is_sprint_anchored());
    }

    #[test]
    fn test_default_for_pins_year() {
        let config = FiscalConfig::default_for(date(2026, 10, 18));
        assert_eq!(config.fiscal_year_start_date, Some(date(2026, 7, 28)));
    }

    #[test]
    fn test_missing_start_uses_default_anchor() {
        let config = FiscalConfig {
            fiscal_year_start_date: None,
            ..FiscalConfig::default()
        };
        assert_eq!(config.anchor_month_day(), (7, 28));
    }

    #[test]
    fn test_builders() {
        let config = FiscalConfig::new(date(2024, 7, 28), 2)
            .with_first_sprint_date(date(2024, 7, 28))
            .with_theme(Theme::Corporate);

        assert_eq!(config.anchor_month_day(), (7, 28));
        assert_eq!(config.sprint_length_weeks.weeks(), 2);
        assert!(config.is_sprint_anchored());
        assert_eq!(config.theme, Theme::Corporate);
    }

    #[test]
    fn test_serde_field_names() {
        let config = FiscalConfig::new(date(2024, 7, 28), 2).with_first_sprint_date(date(2024, 8, 4));
        let json = serde_json::to_value(&config).unwrap();

        assert_eq!(json["fiscalYearStartDate"], "2024-07-28");
        assert_eq!(json["sprintLengthWeeks"], 2);
        assert_eq!(json["theme"], "cool");
        assert_eq!(json["firstSprintDate"], "2024-08-04");

        let back: FiscalConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_serde_omits_missing_sprint_anchor() {
        let json = serde_json::to_value(FiscalConfig::default()).unwrap();
        assert!(json.get("firstSprintDate").is_none());
    }
}
