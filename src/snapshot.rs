use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::calendar::{FiscalPeriod, QuarterInfo, calculate_fiscal_period, get_all_quarters, get_quarter_progress};
use crate::config::FiscalConfig;
use crate::consts::QUARTERS_PER_YEAR;
use crate::sprint::{SprintDates, get_current_sprint_dates, get_sprint_progress};

/// Results of all calculator operations for the same `captured_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiscalSnapshot {
    pub captured_at:      NaiveDateTime,
    pub period:           FiscalPeriod,
    pub quarter_progress: f64,
    pub quarters:         [QuarterInfo; QUARTERS_PER_YEAR as usize],
    pub sprint:           SprintDates,
    pub sprint_progress:  f64,
}

impl FiscalSnapshot {
    /// Evaluates every operation at `now`. Callers refreshing a display call this
    /// on their own schedule; nothing is cached between calls.
    pub fn capture(config: &FiscalConfig, now: NaiveDateTime) -> Self {
        let snapshot = Self {
            captured_at:      now,
            period:           calculate_fiscal_period(config, now),
            quarter_progress: get_quarter_progress(config, now),
            quarters:         get_all_quarters(config, now),
            sprint:           get_current_sprint_dates(config, now),
            sprint_progress:  get_sprint_progress(config, now),
        };
        tracing::trace!(sprint_code = %snapshot.period.sprint_code, "captured fiscal snapshot");
        snapshot
    }

    /// The listed quarter matching the current period, i.e. the one to highlight
    pub fn current_quarter_info(&self) -> Option<&QuarterInfo> {
        self.quarters.iter().find(|info| info.quarter == self.period.quarter)
    }
}
