use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::anchor::{FiscalYearAnchor, add_days};
use crate::config::FiscalConfig;
use crate::consts::DAYS_PER_WEEK;
use crate::range::DateSpan;
use crate::types::SprintLength;

/// Inclusive dates of one sprint window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SprintDates {
    pub start_date: NaiveDate,
    /// `start_date + length - 1 day`
    pub end_date:   NaiveDate,
}

impl SprintDates {
    /// The window as a span
    pub fn span(&self) -> DateSpan {
        DateSpan::new(self.start_date, self.end_date)
            .unwrap_or_else(|_| DateSpan::starting_at(self.start_date, 1))
    }
}

impl From<DateSpan> for SprintDates {
    fn from(span: DateSpan) -> Self {
        Self {
            start_date: span.start(),
            end_date:   span.end(),
        }
    }
}

/// Where sprint windows are counted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SprintGrid {
    /// Continuous windows from the configured first sprint
    Anchored { origin: NaiveDate },
    /// Windows restarting at the start of the quarter containing the reference
    Quarterly { origin: NaiveDate },
}

impl SprintGrid {
    /// Picks the grid for `reference`, using `anchor` to find the quarter start
    /// when no sprint anchor is configured.
    pub fn new(config: &FiscalConfig, anchor: &FiscalYearAnchor, reference: NaiveDateTime) -> Self {
        config.first_sprint_date.map_or_else(
            || Self::Quarterly {
                origin: anchor.quarter_start(anchor.quarter_at(reference)),
            },
            |origin| Self::Anchored { origin },
        )
    }

    /// First day of window zero
    pub const fn origin(&self) -> NaiveDate {
        match *self {
            Self::Anchored { origin } | Self::Quarterly { origin } => origin,
        }
    }

    /// Whole windows elapsed between the origin and `reference`; 0 before the origin
    pub fn window_index(&self, length: SprintLength, reference: NaiveDateTime) -> i64 {
        let elapsed_ms = (reference - self.origin().and_time(chrono::NaiveTime::MIN)).num_milliseconds();
        if elapsed_ms < 0 {
            return 0;
        }
        elapsed_ms / length.window_ms()
    }

    /// The window containing `reference`, or window zero before the origin
    pub fn window(&self, length: SprintLength, reference: NaiveDateTime) -> DateSpan {
        let offset = self.window_index(length, reference) * length.days();
        let start = add_days(self.origin(), offset);
        DateSpan::starting_at(start, length.days().unsigned_abs())
    }
}

/// Sprint number within the quarter, in `1..=floor(13 / weeks)`.
///
/// Anchored grids wrap the continuous window count every `floor(13 / weeks)`
/// sprints. Quarterly grids count whole weeks from the nominal
/// `(q - 1) * 91.25` quarter start and saturate at the last sprint of the quarter.
pub(crate) fn sprint_number(config: &FiscalConfig, anchor: &FiscalYearAnchor, reference: NaiveDateTime) -> u32 {
    let length = config.sprint_length_weeks;
    let per_quarter = i64::from(length.sprints_per_quarter());

    let sprint = match SprintGrid::new(config, anchor, reference) {
        grid @ SprintGrid::Anchored { .. } => grid.window_index(length, reference) % per_quarter + 1,
        SprintGrid::Quarterly { .. } => {
            let weeks_into_quarter = (anchor.days_into_quarter(reference) / f64::from(DAYS_PER_WEEK)).floor();
            #[allow(clippy::cast_possible_truncation)]
            let index = (weeks_into_quarter / f64::from(length.weeks())).floor() as i64;
            index + 1
        },
    };
    // clamped into 1..=per_quarter, which fits u32
    u32::try_from(sprint.clamp(1, per_quarter)).unwrap_or(1)
}

/// Dates of the sprint containing `date`.
///
/// Before a configured first sprint, the first sprint is returned.
pub fn get_current_sprint_dates(config: &FiscalConfig, date: NaiveDateTime) -> SprintDates {
    let anchor = FiscalYearAnchor::resolve(config, date);
    let grid = SprintGrid::new(config, &anchor, date);
    grid.window(config.sprint_length_weeks, date).into()
}

/// Fraction of the current sprint elapsed at `date`, in `[0, 1]`.
///
/// Measured to the millisecond, so it advances continuously through the day.
/// Before a configured first sprint, progress is 0.
pub fn get_sprint_progress(config: &FiscalConfig, date: NaiveDateTime) -> f64 {
    let anchor = FiscalYearAnchor::resolve(config, date);
    let length = config.sprint_length_weeks;
    let window = SprintGrid::new(config, &anchor, date).window(length, date);

    let elapsed_ms = (date - window.start_instant()).num_milliseconds();
    #[allow(clippy::cast_precision_loss)]
    let fraction = elapsed_ms as f64 / length.window_ms() as f64;
    fraction.clamp(0.0, 1.0)
}
