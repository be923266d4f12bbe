use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::config::FiscalConfig;
use crate::range::DateSpan;
use crate::types::Quarter;

/// The fiscal year containing a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FiscalYearAnchor {
    /// First day of the fiscal year
    start:     NaiveDate,
    /// Calendar year in which the fiscal year ends
    label:     i32,
    /// Configured (month, day), kept to find the next anchor
    month_day: (u32, u32),
}

impl FiscalYearAnchor {
    /// Resolves the fiscal year active at `reference`.
    ///
    /// The configured month/day is transposed into the reference year. On or
    /// after that date the fiscal year started this calendar year and is
    /// labelled `year + 1`; before it, the year started last calendar year and
    /// is labelled `year`.
    pub fn resolve(config: &FiscalConfig, reference: NaiveDateTime) -> Self {
        let month_day = config.anchor_month_day();
        let today = reference.date();
        let year = today.year();

        match transpose(year, month_day) {
            Some(start) if today >= start => Self {
                start,
                label: year + 1,
                month_day,
            },
            _ => Self {
                start: transpose(year - 1, month_day).unwrap_or(NaiveDate::MIN),
                label: year,
                month_day,
            },
        }
    }

    /// First day of the fiscal year
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Fiscal year label (the calendar year in which the fiscal year ends)
    pub const fn label(&self) -> i32 {
        self.label
    }

    /// First day of the following fiscal year
    pub fn next_start(&self) -> NaiveDate {
        transpose(self.label, self.month_day).unwrap_or(NaiveDate::MAX)
    }

    /// Every day of the fiscal year, 365 or 366 of them
    pub fn span(&self) -> DateSpan {
        span_until(self.start, self.next_start())
    }

    /// Midnight on the first day of the fiscal year
    pub fn start_instant(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    /// Wall-clock time elapsed since the anchor (negative before it)
    pub fn elapsed(&self, reference: NaiveDateTime) -> TimeDelta {
        reference - self.start_instant()
    }

    /// Whole days since the anchor, truncated toward zero
    pub fn elapsed_days(&self, reference: NaiveDateTime) -> i64 {
        self.elapsed(reference).num_days()
    }

    /// Quarter containing `reference`
    pub fn quarter_at(&self, reference: NaiveDateTime) -> Quarter {
        Quarter::from_elapsed_days(self.elapsed_days(reference))
    }

    /// Whole days elapsed since the nominal start of the quarter containing
    /// `reference`, i.e. `elapsed_days - (q - 1) * 91.25`. Never negative.
    #[allow(clippy::cast_precision_loss)]
    pub fn days_into_quarter(&self, reference: NaiveDateTime) -> f64 {
        let elapsed = self.elapsed_days(reference);
        let quarter = Quarter::from_elapsed_days(elapsed);
        (elapsed as f64 - quarter.nominal_offset_days()).max(0.0)
    }

    /// First day of `quarter`: anchor + floor((q - 1) * 91.25) days
    pub fn quarter_start(&self, quarter: Quarter) -> NaiveDate {
        add_days(self.start, quarter.start_offset_days())
    }

    /// Inclusive dates of `quarter`. Q4 runs to the day before the next anchor,
    /// so the four quarters tile the fiscal year exactly.
    pub fn quarter_span(&self, quarter: Quarter) -> DateSpan {
        let next = quarter.next().map_or_else(|| self.next_start(), |q| self.quarter_start(q));
        span_until(self.quarter_start(quarter), next)
    }
}

/// `month`/`day` in `year`, rolling an out-of-range day into the next month
/// (Feb 29 in a common year becomes March 1).
fn transpose(year: i32, (month, day): (u32, u32)) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)?.checked_add_days(Days::new(u64::from(day.saturating_sub(1))))
}

pub(crate) fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.unwrap_or(if days >= 0 { NaiveDate::MAX } else { NaiveDate::MIN })
}

/// `[start, end_exclusive)` as an inclusive span
fn span_until(start: NaiveDate, end_exclusive: NaiveDate) -> DateSpan {
    let len = u64::try_from((end_exclusive - start).num_days()).unwrap_or(1);
    DateSpan::starting_at(start, len)
}
