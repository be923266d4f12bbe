use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

/// An inclusive span of calendar days.
/// The start date must be less than or equal to the end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateSpan {
    start: NaiveDate,
    end:   NaiveDate,
}

/// Error type for date span operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// Start date is after end date.
    #[error("Invalid date span: start ({start}) is after end ({end})")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

impl DateSpan {
    /// Creates a new date span with validation.
    ///
    /// # Errors
    /// Returns `RangeError::InvalidRange` if start > end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Span of `len_days` days beginning at `start`; `len_days` below 1 is treated as 1.
    pub fn starting_at(start: NaiveDate, len_days: u64) -> Self {
        let end = start
            .checked_add_days(Days::new(len_days.max(1) - 1))
            .unwrap_or(NaiveDate::MAX);
        Self { start, end }
    }

    /// Returns the first day of the span
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Returns the last day of the span (inclusive)
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns both start and end dates as a tuple
    pub const fn dates(&self) -> (NaiveDate, NaiveDate) {
        (self.start, self.end)
    }

    /// Number of days covered, counting both ends
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Midnight at the start of the span
    pub fn start_instant(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    /// The day after the span ends, or `None` at the end of the calendar
    pub fn end_exclusive(&self) -> Option<NaiveDate> {
        self.end.succ_opt()
    }

    /// Checks if the span contains a given date
    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.start <= *date && *date <= self.end
    }

    /// Checks if `other` begins on the day after this span ends
    pub fn is_followed_by(&self, other: &Self) -> bool {
        self.end_exclusive() == Some(other.start)
    }
}
