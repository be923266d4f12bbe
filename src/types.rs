use crate::ValueError;
use crate::consts::{
    DAYS_PER_WEEK, MIN_SPRINT_LENGTH_WEEKS, MS_PER_DAY, QUARTER_LENGTH_DAYS, QUARTERS_PER_YEAR,
    WEEKS_PER_QUARTER,
};
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::num::NonZeroU8;
use std::str::FromStr;

/// A fiscal quarter guaranteed to be in the range `1..=QUARTERS_PER_YEAR` (1..=4)
/// Uses `NonZeroU8` internally, so 0 is not a valid quarter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
#[display(fmt = "Q{}", "_0")]
#[serde(try_from = "u8", into = "u8")]
pub struct Quarter(NonZeroU8);

impl Quarter {
    /// Creates a new Quarter, validating that it's within `1..=QUARTERS_PER_YEAR`
    ///
    /// # Errors
    /// Returns `ValueError::InvalidQuarter` if the value is 0 or > `QUARTERS_PER_YEAR`.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        let non_zero = NonZeroU8::new(value).ok_or(ValueError::InvalidQuarter(value))?;
        if value > QUARTERS_PER_YEAR {
            return Err(ValueError::InvalidQuarter(value));
        }
        Ok(Self(non_zero))
    }

    /// The quarter containing `days` elapsed days since the fiscal-year anchor.
    ///
    /// Out-of-range inputs clamp: negative days land in Q1, anything past the
    /// fourth 91.25-day block stays in Q4.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn from_elapsed_days(days: i64) -> Self {
        let index = if days < 0 {
            0
        } else {
            (days as f64 / QUARTER_LENGTH_DAYS).floor() as i64
        };
        Self::clamped(index + 1)
    }

    // clamp keeps q inside 1..=4, so the narrowing cast is lossless
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn clamped(value: i64) -> Self {
        let q = value.clamp(1, i64::from(QUARTERS_PER_YEAR)) as u8;
        Self(NonZeroU8::MIN.saturating_add(q - 1))
    }

    /// All quarters of a fiscal year, ascending
    #[allow(clippy::cast_possible_wrap)]
    pub fn all() -> [Self; QUARTERS_PER_YEAR as usize] {
        std::array::from_fn(|i| Self::clamped(i as i64 + 1))
    }

    /// Returns the quarter number as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }

    /// The following quarter, or `None` for Q4
    pub fn next(self) -> Option<Self> {
        Self::new(self.get() + 1).ok()
    }

    /// Nominal start of the quarter in days since the anchor, `(q - 1) * 91.25`
    pub fn nominal_offset_days(self) -> f64 {
        f64::from(self.get() - 1) * QUARTER_LENGTH_DAYS
    }

    /// First whole day of the quarter relative to the anchor, `floor((q - 1) * 91.25)`
    #[allow(clippy::cast_possible_truncation)]
    pub fn start_offset_days(self) -> i64 {
        self.nominal_offset_days().floor() as i64
    }
}

impl TryFrom<u8> for Quarter {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quarter> for u8 {
    fn from(quarter: Quarter) -> Self {
        quarter.0.get()
    }
}

/// Sprint length in whole weeks, never below `MIN_SPRINT_LENGTH_WEEKS`.
///
/// Construction is total: zero is coerced up to the minimum instead of
/// rejected, so every configuration yields a usable sprint grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
#[display(fmt = "{} weeks", "_0")]
#[serde(from = "u32", into = "u32")]
pub struct SprintLength(NonZeroU32);

impl SprintLength {
    /// Creates a sprint length, coercing 0 to `MIN_SPRINT_LENGTH_WEEKS`
    pub fn from_weeks(weeks: u32) -> Self {
        let weeks = weeks.max(MIN_SPRINT_LENGTH_WEEKS);
        Self(NonZeroU32::new(weeks).unwrap_or(NonZeroU32::MIN))
    }

    /// Coerces a raw, possibly fractional or negative, week count.
    /// Non-finite values yield `None` so the caller can pick its own default.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_raw(weeks: f64) -> Option<Self> {
        if !weeks.is_finite() {
            return None;
        }
        let floored = weeks.floor().clamp(0.0, f64::from(u32::MAX));
        Some(Self::from_weeks(floored as u32))
    }

    /// Returns the length in weeks
    #[inline]
    pub const fn weeks(self) -> u32 {
        self.0.get()
    }

    /// Returns the length in days
    pub const fn days(self) -> i64 {
        self.0.get() as i64 * DAYS_PER_WEEK as i64
    }

    /// Returns the length in milliseconds
    pub const fn window_ms(self) -> i64 {
        self.days() * MS_PER_DAY
    }

    /// `floor(13 / weeks)`, with a floor of one sprint for sprints longer than a quarter
    pub const fn sprints_per_quarter(self) -> u32 {
        let per_quarter = WEEKS_PER_QUARTER / self.0.get();
        if per_quarter == 0 { 1 } else { per_quarter }
    }
}

impl From<u32> for SprintLength {
    fn from(weeks: u32) -> Self {
        Self::from_weeks(weeks)
    }
}

impl From<SprintLength> for u32 {
    fn from(length: SprintLength) -> Self {
        length.weeks()
    }
}

impl Default for SprintLength {
    fn default() -> Self {
        Self::from_weeks(crate::consts::DEFAULT_SPRINT_LENGTH_WEEKS)
    }
}

/// Display theme. Carried through the configuration, never read by the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    #[display(fmt = "cool")]
    Cool,
    #[display(fmt = "corporate")]
    Corporate,
}

impl FromStr for Theme {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "cool" => Ok(Self::Cool),
            "corporate" => Ok(Self::Corporate),
            other => Err(ValueError::UnknownTheme(other.to_owned())),
        }
    }
}
