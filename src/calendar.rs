use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::anchor::FiscalYearAnchor;
use crate::config::FiscalConfig;
use crate::consts::{DISPLAY_SEPARATOR, LONG_DATE_FORMAT, QUARTER_LENGTH_DAYS, QUARTERS_PER_YEAR};
use crate::range::DateSpan;
use crate::sprint;
use crate::types::Quarter;

/// Fiscal coordinates of a single instant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiscalPeriod {
    pub fiscal_year:  i32,
    pub quarter:      Quarter,
    pub sprint:       u32,
    /// `FY2025 Q1`
    pub display_year: String,
    /// `2025.1.3`
    pub sprint_code:  String,
}

impl FiscalPeriod {
    /// Builds a period and its two display strings
    pub fn new(fiscal_year: i32, quarter: Quarter, sprint: u32) -> Self {
        Self {
            fiscal_year,
            quarter,
            sprint,
            display_year: format!("FY{fiscal_year} {quarter}"),
            sprint_code: format!("{fiscal_year}.{}.{sprint}", quarter.get()),
        }
    }
}

/// One quarter of a fiscal year, as listed by [`get_all_quarters`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarterInfo {
    pub quarter:      Quarter,
    pub start_date:   NaiveDate,
    /// Last day of the quarter (inclusive)
    pub end_date:     NaiveDate,
    /// `Q1 FY25 – July 28, 2024 – October 26, 2024`
    pub display_text: String,
}

impl QuarterInfo {
    fn new(anchor: &FiscalYearAnchor, quarter: Quarter) -> Self {
        let span = anchor.quarter_span(quarter);
        let short_year = anchor.label().rem_euclid(100);
        let display_text = format!(
            "{quarter} FY{short_year:02}{DISPLAY_SEPARATOR}{}{DISPLAY_SEPARATOR}{}",
            span.start().format(LONG_DATE_FORMAT),
            span.end().format(LONG_DATE_FORMAT),
        );

        Self {
            quarter,
            start_date: span.start(),
            end_date: span.end(),
            display_text,
        }
    }

    /// The quarter's dates as a span
    pub fn span(&self) -> DateSpan {
        DateSpan::new(self.start_date, self.end_date)
            .unwrap_or_else(|_| DateSpan::starting_at(self.start_date, 1))
    }

    /// Checks if `date` falls inside the quarter
    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.start_date <= *date && *date <= self.end_date
    }
}

/// Fiscal year, quarter and sprint at `date`.
pub fn calculate_fiscal_period(config: &FiscalConfig, date: NaiveDateTime) -> FiscalPeriod {
    let anchor = FiscalYearAnchor::resolve(config, date);
    let quarter = anchor.quarter_at(date);
    let sprint = sprint::sprint_number(config, &anchor, date);

    FiscalPeriod::new(anchor.label(), quarter, sprint)
}

/// Fraction of the current quarter elapsed at `date`, in `[0, 1]`.
///
/// Whole elapsed days are measured from the nominal `(q - 1) * 91.25` quarter
/// start, so the value moves once per day and can only reach 1 late in Q4.
pub fn get_quarter_progress(config: &FiscalConfig, date: NaiveDateTime) -> f64 {
    let anchor = FiscalYearAnchor::resolve(config, date);
    let fraction = anchor.days_into_quarter(date) / QUARTER_LENGTH_DAYS;
    fraction.clamp(0.0, 1.0)
}

/// The four quarters of the fiscal year containing `date`, ascending.
pub fn get_all_quarters(
    config: &FiscalConfig,
    date: NaiveDateTime,
) -> [QuarterInfo; QUARTERS_PER_YEAR as usize] {
    let anchor = FiscalYearAnchor::resolve(config, date);
    Quarter::all().map(|quarter| QuarterInfo::new(&anchor, quarter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{at, date, quarter};

    fn july_28() -> FiscalConfig {
        FiscalConfig::new(date(2024, 7, 28), 2)
    }

    #[test]
    fn test_period_on_anchor_day() {
        let period = calculate_fiscal_period(&july_28(), at(2024, 7, 28, 9, 30));

        assert_eq!(period.fiscal_year, 2025);
        assert_eq!(period.quarter, quarter(1));
        assert_eq!(period.sprint, 1);
        assert_eq!(period.display_year, "FY2025 Q1");
        assert_eq!(period.sprint_code, "2025.1.1");
    }

    #[test]
    fn test_period_day_before_anchor_belongs_to_previous_year() {
        let period = calculate_fiscal_period(&july_28(), at(2024, 7, 27, 12, 0));

        // 365 days after 2023-07-28, i.e. the tail of Q4 rather than a clamped Q1
        assert_eq!(period.fiscal_year, 2024);
        assert_eq!(period.quarter, quarter(4));
        assert_eq!(period.display_year, "FY2024 Q4");
    }

    #[test]
    fn test_period_cases() {
        struct TestCase {
            reference:   NaiveDateTime,
            weeks:       u32,
            code:        &'static str,
            description: &'static str,
        }

        let cases = [
            TestCase {
                reference:   at(2024, 8, 10, 23, 59),
                weeks:       2,
                code:        "2025.1.1",
                description: "last minute of the first two-week sprint",
            },
            TestCase {
                reference:   at(2024, 8, 11, 0, 0),
                weeks:       2,
                code:        "2025.1.2",
                description: "first day of the second two-week sprint",
            },
            TestCase {
                reference:   at(2024, 10, 26, 12, 0),
                weeks:       2,
                code:        "2025.1.6",
                description: "last day of Q1, sprint clamped to six",
            },
            TestCase {
                reference:   at(2024, 11, 1, 12, 0),
                weeks:       3,
                code:        "2025.2.1",
                description: "early Q2, sprints restart each quarter",
            },
            TestCase {
                reference:   at(2025, 3, 1, 12, 0),
                weeks:       4,
                code:        "2025.3.2",
                description: "mid Q3 with four-week sprints",
            },
        ];

        for case in &cases {
            let config = FiscalConfig::new(date(2024, 7, 28), case.weeks);
            let period = calculate_fiscal_period(&config, case.reference);
            assert_eq!(period.sprint_code, case.code, "{}", case.description);
        }
    }

    #[test]
    fn test_period_serde() {
        let period = calculate_fiscal_period(&july_28(), at(2024, 7, 28, 0, 0));
        let json = serde_json::to_value(&period).unwrap();

        assert_eq!(json["fiscalYear"], 2025);
        assert_eq!(json["quarter"], 1);
        assert_eq!(json["displayYear"], "FY2025 Q1");
        assert_eq!(json["sprintCode"], "2025.1.1");
    }

    #[test]
    fn test_quarter_progress() {
        let config = july_28();

        assert!(get_quarter_progress(&config, at(2024, 7, 28, 0, 0)).abs() < f64::EPSILON);
        assert!(get_quarter_progress(&config, at(2024, 7, 28, 23, 0)).abs() < f64::EPSILON);

        let halfway = get_quarter_progress(&config, at(2024, 9, 11, 0, 0));
        assert!((halfway - 45.0 / 91.25).abs() < 1e-12);

        // 2024-10-27 is day 91: still Q1 by the 91.25-day rule
        let tail = get_quarter_progress(&config, at(2024, 10, 27, 0, 0));
        assert!((tail - 91.0 / 91.25).abs() < 1e-12);

        // day 92 is measured from the nominal Q2 start at day 91.25
        let reset = get_quarter_progress(&config, at(2024, 10, 28, 0, 0));
        assert!((reset - 0.75 / 91.25).abs() < 1e-12);
    }

    #[test]
    fn test_fallback_mode_measures_from_nominal_quarter_start() {
        struct TestCase {
            reference: NaiveDateTime,
            code:      &'static str,
            progress:  f64,
        }

        let cases = [
            // day 105: 13.75 days into Q2, still the first two-week sprint
            TestCase { reference: at(2024, 11, 10, 12, 0), code: "2025.2.1", progress: 13.75 / 91.25 },
            TestCase { reference: at(2024, 11, 11, 0, 0), code: "2025.2.2", progress: 14.75 / 91.25 },
            // day 196: 13.5 days into Q3
            TestCase { reference: at(2025, 2, 9, 0, 0), code: "2025.3.1", progress: 13.5 / 91.25 },
            // day 287: 13.25 days into Q4
            TestCase { reference: at(2025, 5, 11, 0, 0), code: "2025.4.1", progress: 13.25 / 91.25 },
        ];

        let config = july_28();
        for case in &cases {
            let period = calculate_fiscal_period(&config, case.reference);
            assert_eq!(period.sprint_code, case.code, "at {}", case.reference);

            let progress = get_quarter_progress(&config, case.reference);
            assert!((progress - case.progress).abs() < 1e-12, "at {}", case.reference);
        }
    }

    #[test]
    fn test_quarter_progress_saturates_in_leap_year() {
        // FY2024 spans 2023-07-28..=2024-07-27 and contains Feb 29
        let progress = get_quarter_progress(&july_28(), at(2024, 7, 27, 0, 0));
        assert!((progress - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_all_quarters() {
        let quarters = get_all_quarters(&july_28(), at(2024, 9, 1, 0, 0));

        assert_eq!(quarters[0].display_text, "Q1 FY25 – July 28, 2024 – October 26, 2024");
        assert_eq!(quarters[1].display_text, "Q2 FY25 – October 27, 2024 – January 25, 2025");
        assert_eq!(quarters[2].display_text, "Q3 FY25 – January 26, 2025 – April 26, 2025");
        assert_eq!(quarters[3].display_text, "Q4 FY25 – April 27, 2025 – July 27, 2025");

        for (i, info) in quarters.iter().enumerate() {
            assert_eq!(usize::from(info.quarter.get()), i + 1);
        }
        for pair in quarters.windows(2) {
            assert!(pair[0].span().is_followed_by(&pair[1].span()));
        }
    }

    #[test]
    fn test_all_quarters_same_year_from_any_day() {
        let config = july_28();
        let early = get_all_quarters(&config, at(2024, 7, 28, 0, 0));
        let late = get_all_quarters(&config, at(2025, 7, 27, 23, 59));
        assert_eq!(early, late);
    }

    #[test]
    fn test_quarter_info_contains() {
        let quarters = get_all_quarters(&july_28(), at(2024, 9, 1, 0, 0));
        assert!(quarters[0].contains(&date(2024, 9, 1)));
        assert!(!quarters[1].contains(&date(2024, 9, 1)));
    }

    #[test]
    fn test_short_year_keeps_leading_zero() {
        let config = FiscalConfig::new(date(2008, 1, 1), 2);
        let quarters = get_all_quarters(&config, at(2008, 6, 1, 0, 0));
        assert!(quarters[0].display_text.starts_with("Q1 FY09 – "));
    }
}
