//! Reporting period resolution.
//!
//! A dashboard period is either a whole calendar month or the N-th
//! Monday-start week of a month. Week 1 is anchored to a Monday near the
//! 1st (see [`WeekAnchor`]), so it may begin in the previous month.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::PeriodRange;

/// Which Monday starts week 1 of a month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeekAnchor {
    /// The Monday on or before the 1st. The week containing the 1st is
    /// always week 1.
    #[default]
    MondayOnOrBefore,

    /// The first Monday on or after the 1st. Days before it belong to no
    /// week of this month.
    FirstMonday,
}

impl FromStr for WeekAnchor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "monday-on-or-before" => Ok(WeekAnchor::MondayOnOrBefore),
            "first-monday" => Ok(WeekAnchor::FirstMonday),
            other => Err(Error::InvalidArgument(format!("unknown week anchor: {other}"))),
        }
    }
}

/// Week part of a period request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekSelector {
    /// The whole month.
    All,
    /// One-based week of the month. Not range-checked.
    Week(i64),
}

impl FromStr for WeekSelector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(WeekSelector::All);
        }
        s.parse::<i64>()
            .map(WeekSelector::Week)
            .map_err(|_| Error::InvalidArgument(format!("week must be a number or \"all\": {s}")))
    }
}

impl fmt::Display for WeekSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekSelector::All => f.write_str("all"),
            WeekSelector::Week(n) => write!(f, "W{n}"),
        }
    }
}

/// A validated but unresolved period request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodSelector {
    pub year: i32,
    /// Calendar month, nominally 1-12. Values outside that range roll into
    /// neighbouring years.
    pub month: i64,
    pub week: WeekSelector,
}

impl PeriodSelector {
    pub fn new(year: i32, month: i64, week: WeekSelector) -> Self {
        Self { year, month, week }
    }

    /// Build a selector from raw caller input.
    ///
    /// Month and week are required. `year` defaults to the current local
    /// year.
    pub fn from_parts(month: Option<&str>, week: Option<&str>, year: Option<i32>) -> Result<Self> {
        let (Some(month), Some(week)) = (non_empty(month), non_empty(week)) else {
            return Err(Error::InvalidArgument("month and week are required".to_string()));
        };

        let month: i64 = month
            .parse()
            .map_err(|_| Error::InvalidArgument(format!("month must be a number: {month}")))?;
        let week: WeekSelector = week.parse()?;
        let year = year.unwrap_or_else(|| chrono::Local::now().year());

        Ok(Self { year, month, week })
    }

    /// Compute the absolute date range.
    ///
    /// Fails only when the arithmetic leaves chrono's representable range.
    pub fn resolve(&self, anchor: WeekAnchor) -> Result<PeriodRange> {
        let first = first_of_month(self.year, self.month).ok_or_else(|| self.out_of_range())?;

        match self.week {
            WeekSelector::All => {
                let next = first
                    .checked_add_months(chrono::Months::new(1))
                    .ok_or_else(|| self.out_of_range())?;
                Ok(PeriodRange::new(first, next - Duration::days(1)))
            }
            WeekSelector::Week(n) => {
                let week_one = week_one_start(first, anchor);
                let start = n
                    .checked_sub(1)
                    .and_then(|weeks| weeks.checked_mul(7))
                    .and_then(Duration::try_days)
                    .and_then(|offset| week_one.checked_add_signed(offset))
                    .ok_or_else(|| self.out_of_range())?;
                let end = start
                    .checked_add_signed(Duration::days(6))
                    .ok_or_else(|| self.out_of_range())?;
                Ok(PeriodRange::new(start, end))
            }
        }
    }

    fn out_of_range(&self) -> Error {
        Error::InvalidArgument(format!(
            "period out of range: year {} month {} week {}",
            self.year, self.month, self.week
        ))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// First day of `month` in `year`, rolling months outside 1-12 into
/// adjacent years (month 13 is January of the next year, month 0 is
/// December of the previous one).
fn first_of_month(year: i32, month: i64) -> Option<NaiveDate> {
    let index = i64::from(year)
        .checked_mul(12)?
        .checked_add(month.checked_sub(1)?)?;
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = u32::try_from(index.rem_euclid(12) + 1).ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn week_one_start(first: NaiveDate, anchor: WeekAnchor) -> NaiveDate {
    // Days since Monday: Mon = 0 .. Sun = 6.
    let from_monday = i64::from(first.weekday().num_days_from_monday());
    match anchor {
        WeekAnchor::MondayOnOrBefore => first - Duration::days(from_monday),
        WeekAnchor::FirstMonday if first.weekday() == Weekday::Mon => first,
        WeekAnchor::FirstMonday => first + Duration::days(7 - from_monday),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn resolve(year: i32, month: i64, week: WeekSelector) -> PeriodRange {
        PeriodSelector::new(year, month, week)
            .resolve(WeekAnchor::default())
            .unwrap()
    }

    #[test]
    fn test_whole_month() {
        let period = resolve(2024, 1, WeekSelector::All);
        assert_eq!(period.start, date(2024, 1, 1));
        assert_eq!(period.end, date(2024, 1, 31));
        assert_eq!(period.starts_at().to_string(), "2024-01-01 00:00:00");
        assert_eq!(period.ends_at().to_string(), "2024-01-31 23:59:59.999");
    }

    #[test]
    fn test_whole_month_leap_february_and_december() {
        assert_eq!(resolve(2024, 2, WeekSelector::All).end, date(2024, 2, 29));
        assert_eq!(resolve(2025, 2, WeekSelector::All).end, date(2025, 2, 28));
        assert_eq!(resolve(2024, 12, WeekSelector::All).end, date(2024, 12, 31));
    }

    #[test]
    fn test_week_when_month_starts_on_monday() {
        // 1 Jan 2024 is a Monday.
        let week1 = resolve(2024, 1, WeekSelector::Week(1));
        assert_eq!(week1.start, date(2024, 1, 1));
        assert_eq!(week1.end, date(2024, 1, 7));

        let week3 = resolve(2024, 1, WeekSelector::Week(3));
        assert_eq!(week3.start, date(2024, 1, 15));
        assert_eq!(week3.end, date(2024, 1, 21));
    }

    #[test]
    fn test_week_one_reaches_into_previous_month() {
        // 1 Mar 2024 is a Friday: week 1 starts Monday 26 Feb.
        let week1 = resolve(2024, 3, WeekSelector::Week(1));
        assert_eq!(week1.start, date(2024, 2, 26));
        assert_eq!(week1.end, date(2024, 3, 3));
        assert_eq!(week1.start.weekday(), Weekday::Mon);
    }

    #[test]
    fn test_week_one_when_month_starts_on_sunday() {
        // 1 Sep 2024 is a Sunday: the Monday before is 26 Aug.
        let week1 = resolve(2024, 9, WeekSelector::Week(1));
        assert_eq!(week1.start, date(2024, 8, 26));
        assert_eq!(week1.end, date(2024, 9, 1));
    }

    #[test]
    fn test_first_monday_anchor() {
        let selector = PeriodSelector::new(2024, 3, WeekSelector::Week(1));
        let week1 = selector.resolve(WeekAnchor::FirstMonday).unwrap();
        assert_eq!(week1.start, date(2024, 3, 4));
        assert_eq!(week1.end, date(2024, 3, 10));

        let january = PeriodSelector::new(2024, 1, WeekSelector::Week(1));
        assert_eq!(
            january.resolve(WeekAnchor::FirstMonday).unwrap().start,
            date(2024, 1, 1)
        );
    }

    #[test]
    fn test_weeks_always_span_seven_days() {
        for month in 1..=12 {
            for week in 1..=5 {
                let period = resolve(2025, month, WeekSelector::Week(week));
                assert_eq!(period.len_days(), 7);
                assert_eq!(period.start.weekday(), Weekday::Mon);
                assert_eq!(period.end.weekday(), Weekday::Sun);
            }
        }
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let selector = PeriodSelector::new(2024, 6, WeekSelector::Week(2));
        assert_eq!(
            selector.resolve(WeekAnchor::default()).unwrap(),
            selector.resolve(WeekAnchor::default()).unwrap()
        );
    }

    #[test]
    fn test_out_of_range_values_roll_over() {
        assert_eq!(resolve(2024, 13, WeekSelector::All).start, date(2025, 1, 1));
        assert_eq!(resolve(2024, 0, WeekSelector::All).start, date(2023, 12, 1));
        // Week 0 is the week before week 1.
        assert_eq!(resolve(2024, 1, WeekSelector::Week(0)).start, date(2023, 12, 25));
    }

    #[test]
    fn test_from_parts_requires_month_and_week() {
        assert!(matches!(
            PeriodSelector::from_parts(None, Some("1"), Some(2024)),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            PeriodSelector::from_parts(Some("1"), None, Some(2024)),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            PeriodSelector::from_parts(Some(" "), Some("1"), Some(2024)),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_from_parts_parses_selectors() {
        let selector = PeriodSelector::from_parts(Some("3"), Some("ALL"), Some(2024)).unwrap();
        assert_eq!(selector, PeriodSelector::new(2024, 3, WeekSelector::All));

        let selector = PeriodSelector::from_parts(Some("3"), Some("2"), Some(2024)).unwrap();
        assert_eq!(selector.week, WeekSelector::Week(2));

        assert!(PeriodSelector::from_parts(Some("March"), Some("2"), Some(2024)).is_err());
        assert!(PeriodSelector::from_parts(Some("3"), Some("second"), Some(2024)).is_err());
    }

    #[test]
    fn test_from_parts_defaults_to_current_year() {
        let selector = PeriodSelector::from_parts(Some("1"), Some("all"), None).unwrap();
        assert_eq!(selector.year, chrono::Local::now().year());
    }

    #[test]
    fn test_week_anchor_from_str() {
        assert_eq!(
            "first-monday".parse::<WeekAnchor>().unwrap(),
            WeekAnchor::FirstMonday
        );
        assert_eq!(
            "Monday-On-Or-Before".parse::<WeekAnchor>().unwrap(),
            WeekAnchor::MondayOnOrBefore
        );
        assert!("sunday".parse::<WeekAnchor>().is_err());
    }
}
