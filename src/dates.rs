//! Date helpers shared by every category.
//!
//! Sheet cells hold `DD/MM/YYYY` or `DD/MM/YYYY HH:MM:SS`, sometimes with
//! extra locale text after the first space. Only the date portion matters
//! for reporting.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc, Weekday};

/// India Standard Time, UTC+5:30, in seconds.
const IST_OFFSET_SECONDS: i32 = 5 * 3600 + 30 * 60;

/// Parse the date portion of a sheet cell.
///
/// Returns `None` for empty cells, cells without three `/`-separated
/// components, non-numeric components and impossible dates. Two-digit years
/// are read as 20YY.
pub fn parse_local_date(cell: &str) -> Option<NaiveDate> {
    let date_part = cell.trim().split(' ').next()?;
    let parts: Vec<&str> = date_part.split('/').collect();
    let [day, month, year] = parts.as_slice() else {
        return None;
    };

    let day: u32 = day.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    let mut year_value: i32 = year.parse().ok()?;
    if year.len() == 2 {
        year_value += 2000;
    }

    NaiveDate::from_ymd_opt(year_value, month, day)
}

/// Format a date the way it is written back to the sheets.
pub fn format_local_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Count Monday-Friday days in `[start, end]`, both inclusive.
pub fn working_days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| !matches!(day.weekday(), Weekday::Sat | Weekday::Sun))
        .count() as i64
}

/// Working days elapsed after `start` up to and including `end`.
///
/// The start day itself is not counted, so a ticket closed on the day it
/// was raised has elapsed 0 days (or -1 when raised on a weekend).
pub fn elapsed_working_days(start: NaiveDate, end: NaiveDate) -> i64 {
    working_days_between(start, end) - 1
}

/// The fixed UTC+5:30 offset used for all stamped dates.
pub fn ist_offset() -> FixedOffset {
    FixedOffset::east_opt(IST_OFFSET_SECONDS).expect("UTC+5:30 is a valid offset")
}

/// Calendar date of `now` in India Standard Time.
pub fn ist_date(now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&ist_offset()).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_plain_date() {
        assert_eq!(parse_local_date("04/03/2024"), Some(date(2024, 3, 4)));
        assert_eq!(parse_local_date("4/3/2024"), Some(date(2024, 3, 4)));
    }

    #[test]
    fn test_parse_ignores_time_and_trailing_text() {
        assert_eq!(
            parse_local_date("04/03/2024 17:45:10"),
            Some(date(2024, 3, 4))
        );
        assert_eq!(
            parse_local_date("04/03/2024 5:45:10 pm IST"),
            Some(date(2024, 3, 4))
        );
    }

    #[test]
    fn test_parse_two_digit_year() {
        assert_eq!(parse_local_date("31/12/24"), Some(date(2024, 12, 31)));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(parse_local_date(""), None);
        assert_eq!(parse_local_date("N/A"), None);
        assert_eq!(parse_local_date("2024-03-04T10:00:00.000Z"), None);
        assert_eq!(parse_local_date("04/03"), None);
        assert_eq!(parse_local_date("04/03/2024/1"), None);
        assert_eq!(parse_local_date("aa/03/2024"), None);
        assert_eq!(parse_local_date("31/02/2024"), None);
    }

    #[test]
    fn test_format_local_date() {
        assert_eq!(format_local_date(date(2024, 3, 4)), "04/03/2024");
        assert_eq!(parse_local_date(&format_local_date(date(2024, 3, 4))), Some(date(2024, 3, 4)));
    }

    #[test]
    fn test_working_days_full_week() {
        // Mon 4 Mar .. Fri 8 Mar 2024
        assert_eq!(working_days_between(date(2024, 3, 4), date(2024, 3, 8)), 5);
        assert_eq!(elapsed_working_days(date(2024, 3, 4), date(2024, 3, 8)), 4);
    }

    #[test]
    fn test_working_days_skip_weekend() {
        // Fri 8 Mar .. Tue 12 Mar 2024: Fri, Mon, Tue
        assert_eq!(working_days_between(date(2024, 3, 8), date(2024, 3, 12)), 3);
        assert_eq!(elapsed_working_days(date(2024, 3, 8), date(2024, 3, 12)), 2);
    }

    #[test]
    fn test_working_days_same_day_and_reversed() {
        assert_eq!(elapsed_working_days(date(2024, 3, 4), date(2024, 3, 4)), 0);
        assert_eq!(elapsed_working_days(date(2024, 3, 9), date(2024, 3, 9)), -1);
        assert_eq!(working_days_between(date(2024, 3, 8), date(2024, 3, 4)), 0);
    }

    #[test]
    fn test_ist_conversions() {
        let now = Utc.with_ymd_and_hms(2024, 3, 4, 19, 0, 0).unwrap();
        assert_eq!(ist_date(now), date(2024, 3, 5));

        let morning = Utc.with_ymd_and_hms(2024, 3, 4, 18, 29, 59).unwrap();
        assert_eq!(ist_date(morning), date(2024, 3, 4));
    }
}
