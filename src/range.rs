//! Report date ranges
//!
//! Weeks run Sunday to Saturday. "This week" ends today, so a report run
//! mid-week covers the days so far.

use calreport_core::error::{CalreportError, Result};
use calreport_core::types::DateRange;
use chrono::{Datelike, Duration, NaiveDate};

/// Sunday on or before `today`
pub fn week_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(today.weekday().num_days_from_sunday() as i64)
}

/// From the most recent Sunday up to and including `today`
pub fn this_week(today: NaiveDate) -> DateRange {
    DateRange::new(week_start(today), today).unwrap_or_else(|_| DateRange::single(today))
}

/// The full Sunday to Saturday week before the current one
pub fn last_week(today: NaiveDate) -> DateRange {
    let start = week_start(today) - Duration::days(7);
    DateRange::new(start, start + Duration::days(6)).unwrap_or_else(|_| DateRange::single(start))
}

/// Build a range from optional bounds
///
/// A missing start defaults to the start of the week containing the end; a
/// missing end defaults to `today`.
pub fn from_bounds(
    since: Option<NaiveDate>,
    until: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<DateRange> {
    let end = until.unwrap_or(today);
    let start = since.unwrap_or_else(|| week_start(end));
    DateRange::new(start, end)
}

/// Parse a date given as YYYY-MM-DD, or YYYY-MM for the first of the month
///
/// # Example
///
/// ```
/// use calreport::range::parse_date;
/// use chrono::Datelike;
///
/// let date = parse_date("2024-01-15").unwrap();
/// assert_eq!(date.day(), 15);
///
/// let date = parse_date("2024-02").unwrap();
/// assert_eq!((date.month(), date.day()), (2, 1));
/// ```
pub fn parse_date(date_str: &str) -> Result<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
        return Ok(date);
    }

    let (year, month) = parse_year_month(date_str)?;
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| CalreportError::InvalidDate(format!("Invalid date: {date_str}")))
}

/// Parse an upper bound; YYYY-MM means the last day of that month
pub fn parse_until(date_str: &str) -> Result<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
        return Ok(date);
    }

    let (year, month) = parse_year_month(date_str)?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| CalreportError::InvalidDate(format!("Invalid date: {date_str}")))
}

fn parse_year_month(date_str: &str) -> Result<(i32, u32)> {
    let parts: Vec<&str> = date_str.split('-').collect();
    if parts.len() != 2 {
        return Err(CalreportError::InvalidDate(format!(
            "Invalid date format '{date_str}', expected YYYY-MM-DD or YYYY-MM"
        )));
    }

    let year = parts[0]
        .parse::<i32>()
        .map_err(|_| CalreportError::InvalidDate(format!("Invalid year in '{date_str}'")))?;
    let month = parts[1]
        .parse::<u32>()
        .map_err(|_| CalreportError::InvalidDate(format!("Invalid month in '{date_str}'")))?;

    if !(1..=12).contains(&month) {
        return Err(CalreportError::InvalidDate(format!(
            "Month must be between 1-12, got {month}"
        )));
    }

    Ok((year, month))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_start() {
        // 2024-01-10 is a Wednesday
        assert_eq!(week_start(date(2024, 1, 10)), date(2024, 1, 7));
        assert_eq!(week_start(date(2024, 1, 7)), date(2024, 1, 7));
        assert_eq!(week_start(date(2024, 1, 13)), date(2024, 1, 7));
        assert_eq!(week_start(date(2024, 1, 10)).weekday(), Weekday::Sun);
    }

    #[test]
    fn test_this_week_ends_today() {
        let range = this_week(date(2024, 1, 10));
        assert_eq!(range.start(), date(2024, 1, 7));
        assert_eq!(range.end(), date(2024, 1, 10));

        let sunday = this_week(date(2024, 1, 14));
        assert_eq!(sunday.num_days(), 1);
    }

    #[test]
    fn test_last_week_is_full_week() {
        let range = last_week(date(2024, 1, 10));
        assert_eq!(range.start(), date(2023, 12, 31));
        assert_eq!(range.end(), date(2024, 1, 6));
        assert_eq!(range.num_days(), 7);
    }

    #[test]
    fn test_from_bounds() {
        let today = date(2024, 1, 10);
        let range = from_bounds(None, None, today).unwrap();
        assert_eq!(range, this_week(today));

        let range = from_bounds(Some(date(2024, 1, 1)), Some(date(2024, 1, 14)), today).unwrap();
        assert_eq!(range.num_days(), 14);

        assert!(from_bounds(Some(date(2024, 1, 14)), Some(date(2024, 1, 1)), today).is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-01-15").unwrap(), date(2024, 1, 15));
        assert_eq!(parse_date("2024-01").unwrap(), date(2024, 1, 1));

        assert!(parse_date("invalid").is_err());
        assert!(parse_date("2024-13").is_err());
        assert!(parse_date("2024").is_err());
    }

    #[test]
    fn test_parse_until_month_means_last_day() {
        assert_eq!(parse_until("2024-02").unwrap(), date(2024, 2, 29));
        assert_eq!(parse_until("2023-12").unwrap(), date(2023, 12, 31));
        assert_eq!(parse_until("2024-01-15").unwrap(), date(2024, 1, 15));
        assert!(parse_until("2024-00").is_err());
    }
}
