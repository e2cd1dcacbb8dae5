//! Lenient date parsing.
//!
//! Intake sheets are filled by hand and exported through spreadsheets, so the
//! same column mixes ISO dates, day-first dates and timestamps. Day-first is
//! assumed for every ambiguous slash or dash form.

use chrono::NaiveDate;

/// Date-only formats, tried in order.
const DATE_FORMATS: [&str; 5] = [
    "%Y-%m-%d", // 2024-01-15
    "%Y/%m/%d", // 2024/01/15
    "%d/%m/%Y", // 15/01/2024
    "%d-%m-%Y", // 15-01-2024
    "%d.%m.%Y", // 15.01.2024
];

/// Parses a date cell, ignoring any time-of-day suffix.
///
/// The time part may be separated by `T` or whitespace and is not validated.
/// Returns `None` for blank or unrecognized values.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use rma_transform::parse_date;
///
/// let jan_15 = NaiveDate::from_ymd_opt(2024, 1, 15);
/// assert_eq!(parse_date("2024-01-15"), jan_15);
/// assert_eq!(parse_date("2024-01-15T08:30:00"), jan_15);
/// assert_eq!(parse_date("15/01/2024 08:30"), jan_15);
/// assert_eq!(parse_date("not a date"), None);
/// ```
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    let date_part = trimmed
        .split(|ch: char| ch == 'T' || ch.is_whitespace())
        .next()
        .unwrap_or_default();
    if date_part.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// Quarter (1-4) of a month number (1-12).
pub fn quarter_of(month: u32) -> u32 {
    (month.saturating_sub(1)) / 3 + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_iso_and_slashed() {
        assert_eq!(parse_date("2024-03-05"), date(2024, 3, 5));
        assert_eq!(parse_date("2024/03/05"), date(2024, 3, 5));
        assert_eq!(parse_date(" 2024-03-05 00:00:00 "), date(2024, 3, 5));
    }

    #[test]
    fn test_day_first() {
        assert_eq!(parse_date("05/03/2024"), date(2024, 3, 5));
        assert_eq!(parse_date("05-03-2024"), date(2024, 3, 5));
        assert_eq!(parse_date("05.03.2024"), date(2024, 3, 5));
        assert_eq!(parse_date("31/12/2023"), date(2023, 12, 31));
    }

    #[test]
    fn test_invalid() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("2024-13-01"), None);
        assert_eq!(parse_date("12/31/2023"), None);
        assert_eq!(parse_date("N/A"), None);
    }

    #[test]
    fn test_quarter_of() {
        assert_eq!(quarter_of(1), 1);
        assert_eq!(quarter_of(3), 1);
        assert_eq!(quarter_of(4), 2);
        assert_eq!(quarter_of(12), 4);
    }
}
