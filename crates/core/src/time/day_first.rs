use chrono::{Datelike, NaiveDate, NaiveDateTime};

// Spreadsheet exports mix these freely. Day-first wins whenever the text is ambiguous.
const DATE_FORMATS: &[&str] = &[
    "%d-%m-%Y", "%d/%m/%Y", "%d.%m.%Y", "%d-%m-%y", "%d/%m/%y", "%d.%m.%y", "%d %b %Y",
    "%d-%b-%Y", "%d %B %Y", "%Y-%m-%d", "%Y/%m/%d",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d-%m-%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d/%m/%Y %H:%M",
];

// `%Y` happily reads "26" as the year 26; anything this early is a two-digit year.
const MIN_YEAR: i32 = 1900;

/// Parse a cell as a calendar date, reading `05-01-2026` as 5 January.
pub fn parse_day_first(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    let date_only = DATE_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .find(|d| d.year() >= MIN_YEAR);
    if date_only.is_some() {
        return date_only;
    }

    DATETIME_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
        .find(|d| d.year() >= MIN_YEAR)
}

/// Short axis label, e.g. `Jan 05`.
pub fn axis_label(date: NaiveDate) -> String {
    date.format("%b %d").to_string()
}

/// Display form used on the stock page, e.g. `05-01-2026`.
pub fn display_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%d-%m-%Y").to_string(),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn reads_day_before_month() {
        assert_eq!(parse_day_first("05-01-2026"), Some(ymd(2026, 1, 5)));
        assert_eq!(parse_day_first("05/01/2026"), Some(ymd(2026, 1, 5)));
        assert_eq!(parse_day_first("05.01.2026"), Some(ymd(2026, 1, 5)));
    }

    #[test]
    fn two_digit_years_are_not_read_as_antiquity() {
        assert_eq!(parse_day_first("05-01-26"), Some(ymd(2026, 1, 5)));
        assert_eq!(parse_day_first("31/12/25"), Some(ymd(2025, 12, 31)));
    }

    #[test]
    fn accepts_iso_and_spreadsheet_datetimes() {
        assert_eq!(parse_day_first("2026-01-05"), Some(ymd(2026, 1, 5)));
        assert_eq!(parse_day_first("2026-01-05 00:00:00"), Some(ymd(2026, 1, 5)));
        assert_eq!(parse_day_first("2026-01-05T09:15:00"), Some(ymd(2026, 1, 5)));
        assert_eq!(parse_day_first("5 Jan 2026"), Some(ymd(2026, 1, 5)));
        assert_eq!(parse_day_first("05-Jan-2026"), Some(ymd(2026, 1, 5)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_day_first(""), None);
        assert_eq!(parse_day_first("   "), None);
        assert_eq!(parse_day_first("not a date"), None);
        assert_eq!(parse_day_first("32-01-2026"), None);
        assert_eq!(parse_day_first("05-13-2026"), None);
    }

    #[test]
    fn labels() {
        assert_eq!(axis_label(ymd(2026, 1, 5)), "Jan 05");
        assert_eq!(display_date(Some(ymd(2026, 1, 5))), "05-01-2026");
        assert_eq!(display_date(None), "N/A");
    }
}
