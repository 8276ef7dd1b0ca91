use crate::utils::constants::WEEKDAY_LABELS;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

const DATETIME_FORMATS: [&str; 10] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%d/%m/%Y %H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];

/// Largest serial Excel can represent (9999-12-31)
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// Parse a `Fecha` cell.
///
/// Accepts ISO and day-first layouts with or without a time part, and Excel
/// serial day numbers as produced when a date column is exported unformatted.
///
/// # Examples
/// ```
/// use airq_dashboard::utils::parse_timestamp;
///
/// let ts = parse_timestamp("01/06/2021 13:45").unwrap();
/// assert_eq!(ts.to_string(), "2021-06-01 13:45:00");
/// ```
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    for format in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(ts);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date.and_time(NaiveTime::MIN));
        }
    }

    trimmed.parse::<f64>().ok().and_then(excel_serial_to_datetime)
}

/// Convert an Excel (1900 system) serial day number to a timestamp
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(1.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }

    // Excel counts from 1899-12-30 once its 1900 leap-year bug is accounted for
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_time(NaiveTime::MIN);
    let days = serial.floor();
    let seconds = ((serial - days) * 86_400.0).round() as i64;

    epoch
        .checked_add_signed(Duration::days(days as i64))?
        .checked_add_signed(Duration::seconds(seconds))
}

/// Position of a weekday in the Monday-first display order
pub fn weekday_index(weekday: Weekday) -> usize {
    weekday.num_days_from_monday() as usize
}

/// Localized display label of a weekday
pub fn weekday_label(weekday: Weekday) -> &'static str {
    WEEKDAY_LABELS[weekday_index(weekday)]
}

/// Localized label of the weekday a timestamp falls on
pub fn weekday_label_of(ts: &NaiveDateTime) -> &'static str {
    weekday_label(ts.weekday())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_iso_formats() {
        let ts = parse_timestamp("2021-06-01 08:30:15").unwrap();
        assert_eq!(ts.hour(), 8);
        assert_eq!(ts.minute(), 30);
        assert_eq!(ts.second(), 15);

        let ts = parse_timestamp("2021-06-01T08:30:15").unwrap();
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2021, 6, 1).unwrap());

        let ts = parse_timestamp("2021-06-01 08:30:15.250").unwrap();
        assert_eq!(ts.nanosecond(), 250_000_000);

        // Minute precision with either separator
        let spaced = parse_timestamp("2021-06-01 10:00").unwrap();
        let t_sep = parse_timestamp("2021-06-01T10:00").unwrap();
        assert_eq!(spaced, t_sep);
        assert_eq!(t_sep.hour(), 10);

        let ts = parse_timestamp("01/06/2021 08:30:15.5").unwrap();
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2021, 6, 1).unwrap());
        assert_eq!(ts.nanosecond(), 500_000_000);
    }

    #[test]
    fn test_parse_day_first_and_date_only() {
        let ts = parse_timestamp("02/06/2021 23:00").unwrap();
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2021, 6, 2).unwrap());
        assert_eq!(ts.hour(), 23);

        let ts = parse_timestamp("2021-06-03").unwrap();
        assert_eq!(ts.hour(), 0);
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2021, 6, 3).unwrap());
    }

    #[test]
    fn test_parse_excel_serial() {
        // 44348.5 is 2021-06-01 12:00
        let ts = parse_timestamp("44348.5").unwrap();
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2021, 6, 1).unwrap());
        assert_eq!(ts.hour(), 12);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("-5").is_none());
        assert!(parse_timestamp("2021-13-40").is_none());
    }

    #[test]
    fn test_weekday_labels() {
        assert_eq!(weekday_label(Weekday::Mon), "Lunes");
        assert_eq!(weekday_label(Weekday::Wed), "Miércoles");
        assert_eq!(weekday_label(Weekday::Sun), "Domingo");
        assert_eq!(weekday_index(Weekday::Sat), 5);

        // 2021-06-01 was a Tuesday
        let ts = parse_timestamp("2021-06-01 10:00").unwrap();
        assert_eq!(weekday_label_of(&ts), "Martes");
    }
}
