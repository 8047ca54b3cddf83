//! Parsing and formatting of the date/time strings the clinic API exchanges.
//!
//! The backend mixes Brazilian dates (`dd/mm/yyyy`), ISO dates
//! (`yyyy-mm-dd`) and ISO datetimes. All values are treated as clinic
//! wall-clock time.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

const BR_DATE: &str = "%d/%m/%Y";
const ISO_DATE: &str = "%Y-%m-%d";

pub fn parse_br_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), BR_DATE).ok()
}

/// Accepts `dd/mm/yyyy` or `yyyy-mm-dd`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    parse_br_date(value).or_else(|| NaiveDate::parse_from_str(value, ISO_DATE).ok())
}

/// Accepts `HH:MM` or `HH:MM:SS`.
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/// Parses an ISO datetime, with or without offset. An offset is dropped and
/// the wall-clock time kept.
pub fn parse_iso_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Combines a date and an optional time into one timestamp.
///
/// A date containing `T` is read as a full ISO datetime and the time is
/// ignored. A missing time means midnight; a present but malformed time
/// makes the whole value invalid.
pub fn combine_date_time(date: &str, time: Option<&str>) -> Option<NaiveDateTime> {
    let date = date.trim();
    if date.is_empty() {
        return None;
    }
    if date.contains('T') {
        if let Some(dt) = parse_iso_datetime(date) {
            return Some(dt);
        }
    }

    let day = parse_date(date)?;
    let time = match time.map(str::trim).filter(|t| !t.is_empty()) {
        Some(raw) => parse_time(raw)?,
        None => NaiveTime::from_hms_opt(0, 0, 0)?,
    };
    let combined = day.and_time(time);
    debug!("Combined {:?} + {:?} into {}", date, time, combined);
    Some(combined)
}

pub fn format_br_date(date: NaiveDate) -> String {
    date.format(BR_DATE).to_string()
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE).to_string()
}

pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

pub fn format_iso_datetime(value: NaiveDateTime) -> String {
    value.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Converts a form date (`yyyy-mm-dd`) to the backend format (`dd/mm/yyyy`).
/// Empty input stays empty.
pub fn iso_to_br_date(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return Some(String::new());
    }
    NaiveDate::parse_from_str(value, ISO_DATE).ok().map(format_br_date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap()
    }

    #[test]
    fn test_combine_br_date_and_time() {
        assert_eq!(combine_date_time("03/11/2025", Some("08:30")), Some(dt(2025, 11, 3, 8, 30)));
    }

    #[test]
    fn test_combine_defaults_to_midnight() {
        assert_eq!(combine_date_time("2025-11-03", None), Some(dt(2025, 11, 3, 0, 0)));
        assert_eq!(combine_date_time("03/11/2025", Some("  ")), Some(dt(2025, 11, 3, 0, 0)));
    }

    #[test]
    fn test_combine_iso_datetime_ignores_time() {
        assert_eq!(
            combine_date_time("2025-11-03T14:00:00", Some("08:30")),
            Some(dt(2025, 11, 3, 14, 0))
        );
        assert_eq!(
            combine_date_time("2025-11-03T14:00:00-03:00", None),
            Some(dt(2025, 11, 3, 14, 0))
        );
    }

    #[test]
    fn test_combine_rejects_garbage() {
        assert_eq!(combine_date_time("", Some("08:30")), None);
        assert_eq!(combine_date_time("31/02/2025", Some("08:30")), None);
        assert_eq!(combine_date_time("03/11/2025", Some("25:99")), None);
        assert_eq!(combine_date_time("amanhã", None), None);
    }

    #[test]
    fn test_time_with_seconds() {
        assert_eq!(parse_time("14:05:09"), NaiveTime::from_hms_opt(14, 5, 9));
    }

    #[test]
    fn test_iso_to_br_date() {
        assert_eq!(iso_to_br_date("2025-11-03"), Some("03/11/2025".to_string()));
        assert_eq!(iso_to_br_date(""), Some(String::new()));
        assert_eq!(iso_to_br_date("03/11/2025"), None);
    }
}
