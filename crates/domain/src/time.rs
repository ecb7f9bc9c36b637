//! Date and time helpers for the vendor controller clock and holiday dates.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

/// Wall-clock time of the heating controller (no timezone attached).
pub type ControllerTime = NaiveDateTime;

/// Return the current local time, as the controller expects it.
#[must_use]
pub fn now() -> ControllerTime {
    Local::now().naive_local()
}

/// Parse a holiday boundary.
///
/// Anything from the first `T` onwards is ignored, so both `2024-07-01` and
/// `2024-07-01T12:00:00` yield the first of July. Returns `None` when the
/// remaining text is not a `YYYY-MM-DD` date.
#[must_use]
pub fn parse_holiday_date(value: &str) -> Option<NaiveDate> {
    let date_part = value.split('T').next().unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Parse a controller date/time.
///
/// Accepts RFC 3339 (offset dropped after conversion to local time) and the
/// naive `YYYY-MM-DD[T ]HH:MM[:SS]` forms.
#[must_use]
pub fn parse_datetime(value: &str) -> Option<ControllerTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ]
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_plain_date() {
        assert_eq!(
            parse_holiday_date("2024-07-01"),
            NaiveDate::from_ymd_opt(2024, 7, 1)
        );
    }

    #[test]
    fn should_ignore_time_part_of_holiday_date() {
        assert_eq!(
            parse_holiday_date("2024-07-01T23:59:00+02:00"),
            NaiveDate::from_ymd_opt(2024, 7, 1)
        );
    }

    #[test]
    fn should_reject_unparsable_holiday_date() {
        assert_eq!(parse_holiday_date("next monday"), None);
        assert_eq!(parse_holiday_date("2024-02-30"), None);
        assert_eq!(parse_holiday_date(""), None);
    }

    #[test]
    fn should_parse_naive_datetime_with_seconds() {
        let dt = parse_datetime("2024-01-05 10:30:15").unwrap();
        assert_eq!(dt.to_string(), "2024-01-05 10:30:15");
    }

    #[test]
    fn should_parse_naive_datetime_without_seconds() {
        let dt = parse_datetime("2024-01-05T10:30").unwrap();
        assert_eq!(dt.to_string(), "2024-01-05 10:30:00");
    }

    #[test]
    fn should_parse_rfc3339_datetime() {
        assert!(parse_datetime("2024-01-05T10:30:15Z").is_some());
    }

    #[test]
    fn should_reject_garbage_datetime() {
        assert!(parse_datetime("yesterday noon").is_none());
    }
}
