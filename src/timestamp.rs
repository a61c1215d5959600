//! Timestamp parsing and offset formatting
//!
//! GPX `<time>` values and ffprobe creation tags share one parser so both sides
//! of a correlation land on the same UTC timeline.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Layouts accepted when the value is not strict RFC 3339 but carries an offset
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

/// Layouts without an offset; these are read as UTC
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an ISO-8601 timestamp and normalize it to UTC
///
/// Values without an offset are interpreted as UTC. Returns `None` for
/// anything that is not a full date and time (bare dates included).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    None
}

/// Render a UTC instant as ISO-8601 with an explicit `+00:00` offset
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

/// Signed seconds from `reference` to `instant` (millisecond precision)
///
/// Negative when `instant` precedes `reference`.
pub fn offset_seconds(instant: &DateTime<Utc>, reference: &DateTime<Utc>) -> f64 {
    (*instant - *reference).num_milliseconds() as f64 / 1000.0
}

/// Format a signed offset as `HH:MM:SS`, prefixed with `-` when negative
///
/// Fractional seconds are truncated toward zero. Hours are not wrapped, so
/// offsets beyond a day render as e.g. `27:00:00`.
pub fn format_offset(seconds: f64) -> String {
    let total = seconds.abs().trunc() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    let sign = if seconds < 0.0 && total > 0 { "-" } else { "" };
    format!("{}{:02}:{:02}:{:02}", sign, hours, minutes, secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).single().unwrap()
    }

    #[test]
    fn test_parse_zulu() {
        assert_eq!(
            parse_timestamp("2024-01-15T10:30:00Z"),
            Some(utc(2024, 1, 15, 10, 30, 0))
        );
    }

    #[test]
    fn test_parse_offset_is_normalized() {
        assert_eq!(
            parse_timestamp("2024-01-15T12:30:00+02:00"),
            Some(utc(2024, 1, 15, 10, 30, 0))
        );
        assert_eq!(
            parse_timestamp("2024-01-15T05:30:00-0500"),
            Some(utc(2024, 1, 15, 10, 30, 0))
        );
    }

    #[test]
    fn test_parse_ffprobe_fractional() {
        let dt = parse_timestamp("2024-01-15T10:25:00.000000Z").unwrap();
        assert_eq!(dt, utc(2024, 1, 15, 10, 25, 0));
    }

    #[test]
    fn test_parse_naive_as_utc() {
        assert_eq!(
            parse_timestamp("2024-01-15 10:30:00"),
            Some(utc(2024, 1, 15, 10, 30, 0))
        );
        assert_eq!(
            parse_timestamp(" 2024-01-15T10:30:00 "),
            Some(utc(2024, 1, 15, 10, 30, 0))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2024-01-15"), None);
    }

    #[test]
    fn test_format_timestamp_has_offset() {
        assert_eq!(
            format_timestamp(&utc(2024, 1, 15, 10, 30, 0)),
            "2024-01-15T10:30:00+00:00"
        );
    }

    #[test]
    fn test_offset_sign() {
        let waypoint = utc(2024, 1, 15, 10, 30, 0);
        let video = utc(2024, 1, 15, 10, 25, 0);
        assert_eq!(offset_seconds(&waypoint, &video), 300.0);
        assert_eq!(offset_seconds(&video, &waypoint), -300.0);
    }

    #[test]
    fn test_format_offset() {
        assert_eq!(format_offset(300.0), "00:05:00");
        assert_eq!(format_offset(-300.0), "-00:05:00");
        assert_eq!(format_offset(3725.9), "01:02:05");
        assert_eq!(format_offset(-3725.9), "-01:02:05");
        assert_eq!(format_offset(97200.0), "27:00:00");
        assert_eq!(format_offset(-0.4), "00:00:00");
    }
}
