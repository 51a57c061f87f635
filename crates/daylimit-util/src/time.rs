//! Time utilities for daylimit
//!
//! Day accounting uses the local wall clock: a day key is whatever calendar
//! date the local clock reports.
//!
//! # Mock Time for Development
//!
//! In debug builds, the `DAYLIMIT_MOCK_TIME` environment variable can be set
//! to override the system time. The mocked clock keeps advancing at the real
//! rate, which makes it easy to watch a day rollover happen.
//!
//! Format: `YYYY-MM-DD HH:MM:SS` (e.g., `2025-12-25 23:59:30`)
//!
//! Example:
//! ```bash
//! DAYLIMIT_MOCK_TIME="2025-12-25 23:59:30" cargo run -p daylimitd
//! ```

use chrono::{DateTime, Duration, Local, NaiveDateTime, TimeZone};
use std::sync::OnceLock;
use tracing::{info, warn};

use crate::DayKey;

/// Environment variable name for mock time (debug builds only)
pub const MOCK_TIME_ENV_VAR: &str = "DAYLIMIT_MOCK_TIME";

/// Timestamp format used by the activity log
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Offset between mock time and real time at process start.
static MOCK_TIME_OFFSET: OnceLock<Option<Duration>> = OnceLock::new();

/// Offset from `real_now` to the local time named by `value`.
///
/// `None` when `value` is not `YYYY-MM-DD HH:MM:SS` or names a local time
/// that does not exist or is ambiguous (DST transitions).
pub fn parse_mock_offset(value: &str, real_now: DateTime<Local>) -> Option<Duration> {
    let naive = NaiveDateTime::parse_from_str(value.trim(), LOG_TIMESTAMP_FORMAT).ok()?;
    let mock = Local.from_local_datetime(&naive).single()?;
    Some(mock.signed_duration_since(real_now))
}

fn get_mock_time_offset() -> Option<Duration> {
    *MOCK_TIME_OFFSET.get_or_init(|| {
        if !cfg!(debug_assertions) {
            return None;
        }

        let value = std::env::var(MOCK_TIME_ENV_VAR).ok()?;
        match parse_mock_offset(&value, Local::now()) {
            Some(offset) => {
                info!(
                    mock_time = %value,
                    offset_secs = offset.num_seconds(),
                    "Mock time enabled"
                );
                Some(offset)
            }
            None => {
                warn!(
                    mock_time = %value,
                    expected_format = LOG_TIMESTAMP_FORMAT,
                    "Invalid mock time, using the real clock"
                );
                None
            }
        }
    })
}

/// Returns whether mock time is currently active.
pub fn is_mock_time_active() -> bool {
    get_mock_time_offset().is_some()
}

/// Get the current local time, respecting mock time settings in debug builds.
pub fn now() -> DateTime<Local> {
    let real_now = Local::now();

    match get_mock_time_offset() {
        Some(offset) => real_now + offset,
        None => real_now,
    }
}

/// Calendar-day key for the given local time
pub fn current_day_key(now: DateTime<Local>) -> DayKey {
    DayKey::from_date(now.date_naive())
}

/// Format a DateTime the way activity log lines are stamped
pub fn format_log_timestamp(dt: &DateTime<Local>) -> String {
    dt.format(LOG_TIMESTAMP_FORMAT).to_string()
}

/// Format a second count as zero-padded `HH:MM:SS`.
///
/// Hours are not wrapped, so 100 hours renders as `100:00:00`.
pub fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Format a second count as `MM:SS`, used for short warning thresholds
pub fn format_ms(total_seconds: u64) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(59), "00:00:59");
        assert_eq!(format_hms(61), "00:01:01");
        assert_eq!(format_hms(3600), "01:00:00");
        assert_eq!(format_hms(2 * 3600 + 5 * 60 + 9), "02:05:09");
        assert_eq!(format_hms(100 * 3600), "100:00:00");
    }

    #[test]
    fn test_format_ms() {
        assert_eq!(format_ms(300), "05:00");
        assert_eq!(format_ms(90), "01:30");
    }

    #[test]
    fn test_current_day_key_uses_local_date() {
        let late = Local.with_ymd_and_hms(2025, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(current_day_key(late).as_str(), "2025-12-31");

        let early = Local.with_ymd_and_hms(2026, 1, 1, 0, 0, 1).unwrap();
        assert_eq!(current_day_key(early).as_str(), "2026-01-01");
    }

    #[test]
    fn test_log_timestamp_format() {
        let dt = Local.with_ymd_and_hms(2025, 6, 1, 8, 5, 3).unwrap();
        assert_eq!(format_log_timestamp(&dt), "2025-06-01 08:05:03");
    }

    #[test]
    fn test_parse_mock_offset() {
        let real_now = Local.with_ymd_and_hms(2025, 12, 25, 23, 59, 0).unwrap();

        assert_eq!(
            parse_mock_offset("2025-12-25 23:59:30", real_now),
            Some(Duration::seconds(30))
        );
        assert_eq!(
            parse_mock_offset("2025-12-24 23:59:00", real_now),
            Some(Duration::days(-1))
        );
        // Surrounding whitespace from shell quoting is tolerated
        assert_eq!(
            parse_mock_offset("  2025-12-25 23:59:00\n", real_now),
            Some(Duration::zero())
        );
    }

    #[test]
    fn test_parse_mock_offset_rejects_bad_values() {
        let real_now = Local.with_ymd_and_hms(2025, 12, 25, 12, 0, 0).unwrap();

        for value in [
            "",
            "tomorrow",
            "2025-12-25",
            "2025-12-25T23:59:30",
            "2025-13-01 00:00:00",
            "2025-12-25 24:00:00",
        ] {
            assert_eq!(parse_mock_offset(value, real_now), None, "{value:?}");
        }
    }

    #[test]
    fn test_mock_offset_shifts_day_key() {
        let real_now = Local.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let offset = parse_mock_offset("2025-06-01 23:59:59", real_now).unwrap();

        assert_eq!(current_day_key(real_now + offset).as_str(), "2025-06-01");
        assert_eq!(
            current_day_key(real_now + offset + Duration::seconds(1)).as_str(),
            "2025-06-02"
        );
    }

    #[test]
    fn test_now_advances() {
        let t1 = now();
        std::thread::sleep(std::time::Duration::from_millis(20));
        let t2 = now();
        assert!(t2 > t1);
    }
}
