//! Activity log event types
//!
//! The activity log is plain text, one `[YYYY-MM-DD HH:MM:SS] <message>` line
//! per event, meant to be read by the person who configured the budget.

use chrono::NaiveDateTime;
use daylimit_util::{format_hms, DayKey, LOG_TIMESTAMP_FORMAT};
use std::fmt;

/// Things worth recording in the activity log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityEvent {
    /// Countdown started with time left
    Started {
        remaining: u64,
        used: u64,
        limit: u64,
    },

    /// Countdown started with the budget already spent
    StartedExhausted { day: DayKey },

    /// Local date changed while running
    DayRollover {
        day: DayKey,
        used: u64,
        remaining: u64,
    },

    /// Warning threshold reached
    WarningIssued { remaining: u64 },

    /// Countdown reached zero
    LimitReached,

    /// User asked to pause and log out
    ManualLogout { remaining: u64 },

    /// User closed the shell
    WindowClosed { enforced: bool },

    /// Logout action finished
    LoggedOut { method: String },

    /// Both logout primitives failed, or the platform is unsupported
    LogoutFailed { error: String },

    /// State file unusable, replaced with defaults
    StateReadFailed { error: String },

    /// State file partially invalid, fields repaired in place
    StateRepaired { details: String },
}

impl fmt::Display for ActivityEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityEvent::Started {
                remaining,
                used,
                limit,
            } => write!(
                f,
                "Start: remaining {} (used {} of {})",
                format_hms(*remaining),
                format_hms(*used),
                format_hms(*limit)
            ),
            ActivityEvent::StartedExhausted { day } => write!(
                f,
                "Start: daily time already exhausted for {} -> logging out.",
                day
            ),
            ActivityEvent::DayRollover {
                day,
                used,
                remaining,
            } => write!(
                f,
                "Date rollover to {}. Used: {}s. Remaining: {}s.",
                day, used, remaining
            ),
            ActivityEvent::WarningIssued { remaining } => {
                write!(f, "Warning shown with {} remaining.", format_hms(*remaining))
            }
            ActivityEvent::LimitReached => write!(f, "Countdown reached zero -> logging out."),
            ActivityEvent::ManualLogout { remaining } => write!(
                f,
                "Pause button pressed with {} remaining. Logging out.",
                format_hms(*remaining)
            ),
            ActivityEvent::WindowClosed { enforced: true } => {
                write!(f, "Window closed by user -> enforcing logout.")
            }
            ActivityEvent::WindowClosed { enforced: false } => write!(
                f,
                "Window closed by user -> exiting without logout (not enforced)."
            ),
            ActivityEvent::LoggedOut { method } => write!(f, "Logged out ({}).", method),
            ActivityEvent::LogoutFailed { error } => write!(f, "Logout failed: {}", error),
            ActivityEvent::StateReadFailed { error } => {
                write!(f, "State read failed, resetting. Error: {}", error)
            }
            ActivityEvent::StateRepaired { details } => write!(f, "State repaired: {}", details),
        }
    }
}

/// A line read back from the activity log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    pub timestamp: NaiveDateTime,
    pub message: String,
}

impl ActivityEntry {
    /// Parse a `[YYYY-MM-DD HH:MM:SS] message` line
    pub fn parse_line(line: &str) -> Option<Self> {
        let rest = line.strip_prefix('[')?;
        let (stamp, message) = rest.split_once("] ")?;
        let timestamp = NaiveDateTime::parse_from_str(stamp, LOG_TIMESTAMP_FORMAT).ok()?;

        Some(Self {
            timestamp,
            message: message.to_string(),
        })
    }
}

impl fmt::Display for ActivityEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}",
            self.timestamp.format(LOG_TIMESTAMP_FORMAT),
            self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_message_uses_hms() {
        let event = ActivityEvent::Started {
            remaining: 3000,
            used: 600,
            limit: 3600,
        };
        assert_eq!(
            event.to_string(),
            "Start: remaining 00:50:00 (used 00:10:00 of 01:00:00)"
        );
    }

    #[test]
    fn rollover_message_uses_raw_seconds() {
        let event = ActivityEvent::DayRollover {
            day: DayKey::new("2025-04-02"),
            used: 0,
            remaining: 3600,
        };
        assert_eq!(
            event.to_string(),
            "Date rollover to 2025-04-02. Used: 0s. Remaining: 3600s."
        );
    }

    #[test]
    fn parse_line_round_trips_display() {
        let entry = ActivityEntry::parse_line("[2025-04-02 10:11:12] Countdown reached zero -> logging out.")
            .unwrap();
        assert_eq!(entry.message, "Countdown reached zero -> logging out.");
        assert_eq!(
            entry.to_string(),
            "[2025-04-02 10:11:12] Countdown reached zero -> logging out."
        );
    }

    #[test]
    fn parse_line_rejects_garbage() {
        assert!(ActivityEntry::parse_line("").is_none());
        assert!(ActivityEntry::parse_line("no brackets").is_none());
        assert!(ActivityEntry::parse_line("[not a time] hi").is_none());
    }
}
