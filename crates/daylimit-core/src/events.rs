//! Core events emitted by the engine

use daylimit_host_api::{LogoutError, LogoutOutcome};
use daylimit_util::DayKey;
use std::time::Duration;

/// Delay between two ticks
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Events emitted by the countdown engine for the shell to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreEvent {
    /// Remaining time changed
    RemainingChanged {
        remaining: u64,
        used_today: u64,
        daily_limit: u64,
    },

    /// Warning threshold reached, once per day
    WarningDue { remaining: u64, threshold: u64 },

    /// Local date changed; counting continues on the new day
    DayRolledOver {
        day: DayKey,
        used_today: u64,
        remaining: u64,
    },

    /// The logout action failed. Always followed by `LoggedOut`.
    LogoutFailed {
        reason: LogoutReason,
        error: LogoutError,
    },

    /// The engine reached its terminal state. `outcome` is `None` when the
    /// logout action failed.
    LoggedOut {
        reason: LogoutReason,
        outcome: Option<LogoutOutcome>,
    },

    /// Shell closed without enforced logout
    ExitedWithoutLogout,
}

/// Why the session is being ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    /// No time left today
    LimitExhausted,
    /// User chose to pause and log out
    Manual,
    /// User closed the shell
    WindowClosed,
}

/// What the scheduler should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    NextTickIn(Duration),
    Halt,
}

/// Result of one tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tick {
    pub events: Vec<CoreEvent>,
    pub schedule: Schedule,
}

impl Tick {
    pub fn next(events: Vec<CoreEvent>) -> Self {
        Self {
            events,
            schedule: Schedule::NextTickIn(TICK_INTERVAL),
        }
    }

    pub fn halt(events: Vec<CoreEvent>) -> Self {
        Self {
            events,
            schedule: Schedule::Halt,
        }
    }

    pub fn is_halt(&self) -> bool {
        self.schedule == Schedule::Halt
    }
}
