//! Per-run session record

use daylimit_util::DayKey;

/// Today's usage against the daily limit, rebuilt on every day rollover
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Day currently being counted
    pub day: DayKey,

    /// Seconds used on `day`
    pub used_today: u64,

    /// Daily limit, read once at startup
    pub daily_limit: u64,

    /// The warning has been issued since the last rollover
    pub warning_shown: bool,
}

impl Session {
    pub fn new(day: DayKey, used_today: u64, daily_limit: u64) -> Self {
        Self {
            day,
            used_today,
            daily_limit,
            warning_shown: false,
        }
    }

    /// Seconds left today; never negative
    pub fn remaining(&self) -> u64 {
        self.daily_limit.saturating_sub(self.used_today)
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Whether the one-shot warning should fire now.
    ///
    /// Limits shorter than the threshold never warn.
    pub fn warning_due(&self, threshold: u64) -> bool {
        let remaining = self.remaining();
        !self.warning_shown
            && self.daily_limit >= threshold
            && remaining > 0
            && remaining <= threshold
    }

    pub fn mark_warning_shown(&mut self) {
        self.warning_shown = true;
    }

    /// Switch to a new day. The daily limit is kept as-is.
    pub fn roll_over(&mut self, day: DayKey, used_today: u64) {
        self.day = day;
        self.used_today = used_today;
        self.warning_shown = false;
    }

    pub fn record_usage(&mut self, used_today: u64) {
        self.used_today = used_today;
    }
}
