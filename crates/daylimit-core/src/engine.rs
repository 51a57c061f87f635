//! Countdown engine

use chrono::{DateTime, Local};
use daylimit_config::Policy;
use daylimit_host_api::LogoutAction;
use daylimit_store::{ActivityEvent, Store};
use daylimit_util::current_day_key;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::{CoreEvent, CoreResult, DayLedger, LogoutReason, Session, Tick};

/// Engine settings taken from the validated policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub warning_threshold_secs: u64,
    pub enforce_logout_on_close: bool,
}

impl EngineConfig {
    pub fn from_policy(policy: &Policy) -> Self {
        Self {
            warning_threshold_secs: policy.limits.warning_threshold_secs,
            enforce_logout_on_close: policy.logout.enforce_on_close,
        }
    }
}

/// Lifecycle of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    /// Constructed, startup evaluation not done yet
    Starting,
    /// Counting down
    Running,
    /// Logout performed (or attempted). Terminal.
    LoggedOut,
    /// Shell closed without enforced logout. Terminal.
    Exited,
}

impl EnginePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, EnginePhase::LoggedOut | EnginePhase::Exited)
    }
}

/// The countdown state machine.
///
/// Accrues one second of usage per tick for the current local day, fires a
/// one-shot warning near the end of the budget and ends the session through
/// the [`LogoutAction`] when the budget runs out or the user asks for it.
/// Once terminal, every further call is a no-op.
pub struct CountdownEngine {
    config: EngineConfig,
    ledger: DayLedger,
    session: Session,
    logout: Arc<dyn LogoutAction>,
    phase: EnginePhase,
}

impl CountdownEngine {
    /// Load persisted state and build today's session
    pub fn new(
        config: EngineConfig,
        store: Arc<dyn Store>,
        logout: Arc<dyn LogoutAction>,
        now: DateTime<Local>,
    ) -> Self {
        let ledger = DayLedger::load(store);
        let day = current_day_key(now);
        let session = Session::new(day.clone(), ledger.used_seconds(&day), ledger.daily_limit());

        info!(
            day = %day,
            daily_limit = session.daily_limit,
            used_today = session.used_today,
            logout_mode = ?logout.mode(),
            "Countdown engine initialized"
        );

        Self {
            config,
            ledger,
            session,
            logout,
            phase: EnginePhase::Starting,
        }
    }

    /// Startup evaluation. Logs out right away when today's budget is
    /// already spent, otherwise reports the remaining time and fires the
    /// warning if the start lands inside the warning band.
    pub fn start(&mut self) -> Vec<CoreEvent> {
        if self.phase != EnginePhase::Starting {
            return Vec::new();
        }
        self.phase = EnginePhase::Running;

        if self.session.is_exhausted() {
            info!(day = %self.session.day, "Daily time already exhausted at start");
            self.record(ActivityEvent::StartedExhausted {
                day: self.session.day.clone(),
            });
            return self.log_out(LogoutReason::LimitExhausted);
        }

        self.record(ActivityEvent::Started {
            remaining: self.session.remaining(),
            used: self.session.used_today,
            limit: self.session.daily_limit,
        });

        let mut events = vec![self.remaining_changed()];
        self.check_warning(&mut events);
        events
    }

    /// One scheduler callback.
    ///
    /// Order: day rollover, zero check, warning, accrual. A tick that finds
    /// zero remaining logs out and halts without accruing. A failed save is
    /// returned as an error and leaves the engine in its previous phase.
    pub fn tick(&mut self, now: DateTime<Local>) -> CoreResult<Tick> {
        let mut events = Vec::new();

        match self.phase {
            EnginePhase::Starting => {
                events.extend(self.start());
                if self.phase.is_terminal() {
                    return Ok(Tick::halt(events));
                }
            }
            EnginePhase::Running => {}
            EnginePhase::LoggedOut | EnginePhase::Exited => return Ok(Tick::halt(events)),
        }

        let today = current_day_key(now);
        if today != self.session.day {
            let used_today = self.ledger.used_seconds(&today);
            self.session.roll_over(today.clone(), used_today);

            let remaining = self.session.remaining();
            info!(day = %today, used_today, remaining, "Date rollover");
            self.record(ActivityEvent::DayRollover {
                day: today.clone(),
                used: used_today,
                remaining,
            });
            events.push(CoreEvent::DayRolledOver {
                day: today,
                used_today,
                remaining,
            });
        }

        if self.session.is_exhausted() {
            info!(day = %self.session.day, "Countdown reached zero");
            self.record(ActivityEvent::LimitReached);
            events.extend(self.log_out(LogoutReason::LimitExhausted));
            return Ok(Tick::halt(events));
        }

        self.check_warning(&mut events);

        let used_today = self.ledger.add_used_seconds(&self.session.day, 1)?;
        self.session.record_usage(used_today);
        events.push(self.remaining_changed());

        debug!(
            day = %self.session.day,
            used_today,
            remaining = self.session.remaining(),
            "Tick"
        );

        Ok(Tick::next(events))
    }

    /// The user pressed "pause and log out"
    pub fn on_manual_logout_requested(&mut self) -> Vec<CoreEvent> {
        if self.phase.is_terminal() {
            debug!(phase = ?self.phase, "Manual logout ignored");
            return Vec::new();
        }

        let remaining = self.session.remaining();
        info!(remaining, "Manual logout requested");
        self.record(ActivityEvent::ManualLogout { remaining });
        self.log_out(LogoutReason::Manual)
    }

    /// The user closed the shell
    pub fn on_window_close_requested(&mut self) -> Vec<CoreEvent> {
        if self.phase.is_terminal() {
            debug!(phase = ?self.phase, "Window close ignored");
            return Vec::new();
        }

        let enforced = self.config.enforce_logout_on_close;
        info!(enforced, "Window close requested");
        self.record(ActivityEvent::WindowClosed { enforced });

        if enforced {
            self.log_out(LogoutReason::WindowClosed)
        } else {
            self.phase = EnginePhase::Exited;
            vec![CoreEvent::ExitedWithoutLogout]
        }
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn remaining(&self) -> u64 {
        self.session.remaining()
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    fn check_warning(&mut self, events: &mut Vec<CoreEvent>) {
        let threshold = self.config.warning_threshold_secs;
        if !self.session.warning_due(threshold) {
            return;
        }

        self.session.mark_warning_shown();
        let remaining = self.session.remaining();
        info!(remaining, threshold, "Issuing warning");
        self.record(ActivityEvent::WarningIssued { remaining });
        events.push(CoreEvent::WarningDue {
            remaining,
            threshold,
        });
    }

    /// Enter `LoggedOut` and run the logout action exactly once
    fn log_out(&mut self, reason: LogoutReason) -> Vec<CoreEvent> {
        self.phase = EnginePhase::LoggedOut;

        match self.logout.execute() {
            Ok(outcome) => {
                info!(reason = ?reason, outcome = %outcome, "Logged out");
                self.record(ActivityEvent::LoggedOut {
                    method: outcome.to_string(),
                });
                vec![CoreEvent::LoggedOut {
                    reason,
                    outcome: Some(outcome),
                }]
            }
            Err(e) => {
                error!(reason = ?reason, error = %e, "Logout failed");
                self.record(ActivityEvent::LogoutFailed {
                    error: e.to_string(),
                });
                vec![
                    CoreEvent::LogoutFailed { reason, error: e },
                    CoreEvent::LoggedOut {
                        reason,
                        outcome: None,
                    },
                ]
            }
        }
    }

    fn remaining_changed(&self) -> CoreEvent {
        CoreEvent::RemainingChanged {
            remaining: self.session.remaining(),
            used_today: self.session.used_today,
            daily_limit: self.session.daily_limit,
        }
    }

    fn record(&self, event: ActivityEvent) {
        self.ledger.store().append_activity(&event);
    }
}
