//! System logout action

use daylimit_host_api::{LogoutAction, LogoutError, LogoutMode, LogoutOutcome, LogoutResult};
use tracing::{info, warn};

/// Logout action for the machine this process runs on
#[derive(Debug, Clone)]
pub struct SystemLogout {
    mode: LogoutMode,
}

impl SystemLogout {
    pub fn new(mode: LogoutMode) -> Self {
        Self { mode }
    }

    #[cfg(windows)]
    fn log_off(&self) -> LogoutResult<LogoutOutcome> {
        with_fallback(crate::windows::graceful_logoff, crate::windows::api_logoff)
    }

    #[cfg(not(windows))]
    fn log_off(&self) -> LogoutResult<LogoutOutcome> {
        Err(LogoutError::UnsupportedPlatform {
            os: std::env::consts::OS.to_string(),
        })
    }
}

impl LogoutAction for SystemLogout {
    fn mode(&self) -> LogoutMode {
        self.mode
    }

    fn execute(&self) -> LogoutResult<LogoutOutcome> {
        if self.mode == LogoutMode::Simulated {
            info!("[DRY RUN] Would log off now.");
            return Ok(LogoutOutcome::Simulated);
        }

        let result = self.log_off();
        match &result {
            Ok(outcome) => info!(outcome = %outcome, "Logoff requested"),
            Err(e) => warn!(error = %e, "Logoff failed"),
        }
        result
    }
}

/// Try `primary`; if it fails, try `fallback`. Both errors are kept when
/// neither succeeds.
pub fn with_fallback<P, F>(primary: P, fallback: F) -> LogoutResult<LogoutOutcome>
where
    P: FnOnce() -> Result<(), String>,
    F: FnOnce() -> Result<(), String>,
{
    let primary_error = match primary() {
        Ok(()) => return Ok(LogoutOutcome::Primary),
        Err(e) => e,
    };

    warn!(error = %primary_error, "Primary logoff failed, trying fallback");

    match fallback() {
        Ok(()) => Ok(LogoutOutcome::Fallback),
        Err(fallback_error) => Err(LogoutError::BothFailed {
            primary: primary_error,
            fallback: fallback_error,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn simulated_never_touches_the_session() {
        let action = SystemLogout::new(LogoutMode::Simulated);
        assert_eq!(action.mode(), LogoutMode::Simulated);
        assert_eq!(action.execute(), Ok(LogoutOutcome::Simulated));
    }

    #[test]
    #[cfg(not(windows))]
    fn real_mode_is_unsupported_off_windows() {
        let action = SystemLogout::new(LogoutMode::Real);
        assert!(matches!(
            action.execute(),
            Err(LogoutError::UnsupportedPlatform { os }) if os == std::env::consts::OS
        ));
    }

    #[test]
    fn primary_success_skips_fallback() {
        let fallback_ran = Cell::new(false);
        let result = with_fallback(
            || Ok(()),
            || {
                fallback_ran.set(true);
                Ok(())
            },
        );
        assert_eq!(result, Ok(LogoutOutcome::Primary));
        assert!(!fallback_ran.get());
    }

    #[test]
    fn fallback_used_after_primary_failure() {
        let result = with_fallback(|| Err("no shutdown.exe".into()), || Ok(()));
        assert_eq!(result, Ok(LogoutOutcome::Fallback));
    }

    #[test]
    fn both_failures_are_reported() {
        let result = with_fallback(|| Err("primary broke".into()), || Err("fallback broke".into()));
        assert_eq!(
            result,
            Err(LogoutError::BothFailed {
                primary: "primary broke".into(),
                fallback: "fallback broke".into(),
            })
        );
    }
}
