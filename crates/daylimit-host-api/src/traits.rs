//! Logout action traits

use std::fmt;
use thiserror::Error;

/// Errors from logout attempts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogoutError {
    /// Real logout requested on an OS without a supported primitive.
    /// Nothing was attempted.
    #[error("Logout is not supported on {os}")]
    UnsupportedPlatform { os: String },

    /// The graceful primitive and the low-level fallback both failed
    #[error("Failed to log off via both methods. Primary error: {primary}. Fallback error: {fallback}")]
    BothFailed { primary: String, fallback: String },
}

pub type LogoutResult<T> = Result<T, LogoutError>;

/// Whether logout ends the real OS session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutMode {
    /// Report success without touching the session
    Simulated,
    /// End the OS session
    Real,
}

impl LogoutMode {
    pub fn from_dry_run(dry_run: bool) -> Self {
        if dry_run {
            Self::Simulated
        } else {
            Self::Real
        }
    }
}

/// How a successful logout was carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutOutcome {
    /// Simulated mode, the session keeps running
    Simulated,
    /// Graceful OS logoff accepted
    Primary,
    /// Graceful logoff failed, low-level logoff accepted
    Fallback,
}

impl fmt::Display for LogoutOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogoutOutcome::Simulated => write!(f, "simulated"),
            LogoutOutcome::Primary => write!(f, "graceful logoff"),
            LogoutOutcome::Fallback => write!(f, "fallback logoff"),
        }
    }
}

/// Ends the current user session - implemented by platform-specific adapters
pub trait LogoutAction: Send + Sync {
    /// The mode this action runs in
    fn mode(&self) -> LogoutMode;

    /// Attempt to end the session.
    ///
    /// Must not force-close other applications.
    fn execute(&self) -> LogoutResult<LogoutOutcome>;
}
