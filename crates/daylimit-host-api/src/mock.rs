//! Mock logout action for testing

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::{LogoutAction, LogoutError, LogoutMode, LogoutOutcome, LogoutResult};

/// Mock logout action for unit/integration testing.
///
/// Clones share state, so a test can keep one handle while the engine owns
/// another.
#[derive(Debug, Clone)]
pub struct MockLogout {
    calls: Arc<AtomicUsize>,

    /// Configure execute to fail with this error
    pub fail_with: Arc<Mutex<Option<LogoutError>>>,
}

impl MockLogout {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            fail_with: Arc::new(Mutex::new(None)),
        }
    }

    /// Mock that fails every attempt with `error`
    pub fn failing(error: LogoutError) -> Self {
        let mock = Self::new();
        mock.set_failure(Some(error));
        mock
    }

    pub fn set_failure(&self, error: Option<LogoutError>) {
        *self.fail_with.lock().unwrap() = error;
    }

    /// Number of times execute() was called
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockLogout {
    fn default() -> Self {
        Self::new()
    }
}

impl LogoutAction for MockLogout {
    fn mode(&self) -> LogoutMode {
        LogoutMode::Simulated
    }

    fn execute(&self) -> LogoutResult<LogoutOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match self.fail_with.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(LogoutOutcome::Simulated),
        }
    }
}
