//! Store trait definitions

use crate::{ActivityEntry, ActivityEvent, PersistedState, StoreResult};

/// Main store trait
pub trait Store: Send + Sync {
    // State

    /// Load the persisted state.
    ///
    /// Never fails: a missing file is created with defaults, an unusable file
    /// is replaced with defaults (and the failure recorded in the activity
    /// log), and a partially invalid file is repaired field by field.
    fn load_state(&self) -> PersistedState;

    /// Persist the state atomically. Errors are fatal to the caller.
    fn save_state(&self, state: &PersistedState) -> StoreResult<()>;

    // Activity log

    /// Append an activity log line. Write failures are reported as
    /// diagnostics and otherwise ignored.
    fn append_activity(&self, event: &ActivityEvent);

    /// Read back the most recent activity entries, oldest first
    fn recent_activity(&self, limit: usize) -> StoreResult<Vec<ActivityEntry>>;
}
