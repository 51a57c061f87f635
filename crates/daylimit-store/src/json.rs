//! JSON file store implementation

use daylimit_util::{format_log_timestamp, ACTIVITY_LOG_FILENAME, STATE_FILENAME};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::{ActivityEntry, ActivityEvent, PersistedState, Store, StoreResult};

/// Store backed by `state.json` and `activity.log` in one directory
pub struct JsonStore {
    dir: PathBuf,
    state_path: PathBuf,
    log_path: PathBuf,
    default_daily_limit: u64,
}

impl JsonStore {
    /// Open or create a store in the given directory.
    ///
    /// `default_daily_limit` only seeds a state file that has no valid limit.
    pub fn open(dir: impl AsRef<Path>, default_daily_limit: u64) -> StoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;

        Ok(Self {
            state_path: dir.join(STATE_FILENAME),
            log_path: dir.join(ACTIVITY_LOG_FILENAME),
            dir,
            default_daily_limit,
        })
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    pub fn activity_log_path(&self) -> &Path {
        &self.log_path
    }

    fn reset_to_defaults(&self, error: String) -> PersistedState {
        warn!(path = %self.state_path.display(), error = %error, "State read failed, resetting");
        self.append_activity(&ActivityEvent::StateReadFailed { error });

        let state = PersistedState::new(self.default_daily_limit);
        self.save_or_warn(&state);
        state
    }

    /// Writes made while loading are best-effort: the next usage update
    /// saves again and surfaces a persistent failure as fatal.
    fn save_or_warn(&self, state: &PersistedState) {
        if let Err(e) = self.save_state(state) {
            warn!(path = %self.state_path.display(), error = %e, "Failed to write state during load");
        }
    }
}

impl Store for JsonStore {
    fn load_state(&self) -> PersistedState {
        let content = match std::fs::read_to_string(&self.state_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.state_path.display(), "No state file, initializing");
                let state = PersistedState::new(self.default_daily_limit);
                self.save_or_warn(&state);
                return state;
            }
            Err(e) => return self.reset_to_defaults(e.to_string()),
        };

        match PersistedState::decode(&content, self.default_daily_limit) {
            Ok(decoded) => {
                if !decoded.repairs.is_empty() {
                    let details = decoded
                        .repairs
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join("; ");
                    info!(details = %details, "State repaired");
                    self.append_activity(&ActivityEvent::StateRepaired { details });
                    self.save_or_warn(&decoded.state);
                }
                debug!(
                    daily_limit = decoded.state.daily_limit_seconds,
                    days = decoded.state.usage.len(),
                    "State loaded"
                );
                decoded.state
            }
            Err(e) => self.reset_to_defaults(e.to_string()),
        }
    }

    fn save_state(&self, state: &PersistedState) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(state)?;

        // Same directory as the target so the rename stays on one filesystem
        let mut tmp = tempfile::Builder::new()
            .prefix(".state")
            .suffix(".tmp")
            .tempfile_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.state_path).map_err(|e| e.error)?;
        #[cfg(unix)]
        sync_dir(&self.dir)?;

        Ok(())
    }

    fn append_activity(&self, event: &ActivityEvent) {
        let line = format!("[{}] {}\n", format_log_timestamp(&daylimit_util::now()), event);

        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .and_then(|mut file| file.write_all(line.as_bytes()));

        if let Err(e) = result {
            warn!(path = %self.log_path.display(), error = %e, "Activity log write failed");
        }
    }

    fn recent_activity(&self, limit: usize) -> StoreResult<Vec<ActivityEntry>> {
        let content = match std::fs::read_to_string(&self.log_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let entries: Vec<ActivityEntry> =
            content.lines().filter_map(ActivityEntry::parse_line).collect();
        let skip = entries.len().saturating_sub(limit);

        Ok(entries.into_iter().skip(skip).collect())
    }
}

/// Flush the directory entry so a completed rename survives power loss
#[cfg(unix)]
fn sync_dir(dir: &Path) -> std::io::Result<()> {
    std::fs::File::open(dir)?.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use daylimit_util::DayKey;

    fn open_store(dir: &Path) -> JsonStore {
        JsonStore::open(dir, 3600).unwrap()
    }

    #[test]
    fn test_missing_file_initializes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());

        let state = store.load_state();
        assert_eq!(state, PersistedState::new(3600));
        assert!(store.state_path().exists());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());

        let mut state = PersistedState::new(1234);
        state.usage.insert(DayKey::new("2025-01-01"), 100);
        state.usage.insert(DayKey::new("2025-01-02"), 0);
        store.save_state(&state).unwrap();

        assert_eq!(store.load_state(), state);
    }

    #[test]
    fn test_stored_limit_is_sticky() {
        let dir = tempfile::tempdir().unwrap();
        JsonStore::open(dir.path(), 100)
            .unwrap()
            .save_state(&PersistedState::new(100))
            .unwrap();

        // A different compiled-in default must not override the stored one
        let store = JsonStore::open(dir.path(), 9999).unwrap();
        assert_eq!(store.load_state().daily_limit_seconds, 100);
    }

    #[test]
    fn test_corrupt_file_resets_and_logs() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());
        std::fs::write(store.state_path(), "{{{ definitely not json").unwrap();

        let state = store.load_state();
        assert_eq!(state, PersistedState::new(3600));

        // File rewritten with a valid record
        let on_disk = std::fs::read_to_string(store.state_path()).unwrap();
        assert!(PersistedState::decode(&on_disk, 1).unwrap().repairs.is_empty());

        let activity = store.recent_activity(10).unwrap();
        assert_eq!(activity.len(), 1);
        assert!(activity[0].message.starts_with("State read failed, resetting. Error:"));
    }

    #[test]
    fn test_invalid_usage_keeps_limit() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());
        std::fs::write(
            store.state_path(),
            r#"{"dailyLimitSeconds": 42, "usage": 17}"#,
        )
        .unwrap();

        let state = store.load_state();
        assert_eq!(state.daily_limit_seconds, 42);
        assert!(state.usage.is_empty());

        // Repair written back
        let on_disk = std::fs::read_to_string(store.state_path()).unwrap();
        let reread = PersistedState::decode(&on_disk, 1).unwrap();
        assert!(reread.repairs.is_empty());
        assert_eq!(reread.state, state);
    }

    #[test]
    fn test_save_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());
        store.save_state(&PersistedState::new(5)).unwrap();
        store.save_state(&PersistedState::new(6)).unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["state.json".to_string()]);
    }

    #[test]
    fn test_save_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());
        std::fs::remove_dir_all(dir.path()).unwrap();
        // A plain file where the directory used to be
        std::fs::write(dir.path(), b"").unwrap();

        assert!(store.save_state(&PersistedState::new(1)).is_err());

        std::fs::remove_file(dir.path()).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_sync_dir() {
        let dir = tempfile::tempdir().unwrap();
        sync_dir(dir.path()).unwrap();
        assert!(sync_dir(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_activity_log_appends_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());

        store.append_activity(&ActivityEvent::LimitReached);
        store.append_activity(&ActivityEvent::WindowClosed { enforced: true });
        store.append_activity(&ActivityEvent::WarningIssued { remaining: 300 });

        let all = store.recent_activity(10).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].message, "Countdown reached zero -> logging out.");

        let last_two = store.recent_activity(2).unwrap();
        assert_eq!(last_two.len(), 2);
        assert_eq!(last_two[1].message, "Warning shown with 00:05:00 remaining.");
    }

    #[test]
    fn test_activity_log_failure_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());
        // A directory where the log file should be makes every append fail
        std::fs::create_dir(store.activity_log_path()).unwrap();

        store.append_activity(&ActivityEvent::LimitReached);
    }

    #[test]
    fn test_recent_activity_without_log() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());
        assert!(store.recent_activity(5).unwrap().is_empty());
    }
}
