//! Per-day usage accounting
//!
//! Every mutation is written through the store before it returns, so a crash
//! loses at most the increment in flight.

use daylimit_store::{PersistedState, Store, StoreResult};
use daylimit_util::DayKey;
use std::sync::Arc;
use tracing::debug;

/// In-memory copy of the persisted state plus the store that backs it
pub struct DayLedger {
    state: PersistedState,
    store: Arc<dyn Store>,
}

impl DayLedger {
    /// Load the persisted state through the store
    pub fn load(store: Arc<dyn Store>) -> Self {
        let state = store.load_state();
        Self { state, store }
    }

    /// Daily limit as loaded at startup
    pub fn daily_limit(&self) -> u64 {
        self.state.daily_limit_seconds
    }

    /// Seconds used on `day`, zero for days never seen
    pub fn used_seconds(&self, day: &DayKey) -> u64 {
        self.state.usage.get(day).copied().unwrap_or(0)
    }

    /// Overwrite the usage for `day`. Negative values clamp to zero.
    pub fn set_used_seconds(&mut self, day: &DayKey, value: i64) -> StoreResult<()> {
        let value = clamp_seconds(value);
        self.state.usage.insert(day.clone(), value);
        self.store.save_state(&self.state)?;

        debug!(day = %day, used_secs = value, "Usage set");
        Ok(())
    }

    /// Add `delta` seconds to `day` and return the new total.
    /// The total saturates at zero and at `u64::MAX`.
    pub fn add_used_seconds(&mut self, day: &DayKey, delta: i64) -> StoreResult<u64> {
        let total = self.used_seconds(day).saturating_add_signed(delta);
        self.state.usage.insert(day.clone(), total);
        self.store.save_state(&self.state)?;

        debug!(day = %day, delta, used_secs = total, "Usage added");
        Ok(total)
    }

    pub fn state(&self) -> &PersistedState {
        &self.state
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }
}

fn clamp_seconds(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use daylimit_store::JsonStore;

    fn ledger(dir: &std::path::Path) -> DayLedger {
        DayLedger::load(Arc::new(JsonStore::open(dir, 600).unwrap()))
    }

    #[test]
    fn unknown_day_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = ledger(dir.path());
        assert_eq!(ledger.used_seconds(&DayKey::new("2025-01-01")), 0);
        assert_eq!(ledger.daily_limit(), 600);
    }

    #[test]
    fn add_accumulates_and_clamps() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = ledger(dir.path());
        let day = DayKey::new("2025-01-01");

        assert_eq!(ledger.add_used_seconds(&day, 5).unwrap(), 5);
        assert_eq!(ledger.add_used_seconds(&day, 3).unwrap(), 8);
        assert_eq!(ledger.add_used_seconds(&day, -20).unwrap(), 0);
        assert_eq!(ledger.add_used_seconds(&day, 4).unwrap(), 4);
        assert_eq!(ledger.used_seconds(&day), 4);
    }

    #[test]
    fn add_is_cumulative_over_many_increments() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = ledger(dir.path());
        let day = DayKey::new("2025-01-01");

        let deltas = [0i64, 1, 7, 0, 30, 2];
        for delta in deltas {
            ledger.add_used_seconds(&day, delta).unwrap();
        }
        assert_eq!(ledger.used_seconds(&day), deltas.iter().sum::<i64>() as u64);
    }

    #[test]
    fn set_clamps_negative_values() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = ledger(dir.path());
        let day = DayKey::new("2025-01-01");

        ledger.set_used_seconds(&day, -5).unwrap();
        assert_eq!(ledger.used_seconds(&day), 0);

        ledger.set_used_seconds(&day, 90).unwrap();
        assert_eq!(ledger.used_seconds(&day), 90);
    }

    #[test]
    fn every_mutation_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let day = DayKey::new("2025-01-01");
        {
            let mut ledger = ledger(dir.path());
            ledger.add_used_seconds(&day, 42).unwrap();
        }

        let reloaded = ledger(dir.path());
        assert_eq!(reloaded.used_seconds(&day), 42);
    }

    #[test]
    fn add_saturates_at_the_top() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = ledger(dir.path());
        let day = DayKey::new("2025-01-01");

        let mut state = PersistedState::new(600);
        state.usage.insert(day.clone(), u64::MAX);
        ledger.store().save_state(&state).unwrap();
        let mut ledger = DayLedger::load(ledger.store().clone());

        assert_eq!(ledger.add_used_seconds(&day, 1).unwrap(), u64::MAX);
        assert_eq!(ledger.add_used_seconds(&day, -1).unwrap(), u64::MAX - 1);
    }

    #[test]
    fn fractional_usage_on_disk_still_counts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(daylimit_util::STATE_FILENAME),
            r#"{"dailyLimitSeconds": 600, "usage": {"2025-01-01": 600.0}}"#,
        )
        .unwrap();

        let ledger = ledger(dir.path());
        assert_eq!(ledger.used_seconds(&DayKey::new("2025-01-01")), 600);
        assert_eq!(ledger.daily_limit(), 600);
    }

    #[test]
    fn days_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = ledger(dir.path());
        let monday = DayKey::new("2025-01-06");
        let tuesday = DayKey::new("2025-01-07");

        ledger.add_used_seconds(&monday, 100).unwrap();
        ledger.add_used_seconds(&tuesday, 1).unwrap();

        assert_eq!(ledger.used_seconds(&monday), 100);
        assert_eq!(ledger.used_seconds(&tuesday), 1);
        assert_eq!(ledger.state().usage.len(), 2);
    }
}
