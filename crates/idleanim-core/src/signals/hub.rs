use std::sync::{Mutex, MutexGuard};

use super::{
    BatteryProbe, Notifier, ProgressionProbe, ProgressionStats, StorageProbe, StorageStatus,
};

#[derive(Debug, Clone, Copy)]
struct SignalState {
    storage: StorageStatus,
    database_present: bool,
    battery_healthy: bool,
    progression: ProgressionStats,
}

/// In-memory implementation of every probe.
///
/// Host subsystems push their readings through the setters; each setter
/// fires the matching notifier. Storage notifies on every update, like a
/// mount event bus, while battery and progression only notify on change.
#[derive(Debug)]
pub struct SignalHub {
    state: Mutex<SignalState>,
    storage_changes: Notifier,
    battery_changes: Notifier,
    progression_changes: Notifier,
}

impl SignalHub {
    /// Card mounted with a database, healthy battery, level 1.
    pub fn new() -> Self {
        Self::with_state(
            StorageStatus::Ok,
            true,
            true,
            ProgressionStats {
                level: 1,
                mood: 0,
                level_up_pending: false,
            },
        )
    }

    pub fn with_state(
        storage: StorageStatus,
        database_present: bool,
        battery_healthy: bool,
        progression: ProgressionStats,
    ) -> Self {
        Self {
            state: Mutex::new(SignalState {
                storage,
                database_present,
                battery_healthy,
                progression,
            }),
            storage_changes: Notifier::new(),
            battery_changes: Notifier::new(),
            progression_changes: Notifier::new(),
        }
    }

    pub fn set_storage_status(&self, status: StorageStatus) {
        self.lock().storage = status;
        self.storage_changes.notify();
    }

    pub fn set_database_present(&self, present: bool) {
        self.lock().database_present = present;
        self.storage_changes.notify();
    }

    pub fn set_battery_healthy(&self, healthy: bool) {
        let changed = {
            let mut state = self.lock();
            let changed = state.battery_healthy != healthy;
            state.battery_healthy = healthy;
            changed
        };
        if changed {
            self.battery_changes.notify();
        }
    }

    pub fn set_progression(&self, stats: ProgressionStats) {
        let changed = {
            let mut state = self.lock();
            let changed = state.progression != stats;
            state.progression = stats;
            changed
        };
        if changed {
            self.progression_changes.notify();
        }
    }

    /// Set or clear the pending level-up flag, keeping level and mood.
    pub fn set_level_up_pending(&self, pending: bool) {
        let stats = ProgressionStats {
            level_up_pending: pending,
            ..self.lock().progression
        };
        self.set_progression(stats);
    }

    fn lock(&self) -> MutexGuard<'_, SignalState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for SignalHub {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageProbe for SignalHub {
    fn storage_status(&self) -> StorageStatus {
        self.lock().storage
    }

    fn database_present(&self) -> bool {
        self.lock().database_present
    }

    fn changes(&self) -> &Notifier {
        &self.storage_changes
    }
}

impl BatteryProbe for SignalHub {
    fn battery_is_healthy(&self) -> bool {
        self.lock().battery_healthy
    }

    fn changes(&self) -> &Notifier {
        &self.battery_changes
    }
}

impl ProgressionProbe for SignalHub {
    fn progression_stats(&self) -> ProgressionStats {
        self.lock().progression
    }

    fn changes(&self) -> &Notifier {
        &self.progression_changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counter(notifier: &Notifier) -> Arc<AtomicUsize> {
        let hits = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&hits);
        notifier.subscribe(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        hits
    }

    #[test]
    fn storage_notifies_on_every_update() {
        let hub = SignalHub::new();
        let hits = counter(StorageProbe::changes(&hub));
        hub.set_storage_status(StorageStatus::Ok);
        hub.set_storage_status(StorageStatus::Ok);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn battery_notifies_only_on_change() {
        let hub = SignalHub::new();
        let hits = counter(BatteryProbe::changes(&hub));
        hub.set_battery_healthy(true);
        hub.set_battery_healthy(false);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!hub.battery_is_healthy());
    }

    #[test]
    fn level_up_flag_keeps_level_and_mood() {
        let hub = SignalHub::new();
        hub.set_progression(ProgressionStats {
            level: 2,
            mood: 5,
            level_up_pending: false,
        });
        hub.set_level_up_pending(true);
        let stats = hub.progression_stats();
        assert_eq!((stats.level, stats.mood), (2, 5));
        assert!(stats.level_up_pending);
    }
}
