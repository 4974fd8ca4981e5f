//! External signal sources consulted by the animation manager.
//!
//! Each probe answers synchronously and exposes a [`Notifier`] that fires
//! when its value may have changed. Probes never fail: an unavailable
//! subsystem reports a defined "not ready" status instead.

mod hub;
mod notifier;

pub use hub::SignalHub;
pub use notifier::{Notifier, SubscriptionId};

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Mount status of the external storage card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageStatus {
    Ok,
    NotReady,
    InternalError,
}

impl StorageStatus {
    /// A card is physically mounted unless the status is `NotReady`,
    /// even if the filesystem on it is broken.
    pub fn is_mounted(self) -> bool {
        !matches!(self, StorageStatus::NotReady)
    }
}

/// Snapshot of the progression/leveling subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProgressionStats {
    pub level: u32,
    /// The mood ("butthurt") counter; higher is grumpier.
    pub mood: u32,
    pub level_up_pending: bool,
}

pub trait StorageProbe: Send + Sync {
    fn storage_status(&self) -> StorageStatus;

    /// Whether the expected database file exists on the card.
    fn database_present(&self) -> bool;

    fn changes(&self) -> &Notifier;
}

pub trait BatteryProbe: Send + Sync {
    fn battery_is_healthy(&self) -> bool;

    fn changes(&self) -> &Notifier;
}

pub trait ProgressionProbe: Send + Sync {
    fn progression_stats(&self) -> ProgressionStats;

    fn changes(&self) -> &Notifier;
}

/// The three probes the manager reads from.
#[derive(Clone)]
pub struct Signals {
    pub storage: Arc<dyn StorageProbe>,
    pub battery: Arc<dyn BatteryProbe>,
    pub progression: Arc<dyn ProgressionProbe>,
}

impl Signals {
    pub fn new(
        storage: Arc<dyn StorageProbe>,
        battery: Arc<dyn BatteryProbe>,
        progression: Arc<dyn ProgressionProbe>,
    ) -> Self {
        Self {
            storage,
            battery,
            progression,
        }
    }

    /// All three probes served by one hub.
    pub fn from_hub(hub: Arc<SignalHub>) -> Self {
        Self {
            storage: hub.clone(),
            battery: hub.clone(),
            progression: hub,
        }
    }
}

impl std::fmt::Debug for Signals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signals")
            .field("storage", &self.storage.storage_status())
            .field("battery_healthy", &self.battery.battery_is_healthy())
            .field("progression", &self.progression.progression_stats())
            .finish()
    }
}
