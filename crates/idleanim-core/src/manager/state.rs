use serde::{Deserialize, Serialize};

/// Lifecycle state of the animation manager.
///
/// `Idle` and `Blocked` are live: an animation is mounted. The frozen
/// variants hold a [`FreezeSnapshot`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManagerState {
    Idle,
    Blocked,
    FrozenIdle,
    FrozenBlocked,
}

impl ManagerState {
    pub fn is_live(self) -> bool {
        matches!(self, ManagerState::Idle | ManagerState::Blocked)
    }

    pub fn is_frozen(self) -> bool {
        !self.is_live()
    }

    /// The frozen counterpart of a live state.
    pub(crate) fn frozen(self) -> Option<Self> {
        match self {
            ManagerState::Idle => Some(ManagerState::FrozenIdle),
            ManagerState::Blocked => Some(ManagerState::FrozenBlocked),
            _ => None,
        }
    }
}

/// What survives a freeze: the animation name and, for idle animations,
/// the time that was left on the idle timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreezeSnapshot {
    pub name: String,
    pub remaining_ms: u64,
}

/// One-shot gates for the storage notifications.
///
/// `sd_card_ok_shown` and `no_database_shown` re-open when the card is
/// reported not ready; `show_url_once` is armed by the no-database
/// notification and consumed by the URL notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NotificationLatches {
    pub sd_card_ok_shown: bool,
    pub no_database_shown: bool,
    pub show_url_once: bool,
}

impl NotificationLatches {
    /// Boot latches: a card already present at power-on is not announced.
    pub fn at_boot(show_sd_ok_on_boot: bool) -> Self {
        Self {
            sd_card_ok_shown: !show_sd_ok_on_boot,
            ..Self::default()
        }
    }
}
