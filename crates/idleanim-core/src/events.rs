use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::manager::{BlockingReason, ManagerState};

/// Every state change of the animation manager produces an Event.
/// Hosts forward them to logs, UI overlays or test probes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A fresh idle animation was mounted and the idle timer armed.
    IdleStarted {
        name: String,
        duration_ms: u64,
        at: DateTime<Utc>,
    },
    /// A blocking animation preempted idle rotation.
    BlockingShown {
        name: String,
        reason: BlockingReason,
        at: DateTime<Utc>,
    },
    /// The display was handed over to another UI layer.
    Frozen {
        name: String,
        state: ManagerState,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    /// The display came back and an animation is mounted again.
    Resumed {
        name: String,
        state: ManagerState,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Name of the animation this event refers to.
    pub fn animation_name(&self) -> &str {
        match self {
            Event::IdleStarted { name, .. }
            | Event::BlockingShown { name, .. }
            | Event::Frozen { name, .. }
            | Event::Resumed { name, .. } => name,
        }
    }
}
