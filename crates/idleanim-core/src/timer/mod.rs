//! One-shot idle timers.
//!
//! Only the most recent arm is live: every `arm` returns a fresh
//! [`TimerToken`] and expiries carrying an older token are rejected by
//! [`IdleTimer::claim_expiry`]. This makes an expiry that was already in
//! flight when the timer was re-armed or cancelled harmless.

mod manual;
mod tokio_timer;

pub use manual::ManualTimer;
pub use tokio_timer::TokioTimer;

/// Identifies one arm of an idle timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

impl TimerToken {
    pub fn new(generation: u64) -> Self {
        Self(generation)
    }

    pub fn generation(self) -> u64 {
        self.0
    }
}

pub trait IdleTimer: Send {
    /// Arm for `duration_ms`, superseding any previous arm.
    fn arm(&mut self, duration_ms: u64) -> TimerToken;

    fn cancel(&mut self);

    /// Time left on the live arm; 0 when expired or not armed.
    fn remaining_ms(&self) -> u64;

    fn is_armed(&self) -> bool;

    /// Accept an expiry if it belongs to the live arm, disarming the timer.
    fn claim_expiry(&mut self, token: TimerToken) -> bool;
}
