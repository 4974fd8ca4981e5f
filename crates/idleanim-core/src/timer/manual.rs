//! Caller-driven timer.
//!
//! Does not use internal threads or a runtime: the caller advances it by
//! elapsed milliseconds and forwards the returned token as a
//! `ManagerInput::TimerExpired`.
//!
//! ```ignore
//! if let Some(token) = timer.advance(elapsed_ms) {
//!     manager.handle(ManagerInput::TimerExpired(token));
//! }
//! ```

use super::{IdleTimer, TimerToken};

#[derive(Debug, Clone, Default)]
pub struct ManualTimer {
    generation: u64,
    live: bool,
    fired: bool,
    remaining_ms: u64,
    /// Duration passed to the most recent `arm`.
    last_armed_ms: Option<u64>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn last_armed_ms(&self) -> Option<u64> {
        self.last_armed_ms
    }

    pub fn token(&self) -> TimerToken {
        TimerToken::new(self.generation)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Advance by `elapsed_ms`. Returns the live token once, when it expires.
    pub fn advance(&mut self, elapsed_ms: u64) -> Option<TimerToken> {
        if !self.live || self.fired {
            return None;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed_ms);
        if self.remaining_ms == 0 {
            self.fired = true;
            return Some(self.token());
        }
        None
    }
}

impl IdleTimer for ManualTimer {
    fn arm(&mut self, duration_ms: u64) -> TimerToken {
        self.generation += 1;
        self.live = true;
        self.fired = false;
        self.remaining_ms = duration_ms;
        self.last_armed_ms = Some(duration_ms);
        self.token()
    }

    fn cancel(&mut self) {
        self.live = false;
        self.remaining_ms = 0;
    }

    fn remaining_ms(&self) -> u64 {
        if self.live {
            self.remaining_ms
        } else {
            0
        }
    }

    fn is_armed(&self) -> bool {
        self.live && !self.fired
    }

    fn claim_expiry(&mut self, token: TimerToken) -> bool {
        if self.live && token == self.token() {
            self.live = false;
            self.remaining_ms = 0;
            return true;
        }
        false
    }
}
