//! Animation manager state machine.
//!
//! Owns the single mounted animation and decides when it changes. All
//! transitions take `&mut self`; asynchronous producers reach the manager
//! through its input queue (see [`crate::service`]).
//!
//! ## State Transitions
//!
//! ```text
//! Idle --timer--> Idle            Idle --signal[blocking]--> Blocked
//! Blocked --interaction--> Blocked | Idle
//! Idle | Blocked --suspend--> FrozenIdle | FrozenBlocked --resume--> Idle | Blocked
//! ```
//!
//! Exactly one of {mounted animation, freeze snapshot} exists at any time.

use chrono::Utc;

use super::blocking::{self, BlockingReason};
use super::input::{InputSender, ManagerInput};
use super::state::{FreezeSnapshot, ManagerState, NotificationLatches};
use crate::catalog::{Catalog, PlayableAnimation};
use crate::display::DisplaySink;
use crate::events::Event;
use crate::selector::{SelectionContext, Selector};
use crate::signals::{Signals, StorageStatus, SubscriptionId};
use crate::storage::ManagerConfig;
use crate::timer::{IdleTimer, TimerToken};

#[derive(Debug, Clone, Copy)]
enum SignalSubscription {
    Storage(SubscriptionId),
    Progression(SubscriptionId),
}

/// The idle animation lifecycle state machine.
pub struct AnimationManager<C: Catalog, D: DisplaySink, T: IdleTimer> {
    catalog: C,
    display: D,
    timer: T,
    signals: Signals,
    selector: Selector,
    state: ManagerState,
    /// Mounted animation; `Some` iff the state is live.
    current: Option<PlayableAnimation>,
    /// Why the current animation blocks, while `Blocked` or `FrozenBlocked`.
    blocking: Option<BlockingReason>,
    /// `Some` iff the state is frozen.
    snapshot: Option<FreezeSnapshot>,
    latches: NotificationLatches,
    subscriptions: Vec<SignalSubscription>,
}

impl<C: Catalog, D: DisplaySink, T: IdleTimer> AnimationManager<C, D, T> {
    /// Create a manager and mount its first animation.
    ///
    /// A blocking condition present at boot is shown first; otherwise a
    /// fresh idle animation is selected.
    pub fn new(catalog: C, display: D, timer: T, signals: Signals, config: &ManagerConfig) -> Self {
        let mut manager = Self {
            catalog,
            display,
            timer,
            signals,
            selector: Selector::new(config.rng_seed),
            state: ManagerState::Idle,
            current: None,
            blocking: None,
            snapshot: None,
            latches: NotificationLatches::at_boot(config.show_sd_ok_on_boot),
            subscriptions: Vec::new(),
        };
        if manager.check_blocking().is_none() {
            manager.start_new_idle();
        }
        manager
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> ManagerState {
        self.state
    }

    pub fn current_animation(&self) -> Option<&PlayableAnimation> {
        self.current.as_ref()
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current.as_ref().map(|a| a.name.as_str())
    }

    pub fn blocking_reason(&self) -> Option<BlockingReason> {
        self.blocking
    }

    pub fn snapshot(&self) -> Option<&FreezeSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn latches(&self) -> NotificationLatches {
        self.latches
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Hosts driving a caller-advanced timer need mutable access to it.
    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    pub fn signals(&self) -> &Signals {
        &self.signals
    }

    /// Whether the mounted/snapshot exclusivity holds for the current state.
    pub fn is_consistent(&self) -> bool {
        let live = self.state.is_live();
        live == self.current.is_some()
            && !live == self.snapshot.is_some()
            && !(self.state == ManagerState::Idle && self.blocking.is_some())
            && !(self.state != ManagerState::Idle && self.timer.is_armed())
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Apply one input. Returns the resulting event, or `None` when the
    /// input does not apply to the current state.
    pub fn handle(&mut self, input: ManagerInput) -> Option<Event> {
        match input {
            ManagerInput::TimerExpired(token) => self.on_timer_expired(token),
            ManagerInput::SignalChanged => self.on_signal_changed(),
            ManagerInput::Interaction => self.on_interaction(),
            ManagerInput::Suspend => Some(self.suspend()),
            ManagerInput::Resume => Some(self.resume()),
            ManagerInput::Shutdown => None,
        }
    }

    /// Release the mounted animation and let another UI layer take the display.
    ///
    /// # Panics
    ///
    /// Panics unless the state is `Idle` or `Blocked` with no pending snapshot.
    pub fn suspend(&mut self) -> Event {
        assert!(
            self.snapshot.is_none(),
            "suspend called twice without an intervening resume"
        );
        let Some(frozen) = self.state.frozen() else {
            panic!("suspend called in state {:?}", self.state);
        };
        let Some(current) = self.current.take() else {
            panic!("suspend called with no mounted animation");
        };

        let remaining_ms = if self.state == ManagerState::Idle {
            let remaining = self.timer.remaining_ms();
            self.timer.cancel();
            remaining
        } else {
            0
        };

        self.snapshot = Some(FreezeSnapshot {
            name: current.name.clone(),
            remaining_ms,
        });
        self.state = frozen;
        self.display.freeze();
        tracing::debug!("Unload & stall '{}' ({} ms left)", current.name, remaining_ms);

        Event::Frozen {
            name: current.name,
            state: frozen,
            remaining_ms,
            at: Utc::now(),
        }
    }

    /// Mount an animation again after a suspend.
    ///
    /// # Panics
    ///
    /// Panics unless the state is `FrozenIdle` or `FrozenBlocked`.
    pub fn resume(&mut self) -> Event {
        assert!(
            self.state.is_frozen(),
            "resume called in state {:?}",
            self.state
        );
        assert!(self.current.is_none(), "resume called with a mounted animation");
        let Some(snapshot) = self.snapshot.take() else {
            panic!("resume called without a prior suspend");
        };

        match self.state {
            ManagerState::FrozenBlocked => self.restore_blocking(&snapshot),
            _ => self.restore_idle(&snapshot),
        }

        if self.current.is_none() {
            self.start_new_idle();
        }

        self.display.unfreeze();
        let name = self.current_name().unwrap_or_default().to_string();
        tracing::debug!("Load & continue with '{}'", name);

        Event::Resumed {
            name,
            state: self.state,
            at: Utc::now(),
        }
    }

    /// Post `SignalChanged` to `inputs` whenever storage or progression changes.
    pub fn subscribe(&mut self, inputs: &InputSender) {
        let tx = inputs.clone();
        let id = self.signals.storage.changes().subscribe(move || {
            let _ = tx.send(ManagerInput::SignalChanged);
        });
        self.subscriptions.push(SignalSubscription::Storage(id));

        let tx = inputs.clone();
        let id = self.signals.progression.changes().subscribe(move || {
            let _ = tx.send(ManagerInput::SignalChanged);
        });
        self.subscriptions.push(SignalSubscription::Progression(id));
    }

    pub fn unsubscribe(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            match subscription {
                SignalSubscription::Storage(id) => {
                    self.signals.storage.changes().unsubscribe(id);
                }
                SignalSubscription::Progression(id) => {
                    self.signals.progression.changes().unsubscribe(id);
                }
            }
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn on_timer_expired(&mut self, token: TimerToken) -> Option<Event> {
        if !self.timer.claim_expiry(token) {
            tracing::debug!("Ignoring stale idle timer expiry");
            return None;
        }
        if self.state != ManagerState::Idle {
            tracing::debug!("Ignoring idle timer expiry in state {:?}", self.state);
            return None;
        }
        Some(self.start_new_idle())
    }

    fn on_signal_changed(&mut self) -> Option<Event> {
        if self.state != ManagerState::Idle {
            tracing::debug!("Deferring signal change in state {:?}", self.state);
            return None;
        }
        self.check_blocking().map(|reason| self.blocking_event(reason))
    }

    fn on_interaction(&mut self) -> Option<Event> {
        if self.state != ManagerState::Blocked {
            return None;
        }
        match self.check_blocking() {
            Some(reason) => Some(self.blocking_event(reason)),
            None => Some(self.start_new_idle()),
        }
    }

    /// Evaluate blocking conditions and mount the winning animation.
    ///
    /// Latch updates are committed only when the animation loads, so a
    /// notification that could not be shown stays pending.
    fn check_blocking(&mut self) -> Option<BlockingReason> {
        let storage = &self.signals.storage;
        let stats = self.signals.progression.progression_stats();
        let mut latches = self.latches;
        let Some(reason) = blocking::evaluate(
            &mut latches,
            storage.storage_status(),
            || storage.database_present(),
            &stats,
        ) else {
            self.latches = latches;
            return None;
        };

        let name = reason.animation_name();
        match self.catalog.load(name) {
            Ok(animation) => {
                self.latches = latches;
                self.timer.cancel();
                self.replace_current(animation);
                self.state = ManagerState::Blocked;
                self.blocking = Some(reason);
                Some(reason)
            }
            Err(e) => {
                tracing::error!("Blocking animation '{}' unavailable: {}", name, e);
                None
            }
        }
    }

    fn start_new_idle(&mut self) -> Event {
        let context = SelectionContext::from_signals(&self.signals);
        let animation = self.selector.select(&self.catalog, &context);
        let name = animation.name.clone();
        let duration_ms = animation.duration_ms();

        self.replace_current(animation);
        self.state = ManagerState::Idle;
        self.blocking = None;
        self.timer.arm(duration_ms);

        Event::IdleStarted {
            name,
            duration_ms,
            at: Utc::now(),
        }
    }

    /// Mount `animation`, then release the previous one.
    fn replace_current(&mut self, animation: PlayableAnimation) {
        self.display.mount(&animation);
        tracing::info!("Select '{}' animation", animation.name);
        let previous = self.current.replace(animation);
        drop(previous);
    }

    fn restore_blocking(&mut self, snapshot: &FreezeSnapshot) {
        let still_holds = self
            .blocking
            .is_some_and(|reason| self.condition_holds(reason));
        if !still_holds {
            tracing::info!("Blocking condition for '{}' cleared while frozen", snapshot.name);
            self.blocking = None;
            self.check_blocking();
            return;
        }

        match self.catalog.load(&snapshot.name) {
            Ok(animation) => {
                self.replace_current(animation);
                self.state = ManagerState::Blocked;
            }
            Err(e) => {
                tracing::error!("Failed to restore '{}': {}", snapshot.name, e);
                self.blocking = None;
            }
        }
    }

    fn restore_idle(&mut self, snapshot: &FreezeSnapshot) {
        // Notifications may have been missed while frozen.
        if self.check_blocking().is_some() {
            return;
        }

        match self.catalog.load(&snapshot.name) {
            Ok(animation) => {
                let duration_ms = if snapshot.remaining_ms > 0 {
                    snapshot.remaining_ms
                } else {
                    animation.duration_ms()
                };
                self.replace_current(animation);
                self.state = ManagerState::Idle;
                self.timer.arm(duration_ms);
            }
            Err(e) => {
                tracing::error!("Failed to restore '{}': {}", snapshot.name, e);
            }
        }
    }

    /// Whether a blocking animation shown before a freeze still applies.
    fn condition_holds(&self, reason: BlockingReason) -> bool {
        let storage = self.signals.storage.storage_status();
        match reason {
            BlockingReason::BadSdCard => storage == StorageStatus::InternalError,
            BlockingReason::SdCardOk | BlockingReason::ShowUrl => storage == StorageStatus::Ok,
            BlockingReason::NoDatabase => {
                storage == StorageStatus::Ok && !self.signals.storage.database_present()
            }
            BlockingReason::LevelUp => {
                self.signals.progression.progression_stats().level_up_pending
            }
        }
    }

    fn blocking_event(&self, reason: BlockingReason) -> Event {
        Event::BlockingShown {
            name: reason.animation_name().to_string(),
            reason,
            at: Utc::now(),
        }
    }
}

impl<C: Catalog, D: DisplaySink, T: IdleTimer> Drop for AnimationManager<C, D, T> {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl<C: Catalog, D: DisplaySink, T: IdleTimer> std::fmt::Debug for AnimationManager<C, D, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationManager")
            .field("state", &self.state)
            .field("current", &self.current_name())
            .field("blocking", &self.blocking)
            .field("snapshot", &self.snapshot)
            .field("latches", &self.latches)
            .finish()
    }
}
