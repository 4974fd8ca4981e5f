//! Async host for the animation manager.
//!
//! The service owns the manager and the receiving end of its input queue.
//! Timer expiries, signal notifications and UI requests are all posted to
//! that queue and applied one at a time by [`AnimationService::run`], so
//! the manager never sees concurrent mutation.

use tokio::sync::mpsc;

use crate::catalog::Catalog;
use crate::display::DisplaySink;
use crate::events::Event;
use crate::manager::{input_queue, AnimationManager, InputReceiver, InputSender, ManagerInput};
use crate::signals::Signals;
use crate::storage::ManagerConfig;
use crate::timer::TokioTimer;

pub type ServiceManager<C, D> = AnimationManager<C, D, TokioTimer>;

/// Cloneable sender for requests to a running service.
///
/// Every method returns `false` once the service loop has stopped.
#[derive(Debug, Clone)]
pub struct ServiceHandle {
    inputs: InputSender,
}

impl ServiceHandle {
    fn send(&self, input: ManagerInput) -> bool {
        self.inputs.send(input).is_ok()
    }

    /// The user touched the screen.
    pub fn interact(&self) -> bool {
        self.send(ManagerInput::Interaction)
    }

    pub fn suspend(&self) -> bool {
        self.send(ManagerInput::Suspend)
    }

    pub fn resume(&self) -> bool {
        self.send(ManagerInput::Resume)
    }

    /// Re-evaluate blocking conditions as if a probe had fired.
    pub fn notify_signal(&self) -> bool {
        self.send(ManagerInput::SignalChanged)
    }

    pub fn shutdown(&self) -> bool {
        self.send(ManagerInput::Shutdown)
    }
}

pub struct AnimationService<C: Catalog, D: DisplaySink> {
    manager: ServiceManager<C, D>,
    inputs: InputReceiver,
    sender: InputSender,
    events: Option<mpsc::UnboundedSender<Event>>,
}

impl<C: Catalog, D: DisplaySink> AnimationService<C, D> {
    /// Build the manager on a tokio timer and subscribe it to `signals`.
    ///
    /// Mounts the first animation, which arms the timer, so this must be
    /// called from within a tokio runtime.
    pub fn new(catalog: C, display: D, signals: Signals, config: &ManagerConfig) -> Self {
        let (sender, inputs) = input_queue();
        let timer = TokioTimer::new(sender.clone());
        let mut manager = AnimationManager::new(catalog, display, timer, signals, config);
        manager.subscribe(&sender);
        Self {
            manager,
            inputs,
            sender,
            events: None,
        }
    }

    /// Forward every transition event to `events`.
    pub fn with_event_sink(mut self, events: mpsc::UnboundedSender<Event>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn handle(&self) -> ServiceHandle {
        ServiceHandle {
            inputs: self.sender.clone(),
        }
    }

    pub fn manager(&self) -> &ServiceManager<C, D> {
        &self.manager
    }

    /// Apply queued inputs in order until shutdown. Returns the manager,
    /// unsubscribed from its signals.
    pub async fn run(mut self) -> ServiceManager<C, D> {
        tracing::info!(
            "Animation service started with '{}'",
            self.manager.current_name().unwrap_or_default()
        );

        while let Some(input) = self.inputs.recv().await {
            if input == ManagerInput::Shutdown {
                break;
            }
            let Some(event) = self.manager.handle(input) else {
                continue;
            };
            tracing::debug!("{:?} -> {:?}", input, event);
            if let Some(events) = &self.events {
                if events.send(event).is_err() {
                    tracing::debug!("Event receiver dropped; no longer forwarding");
                    self.events = None;
                }
            }
        }

        tracing::info!("Animation service stopped in state {:?}", self.manager.state());
        self.manager.unsubscribe();
        self.manager
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::catalog::{
        AnimationMeta, AnimationRecord, AnimationSource, ManifestCatalog, PlayableAnimation,
        BAD_SD_ANIMATION_NAME,
    };
    use crate::display::HeadlessDisplay;
    use crate::manager::{BlockingReason, ManagerState};
    use crate::signals::{SignalHub, StorageStatus};
    use crate::timer::IdleTimer;

    fn catalog() -> ManifestCatalog {
        let name = "L1_Waves_128x50";
        ManifestCatalog::with_records(vec![AnimationRecord {
            meta: AnimationMeta::unbounded(name, 5),
            source: AnimationSource::Builtin(PlayableAnimation {
                name: name.into(),
                duration_secs: 4,
                frame_rate: 2,
                frames: vec![format!("{name}/frame_0")],
            }),
        }])
    }

    fn service(
        hub: &Arc<SignalHub>,
    ) -> (
        AnimationService<ManifestCatalog, HeadlessDisplay>,
        mpsc::UnboundedReceiver<Event>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let config = ManagerConfig {
            rng_seed: Some(3),
            ..ManagerConfig::default()
        };
        let service = AnimationService::new(
            catalog(),
            HeadlessDisplay::new(),
            Signals::from_hub(Arc::clone(hub)),
            &config,
        )
        .with_event_sink(tx);
        (service, rx)
    }

    #[tokio::test(start_paused = true)]
    async fn timer_expiry_rotates_idle_animation() {
        let hub = Arc::new(SignalHub::new());
        let (service, mut events) = service(&hub);
        let handle = service.handle();
        let task = tokio::spawn(service.run());

        match events.recv().await {
            Some(Event::IdleStarted { duration_ms, .. }) => assert!(duration_ms > 0),
            other => panic!("expected IdleStarted, got {other:?}"),
        }

        assert!(handle.shutdown());
        let manager = task.await.unwrap();
        assert_eq!(manager.state(), ManagerState::Idle);
        assert_eq!(manager.display().mount_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn storage_notification_preempts_idle() {
        let hub = Arc::new(SignalHub::new());
        let (service, mut events) = service(&hub);
        let handle = service.handle();
        let task = tokio::spawn(service.run());

        hub.set_storage_status(StorageStatus::InternalError);
        match events.recv().await {
            Some(Event::BlockingShown { name, reason, .. }) => {
                assert_eq!(reason, BlockingReason::BadSdCard);
                assert_eq!(name, BAD_SD_ANIMATION_NAME);
            }
            other => panic!("expected BlockingShown, got {other:?}"),
        }

        // Deferred while blocked; picked up by the acknowledgement.
        hub.set_storage_status(StorageStatus::Ok);
        handle.interact();
        assert!(matches!(events.recv().await, Some(Event::IdleStarted { .. })));

        handle.shutdown();
        let manager = task.await.unwrap();
        assert_eq!(manager.state(), ManagerState::Idle);
        assert_eq!(
            crate::signals::StorageProbe::changes(hub.as_ref()).subscriber_count(),
            0
        );
    }

    #[tokio::test(start_paused = true)]
    async fn suspend_and_resume_through_handle() {
        let hub = Arc::new(SignalHub::new());
        let (service, mut events) = service(&hub);
        let name = service.manager().current_name().unwrap().to_string();
        let duration = service.manager().current_animation().unwrap().duration_ms();
        let handle = service.handle();
        let task = tokio::spawn(service.run());

        tokio::time::advance(Duration::from_millis(1000)).await;
        handle.suspend();
        match events.recv().await {
            Some(Event::Frozen { remaining_ms, state, .. }) => {
                assert_eq!(state, ManagerState::FrozenIdle);
                assert_eq!(remaining_ms, duration - 1000);
            }
            other => panic!("expected Frozen, got {other:?}"),
        }

        handle.resume();
        match events.recv().await {
            Some(Event::Resumed { name: resumed, state, .. }) => {
                assert_eq!(resumed, name);
                assert_eq!(state, ManagerState::Idle);
            }
            other => panic!("expected Resumed, got {other:?}"),
        }

        handle.shutdown();
        let manager = task.await.unwrap();
        assert!(manager.timer().is_armed());
        assert!(manager.is_consistent());
    }

    #[tokio::test]
    async fn handle_reports_stopped_service() {
        let hub = Arc::new(SignalHub::new());
        let (service, _events) = service(&hub);
        let handle = service.handle();
        handle.shutdown();
        let manager = service.run().await;
        drop(manager);
        assert!(!handle.interact());
    }
}
