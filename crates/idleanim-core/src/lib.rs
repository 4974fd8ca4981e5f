//! # idleanim Core Library
//!
//! Chooses which animation a small pet display shows and when that choice
//! changes. Idle animations rotate on a timer, picked at random with
//! per-animation weights; blocking notifications (bad SD card, card
//! inserted, missing database, level up) preempt rotation until the user
//! acknowledges them; and the whole display can be frozen while another UI
//! layer takes over.
//!
//! ## Architecture
//!
//! - **Manager**: A state machine over `Idle`, `Blocked`, `FrozenIdle` and
//!   `FrozenBlocked` that owns the single mounted animation
//! - **Selector**: Eligibility filtering plus a seeded weighted draw
//! - **Catalog**: Built-in animations and a TOML manifest of asset animations
//! - **Signals**: Storage, battery and progression probes with change notifiers
//! - **Service**: A tokio loop applying every input from one queue in order
//!
//! ## Key Components
//!
//! - [`AnimationManager`]: Core lifecycle state machine
//! - [`AnimationService`]: Async host with a [`ServiceHandle`] for requests
//! - [`ManifestCatalog`]: Catalog backed by built-ins and an asset manifest
//! - [`Config`]: Service configuration management

pub mod catalog;
pub mod display;
pub mod error;
pub mod events;
pub mod logging;
pub mod manager;
pub mod selector;
pub mod service;
pub mod signals;
pub mod storage;
pub mod timer;

pub use catalog::{AnimationMeta, AnimationRecord, Catalog, ManifestCatalog, PlayableAnimation};
pub use display::{DisplaySink, HeadlessDisplay};
pub use error::{CatalogError, ConfigError, CoreError};
pub use events::Event;
pub use manager::{AnimationManager, BlockingReason, ManagerInput, ManagerState};
pub use selector::{SelectionContext, Selector};
pub use service::{AnimationService, ServiceHandle};
pub use signals::{ProgressionStats, SignalHub, Signals, StorageStatus};
pub use storage::{CatalogConfig, Config, LoggingConfig, ManagerConfig};
pub use timer::{IdleTimer, ManualTimer, TimerToken, TokioTimer};
