//! Idle/blocking animation lifecycle.

mod blocking;
mod engine;
mod input;
mod state;


pub use blocking::{evaluate as evaluate_blocking, BlockingReason};
pub use engine::AnimationManager;
pub use input::{input_queue, InputReceiver, InputSender, ManagerInput};
pub use state::{FreezeSnapshot, ManagerState, NotificationLatches};
