use tokio::sync::mpsc;

use crate::timer::TimerToken;

/// Everything that can drive the animation manager.
///
/// Producers on other threads (timer task, signal notifiers, display) post
/// inputs to one queue; a single consumer applies them in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerInput {
    /// The idle timer armed with this token ran out.
    TimerExpired(TimerToken),
    /// A storage or progression probe reported a change.
    SignalChanged,
    /// The user interacted with the displayed animation.
    Interaction,
    /// Another UI layer takes the display.
    Suspend,
    /// The display is handed back.
    Resume,
    /// Stop the service loop.
    Shutdown,
}

pub type InputSender = mpsc::UnboundedSender<ManagerInput>;
pub type InputReceiver = mpsc::UnboundedReceiver<ManagerInput>;

/// Create the manager's input queue.
pub fn input_queue() -> (InputSender, InputReceiver) {
    mpsc::unbounded_channel()
}
