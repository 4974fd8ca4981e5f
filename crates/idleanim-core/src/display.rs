//! Display sink seam.
//!
//! The sink paints whatever animation the manager mounts. It never owns
//! the animation: it copies what it needs out of the borrowed value, and
//! the manager drops the previous animation only after the new one is
//! mounted. Interactions go back to the manager through its input queue
//! (`ServiceHandle::interact`).

use crate::catalog::PlayableAnimation;

pub trait DisplaySink: Send {
    fn mount(&mut self, animation: &PlayableAnimation);

    /// Keep showing the current frame while another UI layer takes over.
    fn freeze(&mut self);

    fn unfreeze(&mut self);
}

/// Sink without a screen: tracks what would be shown.
#[derive(Debug, Clone, Default)]
pub struct HeadlessDisplay {
    mounted: Option<String>,
    frozen: bool,
    mount_count: usize,
}

impl HeadlessDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the last mounted animation.
    pub fn mounted(&self) -> Option<&str> {
        self.mounted.as_deref()
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn mount_count(&self) -> usize {
        self.mount_count
    }
}

impl DisplaySink for HeadlessDisplay {
    fn mount(&mut self, animation: &PlayableAnimation) {
        self.mounted = Some(animation.name.clone());
        self.mount_count += 1;
    }

    fn freeze(&mut self) {
        self.frozen = true;
    }

    fn unfreeze(&mut self) {
        self.frozen = false;
    }
}
