use std::sync::{Mutex, MutexGuard};

/// Identifies one subscription on a [`Notifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    callbacks: Vec<(SubscriptionId, Callback)>,
}

/// Change notification list for one signal source.
///
/// Callbacks run on the notifying thread while the subscriber list is
/// locked, so they must not subscribe or unsubscribe themselves. The
/// animation manager's callbacks only post to its input queue.
#[derive(Default)]
pub struct Notifier {
    inner: Mutex<Subscribers>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut inner = self.lock();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Returns false if the id was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.lock();
        let before = inner.callbacks.len();
        inner.callbacks.retain(|(sub, _)| *sub != id);
        inner.callbacks.len() != before
    }

    pub fn notify(&self) {
        let inner = self.lock();
        for (_, callback) in &inner.callbacks {
            callback();
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().callbacks.len()
    }

    fn lock(&self) -> MutexGuard<'_, Subscribers> {
        // A panicking callback leaves the list itself intact.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn notify_reaches_every_subscriber() {
        let notifier = Notifier::new();
        let hits = Arc::new(AtomicUsize::new(0));
        for _ in 0..2 {
            let hits = Arc::clone(&hits);
            notifier.subscribe(move || {
                hits.fetch_add(1, Ordering::SeqCst);
            });
        }
        notifier.notify();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let notifier = Notifier::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let id = notifier.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(id));
        notifier.notify();
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(notifier.subscriber_count(), 0);
    }
}
