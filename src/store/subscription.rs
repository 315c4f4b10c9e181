use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

pub(crate) type Listener = Arc<dyn Fn() + Send + Sync>;

struct Entry {
    id: u64,
    active: Arc<AtomicBool>,
    listener: Listener,
}

/// Ordered listener list owned by a store.
#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: u64,
    entries: Vec<Entry>,
}

/// A listener captured at the start of a notification round.
pub(crate) struct Pending {
    active: Arc<AtomicBool>,
    listener: Listener,
}

impl Pending {
    /// Invoke the listener unless it was unsubscribed after the snapshot.
    pub(crate) fn invoke(&self) {
        if self.active.load(Ordering::Acquire) {
            (self.listener)();
        }
    }
}

impl Subscribers {
    pub(crate) fn insert(&mut self, listener: Listener) -> (u64, Arc<AtomicBool>) {
        let id = self.next_id;
        self.next_id += 1;
        let active = Arc::new(AtomicBool::new(true));
        self.entries.push(Entry {
            id,
            active: Arc::clone(&active),
            listener,
        });
        (id, active)
    }

    fn remove(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Listeners registered right now, in registration order.
    pub(crate) fn snapshot(&self) -> Vec<Pending> {
        self.entries
            .iter()
            .map(|entry| Pending {
                active: Arc::clone(&entry.active),
                listener: Arc::clone(&entry.listener),
            })
            .collect()
    }
}

/// RAII guard for a store listener.
///
/// Dropping the guard (or calling [`unsubscribe`](Self::unsubscribe))
/// removes the listener. A listener removed while a dispatch is notifying is
/// not invoked for the rest of that round.
#[must_use = "dropping a Subscription immediately unsubscribes the listener"]
pub struct Subscription {
    id: u64,
    active: Arc<AtomicBool>,
    subscribers: Weak<Mutex<Subscribers>>,
}

impl Subscription {
    pub(crate) fn new(
        id: u64,
        active: Arc<AtomicBool>,
        subscribers: &Arc<Mutex<Subscribers>>,
    ) -> Self {
        Self {
            id,
            active,
            subscribers: Arc::downgrade(subscribers),
        }
    }

    /// Remove the listener now.
    pub fn unsubscribe(self) {
        drop(self);
    }

    /// Keep the listener registered for the lifetime of the store.
    pub fn detach(mut self) {
        self.subscribers = Weak::new();
    }

    /// Whether the listener is still registered.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            self.active.store(false, Ordering::Release);
            if subscribers.lock().remove(self.id) {
                tracing::trace!(subscriber = self.id, "listener removed");
            }
        }
    }
}
