//! Location subscriber registry

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use crate::location::Location;

/// Callback invoked with a fresh snapshot after every location change
pub type Callback = Arc<dyn Fn(&Location) + Send + Sync>;

struct Entry {
    id: u64,
    callback: Callback,
}

/// Insertion-ordered subscriber list.
///
/// Notification works on a copy of the list, so callbacks can subscribe and
/// unsubscribe while a pass is running without skipping anyone.
#[derive(Default)]
pub(crate) struct Subscribers {
    entries: RwLock<Vec<Entry>>,
    next_id: AtomicU64,
}

impl Subscribers {
    pub(crate) fn add(self: &Arc<Self>, callback: Callback) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries.write().push(Entry { id, callback });

        tracing::debug!(subscriber_id = id, "Added location subscriber");

        Subscription {
            id,
            registry: Arc::downgrade(self),
        }
    }

    fn remove(&self, id: u64) -> bool {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        let removed = entries.len() != before;

        if removed {
            tracing::debug!(subscriber_id = id, "Removed location subscriber");
        }
        removed
    }

    pub(crate) fn snapshot(&self) -> Vec<Callback> {
        self.entries
            .read()
            .iter()
            .map(|entry| Arc::clone(&entry.callback))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.read().len()
    }
}

/// Handle returned by `subscribe`.
///
/// Dropping it leaves the subscriber registered; call
/// [`Subscription::unsubscribe`] to remove it.
#[derive(Clone)]
pub struct Subscription {
    id: u64,
    registry: Weak<Subscribers>,
}

impl Subscription {
    /// Remove this subscriber. Later calls do nothing.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }

    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .map(|registry| registry.entries.read().iter().any(|e| e.id == self.id))
            .unwrap_or(false)
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
