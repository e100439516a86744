//! ChangeNotifier - zero-payload "study sets changed" callbacks.
//!
//! Listeners receive no data. They re-query the store for whatever view they
//! derive from it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

#[cfg(feature = "emitter")]
use std::sync::Mutex;

#[cfg(feature = "emitter")]
use event_emitter_rs::EventEmitter;

/// Event name used when forwarding changes into an [`EventEmitter`].
pub const CHANGE_EVENT: &str = "study_sets_changed";

/// Handle returned by [`ChangeNotifier::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn() + Send + Sync>;

/// Synchronous fan-out of change signals to registered listeners.
///
/// Clones share the same listener list.
#[derive(Clone, Default)]
pub struct ChangeNotifier {
    listeners: Arc<RwLock<Vec<(SubscriptionId, Listener)>>>,
    next_id: Arc<AtomicU64>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It is called once per change, after the change is stored.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut listeners = match self.listeners.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        listeners.push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns true if it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = match self.listeners.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Call every listener in registration order.
    ///
    /// The list is copied first, so listeners may subscribe or unsubscribe
    /// (or read the store) without deadlocking.
    pub fn notify(&self) {
        let snapshot: Vec<Listener> = {
            let listeners = match self.listeners.read() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            listeners.iter().map(|(_, l)| Arc::clone(l)).collect()
        };
        for listener in snapshot {
            listener();
        }
    }

    pub fn listener_count(&self) -> usize {
        match self.listeners.read() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Re-broadcast every change as a [`CHANGE_EVENT`] on `emitter`.
    ///
    /// `event_emitter_rs` runs its callbacks on spawned threads, so listeners
    /// registered there observe the change asynchronously.
    #[cfg(feature = "emitter")]
    pub fn forward_to(&self, emitter: Arc<Mutex<EventEmitter>>) -> SubscriptionId {
        self.subscribe(move || match emitter.lock() {
            Ok(mut emitter) => {
                emitter.emit(CHANGE_EVENT, ());
            }
            Err(_) => tracing::warn!("event emitter lock poisoned; change not forwarded"),
        })
    }
}
