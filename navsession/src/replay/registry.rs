//! In-process location provider.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::error::CollaboratorResult;
use crate::location::{ListenerId, LocationCallback, LocationFix, LocationProvider};

/// Fans location fixes out to registered listeners.
///
/// Listeners are snapshotted before delivery, so a listener may add or remove
/// listeners (including itself) while being called.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: Mutex<Vec<(ListenerId, LocationCallback)>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `fix` to every registered listener. Returns how many were called.
    pub fn emit(&self, fix: &LocationFix) -> usize {
        let listeners: Vec<LocationCallback> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        trace!(listeners = listeners.len(), "Emitting location fix");
        for listener in &listeners {
            listener(fix);
        }
        listeners.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }
}

impl LocationProvider for ListenerRegistry {
    fn add_listener(&self, listener: LocationCallback) -> CollaboratorResult<ListenerId> {
        let id = ListenerId::next();
        self.listeners.lock().push((id, listener));
        Ok(id)
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners.lock().retain(|(existing, _)| *existing != id);
    }
}
