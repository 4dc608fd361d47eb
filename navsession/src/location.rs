//! Location subscription for the navigation session.
//!
//! A thin adapter over the external location provider: it registers exactly
//! one callback for the session's lifetime and removes it on teardown.
//!
//! # Delivery guarantee
//!
//! Every registration carries a liveness flag that is checked before each
//! delivery. [`LocationSubscription::unsubscribe`] clears the flag before
//! asking the provider to drop the listener, so once it returns no new
//! delivery reaches the session callback, even if the provider still has a
//! fix queued for it.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::error::CollaboratorResult;

/// A single position update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFix {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Horizontal accuracy in meters, when the provider reports one.
    pub accuracy_m: Option<f32>,
    /// When this fix was received.
    pub timestamp: Instant,
}

impl LocationFix {
    /// Create a new fix stamped with the current time.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_m: None,
            timestamp: Instant::now(),
        }
    }

    /// Attach a horizontal accuracy.
    pub fn with_accuracy(mut self, accuracy_m: f32) -> Self {
        self.accuracy_m = Some(accuracy_m);
        self
    }
}

/// Handle identifying a registered listener at the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Allocate a process-unique listener id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// Callback invoked for each position update.
pub type LocationCallback = Arc<dyn Fn(&LocationFix) + Send + Sync>;

/// External location provider.
///
/// Delivers fixes with unspecified frequency, in arrival order.
pub trait LocationProvider: Send + Sync {
    /// Register a listener. The returned id is used to remove it.
    fn add_listener(&self, listener: LocationCallback) -> CollaboratorResult<ListenerId>;

    /// Remove a previously registered listener. Unknown ids are ignored.
    fn remove_listener(&self, id: ListenerId);
}

struct Registration {
    /// `None` while the provider call is still in flight.
    id: Option<ListenerId>,
    live: Arc<AtomicBool>,
}

/// Single-callback subscription to a [`LocationProvider`].
///
/// The internal lock is never held across a provider call, so a callback
/// delivered synchronously from `add_listener` may call
/// [`unsubscribe`](Self::unsubscribe) without deadlocking.
pub struct LocationSubscription {
    provider: Arc<dyn LocationProvider>,
    registration: Mutex<Option<Registration>>,
}

impl fmt::Debug for LocationSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationSubscription")
            .field("subscribed", &self.is_subscribed())
            .finish_non_exhaustive()
    }
}

impl LocationSubscription {
    pub fn new(provider: Arc<dyn LocationProvider>) -> Self {
        Self {
            provider,
            registration: Mutex::new(None),
        }
    }

    /// Register `callback` with the provider.
    ///
    /// Returns `Ok(false)` without touching the provider when a callback is
    /// already registered.
    pub fn subscribe(&self, callback: LocationCallback) -> CollaboratorResult<bool> {
        let live = Arc::new(AtomicBool::new(true));
        {
            let mut registration = self.registration.lock();
            if registration.is_some() {
                debug!("Location subscription already active");
                return Ok(false);
            }
            *registration = Some(Registration {
                id: None,
                live: Arc::clone(&live),
            });
        }

        let gate = Arc::clone(&live);
        let gated: LocationCallback = Arc::new(move |fix: &LocationFix| {
            if !gate.load(Ordering::Acquire) {
                trace!("Dropping location fix delivered after unsubscribe");
                return;
            }
            callback(fix);
        });

        let result = self.provider.add_listener(gated);

        let mut registration = self.registration.lock();
        let still_reserved = registration
            .as_ref()
            .is_some_and(|r| Arc::ptr_eq(&r.live, &live));

        match result {
            Ok(id) if still_reserved => {
                if let Some(r) = registration.as_mut() {
                    r.id = Some(id);
                }
                debug!(listener = %id, "Location subscription registered");
                Ok(true)
            }
            Ok(id) => {
                // Unsubscribed while the provider call was in flight.
                drop(registration);
                self.provider.remove_listener(id);
                debug!(listener = %id, "Location subscription cancelled during registration");
                Ok(false)
            }
            Err(e) => {
                if still_reserved {
                    *registration = None;
                }
                Err(e)
            }
        }
    }

    /// Remove the registered callback, if any.
    ///
    /// Returns `true` if a registration was removed.
    pub fn unsubscribe(&self) -> bool {
        let Some(registration) = self.registration.lock().take() else {
            return false;
        };

        registration.live.store(false, Ordering::Release);
        if let Some(id) = registration.id {
            self.provider.remove_listener(id);
            debug!(listener = %id, "Location subscription removed");
        }
        true
    }

    pub fn is_subscribed(&self) -> bool {
        self.registration.lock().is_some()
    }
}

impl Drop for LocationSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
