//! Per-fix update sequence.
//!
//! ```text
//! LocationFix ─► phase check ─► is_navigating? ─► snapshot + announcements
//!                                                        │
//!            push ◄─ commit ◄─ phase re-check ◄─ render ◄┘ (gate plays speech)
//! ```
//!
//! # Locking
//!
//! No lock is held across a collaborator call. The session state mutex is
//! taken only to read the phase and to commit a payload, so `stop()` never
//! waits on the routing engine, speech or the presentation channel.
//!
//! Updates are single-writer: a fix that arrives while another is being
//! processed (from another thread, or re-entrantly from a collaborator) is
//! dropped with [`UpdateOutcome::Busy`] instead of waiting. The next fix
//! repaints.
//!
//! The phase is re-checked after the routing calls and again right before
//! commit. A `stop()` that completes before that point drops the update; a
//! push already handed to the presentation channel is not recalled.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::announcement::{AnnouncementBatch, AnnouncementGate};
use crate::location::LocationFix;
use crate::presentation::{
    DisplayPayload, PayloadChanges, PresentationChannel, PresentationUpdater, RenderInput,
};
use crate::routing::{NavigationSnapshot, RoutingEngine};
use crate::state::{NavigationSessionState, SessionPhase};

/// What a single location fix did to the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Session not running (not started yet or stopped); fix ignored.
    Inactive,
    /// Another update was in progress; fix dropped.
    Busy,
    /// Routing engine is not navigating; nothing rendered.
    NotNavigating,
    /// Rendered payload equals the one already shown; nothing pushed.
    Unchanged,
    /// A payload was committed and delivered.
    Pushed(PayloadChanges),
    /// A payload was committed but the presentation channel rejected it.
    /// The next update pushes again.
    PushFailed(PayloadChanges),
}

/// Shared core of a session: state plus the collaborators used per update.
pub(crate) struct SessionCore {
    state: Mutex<NavigationSessionState>,
    update: Mutex<()>,
    routing: Arc<dyn RoutingEngine>,
    presentation: Arc<dyn PresentationChannel>,
    updater: PresentationUpdater,
    gate: AnnouncementGate,
}

impl SessionCore {
    pub(crate) fn new(
        routing: Arc<dyn RoutingEngine>,
        presentation: Arc<dyn PresentationChannel>,
        updater: PresentationUpdater,
        gate: AnnouncementGate,
    ) -> Self {
        Self {
            state: Mutex::new(NavigationSessionState::new()),
            update: Mutex::new(()),
            routing,
            presentation,
            updater,
            gate,
        }
    }

    pub(crate) fn gate(&self) -> &AnnouncementGate {
        &self.gate
    }

    /// Run `f` with exclusive access to the session state.
    ///
    /// `f` must not call back into collaborators.
    pub(crate) fn with_state<R>(&self, f: impl FnOnce(&mut NavigationSessionState) -> R) -> R {
        f(&mut self.state.lock())
    }

    pub(crate) fn phase(&self) -> SessionPhase {
        self.state.lock().phase()
    }

    pub(crate) fn payload(&self) -> DisplayPayload {
        self.state.lock().payload().clone()
    }

    pub(crate) fn pushes(&self) -> u64 {
        self.state.lock().pushes()
    }

    /// Process one location fix.
    pub(crate) fn handle_fix(&self, fix: &LocationFix) -> UpdateOutcome {
        if !self.phase().accepts_updates() {
            trace!(
                latitude = fix.latitude,
                longitude = fix.longitude,
                "Ignoring location fix for inactive session"
            );
            return UpdateOutcome::Inactive;
        }

        let Some(_update) = self.update.try_lock() else {
            trace!("Update already in progress, dropping location fix");
            return UpdateOutcome::Busy;
        };

        // Stale fixes after route cancellation must not repaint.
        if !self.routing.is_navigating() {
            trace!("Routing engine not navigating, skipping update");
            return UpdateOutcome::NotNavigating;
        }

        let snapshot = self.routing.following_info();
        let batch = AnnouncementBatch::new(self.routing.generate_announcements());
        let destination = resolve_destination(self.routing.destination_name(), snapshot.as_ref());

        if !self.phase().accepts_updates() {
            debug!("Session stopped while querying routing engine, dropping update");
            return UpdateOutcome::Inactive;
        }

        let primary = self.gate.process(&batch);

        let previous = self.payload();
        let next = self.updater.render(
            &previous,
            RenderInput {
                snapshot: snapshot.as_ref(),
                primary_text: primary.as_deref(),
                destination: &destination,
            },
        );

        let changes = {
            let mut state = self.state.lock();
            if !state.phase().accepts_updates() {
                debug!("Session stopped during update, dropping payload");
                return UpdateOutcome::Inactive;
            }
            let changes = state.payload().diff(&next);
            if changes.is_empty() && state.is_delivered() {
                return UpdateOutcome::Unchanged;
            }
            state.commit(next.clone());
            changes
        };

        debug!(
            has_snapshot = snapshot.is_some(),
            announcements = batch.len(),
            primary_changed = changes.primary,
            secondary_changed = changes.secondary,
            "Pushing navigation display"
        );
        match self.presentation.push(&next) {
            Ok(()) => {
                self.state.lock().mark_delivered();
                UpdateOutcome::Pushed(changes)
            }
            Err(e) => {
                warn!(error = %e, "Failed to push navigation display");
                UpdateOutcome::PushFailed(changes)
            }
        }
    }
}

/// Destination shown on the arrival line.
///
/// Falls back to the snapshot's arrival point when the engine reports no
/// destination name.
fn resolve_destination(name: String, snapshot: Option<&NavigationSnapshot>) -> String {
    if !name.trim().is_empty() {
        return name;
    }
    snapshot
        .map(|s| s.arrival_name.clone())
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(name)
}
