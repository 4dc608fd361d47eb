//! Session lifecycle phase and last-rendered display state.
//!
//! # State Machine
//!
//! ```text
//! Created --[foreground granted]--> ForegroundActive
//! Created --[foreground denied]---> ForegroundDenied
//! Created | ForegroundActive | ForegroundDenied --[stop / teardown]--> Stopped
//! ```
//!
//! `Stopped` is terminal: no transition leaves it.

use std::fmt;

use tracing::{debug, info};

use crate::presentation::DisplayPayload;

/// Lifecycle phase of a navigation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// Constructed, `start()` not completed yet.
    Created,
    /// Running with the host's foreground execution grant.
    ForegroundActive,
    /// Running without the grant (host refused); degraded mode.
    ForegroundDenied,
    /// Torn down. Terminal.
    Stopped,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Created => "created",
            SessionPhase::ForegroundActive => "foreground-active",
            SessionPhase::ForegroundDenied => "foreground-denied",
            SessionPhase::Stopped => "stopped",
        }
    }

    /// Whether location updates should be processed in this phase.
    pub fn accepts_updates(&self) -> bool {
        matches!(
            self,
            SessionPhase::ForegroundActive | SessionPhase::ForegroundDenied
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionPhase::Stopped)
    }

    /// Whether `self -> next` is a legal transition.
    pub fn can_transition_to(&self, next: SessionPhase) -> bool {
        match (self, next) {
            (SessionPhase::Created, SessionPhase::ForegroundActive)
            | (SessionPhase::Created, SessionPhase::ForegroundDenied) => true,
            (SessionPhase::Stopped, _) => false,
            (_, SessionPhase::Stopped) => true,
            _ => false,
        }
    }

    /// Top-level status as seen by callers.
    pub fn status(&self) -> SessionStatus {
        match self {
            SessionPhase::Created => SessionStatus::NotStarted,
            SessionPhase::ForegroundActive => SessionStatus::Active,
            SessionPhase::ForegroundDenied => SessionStatus::Degraded,
            SessionPhase::Stopped => SessionStatus::Stopped,
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User-facing session status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    NotStarted,
    Active,
    /// Running without foreground execution; updates still render.
    Degraded,
    Stopped,
}

impl SessionStatus {
    pub fn display_status(&self) -> &'static str {
        match self {
            SessionStatus::NotStarted => "Not started",
            SessionStatus::Active => "Navigating",
            SessionStatus::Degraded => "Navigating (background limited)",
            SessionStatus::Stopped => "Stopped",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_status())
    }
}

/// Mutable state exclusively owned by one session.
#[derive(Debug, Clone)]
pub struct NavigationSessionState {
    phase: SessionPhase,
    payload: DisplayPayload,
    /// Whether `payload` reached the presentation channel.
    delivered: bool,
    pushes: u64,
}

impl Default for NavigationSessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationSessionState {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Created,
            payload: DisplayPayload::empty(),
            delivered: true,
            pushes: 0,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Move to `next` if the transition is legal.
    ///
    /// Returns `false` (and leaves the phase unchanged) otherwise.
    pub fn transition(&mut self, next: SessionPhase) -> bool {
        if !self.phase.can_transition_to(next) {
            debug!(from = %self.phase, to = %next, "Rejected session phase transition");
            return false;
        }
        info!(from = %self.phase, to = %next, "Session phase changed");
        self.phase = next;
        true
    }

    /// Last payload committed for display.
    pub fn payload(&self) -> &DisplayPayload {
        &self.payload
    }

    /// Replace the display payload as a whole.
    ///
    /// The new payload counts as undelivered until [`mark_delivered`] is
    /// called.
    ///
    /// [`mark_delivered`]: Self::mark_delivered
    pub fn commit(&mut self, payload: DisplayPayload) {
        self.payload = payload;
        self.delivered = false;
    }

    /// Record that the committed payload was pushed successfully.
    pub fn mark_delivered(&mut self) {
        self.delivered = true;
        self.pushes += 1;
    }

    /// Whether the committed payload is what the presentation channel shows.
    pub fn is_delivered(&self) -> bool {
        self.delivered
    }

    /// Number of payloads successfully pushed since the session was created.
    pub fn pushes(&self) -> u64 {
        self.pushes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_created() {
        let state = NavigationSessionState::new();
        assert_eq!(state.phase(), SessionPhase::Created);
        assert_eq!(state.phase().status(), SessionStatus::NotStarted);
        assert_eq!(state.pushes(), 0);
    }

    #[test]
    fn test_grant_transitions() {
        let mut state = NavigationSessionState::new();
        assert!(state.transition(SessionPhase::ForegroundActive));
        assert!(!state.transition(SessionPhase::ForegroundDenied));
        assert_eq!(state.phase().status(), SessionStatus::Active);
    }

    #[test]
    fn test_stopped_is_terminal() {
        let mut state = NavigationSessionState::new();
        assert!(state.transition(SessionPhase::ForegroundDenied));
        assert!(state.transition(SessionPhase::Stopped));

        for next in [
            SessionPhase::Created,
            SessionPhase::ForegroundActive,
            SessionPhase::ForegroundDenied,
            SessionPhase::Stopped,
        ] {
            assert!(!state.transition(next));
        }
        assert_eq!(state.phase(), SessionPhase::Stopped);
    }

    #[test]
    fn test_stop_before_start_is_allowed() {
        let mut state = NavigationSessionState::new();
        assert!(state.transition(SessionPhase::Stopped));
    }

    #[test]
    fn test_accepts_updates_only_while_running() {
        assert!(!SessionPhase::Created.accepts_updates());
        assert!(SessionPhase::ForegroundActive.accepts_updates());
        assert!(SessionPhase::ForegroundDenied.accepts_updates());
        assert!(!SessionPhase::Stopped.accepts_updates());
    }

    #[test]
    fn test_commit_counts_only_delivered_pushes() {
        let mut state = NavigationSessionState::new();
        assert!(state.is_delivered());

        let payload = DisplayPayload::empty().with_primary_text("Turn left");
        state.commit(payload.clone());
        assert_eq!(state.payload(), &payload);
        assert!(!state.is_delivered());
        assert_eq!(state.pushes(), 0);

        state.mark_delivered();
        assert!(state.is_delivered());
        assert_eq!(state.pushes(), 1);
    }
}
