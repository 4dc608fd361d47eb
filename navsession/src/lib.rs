//! navsession - background turn-by-turn navigation session
//!
//! Keeps a turn-by-turn summary visible and audible while the host
//! application is in the background. The session bridges a location stream,
//! a routing engine and a presentation channel (persistent display plus
//! spoken announcements), all injected as trait objects.
//!
//! # Architecture
//!
//! ```text
//! ForegroundLifecycleManager ── start/stop, channel setup, foreground grant
//!        │
//!        ├── LocationSubscription ──► fix ──► pipeline
//!        │                                     │
//!        │        RoutingEngine ◄──────────────┤  snapshot, announcements
//!        │        AnnouncementGate ◄───────────┤  speech + primary text
//!        │        PresentationUpdater ◄────────┤  next DisplayPayload
//!        │        PresentationChannel ◄────────┘  one push per update
//!        │
//!        └── NavigationSessionState (phase + last payload)
//! ```

pub mod announcement;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod location;
pub mod logging;
pub mod pipeline;
pub mod presentation;
pub mod replay;
pub mod routing;
pub mod state;

pub use lifecycle::{ForegroundLifecycleManager, SessionCollaborators};
pub use pipeline::UpdateOutcome;
pub use state::{SessionPhase, SessionStatus};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
