//! Persistent navigation display.
//!
//! # Architecture
//!
//! ```text
//! NavigationSnapshot ──┐
//! announcement text ───┼──► PresentationUpdater ──► DisplayPayload ──► PresentationChannel
//! destination name ────┘        (EtaFormatter)       (whole value)       (host rendering)
//! ```
//!
//! The presentation channel only ever receives complete payloads; the core
//! never reads anything back from it.

mod eta;
mod payload;
mod updater;

pub use eta::{format_finish_time, ClockTimeEta, EtaFormatter, EtaStyle, RelativeEta};
pub use payload::{DisplayPayload, PayloadChanges};
pub use updater::{
    PresentationUpdater, RenderInput, DEFAULT_ARRIVE_TEMPLATE, DESTINATION_PLACEHOLDER,
};

use crate::error::CollaboratorResult;

/// Host-side renderer of the persistent navigation display.
pub trait PresentationChannel: Send + Sync {
    /// Render `payload`, replacing whatever was shown before.
    fn push(&self, payload: &DisplayPayload) -> CollaboratorResult<()>;
}
