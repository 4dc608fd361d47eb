//! Foreground session lifecycle.
//!
//! [`ForegroundLifecycleManager`] is the single entry/exit point of a
//! navigation session. It negotiates foreground execution with the host
//! ([`ForegroundHost`]), wires the location subscription to the update
//! pipeline, and tears everything down on stop.

mod host;
mod manager;

pub use host::{
    ChannelImportance, ChannelSpec, ForegroundGrant, ForegroundHost, HostCapabilities,
};
pub use manager::{ForegroundLifecycleManager, SessionCollaborators};
