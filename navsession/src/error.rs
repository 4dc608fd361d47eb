//! Error types shared by the collaborator traits.
//!
//! No operation in the session core fails fatally. Collaborators report
//! failures through [`CollaboratorError`]; the core logs them at its boundary
//! and keeps running.

use std::fmt;

use thiserror::Error;

/// External subsystem that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    /// Location provider.
    Location,
    /// Text-to-speech subsystem.
    Speech,
    /// Presentation channel (persistent status display).
    Presentation,
    /// Host platform (channels, foreground execution).
    Host,
}

impl Component {
    /// Short name for log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Location => "location",
            Component::Speech => "speech",
            Component::Presentation => "presentation",
            Component::Host => "host",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Failure reported by an external collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{component} failed: {reason}")]
pub struct CollaboratorError {
    /// Which collaborator failed.
    pub component: Component,
    /// Human-readable reason.
    pub reason: String,
}

impl CollaboratorError {
    /// Create a new collaborator error.
    pub fn new(component: Component, reason: impl Into<String>) -> Self {
        Self {
            component,
            reason: reason.into(),
        }
    }

    /// Location provider failure.
    pub fn location(reason: impl Into<String>) -> Self {
        Self::new(Component::Location, reason)
    }

    /// Speech subsystem failure.
    pub fn speech(reason: impl Into<String>) -> Self {
        Self::new(Component::Speech, reason)
    }

    /// Presentation channel failure.
    pub fn presentation(reason: impl Into<String>) -> Self {
        Self::new(Component::Presentation, reason)
    }

    /// Host platform failure.
    pub fn host(reason: impl Into<String>) -> Self {
        Self::new(Component::Host, reason)
    }
}

/// Result type for collaborator calls.
pub type CollaboratorResult<T> = Result<T, CollaboratorError>;
