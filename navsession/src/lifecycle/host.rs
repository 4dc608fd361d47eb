//! Host platform boundary: notification channels and foreground execution.

use std::fmt;

use crate::error::CollaboratorResult;
use crate::presentation::DisplayPayload;

/// Interruption level of a notification channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelImportance {
    /// Shown without sound or heads-up interruption.
    Low,
    Default,
    High,
}

/// Notification channel registered with the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSpec {
    pub id: String,
    pub name: String,
    pub importance: ChannelImportance,
    pub vibration: bool,
    pub lights: bool,
    pub bubbles: bool,
}

impl ChannelSpec {
    /// Informational channel: low importance, no vibration, lights or bubbles.
    pub fn informational(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            importance: ChannelImportance::Low,
            vibration: false,
            lights: false,
            bubbles: false,
        }
    }
}

/// Host answer to a foreground execution request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForegroundGrant {
    Granted,
    /// Host policy refused continued foreground execution.
    Denied { reason: String },
}

impl ForegroundGrant {
    pub fn denied(reason: impl Into<String>) -> Self {
        ForegroundGrant::Denied {
            reason: reason.into(),
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, ForegroundGrant::Granted)
    }
}

impl fmt::Display for ForegroundGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForegroundGrant::Granted => write!(f, "granted"),
            ForegroundGrant::Denied { reason } => write!(f, "denied ({})", reason),
        }
    }
}

/// Host features resolved once when a session is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCapabilities {
    /// The host can refuse foreground execution and reports it as
    /// [`ForegroundGrant::Denied`]. Legacy hosts cannot refuse.
    pub denial_aware_foreground: bool,
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self {
            denial_aware_foreground: true,
        }
    }
}

/// Host platform lifecycle services.
pub trait ForegroundHost: Send + Sync {
    fn capabilities(&self) -> HostCapabilities;

    /// Whether a channel with `id` is already registered.
    fn channel_exists(&self, id: &str) -> bool;

    fn create_channel(&self, spec: &ChannelSpec) -> CollaboratorResult<()>;

    /// Ask to keep running in the foreground, showing `payload` as the
    /// persistent notification.
    fn request_foreground(&self, notification_id: u32, payload: &DisplayPayload)
        -> ForegroundGrant;

    /// Give up foreground execution and remove the persistent notification.
    fn release_foreground(&self, notification_id: u32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_informational_channel_is_quiet() {
        let spec = ChannelSpec::informational("navigation", "Navigation");
        assert_eq!(spec.importance, ChannelImportance::Low);
        assert!(!spec.vibration);
        assert!(!spec.lights);
        assert!(!spec.bubbles);
    }

    #[test]
    fn test_grant_display() {
        assert_eq!(ForegroundGrant::Granted.to_string(), "granted");
        assert_eq!(
            ForegroundGrant::denied("app in background").to_string(),
            "denied (app in background)"
        );
        assert!(!ForegroundGrant::denied("x").is_granted());
    }
}
