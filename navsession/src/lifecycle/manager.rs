//! Session entry and exit point.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use tracing::{debug, error, info, warn};

use super::host::{ChannelSpec, ForegroundGrant, ForegroundHost, HostCapabilities};
use crate::announcement::{AnnouncementGate, SpeechOutput};
use crate::config::SessionConfig;
use crate::location::{LocationCallback, LocationFix, LocationProvider, LocationSubscription};
use crate::pipeline::{SessionCore, UpdateOutcome};
use crate::presentation::{DisplayPayload, EtaFormatter, PresentationChannel, PresentationUpdater};
use crate::routing::RoutingEngine;
use crate::state::{SessionPhase, SessionStatus};

/// External subsystems a session talks to, injected at construction.
#[derive(Clone)]
pub struct SessionCollaborators {
    pub routing: Arc<dyn RoutingEngine>,
    pub location: Arc<dyn LocationProvider>,
    pub speech: Arc<dyn SpeechOutput>,
    pub presentation: Arc<dyn PresentationChannel>,
    pub host: Arc<dyn ForegroundHost>,
}

/// Owns one navigation session from `start()` to `stop()`.
///
/// # Lifecycle
///
/// 1. `start()` ensures the notification channel exists, requests the
///    foreground grant with an empty payload and subscribes to location.
///    A refused grant leaves the session running in degraded mode.
/// 2. Each location fix runs the update pipeline.
/// 3. `stop()` (or host teardown) marks the session stopped, releases the
///    location subscription and cancels speech.
///
/// Cancelling speech is best-effort: whether an utterance already being
/// spoken is cut off depends on the speech subsystem.
///
/// # Example
///
/// ```ignore
/// let session = ForegroundLifecycleManager::new(collaborators, SessionConfig::default());
/// session.start();
/// // ... location fixes drive the display ...
/// session.stop();
/// ```
pub struct ForegroundLifecycleManager {
    core: Arc<SessionCore>,
    subscription: LocationSubscription,
    host: Arc<dyn ForegroundHost>,
    capabilities: HostCapabilities,
    config: SessionConfig,
    channel_ready: AtomicBool,
    starting: AtomicBool,
}

impl ForegroundLifecycleManager {
    /// Build a session using the ETA style from `config`.
    pub fn new(collaborators: SessionCollaborators, config: SessionConfig) -> Self {
        let eta = config.eta_style.formatter();
        Self::with_eta_formatter(collaborators, config, eta)
    }

    /// Build a session with a custom ETA formatter.
    pub fn with_eta_formatter(
        collaborators: SessionCollaborators,
        config: SessionConfig,
        eta: Box<dyn EtaFormatter>,
    ) -> Self {
        let SessionCollaborators {
            routing,
            location,
            speech,
            presentation,
            host,
        } = collaborators;

        let capabilities = host.capabilities();
        debug!(
            denial_aware_foreground = capabilities.denial_aware_foreground,
            "Resolved host capabilities"
        );

        let updater = PresentationUpdater::new(config.arrive_template.clone(), eta);
        let core = Arc::new(SessionCore::new(
            routing,
            presentation,
            updater,
            AnnouncementGate::new(speech),
        ));

        Self {
            core,
            subscription: LocationSubscription::new(location),
            host,
            capabilities,
            config,
            channel_ready: AtomicBool::new(false),
            starting: AtomicBool::new(false),
        }
    }

    /// Start the session. Idempotent.
    ///
    /// Returns the phase after the call: `ForegroundActive` on grant,
    /// `ForegroundDenied` when the host refused (the session keeps running),
    /// or the unchanged current phase if already started, starting or
    /// stopped.
    pub fn start(&self) -> SessionPhase {
        let current = self.core.phase();
        match current {
            SessionPhase::Created => {}
            SessionPhase::Stopped => {
                warn!("start() called on a stopped session, ignoring");
                return current;
            }
            _ => {
                debug!(phase = %current, "Session already started");
                return current;
            }
        }

        if self
            .starting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Session start already in progress");
            return self.core.phase();
        }

        info!(
            channel = %self.config.channel_id,
            notification_id = self.config.notification_id,
            "Starting navigation session"
        );

        self.ensure_channel();

        let grant = self.request_foreground(&DisplayPayload::empty());
        let next = if grant.is_granted() {
            SessionPhase::ForegroundActive
        } else {
            SessionPhase::ForegroundDenied
        };

        if !self.core.with_state(|state| state.transition(next)) {
            // stop() ran while the host was deciding; it saw no grant to release.
            if grant.is_granted() {
                self.host.release_foreground(self.config.notification_id);
            }
            info!("Session stopped during start");
            return self.core.phase();
        }

        self.subscribe_location();

        // stop() may have run while subscribing.
        if self.core.phase().is_terminal() {
            self.subscription.unsubscribe();
            return SessionPhase::Stopped;
        }

        info!(phase = %next, "Navigation session started");
        next
    }

    /// Stop the session. Safe to call repeatedly and before `start()`.
    ///
    /// Never waits on an in-flight update: the phase is switched first and
    /// the update pipeline drops its work when it next checks the phase.
    pub fn stop(&self) {
        let previous = self.core.with_state(|state| {
            let previous = state.phase();
            if previous.is_terminal() {
                return None;
            }
            state.transition(SessionPhase::Stopped);
            Some(previous)
        });

        let Some(previous) = previous else {
            debug!("Session already stopped");
            return;
        };

        self.subscription.unsubscribe();
        self.core.gate().cancel();

        if previous == SessionPhase::ForegroundActive {
            self.host.release_foreground(self.config.notification_id);
        }

        info!(previous = %previous, "Navigation session stopped");
    }

    /// Host reports memory/resource pressure. Logged only.
    pub fn on_low_resource(&self) {
        debug!(phase = %self.phase(), "Low resource notification received");
    }

    /// Host is tearing the process down.
    pub fn on_host_teardown(&self) {
        info!("Host teardown requested");
        self.stop();
    }

    /// Feed a location fix directly, bypassing the provider subscription.
    pub fn on_location(&self, fix: &LocationFix) -> UpdateOutcome {
        self.core.handle_fix(fix)
    }

    pub fn phase(&self) -> SessionPhase {
        self.core.phase()
    }

    pub fn status(&self) -> SessionStatus {
        self.phase().status()
    }

    /// Last payload committed for display.
    pub fn display_payload(&self) -> DisplayPayload {
        self.core.payload()
    }

    /// Number of payloads successfully pushed to the presentation channel.
    pub fn pushes(&self) -> u64 {
        self.core.pushes()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Create the notification channel unless it already exists.
    fn ensure_channel(&self) {
        if self.channel_ready.load(Ordering::Acquire) {
            return;
        }

        let channel_id = self.config.channel_id.as_str();
        if self.host.channel_exists(channel_id) {
            debug!(channel = channel_id, "Notification channel already registered");
            self.channel_ready.store(true, Ordering::Release);
            return;
        }

        let spec = ChannelSpec::informational(channel_id, self.config.channel_name.as_str());
        match self.host.create_channel(&spec) {
            Ok(()) => {
                info!(channel = channel_id, "Notification channel created");
                self.channel_ready.store(true, Ordering::Release);
            }
            Err(e) => warn!(error = %e, channel = channel_id, "Failed to create notification channel"),
        }
    }

    fn request_foreground(&self, payload: &DisplayPayload) -> ForegroundGrant {
        let grant = self
            .host
            .request_foreground(self.config.notification_id, payload);

        if !self.capabilities.denial_aware_foreground {
            if let ForegroundGrant::Denied { reason } = &grant {
                debug!(reason = %reason, "Legacy host cannot refuse foreground, treating as granted");
            }
            return ForegroundGrant::Granted;
        }

        match &grant {
            ForegroundGrant::Granted => info!("Foreground execution allowed"),
            ForegroundGrant::Denied { reason } => error!(
                reason = %reason,
                "Foreground execution not allowed, continuing in degraded mode"
            ),
        }
        grant
    }

    fn subscribe_location(&self) {
        let core: Weak<SessionCore> = Arc::downgrade(&self.core);
        let callback: LocationCallback = Arc::new(move |fix: &LocationFix| {
            if let Some(core) = core.upgrade() {
                core.handle_fix(fix);
            }
        });

        if let Err(e) = self.subscription.subscribe(callback) {
            warn!(error = %e, "Failed to subscribe to location updates");
        }
    }
}

impl Drop for ForegroundLifecycleManager {
    fn drop(&mut self) {
        self.stop();
    }
}
