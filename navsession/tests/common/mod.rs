//! Recording test doubles for session integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveTime;
use parking_lot::Mutex;

use navsession::announcement::SpeechOutput;
use navsession::config::SessionConfig;
use navsession::error::{CollaboratorError, CollaboratorResult};
use navsession::lifecycle::{
    ChannelSpec, ForegroundGrant, ForegroundHost, ForegroundLifecycleManager, HostCapabilities,
    SessionCollaborators,
};
use navsession::presentation::{ClockTimeEta, DisplayPayload, PresentationChannel};
use navsession::replay::ListenerRegistry;
use navsession::routing::{CarDirection, Distance, NavigationSnapshot, RoutingEngine};

type Hook = Box<dyn Fn() + Send + Sync>;

// ============================================================================
// Routing engine
// ============================================================================

struct RoutingState {
    navigating: bool,
    snapshot: Option<NavigationSnapshot>,
    pending: Vec<String>,
    destination: String,
}

/// Routing engine whose answers are set by the test.
///
/// The pending announcement batch is handed out once, then cleared.
pub struct FakeRouting {
    state: Mutex<RoutingState>,
    on_announcements: Mutex<Option<Hook>>,
}

impl FakeRouting {
    pub fn new(destination: &str) -> Self {
        Self {
            state: Mutex::new(RoutingState {
                navigating: true,
                snapshot: None,
                pending: Vec::new(),
                destination: destination.to_string(),
            }),
            on_announcements: Mutex::new(None),
        }
    }

    pub fn set_navigating(&self, navigating: bool) {
        self.state.lock().navigating = navigating;
    }

    pub fn set_snapshot(&self, snapshot: Option<NavigationSnapshot>) {
        self.state.lock().snapshot = snapshot;
    }

    pub fn set_destination(&self, destination: &str) {
        self.state.lock().destination = destination.to_string();
    }

    pub fn queue_announcements(&self, batch: &[&str]) {
        self.state.lock().pending = batch.iter().map(|s| s.to_string()).collect();
    }

    /// Run `hook` whenever announcements are generated (mid-update).
    pub fn on_announcements(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.on_announcements.lock() = Some(Box::new(hook));
    }
}

impl RoutingEngine for FakeRouting {
    fn following_info(&self) -> Option<NavigationSnapshot> {
        self.state.lock().snapshot.clone()
    }

    fn generate_announcements(&self) -> Vec<String> {
        let batch = std::mem::take(&mut self.state.lock().pending);
        if let Some(hook) = self.on_announcements.lock().as_ref() {
            hook();
        }
        batch
    }

    fn is_navigating(&self) -> bool {
        self.state.lock().navigating
    }

    fn destination_name(&self) -> String {
        self.state.lock().destination.clone()
    }
}

// ============================================================================
// Speech
// ============================================================================

#[derive(Default)]
pub struct RecordingSpeech {
    pub played: Mutex<Vec<Vec<String>>>,
    pub stops: Mutex<usize>,
}

impl RecordingSpeech {
    pub fn played(&self) -> Vec<Vec<String>> {
        self.played.lock().clone()
    }

    pub fn stops(&self) -> usize {
        *self.stops.lock()
    }
}

impl SpeechOutput for RecordingSpeech {
    fn play_announcements(&self, announcements: &[String]) -> CollaboratorResult<()> {
        self.played.lock().push(announcements.to_vec());
        Ok(())
    }

    fn stop(&self) {
        *self.stops.lock() += 1;
    }
}

// ============================================================================
// Presentation
// ============================================================================

#[derive(Default)]
pub struct RecordingPresentation {
    pushes: Mutex<Vec<DisplayPayload>>,
    fail: Mutex<bool>,
}

impl RecordingPresentation {
    pub fn pushes(&self) -> Vec<DisplayPayload> {
        self.pushes.lock().clone()
    }

    pub fn push_count(&self) -> usize {
        self.pushes.lock().len()
    }

    pub fn last(&self) -> Option<DisplayPayload> {
        self.pushes.lock().last().cloned()
    }

    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock() = fail;
    }
}

impl PresentationChannel for RecordingPresentation {
    fn push(&self, payload: &DisplayPayload) -> CollaboratorResult<()> {
        self.pushes.lock().push(payload.clone());
        if *self.fail.lock() {
            return Err(CollaboratorError::presentation("display detached"));
        }
        Ok(())
    }
}

// ============================================================================
// Host
// ============================================================================

pub struct FakeHost {
    capabilities: HostCapabilities,
    grant: ForegroundGrant,
    pub channels: Mutex<Vec<ChannelSpec>>,
    pub channel_creations: Mutex<usize>,
    pub grant_requests: Mutex<Vec<(u32, DisplayPayload)>>,
    pub releases: Mutex<Vec<u32>>,
    on_request: Mutex<Option<Hook>>,
}

impl FakeHost {
    pub fn granting() -> Self {
        Self::new(ForegroundGrant::Granted, true)
    }

    pub fn denying() -> Self {
        Self::new(ForegroundGrant::denied("app not in foreground"), true)
    }

    /// Host without denial-aware foreground start that still reports a denial.
    pub fn legacy_denying() -> Self {
        Self::new(ForegroundGrant::denied("legacy"), false)
    }

    fn new(grant: ForegroundGrant, denial_aware: bool) -> Self {
        Self {
            capabilities: HostCapabilities {
                denial_aware_foreground: denial_aware,
            },
            grant,
            channels: Mutex::new(Vec::new()),
            channel_creations: Mutex::new(0),
            grant_requests: Mutex::new(Vec::new()),
            releases: Mutex::new(Vec::new()),
            on_request: Mutex::new(None),
        }
    }

    /// Run `hook` while the host is deciding on a foreground request.
    pub fn on_foreground_request(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.on_request.lock() = Some(Box::new(hook));
    }

    pub fn with_existing_channel(self, id: &str) -> Self {
        self.channels
            .lock()
            .push(ChannelSpec::informational(id, "preexisting"));
        self
    }

    pub fn channel_creations(&self) -> usize {
        *self.channel_creations.lock()
    }

    pub fn grant_request_count(&self) -> usize {
        self.grant_requests.lock().len()
    }

    pub fn release_count(&self) -> usize {
        self.releases.lock().len()
    }
}

impl ForegroundHost for FakeHost {
    fn capabilities(&self) -> HostCapabilities {
        self.capabilities
    }

    fn channel_exists(&self, id: &str) -> bool {
        self.channels.lock().iter().any(|c| c.id == id)
    }

    fn create_channel(&self, spec: &ChannelSpec) -> CollaboratorResult<()> {
        *self.channel_creations.lock() += 1;
        self.channels.lock().push(spec.clone());
        Ok(())
    }

    fn request_foreground(&self, notification_id: u32, payload: &DisplayPayload) -> ForegroundGrant {
        self.grant_requests
            .lock()
            .push((notification_id, payload.clone()));
        if let Some(hook) = self.on_request.lock().as_ref() {
            hook();
        }
        self.grant.clone()
    }

    fn release_foreground(&self, notification_id: u32) {
        self.releases.lock().push(notification_id);
    }
}

// ============================================================================
// Harness
// ============================================================================

/// Wall clock used by the fixed ETA formatter.
pub fn fixed_now() -> NaiveTime {
    NaiveTime::from_hms_opt(17, 40, 0).unwrap()
}

pub fn snapshot(direction: CarDirection, meters: f64, total_time_secs: u64) -> NavigationSnapshot {
    NavigationSnapshot::new(direction, Distance::meters(meters), total_time_secs)
}

/// A session wired to recording doubles.
pub struct Harness {
    pub routing: Arc<FakeRouting>,
    pub location: Arc<ListenerRegistry>,
    pub speech: Arc<RecordingSpeech>,
    pub presentation: Arc<RecordingPresentation>,
    pub host: Arc<FakeHost>,
    pub session: Arc<ForegroundLifecycleManager>,
}

impl Harness {
    pub fn new(host: FakeHost) -> Self {
        let routing = Arc::new(FakeRouting::new("Home"));
        let location = Arc::new(ListenerRegistry::new());
        let speech = Arc::new(RecordingSpeech::default());
        let presentation = Arc::new(RecordingPresentation::default());
        let host = Arc::new(host);

        let collaborators = SessionCollaborators {
            routing: routing.clone(),
            location: location.clone(),
            speech: speech.clone(),
            presentation: presentation.clone(),
            host: host.clone(),
        };
        let session = Arc::new(ForegroundLifecycleManager::with_eta_formatter(
            collaborators,
            SessionConfig::default(),
            Box::new(ClockTimeEta::fixed(fixed_now())),
        ));

        Self {
            routing,
            location,
            speech,
            presentation,
            host,
            session,
        }
    }

    pub fn granted() -> Self {
        Self::new(FakeHost::granting())
    }

    /// Deliver one fix through the location provider.
    pub fn fix(&self) -> usize {
        self.location
            .emit(&navsession::location::LocationFix::new(52.52, 13.40))
    }
}
