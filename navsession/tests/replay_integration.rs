//! Integration tests for scenario replay driving a live session.
//!
//! Run with: `cargo test --test replay_integration`

mod common;

use std::sync::Arc;

use common::{fixed_now, FakeHost, RecordingPresentation, RecordingSpeech};
use navsession::config::SessionConfig;
use navsession::presentation::ClockTimeEta;
use navsession::replay::{run_replay, ListenerRegistry, Scenario, ScenarioRoutingEngine};
use navsession::{ForegroundLifecycleManager, SessionCollaborators, SessionPhase};
use tokio_util::sync::CancellationToken;

const DRIVE_HOME: &str = r#"{
    "destination": "Home",
    "tick_ms": 5,
    "steps": [
        { "snapshot": { "direction": "turn_right",
                        "distance_to_turn": { "value": 500.0, "unit": "meters" },
                        "total_time_secs": 300 },
          "announcements": ["IN 500 METERS TURN RIGHT"],
          "position": [52.52, 13.40] },
        { "snapshot": { "direction": "turn_right",
                        "distance_to_turn": { "value": 100.0, "unit": "meters" },
                        "total_time_secs": 240 } },
        { "snapshot": { "direction": "turn_slight_left",
                        "distance_to_turn": { "value": 2.5, "unit": "kilometers" },
                        "total_time_secs": 180 },
          "announcements": ["Keep left"] },
        { "navigating": false }
    ]
}"#;

struct Replay {
    scenario: Scenario,
    engine: Arc<ScenarioRoutingEngine>,
    registry: Arc<ListenerRegistry>,
    speech: Arc<RecordingSpeech>,
    presentation: Arc<RecordingPresentation>,
    session: ForegroundLifecycleManager,
}

impl Replay {
    fn new(json: &str) -> Self {
        let scenario = Scenario::from_json(json).unwrap();
        let engine = Arc::new(ScenarioRoutingEngine::new(&scenario));
        let registry = Arc::new(ListenerRegistry::new());
        let speech = Arc::new(RecordingSpeech::default());
        let presentation = Arc::new(RecordingPresentation::default());

        let session = ForegroundLifecycleManager::with_eta_formatter(
            SessionCollaborators {
                routing: engine.clone(),
                location: registry.clone(),
                speech: speech.clone(),
                presentation: presentation.clone(),
                host: Arc::new(FakeHost::granting()),
            },
            SessionConfig::default(),
            Box::new(ClockTimeEta::fixed(fixed_now())),
        );

        Self {
            scenario,
            engine,
            registry,
            speech,
            presentation,
            session,
        }
    }
}

#[tokio::test]
async fn test_replay_drives_display() {
    let replay = Replay::new(DRIVE_HOME);
    assert_eq!(replay.session.start(), SessionPhase::ForegroundActive);

    let report = run_replay(
        &replay.scenario,
        replay.engine.clone(),
        replay.registry.clone(),
        CancellationToken::new(),
    )
    .await;

    assert_eq!(report.steps_played, 4);
    assert!(!report.cancelled);

    // The final step stops navigating, so three steps produce pushes.
    let pushes = replay.presentation.pushes();
    assert_eq!(pushes.len(), 3);

    assert_eq!(pushes[0].primary_text(), "In 500 meters turn right");
    assert_eq!(pushes[0].secondary_text(), "Arrive at Home: 17:45");

    // No announcement in step two: primary text is kept.
    assert_eq!(pushes[1].primary_text(), "In 500 meters turn right");
    assert_eq!(pushes[1].distance_text(), "100 m");
    assert_eq!(pushes[1].secondary_text(), "Arrive at Home: 17:44");

    assert_eq!(pushes[2].primary_text(), "Keep left");
    assert_eq!(pushes[2].icon(), Some("ic_turn_left_slight"));
    assert_eq!(pushes[2].distance_text(), "2.5 km");

    assert_eq!(replay.speech.played().len(), 2);

    replay.session.on_host_teardown();
    assert_eq!(replay.session.phase(), SessionPhase::Stopped);
    assert_eq!(replay.registry.listener_count(), 0);
}

#[tokio::test]
async fn test_replay_cancellation() {
    let slow = DRIVE_HOME.replace("\"tick_ms\": 5", "\"tick_ms\": 60000");
    let replay = Replay::new(&slow);
    replay.session.start();

    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = run_replay(
        &replay.scenario,
        replay.engine.clone(),
        replay.registry.clone(),
        cancel,
    )
    .await;

    assert!(report.cancelled);
    assert!(report.steps_played <= 1);
    assert_eq!(replay.presentation.push_count(), report.steps_played);
}

#[tokio::test]
async fn test_replay_after_stop_pushes_nothing() {
    let replay = Replay::new(DRIVE_HOME);
    replay.session.start();
    replay.session.stop();

    let report = run_replay(
        &replay.scenario,
        replay.engine.clone(),
        replay.registry.clone(),
        CancellationToken::new(),
    )
    .await;

    assert_eq!(report.steps_played, 4);
    assert_eq!(replay.presentation.push_count(), 0);
    assert!(replay.speech.played().is_empty());
}

#[tokio::test]
async fn test_replay_with_zero_tick_does_not_panic() {
    let mut scenario = Scenario::from_json(DRIVE_HOME).unwrap();
    scenario.tick_ms = 0;
    let engine = Arc::new(ScenarioRoutingEngine::new(&scenario));

    let report = run_replay(
        &scenario,
        engine,
        Arc::new(ListenerRegistry::new()),
        CancellationToken::new(),
    )
    .await;

    assert_eq!(report.steps_played, 4);
}

#[test]
fn test_bundled_demo_scenario_loads() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../demos/drive_home.json");
    let scenario = Scenario::load(&path).unwrap();
    assert_eq!(scenario.destination, "Home");
    assert_eq!(scenario.steps.len(), 8);
    assert!(!scenario.steps.last().unwrap().navigating);
}
