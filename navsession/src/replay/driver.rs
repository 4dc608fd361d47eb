//! Async driver that plays a scenario as a stream of location fixes.

use std::sync::Arc;

use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::registry::ListenerRegistry;
use super::scenario::{Scenario, ScenarioRoutingEngine};
use crate::location::LocationFix;

/// Summary of a replay run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayReport {
    /// Steps for which a fix was emitted.
    pub steps_played: usize,
    /// Whether the run ended early through cancellation.
    pub cancelled: bool,
}

/// Emit one fix per scenario step, `scenario.tick()` apart.
///
/// Before each fix the engine is moved to the matching step, so listeners
/// observe the step's routing state while handling it.
pub async fn run_replay(
    scenario: &Scenario,
    engine: Arc<ScenarioRoutingEngine>,
    registry: Arc<ListenerRegistry>,
    cancel: CancellationToken,
) -> ReplayReport {
    let mut ticker = interval(scenario.tick());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        steps = scenario.steps.len(),
        tick_ms = scenario.tick_ms,
        destination = %scenario.destination,
        "Starting scenario replay"
    );

    let mut report = ReplayReport::default();
    for (index, step) in scenario.steps.iter().enumerate() {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!(steps_played = report.steps_played, "Scenario replay cancelled");
                report.cancelled = true;
                return report;
            }
            _ = ticker.tick() => {}
        }

        engine.select(index);
        let (latitude, longitude) = step.position.unwrap_or_default();
        let delivered = registry.emit(&LocationFix::new(latitude, longitude));
        debug!(step = index, delivered, "Replayed scenario step");
        report.steps_played += 1;
    }

    info!(steps_played = report.steps_played, "Scenario replay finished");
    report
}
