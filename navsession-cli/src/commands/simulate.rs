//! Simulate command - run a navigation session against a scripted scenario.

use std::path::PathBuf;
use std::sync::Arc;

use navsession::replay::{run_replay, ListenerRegistry, Scenario, ScenarioRoutingEngine};
use navsession::{ForegroundLifecycleManager, SessionCollaborators};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::common::{load_config, resolve_config_path, EtaArg};
use crate::console::{ConsoleHost, ConsolePresentation, ConsoleSpeech};
use crate::error::CliError;

/// Arguments for the simulate command.
pub struct SimulateArgs {
    pub scenario: PathBuf,
    pub config: Option<PathBuf>,
    pub deny_foreground: bool,
    pub legacy_host: bool,
    pub eta: Option<EtaArg>,
    pub verbose: u8,
}

/// Run the simulate command.
pub fn run(args: SimulateArgs) -> Result<(), CliError> {
    let config_path = resolve_config_path(args.config)?;
    let mut config = load_config(&config_path)?;
    if let Some(eta) = args.eta {
        config.session.eta_style = eta.into();
    }

    let _log_guard =
        navsession::logging::init_logging(&config.logging, args.verbose).map_err(CliError::Logging)?;
    info!(version = navsession::VERSION, config = %config_path.display(), "navsession simulate");

    let scenario = Scenario::load(&args.scenario)?;

    let engine = Arc::new(ScenarioRoutingEngine::new(&scenario));
    let registry = Arc::new(ListenerRegistry::new());
    let presentation = Arc::new(ConsolePresentation::default());
    let speech = Arc::new(ConsoleSpeech::default());
    let host = Arc::new(ConsoleHost::new(args.deny_foreground, args.legacy_host));

    println!("navsession simulate v{}", navsession::VERSION);
    println!("==========================");
    println!();
    println!("Scenario:    {}", args.scenario.display());
    println!("Destination: {}", scenario.destination);
    println!("Steps:       {} ({} ms apart)", scenario.steps.len(), scenario.tick_ms);
    println!("ETA:         {}", config.session.eta_style);
    println!();

    let session = ForegroundLifecycleManager::new(
        SessionCollaborators {
            routing: engine.clone(),
            location: registry.clone(),
            speech: speech.clone(),
            presentation: presentation.clone(),
            host,
        },
        config.session.clone(),
    );

    let phase = session.start();
    println!("Session:     {} ({})", phase, session.status().display_status());
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let cancel = CancellationToken::new();
    let cancel_on_signal = cancel.clone();
    ctrlc::set_handler(move || {
        println!();
        println!("Received shutdown signal, stopping session...");
        cancel_on_signal.cancel();
    })
    .map_err(|e| CliError::Runtime(format!("Failed to set signal handler: {}", e)))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Runtime(format!("Failed to start async runtime: {}", e)))?;
    let report = runtime.block_on(run_replay(&scenario, engine, registry, cancel));

    session.on_host_teardown();

    println!();
    println!("Session Summary");
    println!("───────────────");
    println!(
        "  Steps played:   {}/{}{}",
        report.steps_played,
        scenario.steps.len(),
        if report.cancelled { " (cancelled)" } else { "" }
    );
    println!("  Display pushes: {}", presentation.pushes());
    println!("  Announcements:  {}", speech.spoken());
    println!("  Final state:    {}", session.status().display_status());
    Ok(())
}
