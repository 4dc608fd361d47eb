//! Scenario replay: run a session without a device.
//!
//! A [`Scenario`] scripts what the routing engine reports for each location
//! fix. [`run_replay`] emits those fixes through a [`ListenerRegistry`] on a
//! tokio interval, so the session under test sees the same callback flow a
//! real location provider would produce.
//!
//! # Example
//!
//! ```ignore
//! let scenario = Scenario::load(path)?;
//! let engine = Arc::new(ScenarioRoutingEngine::new(&scenario));
//! let registry = Arc::new(ListenerRegistry::new());
//! // ... build a ForegroundLifecycleManager with `engine` and `registry` ...
//! session.start();
//! let report = run_replay(&scenario, engine, registry, cancel).await;
//! session.stop();
//! ```

mod driver;
mod registry;
mod scenario;

pub use driver::{run_replay, ReplayReport};
pub use registry::ListenerRegistry;
pub use scenario::{
    Scenario, ScenarioError, ScenarioRoutingEngine, ScenarioStep, DEFAULT_TICK_MS,
};
