//! Scripted navigation scenarios.

use std::path::{Path, PathBuf};
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::routing::{NavigationSnapshot, RoutingEngine};

/// Default interval between synthetic fixes.
pub const DEFAULT_TICK_MS: u64 = 1_000;

/// Errors raised while loading a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Failed to read scenario {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid scenario: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Scenario has no steps")]
    Empty,

    #[error("Scenario tick_ms must be at least 1")]
    InvalidTick,
}

/// One routing engine state, served for one location fix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioStep {
    #[serde(default = "default_navigating")]
    pub navigating: bool,
    #[serde(default)]
    pub snapshot: Option<NavigationSnapshot>,
    #[serde(default)]
    pub announcements: Vec<String>,
    /// Synthetic position reported with this step.
    #[serde(default)]
    pub position: Option<(f64, f64)>,
}

fn default_navigating() -> bool {
    true
}

fn default_tick_ms() -> u64 {
    DEFAULT_TICK_MS
}

/// A scripted route: destination plus an ordered list of steps.
///
/// ```json
/// {
///   "destination": "Home",
///   "tick_ms": 500,
///   "steps": [
///     { "snapshot": { "direction": "turn_right",
///                     "distance_to_turn": { "value": 500.0, "unit": "meters" },
///                     "total_time_secs": 300 },
///       "announcements": ["In 500 meters turn right"] },
///     { "navigating": false }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub destination: String,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    pub fn from_json(text: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = serde_json::from_str(text)?;
        if scenario.steps.is_empty() {
            return Err(ScenarioError::Empty);
        }
        if scenario.tick_ms == 0 {
            return Err(ScenarioError::InvalidTick);
        }
        Ok(scenario)
    }

    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let text = std::fs::read_to_string(path).map_err(|source| ScenarioError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Interval between fixes, never shorter than 1 ms.
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

struct Cursor {
    index: usize,
    announcements_taken: bool,
}

/// Routing engine that serves scenario steps in order.
///
/// Announcements of a step are handed out once; later calls for the same
/// step return an empty batch, as a real engine would.
pub struct ScenarioRoutingEngine {
    destination: String,
    steps: Vec<ScenarioStep>,
    cursor: Mutex<Cursor>,
}

impl ScenarioRoutingEngine {
    pub fn new(scenario: &Scenario) -> Self {
        Self {
            destination: scenario.destination.clone(),
            steps: scenario.steps.clone(),
            cursor: Mutex::new(Cursor {
                index: 0,
                announcements_taken: false,
            }),
        }
    }

    /// Make step `index` current. Out-of-range indexes are clamped.
    pub fn select(&self, index: usize) {
        let mut cursor = self.cursor.lock();
        cursor.index = index.min(self.steps.len().saturating_sub(1));
        cursor.announcements_taken = false;
    }

    pub fn current_index(&self) -> usize {
        self.cursor.lock().index
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    fn current(&self) -> Option<&ScenarioStep> {
        self.steps.get(self.cursor.lock().index)
    }
}

impl RoutingEngine for ScenarioRoutingEngine {
    fn following_info(&self) -> Option<NavigationSnapshot> {
        self.current().and_then(|step| step.snapshot.clone())
    }

    fn generate_announcements(&self) -> Vec<String> {
        let mut cursor = self.cursor.lock();
        if cursor.announcements_taken {
            return Vec::new();
        }
        cursor.announcements_taken = true;
        self.steps
            .get(cursor.index)
            .map(|step| step.announcements.clone())
            .unwrap_or_default()
    }

    fn is_navigating(&self) -> bool {
        self.current().is_some_and(|step| step.navigating)
    }

    fn destination_name(&self) -> String {
        self.destination.clone()
    }
}
