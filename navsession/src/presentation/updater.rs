//! Folds a navigation snapshot into the next display payload.

use std::fmt;

use super::eta::EtaFormatter;
use super::payload::DisplayPayload;
use crate::routing::NavigationSnapshot;

/// Placeholder in the arrival template replaced by the destination name.
pub const DESTINATION_PLACEHOLDER: &str = "{}";

/// Default arrival line template.
pub const DEFAULT_ARRIVE_TEMPLATE: &str = "Arrive at {}";

/// Inputs for one render pass.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    /// Maneuver data, if the engine has any.
    pub snapshot: Option<&'a NavigationSnapshot>,
    /// New primary text adopted from this cycle's announcements.
    pub primary_text: Option<&'a str>,
    /// Route end point name.
    pub destination: &'a str,
}

/// Computes display payloads from navigation state.
///
/// Stateless apart from its formatting policy: the previous payload is passed
/// in, and the result replaces it as a whole.
pub struct PresentationUpdater {
    arrive_template: String,
    eta: Box<dyn EtaFormatter>,
}

impl fmt::Debug for PresentationUpdater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresentationUpdater")
            .field("arrive_template", &self.arrive_template)
            .finish_non_exhaustive()
    }
}

impl PresentationUpdater {
    pub fn new(arrive_template: impl Into<String>, eta: Box<dyn EtaFormatter>) -> Self {
        Self {
            arrive_template: arrive_template.into(),
            eta,
        }
    }

    /// Arrival line for `destination`, without ETA.
    pub fn arrival_message(&self, destination: &str) -> String {
        if self.arrive_template.contains(DESTINATION_PLACEHOLDER) {
            self.arrive_template
                .replacen(DESTINATION_PLACEHOLDER, destination, 1)
        } else {
            format!("{} {}", self.arrive_template, destination)
        }
    }

    /// Build the payload that follows `previous`.
    ///
    /// Without a snapshot the maneuver icon and distance are carried over
    /// unchanged and only the arrival line is refreshed.
    pub fn render(&self, previous: &DisplayPayload, input: RenderInput<'_>) -> DisplayPayload {
        let primary = input
            .primary_text
            .map(str::to_string)
            .unwrap_or_else(|| previous.primary_text().to_string());

        let mut secondary = self.arrival_message(input.destination);

        let (icon, distance) = match input.snapshot {
            Some(snapshot) => {
                secondary.push_str(": ");
                secondary.push_str(&self.eta.format_eta(snapshot.total_time_secs));
                (
                    Some(snapshot.direction.turn_icon()),
                    snapshot.distance_to_turn.to_string(),
                )
            }
            None => (previous.icon(), previous.distance_text().to_string()),
        };

        DisplayPayload::empty()
            .with_primary_text(primary)
            .with_secondary_text(secondary)
            .with_icon(icon)
            .with_distance_text(distance)
    }
}
