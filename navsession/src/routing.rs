//! Routing engine interface and the per-update navigation snapshot.
//!
//! The routing engine itself is an external collaborator. This module only
//! defines what the session reads from it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maneuver direction class reported by the routing engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarDirection {
    NoTurn,
    GoStraight,
    TurnRight,
    TurnSharpRight,
    TurnSlightRight,
    TurnLeft,
    TurnSharpLeft,
    TurnSlightLeft,
    UTurnLeft,
    UTurnRight,
    EnterRoundAbout,
    LeaveRoundAbout,
    StayOnRoundAbout,
    StartAtEndOfStreet,
    ReachedYourDestination,
    ExitHighwayToLeft,
    ExitHighwayToRight,
}

impl CarDirection {
    /// Icon resource id shown next to the maneuver text.
    pub fn turn_icon(&self) -> &'static str {
        match self {
            CarDirection::NoTurn | CarDirection::GoStraight => "ic_turn_straight",
            CarDirection::TurnRight => "ic_turn_right",
            CarDirection::TurnSharpRight => "ic_turn_right_sharp",
            CarDirection::TurnSlightRight => "ic_turn_right_slight",
            CarDirection::TurnLeft => "ic_turn_left",
            CarDirection::TurnSharpLeft => "ic_turn_left_sharp",
            CarDirection::TurnSlightLeft => "ic_turn_left_slight",
            CarDirection::UTurnLeft => "ic_turn_uleft",
            CarDirection::UTurnRight => "ic_turn_uright",
            CarDirection::EnterRoundAbout
            | CarDirection::LeaveRoundAbout
            | CarDirection::StayOnRoundAbout => "ic_turn_round",
            CarDirection::StartAtEndOfStreet => "ic_turn_straight",
            CarDirection::ReachedYourDestination => "ic_turn_finish",
            CarDirection::ExitHighwayToLeft => "ic_exit_highway_to_left",
            CarDirection::ExitHighwayToRight => "ic_exit_highway_to_right",
        }
    }
}

/// Unit attached to a distance value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    Meters,
    Kilometers,
    Feet,
    Miles,
}

impl DistanceUnit {
    /// Unit suffix used in rendered distances.
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceUnit::Meters => "m",
            DistanceUnit::Kilometers => "km",
            DistanceUnit::Feet => "ft",
            DistanceUnit::Miles => "mi",
        }
    }

    /// Whether values in this unit are shown with a fractional digit.
    fn is_coarse(&self) -> bool {
        matches!(self, DistanceUnit::Kilometers | DistanceUnit::Miles)
    }
}

/// Distance value with its unit, as already chosen by the routing engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distance {
    pub value: f64,
    pub unit: DistanceUnit,
}

impl Distance {
    pub fn new(value: f64, unit: DistanceUnit) -> Self {
        Self { value, unit }
    }

    pub fn meters(value: f64) -> Self {
        Self::new(value, DistanceUnit::Meters)
    }

    pub fn kilometers(value: f64) -> Self {
        Self::new(value, DistanceUnit::Kilometers)
    }
}

impl fmt::Display for Distance {
    /// Renders e.g. `500 m`, `1.2 km`, `12 km`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = if self.unit.is_coarse() && self.value < 10.0 {
            let rounded = format!("{:.1}", self.value);
            match rounded.strip_suffix(".0") {
                Some(whole) => whole.to_string(),
                None => rounded,
            }
        } else {
            format!("{:.0}", self.value)
        };
        write!(f, "{} {}", value, self.unit.as_str())
    }
}

/// Immutable routing state for one update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationSnapshot {
    /// Direction class of the next maneuver.
    pub direction: CarDirection,
    /// Distance to the next maneuver.
    pub distance_to_turn: Distance,
    /// Remaining travel time to the destination, in seconds.
    pub total_time_secs: u64,
    /// Name of the arrival point, as known to the engine.
    #[serde(default)]
    pub arrival_name: String,
}

impl NavigationSnapshot {
    pub fn new(direction: CarDirection, distance_to_turn: Distance, total_time_secs: u64) -> Self {
        Self {
            direction,
            distance_to_turn,
            total_time_secs,
            arrival_name: String::new(),
        }
    }

    /// Set the arrival point name.
    pub fn with_arrival_name(mut self, name: impl Into<String>) -> Self {
        self.arrival_name = name.into();
        self
    }
}

/// Routing/navigation engine consumed by the session.
///
/// Implementations are expected to answer from already-computed state; the
/// session calls these methods once per location fix and never blocks on them.
pub trait RoutingEngine: Send + Sync {
    /// Current maneuver data, or `None` when no maneuver is known.
    fn following_info(&self) -> Option<NavigationSnapshot>;

    /// Announcements generated since the last call, in playback order.
    fn generate_announcements(&self) -> Vec<String>;

    /// Whether a route is currently being followed.
    fn is_navigating(&self) -> bool;

    /// Display name of the route's end point.
    fn destination_name(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_display_meters() {
        assert_eq!(Distance::meters(500.0).to_string(), "500 m");
        assert_eq!(Distance::meters(42.4).to_string(), "42 m");
    }

    #[test]
    fn test_distance_display_kilometers() {
        assert_eq!(Distance::kilometers(1.24).to_string(), "1.2 km");
        assert_eq!(Distance::kilometers(3.0).to_string(), "3 km");
        assert_eq!(Distance::kilometers(12.6).to_string(), "13 km");
    }

    #[test]
    fn test_distance_display_imperial() {
        assert_eq!(Distance::new(800.0, DistanceUnit::Feet).to_string(), "800 ft");
        assert_eq!(Distance::new(0.3, DistanceUnit::Miles).to_string(), "0.3 mi");
    }

    #[test]
    fn test_turn_icons() {
        assert_eq!(CarDirection::TurnRight.turn_icon(), "ic_turn_right");
        assert_eq!(CarDirection::StayOnRoundAbout.turn_icon(), "ic_turn_round");
        assert_eq!(
            CarDirection::ReachedYourDestination.turn_icon(),
            "ic_turn_finish"
        );
    }

    #[test]
    fn test_snapshot_deserializes_from_json() {
        let json = r#"{
            "direction": "turn_left",
            "distance_to_turn": { "value": 250.0, "unit": "meters" },
            "total_time_secs": 600
        }"#;
        let snapshot: NavigationSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.direction, CarDirection::TurnLeft);
        assert_eq!(snapshot.total_time_secs, 600);
        assert!(snapshot.arrival_name.is_empty());
    }
}
