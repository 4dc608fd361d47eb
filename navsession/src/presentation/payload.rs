//! The display payload pushed to the presentation channel.

use std::fmt;

/// Complete content of the persistent navigation display.
///
/// A payload is always pushed as a whole. Text visibility is derived from the
/// text itself: a field is visible iff it is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayPayload {
    primary_text: String,
    secondary_text: String,
    icon: Option<&'static str>,
    distance_text: String,
}

impl DisplayPayload {
    /// Payload with every navigation field empty (used at session start).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_primary_text(mut self, text: impl Into<String>) -> Self {
        self.primary_text = text.into();
        self
    }

    pub fn with_secondary_text(mut self, text: impl Into<String>) -> Self {
        self.secondary_text = text.into();
        self
    }

    pub fn with_icon(mut self, icon: Option<&'static str>) -> Self {
        self.icon = icon;
        self
    }

    pub fn with_distance_text(mut self, text: impl Into<String>) -> Self {
        self.distance_text = text.into();
        self
    }

    /// Maneuver instruction line.
    pub fn primary_text(&self) -> &str {
        &self.primary_text
    }

    pub fn primary_visible(&self) -> bool {
        !self.primary_text.is_empty()
    }

    /// Arrival / ETA line.
    pub fn secondary_text(&self) -> &str {
        &self.secondary_text
    }

    pub fn secondary_visible(&self) -> bool {
        !self.secondary_text.is_empty()
    }

    /// Maneuver icon resource id, once a maneuver is known.
    pub fn icon(&self) -> Option<&'static str> {
        self.icon
    }

    /// Distance to the next maneuver, e.g. `500 m`.
    pub fn distance_text(&self) -> &str {
        &self.distance_text
    }

    /// Which parts differ between `self` (old) and `next`.
    pub fn diff(&self, next: &DisplayPayload) -> PayloadChanges {
        PayloadChanges {
            primary: self.primary_text != next.primary_text,
            secondary: self.secondary_text != next.secondary_text,
            icon: self.icon != next.icon,
            distance: self.distance_text != next.distance_text,
        }
    }
}

impl fmt::Display for DisplayPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let icon = self.icon.unwrap_or("-");
        write!(f, "[{}]", icon)?;
        if !self.distance_text.is_empty() {
            write!(f, " {}", self.distance_text)?;
        }
        if self.primary_visible() {
            write!(f, " | {}", self.primary_text)?;
        }
        if self.secondary_visible() {
            write!(f, " | {}", self.secondary_text)?;
        }
        Ok(())
    }
}

/// Parts of a payload that changed in one update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PayloadChanges {
    pub primary: bool,
    pub secondary: bool,
    pub icon: bool,
    pub distance: bool,
}

impl PayloadChanges {
    /// No part changed; the update can be skipped.
    pub fn is_empty(&self) -> bool {
        !(self.primary || self.secondary || self.icon || self.distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_follows_text() {
        let payload = DisplayPayload::empty();
        assert!(!payload.primary_visible());
        assert!(!payload.secondary_visible());

        let payload = payload.with_primary_text("Turn right");
        assert!(payload.primary_visible());
        assert!(!payload.secondary_visible());
    }

    #[test]
    fn test_diff_reports_changed_parts() {
        let old = DisplayPayload::empty().with_primary_text("Turn right");
        let new = old
            .clone()
            .with_secondary_text("Arrive at Home")
            .with_icon(Some("ic_turn_right"));

        let changes = old.diff(&new);
        assert!(!changes.primary);
        assert!(changes.secondary);
        assert!(changes.icon);
        assert!(!changes.distance);
        assert!(!changes.is_empty());
        assert!(new.diff(&new).is_empty());
    }

    #[test]
    fn test_display_format() {
        let payload = DisplayPayload::empty()
            .with_icon(Some("ic_turn_left"))
            .with_distance_text("200 m")
            .with_primary_text("Turn left")
            .with_secondary_text("Arrive at Work: 17:45");
        assert_eq!(
            payload.to_string(),
            "[ic_turn_left] 200 m | Turn left | Arrive at Work: 17:45"
        );
    }
}
