//! Spoken announcement gating.
//!
//! Each navigation update yields an [`AnnouncementBatch`]. A non-empty batch
//! is authoritative: it is played in full and its first entry becomes the new
//! primary display text. An empty batch leaves everything as it was.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::CollaboratorResult;

/// Text-to-speech subsystem.
pub trait SpeechOutput: Send + Sync {
    /// Queue `announcements` for sequential playback.
    fn play_announcements(&self, announcements: &[String]) -> CollaboratorResult<()>;

    /// Cancel queued and, where supported, in-progress speech.
    fn stop(&self);
}

/// Announcements produced by the routing engine for one update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnouncementBatch(Vec<String>);

impl AnnouncementBatch {
    pub fn new(announcements: Vec<String>) -> Self {
        Self(announcements)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for AnnouncementBatch {
    fn from(announcements: Vec<String>) -> Self {
        Self::new(announcements)
    }
}

/// Normalize letter case for display: first character upper case, the rest
/// lower case.
pub fn normalize_case(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Decides playback of announcement batches.
#[derive(Clone)]
pub struct AnnouncementGate {
    speech: Arc<dyn SpeechOutput>,
}

impl std::fmt::Debug for AnnouncementGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnouncementGate").finish_non_exhaustive()
    }
}

impl AnnouncementGate {
    pub fn new(speech: Arc<dyn SpeechOutput>) -> Self {
        Self { speech }
    }

    /// Play `batch` and return the new primary display text.
    ///
    /// Returns `None` for an empty batch. Speech failures are logged and do
    /// not affect the returned text.
    pub fn process(&self, batch: &AnnouncementBatch) -> Option<String> {
        let first = batch.first()?;

        debug!(count = batch.len(), first, "Playing announcements");
        if let Err(e) = self.speech.play_announcements(batch.as_slice()) {
            warn!(error = %e, "Announcement playback failed");
        }

        Some(normalize_case(first))
    }

    /// Cancel any queued or playing announcement.
    pub fn cancel(&self) {
        self.speech.stop();
    }
}
