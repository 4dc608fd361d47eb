//! Console stand-ins for the host platform.
//!
//! `simulate` has no notification shade or speech engine, so display
//! updates and announcements are printed to stdout instead.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use navsession::announcement::SpeechOutput;
use navsession::error::CollaboratorResult;
use navsession::lifecycle::{ChannelSpec, ForegroundGrant, ForegroundHost, HostCapabilities};
use navsession::presentation::{DisplayPayload, PresentationChannel};

/// Prints each pushed payload as one line.
#[derive(Debug, Default)]
pub struct ConsolePresentation {
    pushes: AtomicUsize,
}

impl ConsolePresentation {
    pub fn pushes(&self) -> usize {
        self.pushes.load(Ordering::Relaxed)
    }
}

impl PresentationChannel for ConsolePresentation {
    fn push(&self, payload: &DisplayPayload) -> CollaboratorResult<()> {
        let n = self.pushes.fetch_add(1, Ordering::Relaxed) + 1;
        println!("  display #{:<3} {}", n, payload);
        Ok(())
    }
}

/// Prints announcements instead of speaking them.
#[derive(Debug, Default)]
pub struct ConsoleSpeech {
    spoken: AtomicUsize,
}

impl ConsoleSpeech {
    pub fn spoken(&self) -> usize {
        self.spoken.load(Ordering::Relaxed)
    }
}

impl SpeechOutput for ConsoleSpeech {
    fn play_announcements(&self, announcements: &[String]) -> CollaboratorResult<()> {
        for text in announcements {
            self.spoken.fetch_add(1, Ordering::Relaxed);
            println!("  speech       \"{}\"", text);
        }
        Ok(())
    }

    fn stop(&self) {
        println!("  speech       (cancelled)");
    }
}

/// In-process host with switchable foreground policy.
#[derive(Debug)]
pub struct ConsoleHost {
    deny_foreground: bool,
    legacy: bool,
    channels: Mutex<HashSet<String>>,
}

impl ConsoleHost {
    /// `deny_foreground` refuses every grant request; `legacy` reports a
    /// host that cannot refuse.
    pub fn new(deny_foreground: bool, legacy: bool) -> Self {
        Self {
            deny_foreground,
            legacy,
            channels: Mutex::new(HashSet::new()),
        }
    }
}

impl ForegroundHost for ConsoleHost {
    fn capabilities(&self) -> HostCapabilities {
        HostCapabilities {
            denial_aware_foreground: !self.legacy,
        }
    }

    fn channel_exists(&self, id: &str) -> bool {
        self.channels.lock().contains(id)
    }

    fn create_channel(&self, spec: &ChannelSpec) -> CollaboratorResult<()> {
        println!("  host         channel '{}' ({}) created", spec.id, spec.name);
        self.channels.lock().insert(spec.id.clone());
        Ok(())
    }

    fn request_foreground(&self, notification_id: u32, _payload: &DisplayPayload) -> ForegroundGrant {
        let grant = if self.deny_foreground {
            ForegroundGrant::denied("background start not allowed")
        } else {
            ForegroundGrant::Granted
        };
        println!("  host         foreground #{}: {}", notification_id, grant);
        grant
    }

    fn release_foreground(&self, notification_id: u32) {
        println!("  host         foreground #{} released", notification_id);
    }
}
