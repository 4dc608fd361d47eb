//! Pluggable ETA rendering for the secondary display line.
//!
//! The session core does not fix how remaining time is shown. Two policies
//! are provided:
//!
//! - [`ClockTimeEta`]: absolute finish time, e.g. `17:45`
//! - [`RelativeEta`]: remaining duration, e.g. `in 1 h 5 min`

use std::fmt;
use std::str::FromStr;

use chrono::{Duration as ChronoDuration, Local, NaiveTime, Timelike};

/// Renders total remaining seconds as a user-facing ETA string.
pub trait EtaFormatter: Send + Sync {
    fn format_eta(&self, total_secs: u64) -> String;
}

/// Which built-in formatter to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EtaStyle {
    /// Absolute local clock time of arrival.
    #[default]
    Clock,
    /// Remaining duration.
    Relative,
}

impl EtaStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            EtaStyle::Clock => "clock",
            EtaStyle::Relative => "relative",
        }
    }

    /// Build the formatter for this style.
    pub fn formatter(&self) -> Box<dyn EtaFormatter> {
        match self {
            EtaStyle::Clock => Box::new(ClockTimeEta::new()),
            EtaStyle::Relative => Box::new(RelativeEta),
        }
    }
}

impl fmt::Display for EtaStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EtaStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clock" => Ok(EtaStyle::Clock),
            "relative" => Ok(EtaStyle::Relative),
            other => Err(format!("unknown ETA style '{}'", other)),
        }
    }
}

/// Finish time as `HH:MM` on a 24-hour clock, wrapping past midnight.
pub fn format_finish_time(now: NaiveTime, total_secs: u64) -> String {
    // Clamp to a day; the wrapped clock time is the same for longer trips.
    let offset = ChronoDuration::seconds((total_secs % 86_400) as i64);
    let (finish, _) = now.overflowing_add_signed(offset);
    format!("{:02}:{:02}", finish.hour(), finish.minute())
}

/// Absolute arrival clock time based on the local wall clock.
pub struct ClockTimeEta {
    now: Box<dyn Fn() -> NaiveTime + Send + Sync>,
}

impl fmt::Debug for ClockTimeEta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClockTimeEta").finish_non_exhaustive()
    }
}

impl Default for ClockTimeEta {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockTimeEta {
    pub fn new() -> Self {
        Self {
            now: Box::new(|| Local::now().time()),
        }
    }

    /// Use a fixed "now" (for testing).
    pub fn fixed(now: NaiveTime) -> Self {
        Self {
            now: Box::new(move || now),
        }
    }
}

impl EtaFormatter for ClockTimeEta {
    fn format_eta(&self, total_secs: u64) -> String {
        format_finish_time((self.now)(), total_secs)
    }
}

/// Remaining time as a duration, rounded up to whole minutes.
#[derive(Debug, Default, Clone, Copy)]
pub struct RelativeEta;

impl EtaFormatter for RelativeEta {
    fn format_eta(&self, total_secs: u64) -> String {
        let minutes = total_secs.div_ceil(60);
        if minutes < 1 {
            return "now".to_string();
        }
        let hours = minutes / 60;
        let rest = minutes % 60;
        match (hours, rest) {
            (0, m) => format!("in {} min", m),
            (h, 0) => format!("in {} h", h),
            (h, m) => format!("in {} h {} min", h, m),
        }
    }
}
