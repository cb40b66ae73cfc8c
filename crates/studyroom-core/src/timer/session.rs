use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SessionError;

/// The timer's current mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Focus,
    Break,
}

impl Phase {
    /// The phase that follows a naturally expired one. Idle has no successor.
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Focus => Some(Phase::Break),
            Phase::Break => Some(Phase::Focus),
            Phase::Idle => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Idle => "idle",
            Phase::Focus => "focus",
            Phase::Break => "break",
        };
        f.write_str(s)
    }
}

/// Durations and label for one run of the timer.
///
/// Immutable for the duration of a run: the timer keeps its own copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub focus_secs: u64,
    pub break_secs: u64,
    /// Free-form subject/category tag.
    #[serde(default)]
    pub label: String,
}

impl SessionConfig {
    pub fn new(focus_secs: u64, break_secs: u64, label: impl Into<String>) -> Self {
        Self {
            focus_secs,
            break_secs,
            label: label.into(),
        }
    }

    /// Build a config from minute durations, saturating on overflow.
    pub fn from_minutes(focus_min: u64, break_min: u64, label: impl Into<String>) -> Self {
        Self::new(
            focus_min.saturating_mul(60),
            break_min.saturating_mul(60),
            label,
        )
    }

    /// Reject non-positive durations.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.focus_secs == 0 {
            return Err(SessionError::InvalidConfiguration {
                field: "focus_secs",
                value: self.focus_secs,
            });
        }
        if self.break_secs == 0 {
            return Err(SessionError::InvalidConfiguration {
                field: "break_secs",
                value: self.break_secs,
            });
        }
        Ok(())
    }

    /// Configured length of `phase` in seconds (0 for Idle).
    pub fn duration_of(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Focus => self.focus_secs,
            Phase::Break => self.break_secs,
            Phase::Idle => 0,
        }
    }
}

/// Mutable countdown state, owned exclusively by the timer.
///
/// Invariants: `paused` implies `running`; `Idle` iff not running, and Idle
/// always carries zero remaining seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub(crate) phase: Phase,
    pub(crate) remaining_secs: u64,
    pub(crate) running: bool,
    pub(crate) paused: bool,
}

impl SessionState {
    pub(crate) const IDLE: SessionState = SessionState {
        phase: Phase::Idle,
        remaining_secs: 0,
        running: false,
        paused: false,
    };

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    /// True when a tick would advance the countdown.
    pub fn is_ticking(&self) -> bool {
        self.running && !self.paused
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::IDLE
    }
}

/// Format seconds as `MM:SS`. Minutes are not wrapped into hours.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
