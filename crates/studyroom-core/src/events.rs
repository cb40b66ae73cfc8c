use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::distraction::{DistractionKind, Resolution};
use crate::timer::Phase;

/// Every state change of a session produces an Event.
/// The CLI prints them; statistics and notification collaborators subscribe to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        label: String,
        focus_secs: u64,
        break_secs: u64,
        at: DateTime<Utc>,
    },
    /// Per-second display notification. Never used for phase accounting.
    Tick {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// A phase's countdown reached zero. Carries the phase that just ended.
    PhaseComplete {
        phase: Phase,
        label: String,
        duration_secs: u64,
        /// Length of the phase that begins in the same tick.
        next_duration_secs: u64,
        at: DateTime<Utc>,
    },
    SessionPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionStopped {
        at: DateTime<Utc>,
    },
    /// Stopped and statistics cleared.
    SessionReset {
        at: DateTime<Utc>,
    },
    DistractionRaised {
        kind: DistractionKind,
        at: DateTime<Utc>,
    },
    DistractionResolved {
        kind: DistractionKind,
        resolution: Resolution,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        remaining_secs: u64,
        total_secs: u64,
        running: bool,
        paused: bool,
        label: String,
        progress: f64,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// The phase that ended, if this is a `PhaseComplete`.
    pub fn completed_phase(&self) -> Option<Phase> {
        match self {
            Event::PhaseComplete { phase, .. } => Some(*phase),
            _ => None,
        }
    }

    /// Timestamp carried by every variant.
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::SessionStarted { at, .. }
            | Event::Tick { at, .. }
            | Event::PhaseComplete { at, .. }
            | Event::SessionPaused { at, .. }
            | Event::SessionResumed { at, .. }
            | Event::SessionStopped { at }
            | Event::SessionReset { at }
            | Event::DistractionRaised { at, .. }
            | Event::DistractionResolved { at, .. }
            | Event::StateSnapshot { at, .. } => *at,
        }
    }
}
