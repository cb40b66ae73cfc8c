//! Per-session statistics.
//!
//! Updated only from phase completions and explicit distraction
//! resolution. Owned by the timer and cleared by `reset()`.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::distraction::Resolution;
use crate::timer::Phase;

/// How many resolved distraction labels are remembered.
pub const RECENT_DISTRACTIONS: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Seconds spent in completed focus phases.
    pub focus_secs: u64,
    /// Seconds spent in completed break phases.
    pub break_secs: u64,
    /// Completed focus phases.
    pub sessions_completed: u32,
    /// Distractions the user ignored.
    pub distractions_handled: u32,
    pub distractions_given_in: u32,
    /// Most recent first.
    pub recent_distractions: VecDeque<String>,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for a naturally completed phase.
    pub fn record_phase(&mut self, phase: Phase, duration_secs: u64) {
        match phase {
            Phase::Focus => {
                self.focus_secs = self.focus_secs.saturating_add(duration_secs);
                self.sessions_completed = self.sessions_completed.saturating_add(1);
            }
            Phase::Break => {
                self.break_secs = self.break_secs.saturating_add(duration_secs);
            }
            Phase::Idle => {}
        }
    }

    pub fn record_distraction(&mut self, label: &str, resolution: Resolution) {
        match resolution {
            Resolution::Ignore => self.distractions_handled += 1,
            Resolution::GiveIn => self.distractions_given_in += 1,
        }
        self.recent_distractions.push_front(label.to_string());
        self.recent_distractions.truncate(RECENT_DISTRACTIONS);
    }

    pub fn focus_minutes(&self) -> u64 {
        self.focus_secs / 60
    }

    pub fn break_minutes(&self) -> u64 {
        self.break_secs / 60
    }

    /// Share of resolved distractions that were ignored, 0..=100.
    /// `None` until at least one distraction has been resolved.
    pub fn focus_score(&self) -> Option<u32> {
        let total = self.distractions_handled + self.distractions_given_in;
        if total == 0 {
            return None;
        }
        Some(((self.distractions_handled as f64 / total as f64) * 100.0).round() as u32)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
