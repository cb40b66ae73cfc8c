//! Seeded distraction simulator.
//!
//! Every `check_interval_secs` effective focus ticks a uniform draw decides
//! whether a distraction appears. The counter restarts whenever the session
//! leaves the eligible state (paused, break, idle), and no draw happens while
//! a distraction is still waiting to be resolved.

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::timer::{Phase, SessionTimer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistractionKind {
    PhoneNotification,
    SocialMediaUrge,
    Hunger,
    Tiredness,
    BackgroundNoise,
    MindWandering,
    EmailNotification,
    SomeoneAtDoor,
}

impl DistractionKind {
    pub const ALL: [DistractionKind; 8] = [
        DistractionKind::PhoneNotification,
        DistractionKind::SocialMediaUrge,
        DistractionKind::Hunger,
        DistractionKind::Tiredness,
        DistractionKind::BackgroundNoise,
        DistractionKind::MindWandering,
        DistractionKind::EmailNotification,
        DistractionKind::SomeoneAtDoor,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DistractionKind::PhoneNotification => "Phone notification",
            DistractionKind::SocialMediaUrge => "Social media urge",
            DistractionKind::Hunger => "Hunger distraction",
            DistractionKind::Tiredness => "Feeling tired",
            DistractionKind::BackgroundNoise => "Background noise",
            DistractionKind::MindWandering => "Mind wandering",
            DistractionKind::EmailNotification => "Email notification",
            DistractionKind::SomeoneAtDoor => "Someone at the door",
        }
    }
}

/// How the user dealt with a distraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Ignore,
    GiveIn,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distraction {
    pub kind: DistractionKind,
    /// Focus seconds left when the distraction appeared.
    pub remaining_secs: u64,
}

/// Simulator tuning, also the `[distractions]` config section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistractionConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Chance of a distraction per check, clamped to 0.0..=1.0.
    #[serde(default = "default_probability")]
    pub probability: f64,
    #[serde(default = "default_check_interval")]
    pub check_interval_secs: u64,
    /// Fixed seed for reproducible runs (None = entropy).
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_probability() -> f64 {
    0.3
}

fn default_check_interval() -> u64 {
    10
}

impl Default for DistractionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            probability: default_probability(),
            check_interval_secs: default_check_interval(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DistractionSimulator {
    config: DistractionConfig,
    rng: Mcg128Xsl64,
    focus_ticks: u64,
}

impl DistractionSimulator {
    pub fn new(config: DistractionConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        Self {
            config,
            rng,
            focus_ticks: 0,
        }
    }

    /// Override the configured seed.
    pub fn with_seed(mut config: DistractionConfig, seed: u64) -> Self {
        config.seed = Some(seed);
        Self::new(config)
    }

    pub fn config(&self) -> &DistractionConfig {
        &self.config
    }

    /// Observe the timer after a tick and maybe produce a distraction.
    pub fn observe(&mut self, timer: &SessionTimer) -> Option<Distraction> {
        let state = timer.state();
        if !state.is_ticking() || state.phase() != Phase::Focus {
            self.focus_ticks = 0;
            return None;
        }
        if timer.pending_distraction().is_some() {
            return None;
        }

        self.focus_ticks += 1;
        let interval = self.config.check_interval_secs.max(1);
        if self.focus_ticks % interval != 0 {
            return None;
        }

        let probability = self.config.probability.clamp(0.0, 1.0);
        if self.rng.gen::<f64>() >= probability {
            return None;
        }

        let kind = DistractionKind::ALL[self.rng.gen_range(0..DistractionKind::ALL.len())];
        debug!(?kind, remaining_secs = state.remaining_secs(), "distraction drawn");
        Some(Distraction {
            kind,
            remaining_secs: state.remaining_secs(),
        })
    }

    /// Restart the check counter, e.g. after a stop.
    pub fn reset(&mut self) {
        self.focus_ticks = 0;
    }
}
