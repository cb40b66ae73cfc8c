//! Session timer implementation.
//!
//! The timer is a tick-driven state machine. It has no internal thread and
//! never reads the wall clock: the host delivers one `tick()` per second and
//! the countdown advances by exactly one unit per effective tick.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Focus <--expiry--> Break
//!   ^               |                  |
//!   +---stop/reset--+------------------+
//! ```
//!
//! ## Usage
//!
//! ```
//! use studyroom_core::timer::{Phase, SessionConfig, SessionTimer};
//!
//! let mut timer = SessionTimer::new();
//! timer.start(SessionConfig::new(3, 1, "demo")).unwrap();
//! timer.tick();
//! timer.tick();
//! let done = timer.tick(); // Some(Event::PhaseComplete { phase: Focus, .. })
//! assert_eq!(done.and_then(|e| e.completed_phase()), Some(Phase::Focus));
//! assert_eq!(timer.phase(), Phase::Break);
//! ```

use chrono::Utc;
use tracing::{debug, info, warn};

use super::listeners::{Listener, Listeners, SubscriptionId};
use super::session::{format_clock, Phase, SessionConfig, SessionState};
use crate::distraction::{Distraction, Resolution};
use crate::error::SessionError;
use crate::events::Event;
use crate::stats::SessionStats;

/// Focus/break countdown timer.
///
/// Sole owner of its [`SessionState`]. Starting while a run is active
/// restarts the run from a fresh focus phase; statistics survive the restart.
#[derive(Debug, Default)]
pub struct SessionTimer {
    /// Config of the current or most recent run.
    config: Option<SessionConfig>,
    state: SessionState,
    stats: SessionStats,
    pending_distraction: Option<Distraction>,
    listeners: Listeners,
}

impl SessionTimer {
    /// Create an idle timer with empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn remaining_secs(&self) -> u64 {
        self.state.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    pub fn config(&self) -> Option<&SessionConfig> {
        self.config.as_ref()
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn pending_distraction(&self) -> Option<&Distraction> {
        self.pending_distraction.as_ref()
    }

    /// Configured length of the current phase (0 while Idle).
    pub fn total_secs(&self) -> u64 {
        self.config
            .as_ref()
            .map(|c| c.duration_of(self.state.phase))
            .unwrap_or(0)
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.state.remaining_secs as f64 / total as f64)
    }

    /// Remaining time as `MM:SS`.
    pub fn format_remaining(&self) -> String {
        format_clock(self.state.remaining_secs)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.state.phase,
            remaining_secs: self.state.remaining_secs,
            total_secs: self.total_secs(),
            running: self.state.running,
            paused: self.state.paused,
            label: self
                .config
                .as_ref()
                .map(|c| c.label.clone())
                .unwrap_or_default(),
            progress: self.progress(),
            at: Utc::now(),
        }
    }

    // ── Subscriptions ────────────────────────────────────────────────

    /// Register a listener for `PhaseComplete` events.
    pub fn on_phase_complete<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Event) + Send + 'static,
    {
        self.listeners.add_phase(Box::new(listener) as Listener)
    }

    /// Register a listener for per-second `Tick` display events.
    pub fn on_tick<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Event) + Send + 'static,
    {
        self.listeners.add_tick(Box::new(listener) as Listener)
    }

    /// Returns false if the id was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(id)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a run with a fresh focus phase.
    ///
    /// An invalid config is rejected before anything changes. An active run
    /// is stopped first, so `start` doubles as restart.
    pub fn start(&mut self, config: SessionConfig) -> Result<Event, SessionError> {
        if let Err(err) = config.validate() {
            warn!(%err, "rejected session configuration");
            return Err(err);
        }

        if self.state.running {
            debug!(phase = %self.state.phase, "restarting active session");
            self.stop();
        }

        self.pending_distraction = None;
        self.state = SessionState {
            phase: Phase::Focus,
            remaining_secs: config.focus_secs,
            running: true,
            paused: false,
        };
        debug!(
            label = %config.label,
            focus_secs = config.focus_secs,
            break_secs = config.break_secs,
            "session started"
        );
        let event = Event::SessionStarted {
            label: config.label.clone(),
            focus_secs: config.focus_secs,
            break_secs: config.break_secs,
            at: Utc::now(),
        };
        self.config = Some(config);
        Ok(event)
    }

    /// No-op unless running and not already paused.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.state.running || self.state.paused {
            return None;
        }
        self.state.paused = true;
        debug!(remaining_secs = self.state.remaining_secs, "session paused");
        Some(Event::SessionPaused {
            remaining_secs: self.state.remaining_secs,
            at: Utc::now(),
        })
    }

    /// No-op unless running and paused.
    pub fn resume(&mut self) -> Option<Event> {
        if !self.state.running || !self.state.paused {
            return None;
        }
        self.state.paused = false;
        debug!(remaining_secs = self.state.remaining_secs, "session resumed");
        Some(Event::SessionResumed {
            remaining_secs: self.state.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Single pause/resume button.
    pub fn toggle_pause(&mut self) -> Option<Event> {
        if self.state.paused {
            self.resume()
        } else {
            self.pause()
        }
    }

    /// Return to Idle. Statistics are kept.
    pub fn stop(&mut self) -> Event {
        self.state = SessionState::IDLE;
        self.pending_distraction = None;
        debug!("session stopped");
        Event::SessionStopped { at: Utc::now() }
    }

    /// Stop and clear accumulated statistics.
    pub fn reset(&mut self) -> Event {
        self.stop();
        self.stats.clear();
        debug!("session reset");
        Event::SessionReset { at: Utc::now() }
    }

    /// Advance the countdown by one second.
    ///
    /// No-op while idle or paused. When the countdown reaches zero, exactly
    /// one `PhaseComplete` naming the finished phase is emitted and returned,
    /// and the next phase starts with its full duration within the same tick.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.state.is_ticking() {
            return None;
        }
        let config = self.config.as_ref()?;
        let ended = self.state.phase;
        let next = ended.next()?;

        self.state.remaining_secs = self.state.remaining_secs.saturating_sub(1);

        let mut completed = None;
        if self.state.remaining_secs == 0 {
            let duration_secs = config.duration_of(ended);
            let next_duration_secs = config.duration_of(next);
            let event = Event::PhaseComplete {
                phase: ended,
                label: config.label.clone(),
                duration_secs,
                next_duration_secs,
                at: Utc::now(),
            };

            self.stats.record_phase(ended, duration_secs);
            info!(phase = %ended, label = %config.label, "phase complete");
            self.listeners.emit_phase(&event);

            self.state.phase = next;
            self.state.remaining_secs = next_duration_secs;
            if next == Phase::Break {
                self.pending_distraction = None;
            }
            completed = Some(event);
        }

        let tick = Event::Tick {
            phase: self.state.phase,
            remaining_secs: self.state.remaining_secs,
            at: Utc::now(),
        };
        self.listeners.emit_tick(&tick);

        completed
    }

    // ── Distractions ─────────────────────────────────────────────────

    /// Hold a distraction until the user resolves it. Replaces any pending one.
    ///
    /// Only accepted while a focus phase is counting down; `None` otherwise.
    pub fn raise_distraction(&mut self, distraction: Distraction) -> Option<Event> {
        if !self.state.is_ticking() || self.state.phase != Phase::Focus {
            debug!(kind = ?distraction.kind, phase = %self.state.phase, "distraction outside focus ignored");
            return None;
        }
        let kind = distraction.kind;
        self.pending_distraction = Some(distraction);
        Some(Event::DistractionRaised {
            kind,
            at: Utc::now(),
        })
    }

    /// Resolve the pending distraction. `None` when nothing is pending.
    pub fn resolve_distraction(&mut self, resolution: Resolution) -> Option<Event> {
        let distraction = self.pending_distraction.take()?;
        self.stats
            .record_distraction(distraction.kind.label(), resolution);
        debug!(kind = ?distraction.kind, ?resolution, "distraction resolved");
        Some(Event::DistractionResolved {
            kind: distraction.kind,
            resolution,
            at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distraction::DistractionKind;
    use std::sync::{Arc, Mutex};

    fn pomodoro() -> SessionConfig {
        SessionConfig::from_minutes(25, 5, "Computer Science")
    }

    fn collect_phases(timer: &mut SessionTimer) -> Arc<Mutex<Vec<Phase>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        timer.on_phase_complete(move |event| {
            if let Some(phase) = event.completed_phase() {
                sink.lock().unwrap().push(phase);
            }
        });
        seen
    }

    #[test]
    fn new_timer_is_idle() {
        let timer = SessionTimer::new();
        assert_eq!(timer.phase(), Phase::Idle);
        assert_eq!(timer.remaining_secs(), 0);
        assert!(!timer.is_running());
        assert!(!timer.is_paused());
        assert!(timer.config().is_none());
    }

    #[test]
    fn start_pause_resume() {
        let mut timer = SessionTimer::new();
        assert!(matches!(timer.start(pomodoro()), Ok(Event::SessionStarted { .. })));
        assert_eq!(timer.phase(), Phase::Focus);
        assert_eq!(timer.remaining_secs(), 1500);

        assert!(timer.pause().is_some());
        assert!(timer.is_paused());
        assert!(timer.pause().is_none());

        assert!(timer.resume().is_some());
        assert!(!timer.is_paused());
        assert!(timer.resume().is_none());
    }

    #[test]
    fn pause_and_resume_are_noops_when_idle() {
        let mut timer = SessionTimer::new();
        assert!(timer.pause().is_none());
        assert!(timer.resume().is_none());
        assert!(timer.toggle_pause().is_none());
        assert!(!timer.is_paused());
    }

    #[test]
    fn toggle_pause_flips() {
        let mut timer = SessionTimer::new();
        timer.start(pomodoro()).unwrap();
        assert!(matches!(timer.toggle_pause(), Some(Event::SessionPaused { .. })));
        assert!(matches!(timer.toggle_pause(), Some(Event::SessionResumed { .. })));
    }

    #[test]
    fn pomodoro_scenario_focus_to_break() {
        let mut timer = SessionTimer::new();
        let phases = collect_phases(&mut timer);
        timer.start(pomodoro()).unwrap();
        assert_eq!(timer.remaining_secs(), 1500);

        let mut returned = 0;
        for _ in 0..1500 {
            if timer.tick().is_some() {
                returned += 1;
            }
        }
        assert_eq!(returned, 1);
        assert_eq!(*phases.lock().unwrap(), vec![Phase::Focus]);
        assert_eq!(timer.phase(), Phase::Break);
        assert_eq!(timer.remaining_secs(), 300);
    }

    #[test]
    fn break_returns_to_focus() {
        let mut timer = SessionTimer::new();
        let phases = collect_phases(&mut timer);
        timer.start(SessionConfig::new(3, 2, "x")).unwrap();
        for _ in 0..5 {
            timer.tick();
        }
        assert_eq!(*phases.lock().unwrap(), vec![Phase::Focus, Phase::Break]);
        assert_eq!(timer.phase(), Phase::Focus);
        assert_eq!(timer.remaining_secs(), 3);
    }

    #[test]
    fn one_second_phases_flip_every_tick() {
        let mut timer = SessionTimer::new();
        timer.start(SessionConfig::new(1, 1, "x")).unwrap();
        let ended: Vec<_> = (0..4)
            .filter_map(|_| timer.tick().and_then(|e| e.completed_phase()))
            .collect();
        assert_eq!(ended, vec![Phase::Focus, Phase::Break, Phase::Focus, Phase::Break]);
        assert_eq!(timer.phase(), Phase::Focus);
        assert_eq!(timer.remaining_secs(), 1);
    }

    #[test]
    fn paused_tick_changes_nothing() {
        let mut timer = SessionTimer::new();
        let phases = collect_phases(&mut timer);
        timer.start(SessionConfig::new(2, 2, "x")).unwrap();
        timer.pause();
        for _ in 0..10 {
            assert!(timer.tick().is_none());
        }
        assert_eq!(timer.remaining_secs(), 2);
        assert!(phases.lock().unwrap().is_empty());
    }

    #[test]
    fn idle_tick_is_noop() {
        let mut timer = SessionTimer::new();
        assert!(timer.tick().is_none());
        assert_eq!(timer.state(), SessionState::IDLE);
    }

    #[test]
    fn stop_from_any_state() {
        let mut timer = SessionTimer::new();
        timer.stop();
        assert_eq!(timer.state(), SessionState::IDLE);

        timer.start(pomodoro()).unwrap();
        timer.tick();
        timer.stop();
        assert_eq!(timer.state(), SessionState::IDLE);

        timer.start(pomodoro()).unwrap();
        timer.pause();
        timer.stop();
        assert_eq!(timer.phase(), Phase::Idle);
        assert_eq!(timer.remaining_secs(), 0);
        assert!(!timer.is_running());
        assert!(!timer.is_paused());
    }

    #[test]
    fn invalid_config_leaves_state_unchanged() {
        let mut timer = SessionTimer::new();
        timer.start(SessionConfig::new(10, 5, "ok")).unwrap();
        timer.tick();
        let before = timer.state();

        let err = timer.start(SessionConfig::new(0, 5, "bad")).unwrap_err();
        assert!(matches!(err, SessionError::InvalidConfiguration { field: "focus_secs", .. }));
        assert!(timer.start(SessionConfig::new(10, 0, "bad")).is_err());

        assert_eq!(timer.state(), before);
        assert_eq!(timer.config().map(|c| c.label.as_str()), Some("ok"));
    }

    #[test]
    fn start_while_running_restarts() {
        let mut timer = SessionTimer::new();
        timer.start(SessionConfig::new(10, 5, "a")).unwrap();
        for _ in 0..4 {
            timer.tick();
        }
        timer.pause();
        timer.start(SessionConfig::new(20, 5, "b")).unwrap();
        assert_eq!(timer.phase(), Phase::Focus);
        assert_eq!(timer.remaining_secs(), 20);
        assert!(!timer.is_paused());
    }

    #[test]
    fn reset_clears_stats_but_stop_keeps_them() {
        let mut timer = SessionTimer::new();
        timer.start(SessionConfig::new(2, 1, "x")).unwrap();
        timer.tick();
        timer.tick();
        assert_eq!(timer.stats().sessions_completed, 1);

        timer.stop();
        assert_eq!(timer.stats().sessions_completed, 1);
        assert_eq!(timer.stats().focus_secs, 2);

        timer.reset();
        assert_eq!(*timer.stats(), SessionStats::default());
        assert_eq!(timer.state(), SessionState::IDLE);
    }

    #[test]
    fn tick_listeners_see_every_effective_tick() {
        let mut timer = SessionTimer::new();
        let ticks = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&ticks);
        timer.on_tick(move |event| {
            if let Event::Tick { phase, remaining_secs, .. } = event {
                sink.lock().unwrap().push((*phase, *remaining_secs));
            }
        });
        timer.start(SessionConfig::new(2, 3, "x")).unwrap();
        timer.tick();
        timer.pause();
        timer.tick();
        timer.resume();
        timer.tick();

        assert_eq!(
            *ticks.lock().unwrap(),
            vec![(Phase::Focus, 1), (Phase::Break, 3)]
        );
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut timer = SessionTimer::new();
        let count = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&count);
        let id = timer.on_phase_complete(move |_| *sink.lock().unwrap() += 1);
        timer.start(SessionConfig::new(1, 1, "x")).unwrap();
        timer.tick();
        assert!(timer.unsubscribe(id));
        assert!(!timer.unsubscribe(id));
        timer.tick();
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn progress_and_snapshot() {
        let mut timer = SessionTimer::new();
        assert_eq!(timer.progress(), 0.0);
        timer.start(SessionConfig::new(4, 2, "Math")).unwrap();
        timer.tick();
        assert!((timer.progress() - 0.25).abs() < f64::EPSILON);
        assert_eq!(timer.format_remaining(), "00:03");

        match timer.snapshot() {
            Event::StateSnapshot {
                phase,
                remaining_secs,
                total_secs,
                running,
                label,
                ..
            } => {
                assert_eq!(phase, Phase::Focus);
                assert_eq!(remaining_secs, 3);
                assert_eq!(total_secs, 4);
                assert!(running);
                assert_eq!(label, "Math");
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
    }

    #[test]
    fn distraction_resolution_updates_stats() {
        let mut timer = SessionTimer::new();
        timer.start(pomodoro()).unwrap();
        assert!(timer.resolve_distraction(Resolution::Ignore).is_none());

        timer.raise_distraction(Distraction {
            kind: DistractionKind::PhoneNotification,
            remaining_secs: 1400,
        });
        assert!(timer.pending_distraction().is_some());
        let event = timer.resolve_distraction(Resolution::Ignore);
        assert!(matches!(event, Some(Event::DistractionResolved { .. })));
        assert!(timer.pending_distraction().is_none());
        assert_eq!(timer.stats().distractions_handled, 1);
        assert_eq!(
            timer.stats().recent_distractions.front().map(String::as_str),
            Some("Phone notification")
        );
    }

    #[test]
    fn distraction_rejected_outside_running_focus() {
        let hunger = Distraction {
            kind: DistractionKind::Hunger,
            remaining_secs: 0,
        };
        let mut timer = SessionTimer::new();
        assert!(timer.raise_distraction(hunger.clone()).is_none());

        timer.start(SessionConfig::new(1, 5, "x")).unwrap();
        timer.pause();
        assert!(timer.raise_distraction(hunger.clone()).is_none());
        timer.resume();

        timer.tick();
        assert_eq!(timer.phase(), Phase::Break);
        assert!(timer.raise_distraction(hunger).is_none());
        assert!(timer.pending_distraction().is_none());
    }

    #[test]
    fn start_discards_distraction_from_previous_run() {
        let mut timer = SessionTimer::new();
        timer.start(SessionConfig::new(10, 5, "a")).unwrap();
        let raised = timer.raise_distraction(Distraction {
            kind: DistractionKind::EmailNotification,
            remaining_secs: 10,
        });
        assert!(matches!(raised, Some(Event::DistractionRaised { .. })));

        timer.start(SessionConfig::new(10, 5, "b")).unwrap();
        assert!(timer.pending_distraction().is_none());
        assert!(timer.resolve_distraction(Resolution::GiveIn).is_none());
        assert_eq!(timer.stats().distractions_given_in, 0);
    }

    #[test]
    fn stop_discards_pending_distraction() {
        let mut timer = SessionTimer::new();
        timer.start(pomodoro()).unwrap();
        timer.raise_distraction(Distraction {
            kind: DistractionKind::Hunger,
            remaining_secs: 1500,
        });
        timer.stop();
        assert!(timer.pending_distraction().is_none());
        assert_eq!(timer.stats().distractions_handled, 0);
    }
}
