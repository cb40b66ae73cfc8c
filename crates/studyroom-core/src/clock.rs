//! Tick sources and the session driver.
//!
//! Time advancement is injected: the timer never sleeps or reads the clock.
//! A [`TickSource`] produces ticks, and [`Driver`] pumps them into a
//! [`SharedTimer`]. Other contexts (user input) mutate the same timer through
//! the shared handle, so every mutation is serialized behind one lock.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::distraction::{Distraction, DistractionSimulator};
use crate::events::Event;
use crate::timer::{Phase, SessionState, SessionTimer};

/// Something that delivers ticks. Resolves to `false` once exhausted.
pub trait TickSource {
    fn next_tick(&mut self) -> impl Future<Output = bool> + Send;
}

/// Wall-clock ticks from a tokio interval. Must be created inside a runtime.
#[derive(Debug)]
pub struct IntervalSource {
    interval: Interval,
}

impl IntervalSource {
    /// Nominal 1 Hz source.
    pub fn every_second() -> Self {
        Self::new(Duration::from_secs(1))
    }

    /// A zero period is raised to one millisecond.
    pub fn new(period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        let start = tokio::time::Instant::now() + period;
        let mut interval = tokio::time::interval_at(start, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
        Self { interval }
    }
}

impl TickSource for IntervalSource {
    fn next_tick(&mut self) -> impl Future<Output = bool> + Send {
        async move {
            self.interval.tick().await;
            true
        }
    }
}

/// Yields a fixed number of ticks immediately.
#[derive(Debug, Clone)]
pub struct ManualSource {
    remaining: u64,
}

impl ManualSource {
    pub fn new(ticks: u64) -> Self {
        Self { remaining: ticks }
    }
}

impl TickSource for ManualSource {
    fn next_tick(&mut self) -> impl Future<Output = bool> + Send {
        let more = self.remaining > 0;
        self.remaining = self.remaining.saturating_sub(1);
        std::future::ready(more)
    }
}

/// Cloneable handle that serializes all access to one timer.
#[derive(Debug, Clone, Default)]
pub struct SharedTimer {
    inner: Arc<Mutex<SessionTimer>>,
}

impl SharedTimer {
    pub fn new(timer: SessionTimer) -> Self {
        Self {
            inner: Arc::new(Mutex::new(timer)),
        }
    }

    /// A panicking listener must not wedge the session, so poisoning is ignored.
    pub fn lock(&self) -> MutexGuard<'_, SessionTimer> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access.
    pub fn with<R>(&self, f: impl FnOnce(&mut SessionTimer) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn state(&self) -> SessionState {
        self.lock().state()
    }

    pub fn toggle_pause(&self) -> Option<Event> {
        self.with(|t| t.toggle_pause())
    }

    pub fn stop(&self) -> Event {
        self.with(|t| t.stop())
    }
}

/// What happened on one driven tick.
#[derive(Debug, Clone)]
pub struct DriveStep {
    pub tick: u64,
    pub state: SessionState,
    pub completed: Option<Event>,
    pub distraction: Option<Distraction>,
}

/// Totals for one driver run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriveSummary {
    /// Ticks delivered by the source, including paused no-ops.
    pub ticks: u64,
    /// Completed phases, in order.
    pub completed: Vec<Phase>,
    pub distractions: u32,
    /// True when the run ended because the timer went idle.
    pub stopped: bool,
}

impl DriveSummary {
    /// Full focus+break cycles completed.
    pub fn cycles(&self) -> u32 {
        self.completed.iter().filter(|p| **p == Phase::Break).count() as u32
    }
}

/// Pumps ticks from a source into a shared timer.
pub struct Driver<S> {
    timer: SharedTimer,
    source: S,
    distractions: Option<DistractionSimulator>,
    max_cycles: Option<u32>,
}

impl<S: TickSource> Driver<S> {
    pub fn new(timer: SharedTimer, source: S) -> Self {
        Self {
            timer,
            source,
            distractions: None,
            max_cycles: None,
        }
    }

    pub fn with_distractions(mut self, simulator: DistractionSimulator) -> Self {
        self.distractions = Some(simulator);
        self
    }

    /// Stop the timer after `cycles` full focus+break cycles. Zero means no limit.
    pub fn with_max_cycles(mut self, cycles: u32) -> Self {
        self.max_cycles = (cycles > 0).then_some(cycles);
        self
    }

    /// Drive until the source is exhausted, the cycle limit is reached, or
    /// the timer is stopped from elsewhere. `on_step` runs outside the lock.
    pub async fn run(mut self, mut on_step: impl FnMut(&DriveStep)) -> DriveSummary {
        let mut summary = DriveSummary::default();

        while self.source.next_tick().await {
            summary.ticks += 1;
            let distractions = self.distractions.as_mut();
            let (state, completed, distraction) = self.timer.with(|timer| {
                let completed = timer.tick();
                let distraction = distractions.and_then(|sim| sim.observe(timer));
                if let Some(d) = &distraction {
                    timer.raise_distraction(d.clone());
                }
                (timer.state(), completed, distraction)
            });

            if let Some(phase) = completed.as_ref().and_then(Event::completed_phase) {
                summary.completed.push(phase);
            }
            if distraction.is_some() {
                summary.distractions += 1;
            }

            on_step(&DriveStep {
                tick: summary.ticks,
                state,
                completed,
                distraction,
            });

            if !state.running() {
                debug!(ticks = summary.ticks, "timer idle, driver exiting");
                summary.stopped = true;
                break;
            }
            if self.max_cycles.is_some_and(|max| summary.cycles() >= max) {
                info!(cycles = summary.cycles(), "cycle limit reached");
                self.timer.stop();
                summary.stopped = true;
                break;
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distraction::DistractionConfig;
    use crate::timer::SessionConfig;

    fn started(focus: u64, brk: u64) -> SharedTimer {
        let mut timer = SessionTimer::new();
        timer.start(SessionConfig::new(focus, brk, "test")).unwrap();
        SharedTimer::new(timer)
    }

    #[tokio::test]
    async fn manual_source_drives_phases() {
        let timer = started(3, 2);
        let summary = Driver::new(timer.clone(), ManualSource::new(7))
            .run(|_| {})
            .await;
        assert_eq!(summary.ticks, 7);
        assert_eq!(summary.completed, vec![Phase::Focus, Phase::Break]);
        assert_eq!(summary.cycles(), 1);
        assert!(!summary.stopped);
        let state = timer.state();
        assert_eq!(state.phase(), Phase::Focus);
        assert_eq!(state.remaining_secs(), 1);
    }

    #[tokio::test]
    async fn cycle_limit_stops_timer() {
        let timer = started(2, 1);
        let summary = Driver::new(timer.clone(), ManualSource::new(100))
            .with_max_cycles(2)
            .run(|_| {})
            .await;
        assert_eq!(summary.ticks, 6);
        assert_eq!(summary.cycles(), 2);
        assert!(summary.stopped);
        assert_eq!(timer.state(), SessionState::IDLE);
    }

    #[tokio::test]
    async fn zero_cycle_limit_means_unlimited() {
        let timer = started(2, 1);
        let summary = Driver::new(timer.clone(), ManualSource::new(7))
            .with_max_cycles(0)
            .run(|_| {})
            .await;
        assert_eq!(summary.ticks, 7);
        assert_eq!(summary.cycles(), 2);
        assert!(!summary.stopped);
        assert!(timer.state().running());
    }

    #[tokio::test]
    async fn stop_from_another_context_ends_run() {
        let timer = started(60, 10);
        let handle = timer.clone();
        let summary = Driver::new(timer.clone(), ManualSource::new(100))
            .run(move |step| {
                if step.tick == 2 {
                    handle.stop();
                }
            })
            .await;
        assert_eq!(summary.ticks, 3);
        assert!(summary.stopped);
        assert!(!timer.state().running());
    }

    #[tokio::test]
    async fn paused_ticks_are_consumed_without_effect() {
        let timer = started(5, 5);
        timer.toggle_pause();
        let summary = Driver::new(timer.clone(), ManualSource::new(20))
            .run(|step| assert!(step.completed.is_none()))
            .await;
        assert_eq!(summary.ticks, 20);
        assert_eq!(timer.state().remaining_secs(), 5);
        assert!(timer.state().paused());
    }

    #[tokio::test]
    async fn driver_raises_distractions_into_timer() {
        let timer = started(10, 5);
        let sim = DistractionSimulator::new(DistractionConfig {
            enabled: true,
            probability: 1.0,
            check_interval_secs: 2,
            seed: Some(1),
        });
        let summary = Driver::new(timer.clone(), ManualSource::new(4))
            .with_distractions(sim)
            .run(|_| {})
            .await;
        assert_eq!(summary.distractions, 1);
        let pending = timer.with(|t| t.pending_distraction().cloned());
        assert_eq!(pending.map(|d| d.remaining_secs), Some(8));
    }

    #[tokio::test(start_paused = true)]
    async fn interval_source_ticks_on_period() {
        let timer = started(3, 1);
        let begin = tokio::time::Instant::now();
        let mut source = IntervalSource::new(Duration::from_millis(250));
        for _ in 0..3 {
            assert!(source.next_tick().await);
            timer.with(|t| t.tick());
        }
        assert_eq!(begin.elapsed(), Duration::from_millis(750));
        assert_eq!(timer.state().phase(), Phase::Break);
    }
}
