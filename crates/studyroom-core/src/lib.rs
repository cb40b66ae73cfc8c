//! # Studyroom Core Library
//!
//! Core logic for the Studyroom study-session companion. The CLI binary is a
//! thin host over this library: it owns the clock and the terminal, while
//! everything with rules lives here.
//!
//! ## Architecture
//!
//! - **Session timer**: a tick-driven focus/break state machine. The caller
//!   delivers one `tick()` per second; the timer never reads the wall clock
//! - **Clock**: injectable tick sources and a driver that serializes all
//!   timer access behind one lock
//! - **Distractions**: seeded simulator of focus interruptions
//! - **Streaks**: habit streak levels, milestones and activity maps
//! - **Notifications**: phase-complete messages rendered from templates
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`SessionTimer`]: Core timer state machine
//! - [`Driver`]: Pumps a [`TickSource`] into a [`SharedTimer`]
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod distraction;
pub mod error;
pub mod events;
pub mod notify;
pub mod stats;
pub mod storage;
pub mod streak;
pub mod templates;
pub mod timer;

pub use clock::{Driver, DriveStep, DriveSummary, IntervalSource, ManualSource, SharedTimer, TickSource};
pub use distraction::{Distraction, DistractionConfig, DistractionKind, DistractionSimulator, Resolution};
pub use error::{ConfigError, CoreError, SessionError};
pub use events::Event;
pub use notify::{Notification, NotificationStyle, NotificationTemplate, Notifier};
pub use stats::SessionStats;
pub use storage::Config;
pub use streak::{ActivityMap, Habit, HabitCategory, StreakLevel, StreakMilestone};
pub use templates::{builtin_templates, SessionKind, SessionTemplate};
pub use timer::{Phase, SessionConfig, SessionState, SessionTimer, SubscriptionId};
