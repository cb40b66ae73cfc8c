//! Habit streak tracking.
//!
//! A habit is toggled done/undone for today. Streaks climb through levels
//! every seven days, and completions that land on a multiple of seven are
//! reported as milestones. The 30-day activity map is cosmetic history and
//! is drawn from a caller-supplied rng so it can be seeded.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

/// Days per streak level.
pub const LEVEL_SPAN_DAYS: u32 = 7;

/// Days shown by the activity map, today included.
pub const ACTIVITY_WINDOW_DAYS: usize = 30;

/// Chance that a past day in the activity map counts as completed.
const PAST_COMPLETION_RATE: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitCategory {
    Academic,
    Personal,
    Spiritual,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    pub category: HabitCategory,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub completed_today: bool,
}

/// A completion that landed on a multiple of [`LEVEL_SPAN_DAYS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakMilestone {
    pub habit_id: String,
    pub streak: u32,
    pub level: StreakLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakLevel {
    Starting,
    Beginner,
    Intermediate,
    Advanced,
    Expert,
    Master,
}

impl StreakLevel {
    pub fn from_streak(streak: u32) -> Self {
        match streak {
            30.. => StreakLevel::Master,
            21.. => StreakLevel::Expert,
            14.. => StreakLevel::Advanced,
            7.. => StreakLevel::Intermediate,
            3.. => StreakLevel::Beginner,
            _ => StreakLevel::Starting,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StreakLevel::Starting => "Starting",
            StreakLevel::Beginner => "Beginner",
            StreakLevel::Intermediate => "Intermediate",
            StreakLevel::Advanced => "Advanced",
            StreakLevel::Expert => "Expert",
            StreakLevel::Master => "Master",
        }
    }
}

impl Habit {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: HabitCategory) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            current_streak: 0,
            longest_streak: 0,
            completed_today: false,
        }
    }

    /// Mark today done, or undo today's completion.
    ///
    /// Undoing never drops the streak below zero and never lowers the
    /// longest streak.
    pub fn toggle_completion(&mut self) -> Option<StreakMilestone> {
        let was_completed = self.completed_today;
        self.current_streak = if was_completed {
            self.current_streak.saturating_sub(1)
        } else {
            self.current_streak.saturating_add(1)
        };
        self.longest_streak = self.longest_streak.max(self.current_streak);
        self.completed_today = !was_completed;

        if !was_completed && self.current_streak > 0 && self.current_streak % LEVEL_SPAN_DAYS == 0 {
            return Some(StreakMilestone {
                habit_id: self.id.clone(),
                streak: self.current_streak,
                level: self.level(),
            });
        }
        None
    }

    pub fn level(&self) -> StreakLevel {
        StreakLevel::from_streak(self.current_streak)
    }

    /// Always 1..=7: a streak sitting on a boundary still needs a full span.
    pub fn days_to_next_level(&self) -> u32 {
        LEVEL_SPAN_DAYS - self.current_streak % LEVEL_SPAN_DAYS
    }

    /// 0..100 progress through the current seven-day span.
    pub fn level_progress_pct(&self) -> f64 {
        (self.current_streak % LEVEL_SPAN_DAYS) as f64 / LEVEL_SPAN_DAYS as f64 * 100.0
    }

    pub fn motivational_message(&self) -> String {
        let streak = self.current_streak;
        let name = &self.name;
        match streak {
            30.. => format!("Incredible! {streak} days of {name}. You're unstoppable!"),
            14.. => format!("Amazing {streak}-day streak with {name}! Keep it up!"),
            7.. => format!("One week of {name} complete! You're building great habits!"),
            3.. => format!("{streak} days of {name}! You're on a roll!"),
            _ => format!("Great start with {name}! Every day counts!"),
        }
    }
}

/// Sum of current streaks and number of habits done today.
pub fn totals(habits: &[Habit]) -> (u32, usize) {
    let days = habits.iter().map(|h| h.current_streak).sum();
    let done = habits.iter().filter(|h| h.completed_today).count();
    (days, done)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDay {
    pub date: NaiveDate,
    pub completed: bool,
}

impl ActivityDay {
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    pub fn day_of_month(&self) -> u32 {
        self.date.day()
    }
}

/// 30 days of simulated activity, oldest first, ending on `today`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityMap {
    pub days: Vec<ActivityDay>,
}

impl ActivityMap {
    /// Today mirrors `habit.completed_today`; earlier days are drawn from `rng`.
    pub fn generate<R: Rng>(habit: &Habit, today: NaiveDate, rng: &mut R) -> Self {
        let days = (0..ACTIVITY_WINDOW_DAYS as i64)
            .rev()
            .map(|offset| {
                let date = today - Duration::days(offset);
                let completed = if offset == 0 {
                    habit.completed_today
                } else {
                    rng.gen::<f64>() < PAST_COMPLETION_RATE
                };
                ActivityDay { date, completed }
            })
            .collect();
        Self { days }
    }

    pub fn seeded(habit: &Habit, today: NaiveDate, seed: u64) -> Self {
        let mut rng = Mcg128Xsl64::seed_from_u64(seed);
        Self::generate(habit, today, &mut rng)
    }

    pub fn completed_days(&self) -> usize {
        self.days.iter().filter(|d| d.completed).count()
    }
}
