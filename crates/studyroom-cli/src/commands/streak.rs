//! Habit streak commands for CLI.

use chrono::{Local, Weekday};
use clap::Subcommand;
use serde::Serialize;
use studyroom_core::streak::LEVEL_SPAN_DAYS;
use studyroom_core::{ActivityMap, Habit, HabitCategory, StreakMilestone};

#[derive(Subcommand)]
pub enum StreakAction {
    /// Show level, progress and the 30-day activity map for a habit
    Show {
        /// Habit name
        #[arg(long)]
        name: String,
        /// Category: academic, personal or spiritual
        #[arg(long, default_value = "academic", value_parser = ["academic", "personal", "spiritual"])]
        category: String,
        /// Current streak in days
        #[arg(long, default_value = "0")]
        streak: u32,
        /// Longest streak so far (defaults to the current streak)
        #[arg(long)]
        best: Option<u32>,
        /// Today is already completed
        #[arg(long)]
        done: bool,
        /// Toggle today's completion before showing
        #[arg(long)]
        toggle: bool,
        /// Seed for the activity map
        #[arg(long)]
        seed: Option<u64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct StreakReport {
    habit: Habit,
    level: &'static str,
    days_to_next_level: u32,
    level_progress_pct: f64,
    message: String,
    milestone: Option<StreakMilestone>,
    activity: ActivityMap,
}

fn category(name: &str) -> HabitCategory {
    match name {
        "personal" => HabitCategory::Personal,
        "spiritual" => HabitCategory::Spiritual,
        _ => HabitCategory::Academic,
    }
}

fn weekday_initial(day: Weekday) -> char {
    match day {
        Weekday::Mon => 'M',
        Weekday::Tue | Weekday::Thu => 'T',
        Weekday::Wed => 'W',
        Weekday::Fri => 'F',
        Weekday::Sat | Weekday::Sun => 'S',
    }
}

fn print_activity(activity: &ActivityMap) {
    let header: String = activity
        .days
        .iter()
        .map(|d| weekday_initial(d.weekday()))
        .collect();
    let cells: String = activity
        .days
        .iter()
        .map(|d| if d.completed { '#' } else { '.' })
        .collect();
    println!("  {header}");
    println!("  {cells}");
    println!(
        "  {} of {} days completed",
        activity.completed_days(),
        activity.days.len()
    );
}

#[allow(clippy::too_many_arguments)]
fn show(
    name: String,
    category_name: &str,
    streak: u32,
    best: Option<u32>,
    done: bool,
    toggle: bool,
    seed: Option<u64>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let id = name.to_lowercase().replace(' ', "-");
    let mut habit = Habit::new(id, name, category(category_name));
    habit.current_streak = streak;
    habit.longest_streak = best.unwrap_or(streak).max(streak);
    habit.completed_today = done;

    let milestone = if toggle { habit.toggle_completion() } else { None };

    let today = Local::now().date_naive();
    let activity = match seed {
        Some(seed) => ActivityMap::seeded(&habit, today, seed),
        None => ActivityMap::generate(&habit, today, &mut rand::thread_rng()),
    };

    let report = StreakReport {
        level: habit.level().name(),
        days_to_next_level: habit.days_to_next_level(),
        level_progress_pct: habit.level_progress_pct(),
        message: habit.motivational_message(),
        milestone,
        activity,
        habit,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let habit = &report.habit;
    println!("{} ({} day streak, best {})", habit.name, habit.current_streak, habit.longest_streak);
    println!("Level:      {}", report.level);
    println!(
        "Next level: {} day(s) ({:.0}% of {LEVEL_SPAN_DAYS})",
        report.days_to_next_level, report.level_progress_pct
    );
    println!("Today:      {}", if habit.completed_today { "done" } else { "not yet" });
    if let Some(m) = &report.milestone {
        println!("Milestone!  {} days, {}", m.streak, m.level.name());
    }
    println!("{}", report.message);
    println!();
    println!("Activity through {}:", today.format("%b %-d"));
    print_activity(&report.activity);
    Ok(())
}

pub fn run(action: StreakAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        StreakAction::Show {
            name,
            category,
            streak,
            best,
            done,
            toggle,
            seed,
            json,
        } => show(name, &category, streak, best, done, toggle, seed, json),
    }
}
