//! Notification preview commands for CLI.

use std::collections::BTreeMap;

use chrono::Utc;
use clap::Subcommand;
use studyroom_core::notify::NotificationKind;
use studyroom_core::{Config, Event, NotificationStyle, NotificationTemplate, Notifier, Phase};

#[derive(Subcommand)]
pub enum NotifyAction {
    /// Show the notification sent when a phase completes
    Preview {
        /// standard, messaging or snappy (defaults to the configured style)
        #[arg(long)]
        style: Option<NotificationStyle>,
        /// Leave emoji out
        #[arg(long)]
        no_emoji: bool,
        /// Phase that just completed
        #[arg(long, default_value = "focus", value_parser = ["focus", "break"])]
        phase: String,
        /// Subject label
        #[arg(long, default_value = "Computer Science")]
        label: String,
        /// Focus length in minutes
        #[arg(long, default_value = "25")]
        focus_min: u64,
        /// Break length in minutes
        #[arg(long, default_value = "5")]
        break_min: u64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render an arbitrary `{{placeholder}}` message
    Render {
        /// Message template
        #[arg(long)]
        message: String,
        /// Variable as key=value (repeatable)
        #[arg(long = "var", value_name = "KEY=VALUE")]
        vars: Vec<String>,
        /// Style to wrap the rendered message in
        #[arg(long, default_value = "standard")]
        style: NotificationStyle,
        /// Leave emoji out
        #[arg(long)]
        no_emoji: bool,
    },
}

fn parse_var(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))
}

pub fn run(action: NotifyAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        NotifyAction::Preview {
            style,
            no_emoji,
            phase,
            label,
            focus_min,
            break_min,
            json,
        } => {
            let config = Config::load()?;
            let style = style.unwrap_or(config.notifications.style);
            let emoji = config.notifications.emoji && !no_emoji;

            let (phase, duration_min, next_min) = match phase.as_str() {
                "break" => (Phase::Break, break_min, focus_min),
                _ => (Phase::Focus, focus_min, break_min),
            };
            let event = Event::PhaseComplete {
                phase,
                label,
                duration_secs: duration_min.saturating_mul(60),
                next_duration_secs: next_min.saturating_mul(60),
                at: Utc::now(),
            };
            let notifier = Notifier::new(style, emoji);
            let Some(note) = notifier.notification_for(&event) else {
                return Err("no notification for this event".into());
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&note)?);
            } else {
                println!("{}", note.title);
                println!("{}", note.body);
            }
        }
        NotifyAction::Render {
            message,
            vars,
            style,
            no_emoji,
        } => {
            let extra = vars
                .iter()
                .map(|raw| parse_var(raw))
                .collect::<Result<BTreeMap<_, _>, _>>()?;
            let template = NotificationTemplate::new("", message, NotificationKind::Reminder);
            println!("{}", style.wrap(&template.render_with(&extra), !no_emoji));
        }
    }
    Ok(())
}
