//! Notification rendering for phase completions.
//!
//! Templates carry `{{key}}` placeholders filled from their own variables
//! plus per-event values. A style then wraps the rendered message.

use std::collections::BTreeMap;
use std::sync::mpsc::Sender;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::timer::{Listener, Phase};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("placeholder pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Reminder,
    Achievement,
    Encouragement,
    Milestone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationTemplate {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

impl NotificationTemplate {
    pub fn new(title: impl Into<String>, message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind,
            variables: BTreeMap::new(),
        }
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    /// Fill placeholders from the template's variables. Unknown keys stay verbatim.
    pub fn render(&self) -> String {
        self.render_with(&BTreeMap::new())
    }

    /// Like [`render`](Self::render), with `extra` taking precedence.
    pub fn render_with(&self, extra: &BTreeMap<String, String>) -> String {
        PLACEHOLDER
            .replace_all(&self.message, |caps: &Captures<'_>| {
                let key = &caps[1];
                extra
                    .get(key)
                    .or_else(|| self.variables.get(key))
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStyle {
    /// Plain message.
    #[default]
    Standard,
    /// Chat-like greeting in front of the message.
    Messaging,
    /// Loud, emoji-framed message.
    Snappy,
}

impl NotificationStyle {
    pub fn wrap(&self, message: &str, emoji: bool) -> String {
        match self {
            NotificationStyle::Standard => message.to_string(),
            NotificationStyle::Messaging => {
                let prefix = if emoji { "\u{1F4DA} " } else { "" };
                format!("{prefix}Hey! {message}")
            }
            NotificationStyle::Snappy => {
                if emoji {
                    format!("\u{1F525} {message} \u{2728}")
                } else {
                    message.to_string()
                }
            }
        }
    }
}

impl std::str::FromStr for NotificationStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(NotificationStyle::Standard),
            "messaging" => Ok(NotificationStyle::Messaging),
            "snappy" => Ok(NotificationStyle::Snappy),
            other => Err(format!("unknown notification style: {other}")),
        }
    }
}

/// A rendered, styled notification ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub kind: NotificationKind,
}

/// Turns `PhaseComplete` events into notifications.
#[derive(Debug, Clone)]
pub struct Notifier {
    pub style: NotificationStyle,
    pub emoji: bool,
    pub focus_done: NotificationTemplate,
    pub break_done: NotificationTemplate,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(NotificationStyle::default(), true)
    }
}

impl Notifier {
    pub fn new(style: NotificationStyle, emoji: bool) -> Self {
        Self {
            style,
            emoji,
            focus_done: NotificationTemplate::new(
                "Focus complete",
                "Nice work on {{label}}! Take a {{next_minutes}}-minute break.",
                NotificationKind::Achievement,
            ),
            break_done: NotificationTemplate::new(
                "Break over",
                "Back to {{label}} for {{next_minutes}} minutes.",
                NotificationKind::Reminder,
            ),
        }
    }

    /// `None` for anything other than `PhaseComplete`.
    pub fn notification_for(&self, event: &Event) -> Option<Notification> {
        let Event::PhaseComplete {
            phase,
            label,
            duration_secs,
            next_duration_secs,
            ..
        } = event
        else {
            return None;
        };
        let template = match phase {
            Phase::Focus => &self.focus_done,
            Phase::Break => &self.break_done,
            Phase::Idle => return None,
        };

        let mut vars = BTreeMap::new();
        vars.insert("label".to_string(), label.clone());
        vars.insert("minutes".to_string(), (duration_secs / 60).to_string());
        vars.insert("next_minutes".to_string(), (next_duration_secs / 60).to_string());

        Some(Notification {
            title: template.title.clone(),
            body: self.style.wrap(&template.render_with(&vars), self.emoji),
            kind: template.kind,
        })
    }

    /// A phase-complete listener that forwards notifications to `sink`.
    pub fn into_listener(self, sink: Sender<Notification>) -> Listener {
        Box::new(move |event| {
            if let Some(notification) = self.notification_for(event) {
                // Receiver gone means nobody is displaying; drop silently.
                let _ = sink.send(notification);
            }
        })
    }
}
