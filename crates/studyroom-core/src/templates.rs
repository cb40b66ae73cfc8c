//! Study session templates.
//!
//! A template is a named preset that produces a [`SessionConfig`]. The
//! built-in set is used when the configuration file does not list its own.

use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::timer::SessionConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionKind {
    Pomodoro,
    DeepWork,
    Review,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTemplate {
    pub id: String,
    pub kind: SessionKind,
    /// Focus duration in minutes.
    pub focus_min: u64,
    /// Break duration in minutes.
    pub break_min: u64,
    pub subject: String,
}

impl SessionTemplate {
    pub fn new(
        id: impl Into<String>,
        kind: SessionKind,
        focus_min: u64,
        break_min: u64,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            focus_min,
            break_min,
            subject: subject.into(),
        }
    }

    /// Convert to a validated timer config labelled with the subject.
    pub fn to_config(&self) -> Result<SessionConfig, SessionError> {
        let config = SessionConfig::from_minutes(self.focus_min, self.break_min, &self.subject);
        config.validate()?;
        Ok(config)
    }
}

/// The stock templates: pomodoro, deep work, review.
pub fn builtin_templates() -> Vec<SessionTemplate> {
    vec![
        SessionTemplate::new("pomodoro", SessionKind::Pomodoro, 25, 5, "Computer Science"),
        SessionTemplate::new("deep-work", SessionKind::DeepWork, 90, 15, "History Research"),
        SessionTemplate::new("review", SessionKind::Review, 45, 10, "Math Problems"),
    ]
}

/// Look up a template by id.
pub fn find_template<'a>(
    templates: &'a [SessionTemplate],
    id: &str,
) -> Result<&'a SessionTemplate, SessionError> {
    templates
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(|| SessionError::UnknownTemplate(id.to_string()))
}
