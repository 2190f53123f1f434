//! Session data model: view state, transcript messages, and learner statistics.

use crate::protocol::{StepResponse, Trend};
use chrono::{DateTime, Utc};
use std::fmt;

/// Which screen is currently presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Welcome,
    Teaching,
}

/// Author of a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single transcript entry. Fields are read-only once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    role: Role,
    text: String,
    timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Ordered, append-only list of messages for the current session.
///
/// Entries can be appended or the whole list cleared; existing entries are
/// never handed out mutably.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Confusion level the teaching service starts every session at.
pub const INITIAL_CONFUSION_LEVEL: u32 = 1;

/// Learner statistics as last reported by the server.
///
/// Replaced wholesale on every step response; the client never accumulates its
/// own counts.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStats {
    pub quality_score: f64,
    pub confusion_level: u32,
    pub exchanges_count: u32,
    pub average_quality: f64,
    pub improvement_trend: Trend,
    pub correction_mode: bool,
    pub corrections_made: u32,
}

impl Default for SessionStats {
    fn default() -> Self {
        Self {
            quality_score: 0.0,
            confusion_level: INITIAL_CONFUSION_LEVEL,
            exchanges_count: 0,
            average_quality: 0.0,
            improvement_trend: Trend::Neutral,
            correction_mode: false,
            corrections_made: 0,
        }
    }
}

impl SessionStats {
    /// Builds the stats snapshot carried by a step response.
    pub fn from_step(response: &StepResponse) -> Self {
        let progress = &response.session_progress;
        Self {
            quality_score: response.quality_score,
            confusion_level: progress.confusion_level,
            exchanges_count: response.exchanges_count,
            average_quality: progress.average_quality,
            improvement_trend: progress.improvement_trend,
            correction_mode: progress.correction_mode,
            corrections_made: progress.corrections_made,
        }
    }

    /// Average quality as a whole percentage, clamped to 0..=100.
    pub fn user_score(&self) -> u32 {
        (self.average_quality.clamp(0.0, 1.0) * 100.0).round() as u32
    }
}
