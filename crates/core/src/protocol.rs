//! Defines the JSON request and response bodies exchanged with the teaching service.

use serde::{Deserialize, Serialize};

/// Body of the `start` request.
#[derive(Serialize, Debug)]
pub struct StartRequest<'a> {
    pub topic: &'a str,
}

/// Body of the `step` request.
#[derive(Serialize, Debug)]
pub struct StepRequest<'a> {
    pub explanation: &'a str,
}

/// Successful reply to `start`: the learner's opening message.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct StartResponse {
    pub ai_response: String,
    #[serde(default)]
    pub session_started: bool,
    /// The topic as the server recorded it (trimmed).
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub confusion_level: Option<u32>,
}

/// Successful reply to `step`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct StepResponse {
    pub ai_response: String,
    pub quality_score: f64,
    pub exchanges_count: u32,
    pub session_progress: SessionProgress,
}

/// Whether recent explanations score better or worse than earlier ones.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    #[default]
    Neutral,
    Improving,
    Stable,
    Declining,
}

/// Server-side progress summary attached to each step response.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SessionProgress {
    pub confusion_level: u32,
    pub average_quality: f64,
    #[serde(default)]
    pub improvement_trend: Trend,
    #[serde(default)]
    pub correction_mode: bool,
    #[serde(default)]
    pub corrections_made: u32,
    #[serde(default)]
    pub latest_score: Option<f64>,
    /// Minutes since the session started.
    #[serde(default)]
    pub session_duration: f64,
    #[serde(default)]
    pub exchanges: u32,
}

impl Default for SessionProgress {
    fn default() -> Self {
        Self {
            confusion_level: crate::session::INITIAL_CONFUSION_LEVEL,
            average_quality: 0.0,
            improvement_trend: Trend::Neutral,
            correction_mode: false,
            corrections_made: 0,
            latest_score: None,
            session_duration: 0.0,
            exchanges: 0,
        }
    }
}

/// Successful reply to `reset`. Both fields are informational.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ResetResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body carried by non-2xx replies.
#[derive(Deserialize, Debug, Clone)]
pub struct ErrorResponse {
    pub error: String,
}
