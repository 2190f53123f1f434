use thiserror::Error;

/// Errors surfaced to the user by the controller.
///
/// Every variant is recoverable; the controller shows it as a notification and
/// keeps its state consistent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Required input was empty.
    #[error("{0}")]
    Validation(String),
    /// The action needs an active session.
    #[error("{0}")]
    State(String),
    /// The request could not be sent or the server rejected it.
    #[error("{0}")]
    Network(String),
}

/// Failures from a [`crate::backend::TeachingBackend`] call.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Invalid service URL: {0}")]
    InvalidUrl(String),
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Server returned status {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    Status { status: u16, message: Option<String> },
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl BackendError {
    /// Message to show the user: the server's own error text when it sent one.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            BackendError::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}
