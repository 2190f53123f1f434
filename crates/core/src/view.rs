//! The rendering surface the controller drives.
//!
//! A [`SessionView`] stands in for the page: it owns the widgets (inputs,
//! message list, stat readouts) and the controller tells it what to show.

use crate::session::{Message, SessionStats, ViewState};
use std::time::Duration;

/// How long a notification stays visible unless configured otherwise.
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

/// A transient message. The view dismisses it once `ttl` has elapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub ttl: Duration,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>, ttl: Duration) -> Self {
        Self {
            kind,
            message: message.into(),
            ttl,
        }
    }
}

pub trait SessionView {
    /// Switches the visible screen.
    fn show_view(&mut self, view: ViewState);

    /// Shows or hides the blocking loading indicator around `start`.
    fn set_loading(&mut self, loading: bool);

    fn append_message(&mut self, message: &Message);

    fn clear_messages(&mut self);

    /// Shows the placeholder that stands in for the learner's pending reply.
    fn show_typing(&mut self);

    fn hide_typing(&mut self);

    fn render_stats(&mut self, stats: &SessionStats);

    fn set_topic_input(&mut self, topic: &str);

    fn clear_topic_input(&mut self);

    fn clear_teaching_input(&mut self);

    /// Updates the character counter under the teaching input.
    fn update_char_count(&mut self, count: usize);

    fn notify(&mut self, notification: Notification);
}
