//! Renders the session view as plain text lines.

use crate::input::{QUICK_TOPICS, SUGGESTED_TOPICS};
use chrono::Local;
use std::fmt;
use std::io::Write;
use teachback_core::{
    Message, Notification, NotificationKind, Role, SessionStats, SessionView, ViewState,
    protocol::Trend,
};
use tracing::warn;

/// A [`SessionView`] that prints to any writer, normally stdout.
pub struct TerminalView<W: Write> {
    out: W,
    topic_input: String,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            topic_input: String::new(),
        }
    }

    /// Prints the input prompt for `view`.
    pub fn prompt(&mut self, view: ViewState) {
        match view {
            ViewState::Welcome if !self.topic_input.is_empty() => {
                let topic = self.topic_input.clone();
                self.write(format_args!("topic [{}]> ", topic));
            }
            ViewState::Welcome => self.write(format_args!("topic> ")),
            ViewState::Teaching => self.write(format_args!("teach> ")),
        }
        if let Err(e) = self.out.flush() {
            warn!(error = %e, "Failed to flush terminal output");
        }
    }

    /// Prints a free-form line, e.g. help text.
    pub fn print(&mut self, text: &str) {
        self.line(format_args!("{}", text));
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, args: fmt::Arguments<'_>) {
        if let Err(e) = self.out.write_fmt(args) {
            warn!(error = %e, "Failed to write to terminal");
        }
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        self.write(args);
        self.write(format_args!("\n"));
    }

    fn welcome_banner(&mut self) {
        self.line(format_args!("=== Teachback: learn by teaching ==="));
        self.line(format_args!("Type a topic you want to teach, or pick one:"));
        for (i, topic) in QUICK_TOPICS.iter().enumerate() {
            self.line(format_args!("  /quick {}  {}", i + 1, topic));
        }
        self.line(format_args!(
            "Suggestions (/suggest <text>): {}",
            SUGGESTED_TOPICS.join(", ")
        ));
    }
}

fn trend_label(trend: Trend) -> &'static str {
    match trend {
        Trend::Neutral => "neutral",
        Trend::Improving => "improving",
        Trend::Stable => "stable",
        Trend::Declining => "declining",
    }
}

impl<W: Write> SessionView for TerminalView<W> {
    fn show_view(&mut self, view: ViewState) {
        match view {
            ViewState::Welcome => self.welcome_banner(),
            ViewState::Teaching => {
                self.line(format_args!("=== Teaching session ==="));
                self.line(format_args!(
                    "Explain the topic to your student. /reset, /back, /new, /help"
                ));
            }
        }
    }

    fn set_loading(&mut self, loading: bool) {
        if loading {
            self.line(format_args!("... starting session"));
        }
    }

    fn append_message(&mut self, message: &Message) {
        let who = match message.role() {
            Role::User => "You",
            Role::Assistant => "Student",
        };
        let time = message.timestamp().with_timezone(&Local).format("%H:%M");
        self.line(format_args!("[{}] {}: {}", time, who, message.text()));
    }

    fn clear_messages(&mut self) {}

    fn show_typing(&mut self) {
        self.line(format_args!("Student is typing..."));
    }

    fn hide_typing(&mut self) {}

    fn render_stats(&mut self, stats: &SessionStats) {
        let mut summary = format!(
            "quality {:.0}% | level {} | exchanges {} | score {}",
            stats.quality_score * 100.0,
            stats.confusion_level,
            stats.exchanges_count,
            stats.user_score()
        );
        if stats.improvement_trend != Trend::Neutral {
            summary.push_str(&format!(" | {}", trend_label(stats.improvement_trend)));
        }
        if stats.correction_mode {
            summary.push_str(&format!(
                " | correcting ({} so far)",
                stats.corrections_made
            ));
        }
        self.line(format_args!("{}", summary));
    }

    fn set_topic_input(&mut self, topic: &str) {
        self.topic_input = topic.to_string();
        self.line(format_args!("Topic: {}", topic));
    }

    fn clear_topic_input(&mut self) {
        self.topic_input.clear();
    }

    // Lines are submitted whole, so there is no live input to clear or count.
    fn clear_teaching_input(&mut self) {}

    fn update_char_count(&mut self, _count: usize) {}

    fn notify(&mut self, notification: Notification) {
        // Lines scroll away on their own; the ttl has no terminal equivalent.
        let tag = match notification.kind {
            NotificationKind::Info => "info",
            NotificationKind::Success => "ok",
            NotificationKind::Error => "error",
        };
        self.line(format_args!("[{}] {}", tag, notification.message));
    }
}
