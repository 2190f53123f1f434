//! Session View Controller
//!
//! Drives a teaching session from the client side: validates input, calls the
//! teaching service, and pushes the results into a [`SessionView`]. The
//! controller is an owned value; hosts construct it with a view, a backend and
//! an [`EventMap`] and feed it [`UiEvent`]s.

use crate::{
    backend::TeachingBackend,
    bindings::{EventMap, UiAction, UiEvent},
    error::SessionError,
    session::{Message, SessionStats, Transcript, ViewState},
    view::{DEFAULT_NOTIFICATION_TTL, Notification, NotificationKind, SessionView},
};
use std::time::Duration;
use tracing::{debug, error, info, instrument, trace};

const EMPTY_TOPIC: &str = "Please enter a topic to teach";
const EMPTY_EXPLANATION: &str = "Please enter an explanation";
const NO_ACTIVE_SESSION: &str = "Please start a teaching session first";
const START_FAILED: &str = "Failed to start teaching session";
const STEP_FAILED: &str = "Failed to process teaching step";
const RESET_FAILED: &str = "Failed to reset session";
const RESET_DONE: &str = "Session reset successfully";

/// A session the server has confirmed.
#[derive(Debug, Clone)]
struct ActiveSession {
    topic: String,
}

pub struct SessionViewController<V, B> {
    view: V,
    backend: B,
    bindings: EventMap,
    /// `Some` exactly while the teaching view is shown.
    session: Option<ActiveSession>,
    transcript: Transcript,
    stats: SessionStats,
    topic_input: String,
    teaching_input: String,
    notification_ttl: Duration,
}

impl<V, B> SessionViewController<V, B>
where
    V: SessionView,
    B: TeachingBackend,
{
    pub fn new(view: V, backend: B, bindings: EventMap) -> Self {
        Self {
            view,
            backend,
            bindings,
            session: None,
            transcript: Transcript::new(),
            stats: SessionStats::default(),
            topic_input: String::new(),
            teaching_input: String::new(),
            notification_ttl: DEFAULT_NOTIFICATION_TTL,
        }
    }

    /// Overrides how long notifications stay visible.
    pub fn with_notification_ttl(mut self, ttl: Duration) -> Self {
        self.notification_ttl = ttl;
        self
    }

    pub fn view_state(&self) -> ViewState {
        if self.session.is_some() {
            ViewState::Teaching
        } else {
            ViewState::Welcome
        }
    }

    pub fn is_session_active(&self) -> bool {
        self.session.is_some()
    }

    /// Topic of the active session, as confirmed by the server.
    pub fn topic(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.topic.as_str())
    }

    pub fn messages(&self) -> &[Message] {
        self.transcript.messages()
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn topic_input(&self) -> &str {
        &self.topic_input
    }

    pub fn teaching_input(&self) -> &str {
        &self.teaching_input
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Re-renders the current screen and stats.
    pub fn refresh(&mut self) {
        self.view.show_view(self.view_state());
        self.view.render_stats(&self.stats);
    }

    /// Resolves `event` through the bindings and runs the bound action.
    ///
    /// Unbound events are ignored. Errors have already been shown to the user
    /// when they are returned here.
    pub async fn handle(&mut self, event: UiEvent) -> Result<(), SessionError> {
        let Some(action) = self.bindings.resolve(&event) else {
            trace!(?event, "Ignoring unbound UI event");
            return Ok(());
        };
        debug!(?action, "Dispatching UI action");

        let payload = event.payload().unwrap_or_default().to_string();
        match action {
            UiAction::StartSession => {
                let topic = self.topic_input.clone();
                self.start_session(&topic).await
            }
            UiAction::SubmitExplanation => {
                let text = self.teaching_input.clone();
                self.submit_explanation(&text).await
            }
            UiAction::ResetSession => self.reset_session().await,
            UiAction::ReturnToWelcome => {
                self.return_to_welcome();
                Ok(())
            }
            UiAction::NewTopic => {
                self.new_topic();
                Ok(())
            }
            UiAction::QuickTopic => self.select_quick_topic(&payload).await,
            UiAction::SuggestedTopic => {
                self.select_suggested_topic(&payload);
                Ok(())
            }
            UiAction::TopicInputChanged => {
                self.topic_input = payload;
                Ok(())
            }
            UiAction::TeachingInputChanged => {
                self.set_teaching_input(payload);
                Ok(())
            }
        }
    }

    /// Asks the service to open a session on `topic`.
    ///
    /// On success the teaching view is shown with the learner's opening
    /// message. On failure nothing changes apart from an error notification.
    #[instrument(skip(self))]
    pub async fn start_session(&mut self, topic: &str) -> Result<(), SessionError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(self.surface(SessionError::Validation(EMPTY_TOPIC.to_string())));
        }

        info!("Starting teaching session");
        self.view.set_loading(true);
        let result = self.backend.start_teaching(topic).await;
        self.view.set_loading(false);

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Failed to start teaching session");
                return Err(self.surface(SessionError::Network(e.user_message(START_FAILED))));
            }
        };

        let confirmed_topic = response
            .topic
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| topic.to_string());
        self.session = Some(ActiveSession {
            topic: confirmed_topic,
        });

        self.transcript.clear();
        self.view.clear_messages();
        self.stats = SessionStats::default();
        if let Some(level) = response.confusion_level {
            self.stats.confusion_level = level;
        }
        self.topic_input.clear();
        self.view.clear_topic_input();
        self.view.show_view(ViewState::Teaching);
        self.view.render_stats(&self.stats);
        self.push_message(Message::assistant(response.ai_response));
        Ok(())
    }

    /// Sends one explanation to the learner.
    ///
    /// The user's message is shown before the server answers and stays in the
    /// transcript even if the request fails.
    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    pub async fn submit_explanation(&mut self, text: &str) -> Result<(), SessionError> {
        if self.session.is_none() {
            return Err(self.surface(SessionError::State(NO_ACTIVE_SESSION.to_string())));
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(self.surface(SessionError::Validation(EMPTY_EXPLANATION.to_string())));
        }

        self.push_message(Message::user(text));
        self.set_teaching_input(String::new());
        self.view.clear_teaching_input();

        self.view.show_typing();
        let result = self.backend.teach_step(text).await;
        self.view.hide_typing();

        match result {
            Ok(response) => {
                self.stats = SessionStats::from_step(&response);
                info!(
                    exchanges = self.stats.exchanges_count,
                    quality = self.stats.quality_score,
                    level = self.stats.confusion_level,
                    "Teaching step completed"
                );
                self.view.render_stats(&self.stats);
                self.push_message(Message::assistant(response.ai_response));
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Teaching step failed");
                Err(self.surface(SessionError::Network(e.user_message(STEP_FAILED))))
            }
        }
    }

    /// Clears the conversation on both sides while staying in the teaching view.
    ///
    /// Does nothing when no session is active.
    #[instrument(skip(self))]
    pub async fn reset_session(&mut self) -> Result<(), SessionError> {
        if self.session.is_none() {
            debug!("Reset requested without an active session; ignoring");
            return Ok(());
        }

        match self.backend.reset_session().await {
            Ok(response) => {
                info!("Session reset");
                self.transcript.clear();
                self.view.clear_messages();
                self.stats = SessionStats::default();
                self.view.render_stats(&self.stats);
                let message = response
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| RESET_DONE.to_string());
                self.notify(NotificationKind::Success, message);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to reset session");
                Err(self.surface(SessionError::Network(e.user_message(RESET_FAILED))))
            }
        }
    }

    /// Leaves the teaching view. Safe to call repeatedly.
    pub fn return_to_welcome(&mut self) {
        if let Some(session) = self.session.take() {
            info!(topic = %session.topic, "Returning to welcome screen");
        }
        self.transcript.clear();
        self.view.clear_messages();
        self.stats = SessionStats::default();
        self.set_teaching_input(String::new());
        self.view.clear_teaching_input();
        self.view.show_view(ViewState::Welcome);
    }

    /// Returns to the welcome screen with an empty topic field.
    pub fn new_topic(&mut self) {
        self.return_to_welcome();
        self.topic_input.clear();
        self.view.clear_topic_input();
    }

    /// Fills in the topic from a quick-start card and starts right away.
    pub async fn select_quick_topic(&mut self, topic: &str) -> Result<(), SessionError> {
        self.fill_topic(topic);
        self.start_session(topic).await
    }

    /// Fills in the topic from a suggestion card; the user still has to start.
    pub fn select_suggested_topic(&mut self, topic: &str) {
        self.fill_topic(topic);
    }

    fn fill_topic(&mut self, topic: &str) {
        self.topic_input = topic.to_string();
        self.view.set_topic_input(topic);
    }

    fn set_teaching_input(&mut self, value: String) {
        self.view.update_char_count(value.chars().count());
        self.teaching_input = value;
    }

    fn push_message(&mut self, message: Message) {
        let message = self.transcript.push(message);
        self.view.append_message(message);
    }

    fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) {
        self.view
            .notify(Notification::new(kind, message, self.notification_ttl));
    }

    /// Shows `err` to the user and hands it back for the caller to return.
    fn surface(&mut self, err: SessionError) -> SessionError {
        self.notify(NotificationKind::Error, err.to_string());
        err
    }
}
