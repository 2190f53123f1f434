//! Mapping from UI events to controller actions.
//!
//! The controller never looks widgets up by itself. Whatever hosts it turns raw
//! input into [`UiEvent`]s, and an [`EventMap`] supplied at construction decides
//! which [`UiAction`] each one triggers.

use std::collections::HashMap;

/// Identifiers of the standard session page widgets.
pub mod elements {
    pub const TOPIC_INPUT: &str = "topicInput";
    pub const START_BUTTON: &str = "startTeachingBtn";
    pub const TEACHING_INPUT: &str = "teachingInput";
    pub const SEND_BUTTON: &str = "sendBtn";
    pub const BACK_BUTTON: &str = "backBtn";
    pub const RESET_BUTTON: &str = "resetBtn";
    pub const NEW_TOPIC_BUTTON: &str = "newTopicBtn";
    pub const QUICK_TOPIC_CARD: &str = "quickTopic";
    pub const SUGGESTED_TOPIC_CARD: &str = "suggestedTopic";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter { shift: bool },
    Other,
}

/// Something the user did to a widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Click { element: String },
    KeyPress { element: String, key: Key },
    Input { element: String, value: String },
    CardSelected { element: String, topic: String },
}

impl UiEvent {
    pub fn click(element: impl Into<String>) -> Self {
        UiEvent::Click {
            element: element.into(),
        }
    }

    pub fn enter(element: impl Into<String>) -> Self {
        UiEvent::KeyPress {
            element: element.into(),
            key: Key::Enter { shift: false },
        }
    }

    pub fn input(element: impl Into<String>, value: impl Into<String>) -> Self {
        UiEvent::Input {
            element: element.into(),
            value: value.into(),
        }
    }

    pub fn card(element: impl Into<String>, topic: impl Into<String>) -> Self {
        UiEvent::CardSelected {
            element: element.into(),
            topic: topic.into(),
        }
    }

    /// Text carried by the event: the new input value or the card's topic.
    pub fn payload(&self) -> Option<&str> {
        match self {
            UiEvent::Input { value, .. } => Some(value),
            UiEvent::CardSelected { topic, .. } => Some(topic),
            UiEvent::Click { .. } | UiEvent::KeyPress { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiAction {
    StartSession,
    SubmitExplanation,
    ResetSession,
    ReturnToWelcome,
    NewTopic,
    QuickTopic,
    SuggestedTopic,
    TopicInputChanged,
    TeachingInputChanged,
}

/// Explicit bindings from `(event kind, element)` to an action.
#[derive(Debug, Clone, Default)]
pub struct EventMap {
    clicks: HashMap<String, UiAction>,
    enter_keys: HashMap<String, UiAction>,
    inputs: HashMap<String, UiAction>,
    cards: HashMap<String, UiAction>,
}

impl EventMap {
    /// An empty map; every event resolves to `None`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The bindings of the standard session page.
    pub fn standard() -> Self {
        use elements::*;
        Self::empty()
            .on_input(TOPIC_INPUT, UiAction::TopicInputChanged)
            .on_enter(TOPIC_INPUT, UiAction::StartSession)
            .on_click(START_BUTTON, UiAction::StartSession)
            .on_input(TEACHING_INPUT, UiAction::TeachingInputChanged)
            .on_enter(TEACHING_INPUT, UiAction::SubmitExplanation)
            .on_click(SEND_BUTTON, UiAction::SubmitExplanation)
            .on_click(BACK_BUTTON, UiAction::ReturnToWelcome)
            .on_click(RESET_BUTTON, UiAction::ResetSession)
            .on_click(NEW_TOPIC_BUTTON, UiAction::NewTopic)
            .on_card(QUICK_TOPIC_CARD, UiAction::QuickTopic)
            .on_card(SUGGESTED_TOPIC_CARD, UiAction::SuggestedTopic)
    }

    pub fn on_click(mut self, element: impl Into<String>, action: UiAction) -> Self {
        self.clicks.insert(element.into(), action);
        self
    }

    /// Binds Enter (without Shift) on `element`.
    pub fn on_enter(mut self, element: impl Into<String>, action: UiAction) -> Self {
        self.enter_keys.insert(element.into(), action);
        self
    }

    pub fn on_input(mut self, element: impl Into<String>, action: UiAction) -> Self {
        self.inputs.insert(element.into(), action);
        self
    }

    pub fn on_card(mut self, element: impl Into<String>, action: UiAction) -> Self {
        self.cards.insert(element.into(), action);
        self
    }

    pub fn resolve(&self, event: &UiEvent) -> Option<UiAction> {
        match event {
            UiEvent::Click { element } => self.clicks.get(element),
            UiEvent::KeyPress {
                element,
                key: Key::Enter { shift: false },
            } => self.enter_keys.get(element),
            UiEvent::KeyPress { .. } => None,
            UiEvent::Input { element, .. } => self.inputs.get(element),
            UiEvent::CardSelected { element, .. } => self.cards.get(element),
        }
        .copied()
    }
}
