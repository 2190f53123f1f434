//! Turns typed lines into UI events.

use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use teachback_core::{UiEvent, ViewState, bindings::elements};

/// Topics offered as one-step quick starts on the welcome screen.
pub const QUICK_TOPICS: &[&str] = &[
    "Photosynthesis",
    "Chess",
    "Democracy",
    "How the internet works",
    "The French Revolution",
];

/// Topics the user can pick to pre-fill the topic field.
pub const SUGGESTED_TOPICS: &[&str] = &[
    "Mitosis",
    "Machine learning",
    "Supply and demand",
    "How vaccines work",
    "The water cycle",
    "Playing the guitar",
    "Black holes",
    "Cooking pasta",
];

/// What a typed line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineCommand {
    Events(Vec<UiEvent>),
    Help,
    Quit,
    /// A command that could not be interpreted; carries the reason.
    Unknown(String),
}

pub const HELP: &str = "\
Welcome screen:
  <topic>          start teaching <topic>
  /quick <n>       start quick topic number <n>
  /suggest <text>  pick the suggested topic closest to <text>
  <enter>          start the topic shown in the prompt
Teaching screen:
  <explanation>    send an explanation
  /reset           clear the conversation
  /back            return to the welcome screen
  /new             pick a new topic
Anywhere:
  /help            show this help
  /quit            exit";

/// Parses one line typed while `view` is shown.
pub fn parse_line(line: &str, view: ViewState) -> LineCommand {
    let line = line.trim();
    if line.is_empty() {
        // Enter on its own confirms whatever topic is already filled in.
        return match view {
            ViewState::Welcome => LineCommand::Events(vec![UiEvent::enter(elements::TOPIC_INPUT)]),
            ViewState::Teaching => LineCommand::Events(Vec::new()),
        };
    }

    let (command, argument) = match line.strip_prefix('/') {
        Some(rest) => {
            let mut parts = rest.splitn(2, char::is_whitespace);
            let command = parts.next().unwrap_or_default();
            (Some(command), parts.next().unwrap_or_default().trim())
        }
        None => (None, line),
    };

    match (command, view) {
        (Some("help"), _) => LineCommand::Help,
        (Some("quit" | "exit"), _) => LineCommand::Quit,
        (Some("quick"), ViewState::Welcome) => quick_topic(argument),
        (Some("suggest"), ViewState::Welcome) => suggested_topic(argument),
        (Some("back"), ViewState::Teaching) => click(elements::BACK_BUTTON),
        (Some("reset"), ViewState::Teaching) => click(elements::RESET_BUTTON),
        (Some("new"), ViewState::Teaching) => click(elements::NEW_TOPIC_BUTTON),
        (Some(other), _) => LineCommand::Unknown(format!("'/{}' is not available here", other)),
        (None, ViewState::Welcome) => LineCommand::Events(vec![
            UiEvent::input(elements::TOPIC_INPUT, argument),
            UiEvent::enter(elements::TOPIC_INPUT),
        ]),
        (None, ViewState::Teaching) => LineCommand::Events(vec![
            UiEvent::input(elements::TEACHING_INPUT, argument),
            UiEvent::click(elements::SEND_BUTTON),
        ]),
    }
}

fn click(element: &str) -> LineCommand {
    LineCommand::Events(vec![UiEvent::click(element)])
}

fn quick_topic(argument: &str) -> LineCommand {
    match argument.parse::<usize>() {
        Ok(n) if (1..=QUICK_TOPICS.len()).contains(&n) => LineCommand::Events(vec![
            UiEvent::card(elements::QUICK_TOPIC_CARD, QUICK_TOPICS[n - 1]),
        ]),
        _ => LineCommand::Unknown(format!(
            "Choose a quick topic between 1 and {}",
            QUICK_TOPICS.len()
        )),
    }
}

fn suggested_topic(argument: &str) -> LineCommand {
    match best_match(argument, SUGGESTED_TOPICS) {
        Some(topic) => LineCommand::Events(vec![UiEvent::card(
            elements::SUGGESTED_TOPIC_CARD,
            topic,
        )]),
        None => LineCommand::Unknown(format!("No suggested topic matches '{}'", argument)),
    }
}

/// The candidate with the highest fuzzy score for `pattern`, if any matches.
pub fn best_match<'a>(pattern: &str, candidates: &[&'a str]) -> Option<&'a str> {
    if pattern.trim().is_empty() {
        return None;
    }
    let matcher = SkimMatcherV2::default().ignore_case();
    candidates
        .iter()
        .filter_map(|candidate| {
            matcher
                .fuzzy_match(candidate, pattern.trim())
                .map(|score| (score, *candidate))
        })
        .max_by_key(|(score, _)| *score)
        .map(|(_, candidate)| candidate)
}
