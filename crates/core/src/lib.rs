//! Teachback Core
//!
//! Client-side logic for a reverse-teaching session: the user picks a topic and
//! teaches a simulated learner. The [`controller::SessionViewController`] owns the
//! view state and transcript, talks to the teaching service through a
//! [`backend::TeachingBackend`], and renders through a [`view::SessionView`].

pub mod backend;
pub mod bindings;
pub mod controller;
pub mod error;
pub mod protocol;
pub mod session;
pub mod view;

pub use backend::{Endpoints, HttpBackend, TeachingBackend};
pub use bindings::{EventMap, Key, UiAction, UiEvent};
pub use controller::SessionViewController;
pub use error::{BackendError, SessionError};
pub use session::{Message, Role, SessionStats, Transcript, ViewState};
pub use reqwest::Url;
pub use view::{Notification, NotificationKind, SessionView};
