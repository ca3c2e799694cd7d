//! Voice-skill surface: request model, handlers, and first-match dispatch.

pub mod dispatcher;
pub mod envelope;
pub mod handlers;
pub mod router;

use std::collections::BTreeMap;

use crate::deals::{DataFormatError, DealQueryError, DealsError};

pub use dispatcher::{SkillDispatcher, APOLOGY};
pub use envelope::{RequestEnvelope, ResponseEnvelope};
pub use handlers::RequestHandler;
pub use router::skill_router;

/// Incoming request as the skill sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillRequest {
    Launch,
    Intent(IntentRequest),
    SessionEnded,
    /// A request type the skill has no handler for, kept by name for logging.
    Other(String),
}

impl SkillRequest {
    pub fn intent(name: impl Into<String>) -> Self {
        SkillRequest::Intent(IntentRequest::new(name))
    }

    pub fn type_name(&self) -> &str {
        match self {
            SkillRequest::Launch => "LaunchRequest",
            SkillRequest::Intent(_) => "IntentRequest",
            SkillRequest::SessionEnded => "SessionEndedRequest",
            SkillRequest::Other(kind) => kind.as_str(),
        }
    }

    pub fn intent_name(&self) -> Option<&str> {
        match self {
            SkillRequest::Intent(intent) => Some(intent.name.as_str()),
            _ => None,
        }
    }

    pub(crate) fn is_intent(&self, name: &str) -> bool {
        self.intent_name() == Some(name)
    }
}

/// Intent name plus the slot values the platform resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentRequest {
    pub name: String,
    pub slots: BTreeMap<String, String>,
}

impl IntentRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slots: BTreeMap::new(),
        }
    }

    pub fn with_slot(mut self, slot: impl Into<String>, value: impl Into<String>) -> Self {
        self.slots.insert(slot.into(), value.into());
        self
    }

    pub fn slot(&self, slot: &str) -> Option<&str> {
        self.slots.get(slot).map(String::as_str)
    }
}

impl From<IntentRequest> for SkillRequest {
    fn from(value: IntentRequest) -> Self {
        SkillRequest::Intent(value)
    }
}

/// What the skill says back. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpokenResponse {
    pub speech: Option<String>,
    pub reprompt: Option<String>,
    pub should_end_session: Option<bool>,
}

impl SpokenResponse {
    /// Speak and close the session.
    pub fn tell(speech: impl Into<String>) -> Self {
        Self {
            speech: Some(speech.into()),
            reprompt: None,
            should_end_session: Some(true),
        }
    }

    /// Speak and keep listening; `reprompt` plays if the user stays silent.
    pub fn ask(speech: impl Into<String>, reprompt: impl Into<String>) -> Self {
        Self {
            speech: Some(speech.into()),
            reprompt: Some(reprompt.into()),
            should_end_session: Some(false),
        }
    }

    /// No output at all; used when the platform is already closing the session.
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn keeps_session_open(&self) -> bool {
        self.should_end_session == Some(false)
    }
}

/// Anything that can go wrong inside a handler.
#[derive(Debug, thiserror::Error)]
pub enum SkillError {
    #[error("could not retrieve deals: {0}")]
    Retrieval(String),
    #[error("could not parse deals: {0}")]
    Parse(String),
    #[error(transparent)]
    DataFormat(#[from] DataFormatError),
    #[error("slot '{slot}' {reason}")]
    SlotValidation { slot: &'static str, reason: String },
    #[error("no handler accepts {request_type}")]
    Unhandled { request_type: String },
}

impl From<DealsError> for SkillError {
    fn from(value: DealsError) -> Self {
        match value {
            DealsError::Retrieval(detail) => SkillError::Retrieval(detail),
            DealsError::Parse(detail) => SkillError::Parse(detail),
        }
    }
}

impl From<DealQueryError> for SkillError {
    fn from(value: DealQueryError) -> Self {
        match value {
            DealQueryError::Source(err) => err.into(),
            DealQueryError::DataFormat(err) => err.into(),
        }
    }
}
