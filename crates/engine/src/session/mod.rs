mod dialogue;
mod history;
mod tribunal;

use thiserror::Error;

pub use dialogue::{fallback_reply, greeting_for, DialogueExchange, DialogueRole, DialogueTurn};
pub use history::{normalize_history, HistoryLine, RawHistoryLine};
pub use tribunal::{SessionError, TribunalAction, TribunalSession};

/// Locally-rejected input. No port call is made and no state is mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("player input must not be empty")]
    EmptyPlayerInput,
    #[error("unknown speaker '{0}' for this event")]
    UnknownSpeaker(String),
}
