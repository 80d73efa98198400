use thiserror::Error;
use tracing::info;

use crate::remote::{TransportError, TribunalActRequest, TribunalEvent, TribunalService};

use super::history::{normalize_history, HistoryLine};
use super::ValidationError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("no tribunal event is loaded")]
    NotLoaded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TribunalAction {
    /// Free-text statement by the player; spoken as the Judge.
    Player { input: String },
    /// Put a specific suspect on the stand.
    Choose { speaker: String },
    /// Let the moderator pick the next speaker.
    Auto,
}

impl TribunalAction {
    fn wire_name(&self) -> &'static str {
        match self {
            Self::Player { .. } => "player",
            Self::Choose { .. } => "choose",
            Self::Auto => "auto",
        }
    }
}

#[derive(Debug, Default)]
enum SessionState {
    #[default]
    Unloaded,
    Loaded {
        event: TribunalEvent,
        history: Vec<HistoryLine>,
    },
}

/// Stateful client of the tribunal service for a single event at a time.
///
/// The server is the single source of truth for the transcript: every
/// successful action replaces the local history wholesale with the normalized
/// server copy. Failures leave the session exactly as it was.
#[derive(Default)]
pub struct TribunalSession {
    state: SessionState,
    open: bool,
    close_callback: Option<Box<dyn FnOnce() + Send>>,
}

impl std::fmt::Debug for TribunalSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TribunalSession")
            .field("state", &self.state)
            .field("open", &self.open)
            .field("has_close_callback", &self.close_callback.is_some())
            .finish()
    }
}

impl TribunalSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, SessionState::Loaded { .. })
    }

    pub fn event(&self) -> Option<&TribunalEvent> {
        match &self.state {
            SessionState::Loaded { event, .. } => Some(event),
            SessionState::Unloaded => None,
        }
    }

    pub fn transcript(&self) -> &[HistoryLine] {
        match &self.state {
            SessionState::Loaded { history, .. } => history,
            SessionState::Unloaded => &[],
        }
    }

    pub fn latest_line(&self) -> Option<&HistoryLine> {
        self.transcript().last()
    }

    /// Loads the event unless it is already the loaded one. On failure the
    /// session keeps its previous state.
    pub fn ensure_event(
        &mut self,
        event_id: &str,
        service: &mut dyn TribunalService,
    ) -> Result<(), SessionError> {
        if let SessionState::Loaded { event, .. } = &self.state {
            if event.id == event_id {
                return Ok(());
            }
        }

        let response = service.fetch_event(event_id)?;
        let history = normalize_history(response.history);
        info!(
            event_id,
            npcs = response.event.npcs.len(),
            lines = history.len(),
            "tribunal_event_loaded"
        );
        self.state = SessionState::Loaded {
            event: response.event,
            history,
        };
        Ok(())
    }

    /// Opens the session for an event; the callback fires exactly once when
    /// the session is closed.
    pub fn open(
        &mut self,
        event_id: &str,
        service: &mut dyn TribunalService,
        on_close: Option<Box<dyn FnOnce() + Send>>,
    ) -> Result<(), SessionError> {
        self.ensure_event(event_id, service)?;
        self.open = true;
        self.close_callback = on_close;
        Ok(())
    }

    /// Closing an already-closed session is a no-op.
    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        if let Some(callback) = self.close_callback.take() {
            callback();
        }
    }

    /// Dispatches one action. Player input and speaker choice are validated
    /// locally before any service call; a failed call leaves the transcript
    /// untouched.
    pub fn act(
        &mut self,
        action: TribunalAction,
        service: &mut dyn TribunalService,
    ) -> Result<(), SessionError> {
        let SessionState::Loaded { event, history } = &mut self.state else {
            return Err(SessionError::NotLoaded);
        };

        let (player_input, speaker) = match &action {
            TribunalAction::Player { input } => {
                let input = input.trim();
                if input.is_empty() {
                    return Err(ValidationError::EmptyPlayerInput.into());
                }
                (Some(input), None)
            }
            TribunalAction::Choose { speaker } => {
                if !event.npcs.iter().any(|npc| npc == speaker) {
                    return Err(ValidationError::UnknownSpeaker(speaker.clone()).into());
                }
                (None, Some(speaker.as_str()))
            }
            TribunalAction::Auto => (None, None),
        };

        let request = TribunalActRequest {
            event_id: &event.id,
            action: action.wire_name(),
            history: history.as_slice(),
            speaker,
            player_input,
        };
        let response = service.act(&request)?;
        if !response.success {
            let reason = response
                .error
                .unwrap_or_else(|| "tribunal action failed".to_string());
            return Err(TransportError::Rejected(reason).into());
        }

        *history = normalize_history(response.history);
        Ok(())
    }
}
