//! Port traits for the remote collaborators and the serde payload types of
//! their wire protocol. The engine never opens connections itself; adapters
//! implementing these traits are injected by the shell.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clues::{ClueDataset, ClueEntry, OverridePayload};
use crate::session::{DialogueTurn, HistoryLine, RawHistoryLine};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("service unavailable: {0}")]
    Unavailable(String),
    #[error("request failed with status {status}")]
    Status { status: u16 },
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("service rejected the request: {0}")]
    Rejected(String),
}

/// Source of the two clue dataset resources. A failed override fetch must not
/// block base-dataset use; callers merge with `None` in that case.
pub trait ClueSource {
    fn fetch_base(&mut self) -> Result<ClueDataset, TransportError>;
    fn fetch_overrides(&mut self) -> Result<Option<OverridePayload>, TransportError>;
}

/// Fire-and-forget clue logging. Failures are logged locally by the caller
/// and never surfaced to the player.
pub trait ClueLogSink {
    fn log_clue(&mut self, entry: &ClueEntry) -> Result<(), TransportError>;
}

#[derive(Debug, Clone, Serialize)]
pub struct DialogueRequest<'a> {
    pub npc_id: &'a str,
    pub message: &'a str,
    pub history: &'a [DialogueTurn],
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DialogueReply {
    pub success: bool,
    #[serde(default)]
    pub response: Option<String>,
}

pub trait DialogueService {
    fn chat(&mut self, request: &DialogueRequest<'_>) -> Result<DialogueReply, TransportError>;
}

/// Tribunal clue references accept both `{text}` and `{clue}` shapes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TribunalClue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clue: Option<String>,
}

impl TribunalClue {
    pub fn display_text(&self) -> Option<&str> {
        self.text.as_deref().or(self.clue.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TribunalEvent {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub npcs: Vec<String>,
    #[serde(default)]
    pub p_clues: Vec<TribunalClue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TribunalEventResponse {
    pub event: TribunalEvent,
    #[serde(default)]
    pub history: Vec<RawHistoryLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TribunalActRequest<'a> {
    pub event_id: &'a str,
    pub action: &'a str,
    pub history: &'a [HistoryLine],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_input: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TribunalActResponse {
    pub success: bool,
    #[serde(default)]
    pub history: Vec<RawHistoryLine>,
    #[serde(default)]
    pub error: Option<String>,
}

pub trait TribunalService {
    fn fetch_event(&mut self, event_id: &str) -> Result<TribunalEventResponse, TransportError>;
    fn act(&mut self, request: &TribunalActRequest<'_>)
        -> Result<TribunalActResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn act_request_omits_absent_optional_fields() {
        let history = vec![HistoryLine {
            speaker: "Judge".to_string(),
            text: "Who bled the altar?".to_string(),
        }];
        let request = TribunalActRequest {
            event_id: "moon_eclipse_tribunal",
            action: "auto",
            history: &history,
            speaker: None,
            player_input: None,
        };
        let json = serde_json::to_value(&request).expect("serialize");
        assert!(json.get("speaker").is_none());
        assert!(json.get("player_input").is_none());
        assert_eq!(json["action"], "auto");
    }

    #[test]
    fn tribunal_clue_prefers_text_over_clue() {
        let both = TribunalClue {
            text: Some("text".to_string()),
            clue: Some("clue".to_string()),
        };
        assert_eq!(both.display_text(), Some("text"));

        let clue_only = TribunalClue {
            text: None,
            clue: Some("clue".to_string()),
        };
        assert_eq!(clue_only.display_text(), Some("clue"));
        assert_eq!(TribunalClue::default().display_text(), None);
    }

    #[test]
    fn event_parses_with_missing_optional_sections() {
        let event: TribunalEvent = serde_json::from_str(
            r#"{"id": "moon_eclipse_tribunal", "name": "The Bleeding Altar"}"#,
        )
        .expect("event");
        assert!(event.npcs.is_empty());
        assert!(event.p_clues.is_empty());
    }
}
