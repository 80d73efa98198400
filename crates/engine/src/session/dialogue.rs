use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::remote::{DialogueRequest, DialogueService};

use super::ValidationError;

const SILENT_REPLY: &str = "*silence*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogueRole {
    Player,
    Npc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueTurn {
    pub role: DialogueRole,
    pub text: String,
}

impl DialogueTurn {
    fn player(text: impl Into<String>) -> Self {
        Self {
            role: DialogueRole::Player,
            text: text.into(),
        }
    }

    fn npc(text: impl Into<String>) -> Self {
        Self {
            role: DialogueRole::Npc,
            text: text.into(),
        }
    }
}

/// A single-NPC conversation. Opening an exchange seeds it with the NPC's
/// greeting; switching to another NPC means opening a fresh exchange.
#[derive(Debug, Clone)]
pub struct DialogueExchange {
    npc_id: String,
    npc_name: String,
    history: Vec<DialogueTurn>,
}

impl DialogueExchange {
    pub fn open(npc_id: impl Into<String>, npc_name: impl Into<String>) -> Self {
        let npc_id = npc_id.into();
        let greeting = greeting_for(&npc_id);
        Self {
            npc_id,
            npc_name: npc_name.into(),
            history: vec![DialogueTurn::npc(greeting)],
        }
    }

    pub fn npc_id(&self) -> &str {
        &self.npc_id
    }

    pub fn npc_name(&self) -> &str {
        &self.npc_name
    }

    pub fn history(&self) -> &[DialogueTurn] {
        &self.history
    }

    /// Sends one player message and returns the NPC's reply. Empty input is
    /// rejected locally with no service call. A transport failure falls back
    /// to the local deterministic reply generator.
    pub fn send(
        &mut self,
        message: &str,
        service: &mut dyn DialogueService,
    ) -> Result<String, ValidationError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ValidationError::EmptyPlayerInput);
        }

        self.history.push(DialogueTurn::player(message));

        let request = DialogueRequest {
            npc_id: &self.npc_id,
            message,
            history: &self.history,
        };
        let reply = match service.chat(&request) {
            Ok(reply) if reply.success => reply
                .response
                .unwrap_or_else(|| SILENT_REPLY.to_string()),
            Ok(_) => SILENT_REPLY.to_string(),
            Err(error) => {
                warn!(
                    npc_id = %self.npc_id,
                    error = %error,
                    "dialogue_service_failed_using_local_reply"
                );
                fallback_reply(&self.npc_id, message).to_string()
            }
        };

        self.history.push(DialogueTurn::npc(reply.clone()));
        Ok(reply)
    }
}

pub fn greeting_for(npc_id: &str) -> &'static str {
    match npc_id {
        "baize" => {
            "The moonlight shivers... I am Baize, your companion and living bestiary. \
             I've catalogued every monster in this shrine and will guide you through this investigation."
        }
        "bifang" => "*The one-legged bird watches with a fiery gaze* I am Bifang, herald of flames.",
        "kui" => "*A thunderous presence fills the air* Kui speaks. Few mortals dare approach.",
        "qingniao" => "*Melodious chirping* Qingniao greets you, messenger of the west.",
        "qiongqi" => "*A menacing growl* Qiongqi does not welcome uninvited guests...",
        "xiangliu" => {
            "*Nine serpent heads hiss in unison* Xiangliu observes your courage... or foolishness."
        }
        "xingxing" => "*Mischievous laughter echoes* Xingxing at your service! What brings you here?",
        "yingzhao" => "*Majestic wings unfold* I am Yingzhao, guardian of the eastern winds.",
        "jiuweihu" => {
            "*The fox's eyes gleam crimson* Welcome, mortal. You seek the truth of the bleeding altar?"
        }
        _ => "...",
    }
}

const BAIZE_REPLIES: [(&str, &str); 7] = [
    (
        "altar",
        "The altar bleeds when divine truth is wounded. Someone... or something... has committed sacrilege.",
    ),
    (
        "moon",
        "The moon remembers what mortals forget. Tonight it reveals all secrets.",
    ),
    (
        "truth",
        "Truth is a blade that cuts both ways. Are you prepared to wield it?",
    ),
    (
        "murder",
        "A god was slain on holy ground. The heavens themselves weep crimson.",
    ),
    (
        "help",
        "I am Baize, keeper of knowledge. I document all creatures, all mysteries. What troubles you?",
    ),
    (
        "cat",
        "*purrs softly* I may look like a simple cat, but I am Baize, in feline form. The blood moon requires... discretion.",
    ),
    (
        "shrine",
        "Each shrine in this realm holds fragments of truth. Explore them all to understand what transpired.",
    ),
];
const BAIZE_DEFAULT: &str = "Interesting... the threads of fate twist around your words.";

const FOX_REPLIES: [(&str, &str); 6] = [
    (
        "altar",
        "That altar? Drenched in divine blood. Quite the spectacle, wouldn't you say?",
    ),
    (
        "moon",
        "The blood moon is my favorite time. Everything hidden comes to light... eventually.",
    ),
    (
        "truth",
        "Truth is such a flexible concept. Whose truth are we seeking?",
    ),
    (
        "murder",
        "Murder implies wrongdoing. Perhaps it was... justice?",
    ),
    (
        "help",
        "Help? How delightfully mortal. I deal in bargains, not charity.",
    ),
    (
        "baize",
        "*laughs* That fluffy creature following you? More than meets the eye, I assure you.",
    ),
];
const FOX_DEFAULT: &str = "How curious you are... like a moth to crimson flame.";

/// Deterministic local reply used when the dialogue service is unreachable.
/// First keyword match in table order wins.
pub fn fallback_reply(npc_id: &str, message: &str) -> &'static str {
    let lowered = message.to_lowercase();
    match npc_id {
        "baize" => keyword_reply(&BAIZE_REPLIES, BAIZE_DEFAULT, &lowered),
        "jiuweihu" => keyword_reply(&FOX_REPLIES, FOX_DEFAULT, &lowered),
        _ => "...",
    }
}

fn keyword_reply(
    table: &[(&'static str, &'static str)],
    default: &'static str,
    lowered_message: &str,
) -> &'static str {
    table
        .iter()
        .find(|(keyword, _)| lowered_message.contains(keyword))
        .map(|(_, reply)| *reply)
        .unwrap_or(default)
}
