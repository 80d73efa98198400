use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One normalized transcript line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryLine {
    pub speaker: String,
    pub text: String,
}

impl HistoryLine {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
        }
    }
}

/// History entries as they arrive from the service. Two legacy shapes are
/// accepted: the well-formed `{speaker, text}` object, and a single-key
/// mapping `{<speaker_id>: <text>}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawHistoryLine {
    WellFormed { speaker: String, text: String },
    SpeakerKeyed(BTreeMap<String, String>),
}

/// Rewrites legacy entries into the uniform shape. Entries with no keys are
/// dropped silently.
pub fn normalize_history(entries: Vec<RawHistoryLine>) -> Vec<HistoryLine> {
    entries
        .into_iter()
        .filter_map(|entry| match entry {
            RawHistoryLine::WellFormed { speaker, text } => Some(HistoryLine { speaker, text }),
            RawHistoryLine::SpeakerKeyed(map) => map
                .into_iter()
                .next()
                .map(|(speaker, text)| HistoryLine { speaker, text }),
        })
        .collect()
}
