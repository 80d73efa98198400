use serde::{Deserialize, Serialize};

/// One clue line as stored in the datasets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClueText {
    pub clue: String,
}

impl ClueText {
    pub fn new(clue: impl Into<String>) -> Self {
        Self { clue: clue.into() }
    }
}

/// Per-location clue set from the base dataset. `name` is matched against the
/// active scene's area names; locations that belong to other scenes stay in
/// the merged data untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationClueSet {
    pub name: String,
    #[serde(default)]
    pub beast: String,
    #[serde(default)]
    pub clues: Vec<ClueText>,
}

/// Wire shape of the base clue dataset resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClueDataset {
    #[serde(default)]
    pub locations: Vec<LocationClueSet>,
}

/// The crime-scene override resource arrives either as a single entry or as a
/// list of entries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OverridePayload {
    Many(Vec<OverrideEntry>),
    One(OverrideEntry),
}

impl OverridePayload {
    pub fn into_entries(self) -> Vec<OverrideEntry> {
        match self {
            Self::Many(entries) => entries,
            Self::One(entry) => vec![entry],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OverrideEntry {
    pub location: String,
    #[serde(default)]
    pub beast: Option<String>,
    /// Entries without a clue list are ignored by the merge.
    #[serde(default)]
    pub clues: Option<Vec<OverrideClue>>,
}

/// Override clues are accepted both as bare strings and as `{clue}` objects.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OverrideClue {
    Text(String),
    Wrapped(ClueText),
}

impl OverrideClue {
    pub fn into_clue_text(self) -> ClueText {
        match self {
            Self::Text(clue) => ClueText { clue },
            Self::Wrapped(clue) => clue,
        }
    }
}
