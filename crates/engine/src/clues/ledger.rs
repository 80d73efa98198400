use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::placement::ClueInfo;

/// A clue the player has discovered. De-duplication key is `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClueEntry {
    pub area: String,
    pub beast: String,
    pub text: String,
    pub timestamp_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Recorded,
    /// Soft rejection: an entry with identical text already exists.
    Duplicate,
}

impl RecordOutcome {
    pub fn is_recorded(self) -> bool {
        matches!(self, Self::Recorded)
    }
}

/// Ordered, text-deduplicated record of discovered clues. Insertion order is
/// discovery order; the ledger is never reordered or pruned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvestigationLedger {
    entries: Vec<ClueEntry>,
}

impl InvestigationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starting ledger handed over from a previous scene instance.
    pub fn from_entries(entries: Vec<ClueEntry>) -> Self {
        Self { entries }
    }

    pub fn record(&mut self, info: &ClueInfo) -> RecordOutcome {
        self.record_at(info, unix_time_ms())
    }

    pub fn record_at(&mut self, info: &ClueInfo, timestamp_ms: u64) -> RecordOutcome {
        if self.entries.iter().any(|entry| entry.text == info.text) {
            return RecordOutcome::Duplicate;
        }
        self.entries.push(ClueEntry {
            area: info.area.clone(),
            beast: info.beast.clone(),
            text: info.text.clone(),
            timestamp_ms,
        });
        RecordOutcome::Recorded
    }

    pub fn entries(&self) -> &[ClueEntry] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&ClueEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Owned copy for handing to a reloaded scene instance; mutations on
    /// either side afterward do not affect the other.
    pub fn snapshot(&self) -> Vec<ClueEntry> {
        self.entries.clone()
    }
}

fn unix_time_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(area: &str, text: &str) -> ClueInfo {
        ClueInfo {
            area: area.to_string(),
            beast: "jiuweihu".to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn duplicate_text_is_rejected_without_mutation() {
        let mut ledger = InvestigationLedger::new();
        assert_eq!(
            ledger.record_at(&info("Qingqiu Village", "white fur"), 1),
            RecordOutcome::Recorded
        );
        assert_eq!(
            ledger.record_at(&info("Blood Altar", "white fur"), 2),
            RecordOutcome::Duplicate
        );
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.entries()[0].area, "Qingqiu Village");
    }

    #[test]
    fn distinct_texts_are_kept_in_insertion_order() {
        let mut ledger = InvestigationLedger::new();
        ledger.record_at(&info("Qingqiu Village", "first"), 1);
        ledger.record_at(&info("Qingqiu Village", "second"), 2);
        let texts: Vec<&str> = ledger
            .entries()
            .iter()
            .map(|entry| entry.text.as_str())
            .collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn dedup_is_case_sensitive_exact_match() {
        let mut ledger = InvestigationLedger::new();
        ledger.record_at(&info("a", "White Fur"), 1);
        assert_eq!(
            ledger.record_at(&info("a", "white fur"), 2),
            RecordOutcome::Recorded
        );
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn snapshot_is_independent_of_the_live_ledger() {
        let mut ledger = InvestigationLedger::new();
        ledger.record_at(&info("a", "one"), 1);

        let snapshot = ledger.snapshot();
        ledger.record_at(&info("a", "two"), 2);

        assert_eq!(snapshot.len(), 1);
        assert_eq!(ledger.len(), 2);

        let mut restored = InvestigationLedger::from_entries(snapshot);
        restored.record_at(&info("a", "three"), 3);
        assert_eq!(restored.len(), 2);
        assert_eq!(ledger.len(), 2);
    }
}
