use crate::clues::{ClueEntry, InvestigationLedger, LocationClueSet};

/// State carried across a scene switch. Captured synchronously before the new
/// scene instance is constructed; both sides own independent copies, so there
/// is no shared mutable state across the switch boundary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneTransitionState {
    pub discovered: Vec<ClueEntry>,
    pub clue_data: Vec<LocationClueSet>,
}

impl SceneTransitionState {
    pub fn capture(ledger: &InvestigationLedger, clue_data: &[LocationClueSet]) -> Self {
        Self {
            discovered: ledger.snapshot(),
            clue_data: clue_data.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clues::{ClueInfo, ClueText};

    #[test]
    fn capture_snapshots_are_independent_of_the_source() {
        let mut ledger = InvestigationLedger::new();
        ledger.record_at(
            &ClueInfo {
                area: "Qingqiu Village".to_string(),
                beast: "jiuweihu".to_string(),
                text: "a trail of white fur".to_string(),
            },
            1,
        );
        let data = vec![LocationClueSet {
            name: "Qingqiu Village".to_string(),
            beast: "jiuweihu".to_string(),
            clues: vec![ClueText::new("a trail of white fur")],
        }];

        let transition = SceneTransitionState::capture(&ledger, &data);

        ledger.record_at(
            &ClueInfo {
                area: "Blood Altar".to_string(),
                beast: "qiongqi".to_string(),
                text: "fresh incense ash".to_string(),
            },
            2,
        );
        assert_eq!(transition.discovered.len(), 1);
        assert_eq!(ledger.len(), 2);
        assert_eq!(transition.clue_data, data);
    }
}
