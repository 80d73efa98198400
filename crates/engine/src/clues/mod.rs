mod dataset;
mod ledger;
mod merge;
mod placement;

pub use dataset::{ClueDataset, ClueText, LocationClueSet, OverrideClue, OverrideEntry, OverridePayload};
pub use ledger::{ClueEntry, InvestigationLedger, RecordOutcome};
pub use merge::merge_clue_data;
pub use placement::{plan_clue_placements, ClueInfo, CluePlacement, CluePlacementPlan, CLUES_PER_AREA};
