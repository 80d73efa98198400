use super::dataset::{LocationClueSet, OverridePayload};

const UNKNOWN_BEAST: &str = "Unknown";

/// Merges the base clue locations with the optional crime-scene overrides.
///
/// The result owns all of its data; mutating it never touches `base`. An
/// override naming an existing location replaces that location's clue list
/// wholesale and takes the override beast only when one is supplied. An
/// override for an unknown location is appended at the end.
pub fn merge_clue_data(
    base: &[LocationClueSet],
    overrides: Option<OverridePayload>,
) -> Vec<LocationClueSet> {
    let mut merged: Vec<LocationClueSet> = base.to_vec();

    let Some(overrides) = overrides else {
        return merged;
    };

    for entry in overrides.into_entries() {
        let Some(clues) = entry.clues else {
            continue;
        };
        let normalized: Vec<_> = clues
            .into_iter()
            .map(|clue| clue.into_clue_text())
            .collect();

        match merged
            .iter_mut()
            .find(|location| location.name == entry.location)
        {
            Some(existing) => {
                existing.clues = normalized;
                if let Some(beast) = entry.beast {
                    existing.beast = beast;
                }
            }
            None => merged.push(LocationClueSet {
                name: entry.location,
                beast: entry.beast.unwrap_or_else(|| UNKNOWN_BEAST.to_string()),
                clues: normalized,
            }),
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clues::dataset::{ClueText, OverrideClue, OverrideEntry};

    fn base_locations() -> Vec<LocationClueSet> {
        vec![
            LocationClueSet {
                name: "Qingqiu Village".to_string(),
                beast: "xingxing".to_string(),
                clues: vec![
                    ClueText::new("claw marks on the well"),
                    ClueText::new("a broken lantern"),
                    ClueText::new("scattered rice offerings"),
                    ClueText::new("a torn prayer ribbon"),
                ],
            },
            LocationClueSet {
                name: "Blood Altar".to_string(),
                beast: "qiongqi".to_string(),
                clues: vec![ClueText::new("the altar bleeds at moonrise")],
            },
        ]
    }

    #[test]
    fn merging_without_overrides_is_a_deep_copy() {
        let base = base_locations();
        let mut merged = merge_clue_data(&base, None);
        assert_eq!(merged, base);

        merged[0].clues.clear();
        merged[0].beast = "changed".to_string();
        assert_eq!(base[0].clues.len(), 4);
        assert_eq!(base[0].beast, "xingxing");
    }

    #[test]
    fn override_replaces_clues_and_beast_for_matching_location() {
        let base = base_locations();
        let overrides = OverridePayload::Many(vec![OverrideEntry {
            location: "Qingqiu Village".to_string(),
            beast: Some("jiuweihu".to_string()),
            clues: Some(vec![
                OverrideClue::Text("a trail of white fur".to_string()),
                OverrideClue::Wrapped(ClueText::new("two puncture wounds, no blood")),
            ]),
        }]);

        let merged = merge_clue_data(&base, Some(overrides));
        let village = &merged[0];
        assert_eq!(village.beast, "jiuweihu");
        assert_eq!(village.clues.len(), 2);
        assert_eq!(village.clues[0].clue, "a trail of white fur");
        // Untouched locations pass through.
        assert_eq!(merged[1], base[1]);
    }

    #[test]
    fn override_without_beast_keeps_the_base_beast() {
        let base = base_locations();
        let overrides = OverridePayload::One(OverrideEntry {
            location: "Blood Altar".to_string(),
            beast: None,
            clues: Some(vec![OverrideClue::Text("fresh incense ash".to_string())]),
        });

        let merged = merge_clue_data(&base, Some(overrides));
        assert_eq!(merged[1].beast, "qiongqi");
        assert_eq!(merged[1].clues.len(), 1);
    }

    #[test]
    fn override_for_unknown_location_is_appended_with_default_beast() {
        let base = base_locations();
        let overrides = OverridePayload::One(OverrideEntry {
            location: "Hidden Grotto".to_string(),
            beast: None,
            clues: Some(vec![OverrideClue::Text("wet footprints".to_string())]),
        });

        let merged = merge_clue_data(&base, Some(overrides));
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[2].name, "Hidden Grotto");
        assert_eq!(merged[2].beast, "Unknown");
    }

    #[test]
    fn override_entry_without_clue_list_is_ignored() {
        let base = base_locations();
        let overrides = OverridePayload::One(OverrideEntry {
            location: "Qingqiu Village".to_string(),
            beast: Some("jiuweihu".to_string()),
            clues: None,
        });

        let merged = merge_clue_data(&base, Some(overrides));
        assert_eq!(merged, base);
    }
}
