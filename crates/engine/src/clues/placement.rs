use std::collections::HashSet;

use rand::Rng;
use serde::Serialize;

use crate::world::{SceneConfig, SpawnPoint, WorldPosition};

use super::dataset::LocationClueSet;

pub const CLUES_PER_AREA: usize = 3;
const SPAWN_EDGE_PADDING_TILES: u32 = 2;

/// What a placed clue tells the player once inspected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClueInfo {
    pub area: String,
    pub beast: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CluePlacement {
    pub position: WorldPosition,
    pub info: ClueInfo,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CluePlacementPlan {
    pub placements: Vec<CluePlacement>,
    /// Clue bound to the corpse interaction instead of a roaming pickup.
    pub corpse_clue: Option<ClueInfo>,
}

/// Plans clue placements for one scene activation.
///
/// Re-planning yields the same clue content; only the randomized fallback
/// coordinates vary between runs.
pub fn plan_clue_placements(
    config: &SceneConfig,
    data: &[LocationClueSet],
    rng: &mut impl Rng,
) -> CluePlacementPlan {
    let allowed: HashSet<&str> = if config.clue_areas.is_empty() {
        config.area_names.iter().map(String::as_str).collect()
    } else {
        config.clue_areas.iter().map(String::as_str).collect()
    };

    let corpse_area = config
        .corpse_clue_index
        .and(config.corpse)
        .map(|corpse| corpse.area_index());

    let mut plan = CluePlacementPlan::default();

    for location in data {
        let Some(area_index) = config.area_index_of_name(&location.name) else {
            continue;
        };
        if !allowed.contains(location.name.as_str()) {
            continue;
        }

        let mut lit_count = CLUES_PER_AREA.min(location.clues.len());
        if corpse_area == Some(area_index) {
            lit_count = (CLUES_PER_AREA - 1).min(location.clues.len());
            plan.corpse_clue = config
                .corpse_clue_index
                .and_then(|index| location.clues.get(index))
                .map(|clue| ClueInfo {
                    area: location.name.clone(),
                    beast: location.beast.clone(),
                    text: clue.clue.clone(),
                });
        }

        let positions = match config.clue_spawns.get(&location.name) {
            Some(spawns) if !spawns.is_empty() => spawns
                .iter()
                .take(lit_count)
                .map(|spawn| {
                    config.grid.resolve_spawn(
                        Some(*spawn),
                        SpawnPoint {
                            area_index: Some(area_index),
                            tile_x: None,
                            tile_y: None,
                        },
                    )
                })
                .collect(),
            _ => random_positions_in_area(config, area_index, lit_count, rng),
        };

        for (index, position) in positions.into_iter().enumerate() {
            let Some(clue) = location.clues.get(index) else {
                continue;
            };
            plan.placements.push(CluePlacement {
                position,
                info: ClueInfo {
                    area: location.name.clone(),
                    beast: location.beast.clone(),
                    text: clue.clue.clone(),
                },
            });
        }
    }

    plan
}

/// Uniform positions inside the area's pixel rectangle, inset from every edge
/// so clues never spawn flush against a border.
fn random_positions_in_area(
    config: &SceneConfig,
    area_index: usize,
    count: usize,
    rng: &mut impl Rng,
) -> Vec<WorldPosition> {
    let grid = config.grid;
    let origin = grid.area_origin_px(area_index);
    let area_width_px = grid.area_width * grid.tile_size;
    let area_height_px = grid.area_height * grid.tile_size;
    let padding = SPAWN_EDGE_PADDING_TILES * grid.tile_size;

    let mut positions = Vec::with_capacity(count);
    for _ in 0..count {
        let x = random_coordinate(origin.x as u32, area_width_px, padding, rng);
        let y = random_coordinate(origin.y as u32, area_height_px, padding, rng);
        positions.push(WorldPosition {
            x: x as f32,
            y: y as f32,
        });
    }
    positions
}

fn random_coordinate(start: u32, extent: u32, padding: u32, rng: &mut impl Rng) -> u32 {
    if extent <= padding * 2 {
        return start + extent / 2;
    }
    rng.random_range(start + padding..=start + extent - padding)
}
