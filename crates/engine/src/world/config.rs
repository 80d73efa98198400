use std::collections::HashMap;

use thiserror::Error;

use super::grid::{GridShape, SpawnPoint};

/// Static NPC seat carried by a scene config (tribunal chamber seating and
/// similar fixed placements).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpcSpawn {
    pub npc_id: String,
    pub display_name: String,
    pub spawn: SpawnPoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorpseSpawn {
    pub spawn: SpawnPoint,
}

impl CorpseSpawn {
    pub fn area_index(&self) -> usize {
        self.spawn.area_index.unwrap_or(0)
    }
}

/// Static scene descriptor. Constructed once at catalog build time and never
/// mutated by gameplay. Colors, background and camera zoom are display
/// metadata carried for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub key: String,
    pub display_name: String,
    pub summary: String,
    pub grid: GridShape,
    pub area_names: Vec<String>,
    pub area_colors: Vec<u32>,
    pub background_color: String,
    pub camera_zoom: f32,
    pub player_start: Option<SpawnPoint>,
    pub companion_start: Option<SpawnPoint>,
    pub extra_npcs: Vec<NpcSpawn>,
    pub corpse: Option<CorpseSpawn>,
    pub corpse_clue_index: Option<usize>,
    /// Subset of `area_names` eligible for clue spawns; empty means all areas.
    pub clue_areas: Vec<String>,
    pub clue_spawns: HashMap<String, Vec<SpawnPoint>>,
    pub spawn_monsters: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("scene '{key}': area name count mismatch: expected {expected}, got {actual}")]
    AreaNameCountMismatch {
        key: String,
        expected: usize,
        actual: usize,
    },
    #[error("scene '{key}': area color count mismatch: expected {expected}, got {actual}")]
    AreaColorCountMismatch {
        key: String,
        expected: usize,
        actual: usize,
    },
    #[error("scene '{key}': clue area '{name}' is not one of the scene's area names")]
    UnknownClueArea { key: String, name: String },
}

impl SceneConfig {
    pub fn area_index_of_name(&self, name: &str) -> Option<usize> {
        self.area_names.iter().position(|area| area == name)
    }

    pub fn area_color(&self, area_index: usize) -> u32 {
        const FALLBACK_AREA_COLOR: u32 = 0x2c3e50;
        self.area_colors
            .get(area_index)
            .copied()
            .unwrap_or(FALLBACK_AREA_COLOR)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let expected = self.grid.area_count();
        if self.area_names.len() != expected {
            return Err(ConfigError::AreaNameCountMismatch {
                key: self.key.clone(),
                expected,
                actual: self.area_names.len(),
            });
        }
        if self.area_colors.len() != expected {
            return Err(ConfigError::AreaColorCountMismatch {
                key: self.key.clone(),
                expected,
                actual: self.area_colors.len(),
            });
        }
        for name in &self.clue_areas {
            if self.area_index_of_name(name).is_none() {
                return Err(ConfigError::UnknownClueArea {
                    key: self.key.clone(),
                    name: name.clone(),
                });
            }
        }
        Ok(())
    }
}
