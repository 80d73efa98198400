use std::collections::HashMap;

use super::config::{CorpseSpawn, NpcSpawn, SceneConfig};
use super::grid::{GridShape, SpawnPoint};

pub const DEFAULT_SCENE_KEY: &str = "shrine_grounds";

/// Read-only catalog of scene configs, in scene-switcher display order.
#[derive(Debug, Default, Clone)]
pub struct SceneRegistry {
    configs: Vec<SceneConfig>,
    indices_by_key: HashMap<String, usize>,
}

impl SceneRegistry {
    pub fn from_configs(configs: Vec<SceneConfig>) -> Self {
        let mut indices_by_key = HashMap::with_capacity(configs.len());
        for (idx, config) in configs.iter().enumerate() {
            indices_by_key.insert(config.key.clone(), idx);
        }
        Self {
            configs,
            indices_by_key,
        }
    }

    pub fn builtin() -> Self {
        Self::from_configs(vec![
            qingqiu_village(),
            shrine_grounds(),
            council_chamber(),
        ])
    }

    pub fn find(&self, key: &str) -> Option<&SceneConfig> {
        self.indices_by_key
            .get(key)
            .and_then(|idx| self.configs.get(*idx))
    }

    /// Unknown keys fall back to the default scene. The builtin catalog always
    /// contains the default, so this cannot fail for it; a custom catalog
    /// without the default falls back to its first entry.
    pub fn get(&self, key: &str) -> &SceneConfig {
        self.find(key)
            .or_else(|| self.find(DEFAULT_SCENE_KEY))
            .unwrap_or(&self.configs[0])
    }

    pub fn get_or_default(&self, key: Option<&str>) -> &SceneConfig {
        match key {
            Some(key) => self.get(key),
            None => self.get(DEFAULT_SCENE_KEY),
        }
    }

    pub fn list(&self) -> &[SceneConfig] {
        &self.configs
    }
}

fn qingqiu_village() -> SceneConfig {
    let mut clue_spawns = HashMap::new();
    clue_spawns.insert(
        "Qingqiu Village".to_string(),
        vec![
            SpawnPoint::at(0, 12, 8),
            SpawnPoint::at(0, 7, 12),
            SpawnPoint::at(0, 16, 10),
        ],
    );

    SceneConfig {
        key: "qingqiu_village".to_string(),
        display_name: "Qingqiu Village (Crime Scene)".to_string(),
        summary: "Investigate Aqi's bloodless death beneath the eclipse.".to_string(),
        grid: GridShape {
            grid_cols: 2,
            grid_rows: 1,
            area_width: 24,
            area_height: 18,
            tile_size: 24,
        },
        area_names: vec!["Qingqiu Village".to_string(), "Eastern Path".to_string()],
        area_colors: vec![0x1b1f34, 0x101524],
        background_color: "#050712".to_string(),
        camera_zoom: 3.8,
        player_start: Some(SpawnPoint::at(0, 10, 9)),
        companion_start: Some(SpawnPoint::at(0, 8, 11)),
        extra_npcs: Vec::new(),
        corpse: Some(CorpseSpawn {
            spawn: SpawnPoint::at(0, 11, 9),
        }),
        corpse_clue_index: Some(2),
        clue_areas: vec!["Qingqiu Village".to_string()],
        clue_spawns,
        spawn_monsters: false,
    }
}

fn shrine_grounds() -> SceneConfig {
    let area_names = [
        "Entrance Hall",
        "Forest Shrine",
        "Spirit Garden",
        "Blood Altar",
        "Water Temple",
        "Ancient Library",
        "Mountain Pass",
        "Moonlit Summit",
    ];

    SceneConfig {
        key: "shrine_grounds".to_string(),
        display_name: "Moonlit Shrine Grounds".to_string(),
        summary: "Explore the eight sanctums of the Moon Eclipse Trial.".to_string(),
        grid: GridShape {
            grid_cols: 4,
            grid_rows: 2,
            area_width: 28,
            area_height: 20,
            tile_size: 24,
        },
        area_names: area_names.iter().map(ToString::to_string).collect(),
        area_colors: vec![
            0xFF6B9D, 0x4ECDC4, 0xFFE66D, 0xA8E6CF, 0xFF8B94, 0xB4A7D6, 0xFDCB82, 0x95E1D3,
        ],
        background_color: "#0a0015".to_string(),
        camera_zoom: 2.5,
        player_start: Some(SpawnPoint::at(0, 14, 10)),
        companion_start: Some(SpawnPoint::at(0, 12, 10)),
        extra_npcs: Vec::new(),
        corpse: None,
        corpse_clue_index: None,
        clue_areas: area_names.iter().map(ToString::to_string).collect(),
        clue_spawns: HashMap::new(),
        spawn_monsters: true,
    }
}

fn council_chamber() -> SceneConfig {
    let seats: [(&str, &str, usize, u32, u32); 8] = [
        ("bifang", "Bifang", 0, 6, 8),
        ("kui", "Kui", 0, 18, 8),
        ("qingniao", "Qingniao", 0, 6, 13),
        ("qiongqi", "Qiongqi", 0, 18, 13),
        ("xiangliu", "Xiangliu", 0, 12, 6),
        ("xingxing", "Xingxing", 0, 12, 14),
        ("yingzhao", "Yingzhao", 0, 4, 10),
        ("jiuweihu", "Nine-Tail Fox", 0, 20, 10),
    ];

    SceneConfig {
        key: "council_chamber".to_string(),
        display_name: "Moonlit Tribunal".to_string(),
        summary: "Convene every eyewitness and spirit to debate the culprit.".to_string(),
        grid: GridShape {
            grid_cols: 1,
            grid_rows: 1,
            area_width: 24,
            area_height: 18,
            tile_size: 24,
        },
        area_names: vec!["Council Hall".to_string()],
        area_colors: vec![0x1f1230],
        background_color: "#150820".to_string(),
        camera_zoom: 3.2,
        player_start: Some(SpawnPoint::at(0, 12, 10)),
        companion_start: Some(SpawnPoint::at(0, 10, 11)),
        extra_npcs: seats
            .iter()
            .map(|(npc_id, display_name, area, x, y)| NpcSpawn {
                npc_id: npc_id.to_string(),
                display_name: display_name.to_string(),
                spawn: SpawnPoint::at(*area, *x, *y),
            })
            .collect(),
        corpse: None,
        corpse_clue_index: None,
        clue_areas: Vec::new(),
        clue_spawns: HashMap::new(),
        spawn_monsters: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_configs_are_internally_consistent() {
        let registry = SceneRegistry::builtin();
        assert_eq!(registry.list().len(), 3);
        for config in registry.list() {
            config.validate().expect("builtin config");
        }
    }

    #[test]
    fn get_falls_back_to_default_scene_for_unknown_keys() {
        let registry = SceneRegistry::builtin();
        assert_eq!(registry.get("no_such_scene").key, DEFAULT_SCENE_KEY);
        assert_eq!(registry.get_or_default(None).key, DEFAULT_SCENE_KEY);
        assert_eq!(
            registry.get_or_default(Some("qingqiu_village")).key,
            "qingqiu_village"
        );
    }

    #[test]
    fn crime_scene_reserves_the_corpse_clue() {
        let registry = SceneRegistry::builtin();
        let village = registry.get("qingqiu_village");
        assert_eq!(village.corpse_clue_index, Some(2));
        let corpse = village.corpse.expect("corpse spawn");
        assert_eq!(corpse.area_index(), 0);
        assert_eq!(
            village.clue_spawns.get("Qingqiu Village").map(Vec::len),
            Some(3)
        );
    }

    #[test]
    fn list_preserves_catalog_order_for_the_scene_switcher() {
        let registry = SceneRegistry::builtin();
        let keys: Vec<&str> = registry.list().iter().map(|c| c.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["qingqiu_village", "shrine_grounds", "council_chamber"]
        );
    }

    #[test]
    fn council_chamber_seats_every_tribunal_npc() {
        let registry = SceneRegistry::builtin();
        let chamber = registry.get("council_chamber");
        assert_eq!(chamber.extra_npcs.len(), 8);
        assert!(chamber
            .extra_npcs
            .iter()
            .any(|npc| npc.npc_id == "jiuweihu" && npc.display_name == "Nine-Tail Fox"));
    }
}
