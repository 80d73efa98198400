use std::collections::HashMap;

use super::config::SceneConfig;
use super::grid::{SpawnPoint, TilePosition, WorldPosition};

pub const PLAYER_ID: &str = "player";
pub const COMPANION_ID: &str = "baize";

/// One monster per area, in area-index order.
const MONSTER_ROSTER: [(&str, &str); 8] = [
    ("bifang", "Bifang"),
    ("kui", "Kui"),
    ("qingniao", "Qingniao"),
    ("qiongqi", "Qiongqi"),
    ("xiangliu", "Xiangliu"),
    ("xingxing", "Xingxing"),
    ("yingzhao", "Yingzhao"),
    ("jiuweihu", "Nine-Tail Fox"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorKind {
    Player,
    Companion,
    Monster,
    StaticNpc,
}

impl ActorKind {
    /// Whether the player can open a dialogue with this actor via the
    /// nearest-NPC interaction. The companion has its own interaction path.
    pub fn is_conversable(self) -> bool {
        matches!(self, Self::Monster | Self::StaticNpc)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub kind: ActorKind,
    pub id: String,
    pub display_name: String,
    pub position: WorldPosition,
}

/// Actors keyed by id; insertion order is spawn order.
#[derive(Debug, Default, Clone)]
pub struct ActorRegistry {
    actors: Vec<Actor>,
    indices_by_id: HashMap<String, usize>,
}

impl ActorRegistry {
    pub fn from_scene(config: &SceneConfig) -> Self {
        let grid = config.grid;
        let mut registry = Self::default();

        let player_fallback = grid.centered_spawn();
        registry.insert(Actor {
            kind: ActorKind::Player,
            id: PLAYER_ID.to_string(),
            display_name: "You".to_string(),
            position: grid.resolve_spawn(config.player_start, player_fallback),
        });

        let companion_fallback = SpawnPoint::at(
            0,
            (grid.area_width / 2).saturating_sub(2),
            grid.area_height / 2,
        );
        registry.insert(Actor {
            kind: ActorKind::Companion,
            id: COMPANION_ID.to_string(),
            display_name: "Baize".to_string(),
            position: grid.resolve_spawn(config.companion_start, companion_fallback),
        });

        if config.spawn_monsters {
            for area_index in 0..grid.area_count() {
                let Some((id, name)) = MONSTER_ROSTER.get(area_index) else {
                    continue;
                };
                let center = grid.tile_to_world(TilePosition {
                    area_index,
                    tile_x: grid.area_width / 2,
                    tile_y: grid.area_height / 2,
                });
                registry.insert(Actor {
                    kind: ActorKind::Monster,
                    id: id.to_string(),
                    display_name: name.to_string(),
                    position: center,
                });
            }
        }

        for npc in &config.extra_npcs {
            let fallback = SpawnPoint {
                area_index: npc.spawn.area_index.or(Some(0)),
                tile_x: Some(grid.area_width / 2),
                tile_y: Some(grid.area_height / 2),
            };
            registry.insert(Actor {
                kind: ActorKind::StaticNpc,
                id: npc.npc_id.clone(),
                display_name: npc.display_name.clone(),
                position: grid.resolve_spawn(Some(npc.spawn), fallback),
            });
        }

        registry
    }

    pub fn insert(&mut self, actor: Actor) {
        match self.indices_by_id.get(&actor.id) {
            Some(idx) => self.actors[*idx] = actor,
            None => {
                self.indices_by_id
                    .insert(actor.id.clone(), self.actors.len());
                self.actors.push(actor);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Actor> {
        self.indices_by_id
            .get(id)
            .and_then(|idx| self.actors.get(*idx))
    }

    pub fn set_position(&mut self, id: &str, position: WorldPosition) -> bool {
        let Some(idx) = self.indices_by_id.get(id) else {
            return false;
        };
        self.actors[*idx].position = position;
        true
    }

    pub fn player_position(&self) -> Option<WorldPosition> {
        self.get(PLAYER_ID).map(|actor| actor.position)
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Closest conversable NPC within `max_distance` of `from`, if any.
    pub fn nearest_conversable(&self, from: WorldPosition, max_distance: f32) -> Option<&Actor> {
        let mut closest: Option<(f32, &Actor)> = None;
        for actor in &self.actors {
            if !actor.kind.is_conversable() {
                continue;
            }
            let distance = from.distance_to(actor.position);
            if distance >= max_distance {
                continue;
            }
            match closest {
                Some((best, _)) if best <= distance => {}
                _ => closest = Some((distance, actor)),
            }
        }
        closest.map(|(_, actor)| actor)
    }

    pub fn companion_within(&self, from: WorldPosition, max_distance: f32) -> bool {
        self.get(COMPANION_ID)
            .is_some_and(|actor| from.distance_to(actor.position) < max_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::SceneRegistry;

    #[test]
    fn shrine_grounds_spawns_one_monster_per_area() {
        let registry = SceneRegistry::builtin();
        let actors = ActorRegistry::from_scene(registry.get("shrine_grounds"));

        let monsters: Vec<&Actor> = actors
            .actors()
            .iter()
            .filter(|actor| actor.kind == ActorKind::Monster)
            .collect();
        assert_eq!(monsters.len(), 8);
        assert!(actors.get("jiuweihu").is_some());
        assert!(actors.get(PLAYER_ID).is_some());
        assert!(actors.get(COMPANION_ID).is_some());
    }

    #[test]
    fn crime_scene_spawns_no_monsters() {
        let registry = SceneRegistry::builtin();
        let actors = ActorRegistry::from_scene(registry.get("qingqiu_village"));
        assert!(actors
            .actors()
            .iter()
            .all(|actor| actor.kind != ActorKind::Monster));
    }

    #[test]
    fn council_chamber_seats_static_npcs_by_id() {
        let registry = SceneRegistry::builtin();
        let actors = ActorRegistry::from_scene(registry.get("council_chamber"));
        let kui = actors.get("kui").expect("kui seated");
        assert_eq!(kui.kind, ActorKind::StaticNpc);
        assert_eq!(kui.display_name, "Kui");
    }

    #[test]
    fn nearest_conversable_skips_player_and_companion() {
        let registry = SceneRegistry::builtin();
        let config = registry.get("council_chamber");
        let mut actors = ActorRegistry::from_scene(config);

        // Stand on top of the companion; the nearest conversable must still be
        // a seated NPC, never the companion itself.
        let companion_pos = actors.get(COMPANION_ID).expect("companion").position;
        actors.set_position(PLAYER_ID, companion_pos);

        let nearest = actors.nearest_conversable(companion_pos, f32::MAX).expect("npc");
        assert!(nearest.kind.is_conversable());

        let none = actors.nearest_conversable(companion_pos, 0.5);
        assert!(none.is_none());
    }

    #[test]
    fn set_position_moves_only_the_named_actor() {
        let registry = SceneRegistry::builtin();
        let mut actors = ActorRegistry::from_scene(registry.get("qingqiu_village"));
        let before_companion = actors.get(COMPANION_ID).expect("companion").position;

        let target = WorldPosition { x: 42.0, y: 17.0 };
        assert!(actors.set_position(PLAYER_ID, target));
        assert!(!actors.set_position("nobody", target));

        assert_eq!(actors.player_position(), Some(target));
        assert_eq!(
            actors.get(COMPANION_ID).expect("companion").position,
            before_companion
        );
    }
}
