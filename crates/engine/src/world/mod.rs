mod actor;
mod config;
mod grid;
mod registry;

pub use actor::{Actor, ActorKind, ActorRegistry, COMPANION_ID, PLAYER_ID};
pub use config::{ConfigError, CorpseSpawn, NpcSpawn, SceneConfig};
pub use grid::{GridShape, SpawnPoint, TilePosition, WorldPosition};
pub use registry::{SceneRegistry, DEFAULT_SCENE_KEY};
