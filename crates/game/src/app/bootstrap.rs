use engine::{resolve_app_paths, SceneRegistry};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::services::{FileClueLog, FileClueSource, FileTribunalService, OfflineDialogueService};

const INITIAL_SCENE_ENV_VAR: &str = "MOONLIT_SCENE";
const DEFAULT_INITIAL_SCENE: &str = "qingqiu_village";

pub(crate) struct AppWiring {
    pub(crate) registry: SceneRegistry,
    pub(crate) clue_source: FileClueSource,
    pub(crate) clue_log: FileClueLog,
    pub(crate) dialogue: OfflineDialogueService,
    pub(crate) tribunal: FileTribunalService,
    pub(crate) initial_scene: String,
}

pub(crate) fn build_app() -> Result<AppWiring, String> {
    init_tracing();
    info!("=== Moonlit Startup ===");

    let paths = resolve_app_paths().map_err(|error| format!("resolve app paths: {error}"))?;
    let initial_scene = std::env::var(INITIAL_SCENE_ENV_VAR)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|key| !key.is_empty())
        .unwrap_or_else(|| DEFAULT_INITIAL_SCENE.to_string());
    info!(
        root = %paths.root.display(),
        initial_scene = %initial_scene,
        "app_paths_resolved"
    );

    Ok(AppWiring {
        registry: SceneRegistry::builtin(),
        clue_source: FileClueSource::new(
            paths.assets_dir.join("clues.json"),
            paths.assets_dir.join("crime_clues.json"),
        ),
        clue_log: FileClueLog::new(paths.cache_dir.join("discovered_clues.json")),
        dialogue: OfflineDialogueService,
        tribunal: FileTribunalService::new(paths.assets_dir.join("events.json")),
        initial_scene,
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
