use engine::{
    merge_clue_data, plan_clue_placements, Actor, ActorKind, ActorRegistry, ClueEntry, ClueInfo,
    ClueLogSink, ClueSource, DialogueExchange, DialogueService, InvestigationLedger,
    LocationClueSet, Notification, NotificationSink, RecordOutcome, SceneConfig, SceneRegistry,
    SceneTransitionState, SessionError, SpawnPoint, TribunalAction, TribunalService,
    TribunalSession, ValidationError, WorldPosition, PLAYER_ID,
};
use rand::Rng;
use tracing::{info, warn};

const INTERACT_DISTANCE_PX: f32 = 80.0;
const TOAST_CLUE_RECORDED: &str = "Clue recorded in Memory Book";
const TOAST_CLUE_DUPLICATE: &str = "Clue already recorded";
const TOAST_CLUE_TOO_FAR: &str = "Get closer to inspect the clue";
const TOAST_CORPSE_TOO_FAR: &str = "Get closer to inspect the corpse";
const TOAST_NOTHING_TO_INSPECT: &str = "Nothing to inspect there";
const TOAST_CORPSE_EMPTY: &str = "Nothing else to inspect here";
const TOAST_SAME_SCENE: &str = "Already investigating here";

include!("types.rs");
include!("scene_state.rs");
include!("scene_impl.rs");
