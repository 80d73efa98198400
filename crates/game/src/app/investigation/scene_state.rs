/// One active scene: config, actors, planned clue placements, and the ledger.
/// Constructed fresh per scene activation; cross-scene state arrives through
/// a `SceneTransitionState` snapshot.
pub(crate) struct InvestigationScene {
    config: SceneConfig,
    actors: ActorRegistry,
    clue_data: Vec<LocationClueSet>,
    placements: Vec<ScenePlacement>,
    corpse_clue: Option<ClueInfo>,
    corpse_position: Option<WorldPosition>,
    ledger: InvestigationLedger,
    dialogue: Option<DialogueExchange>,
    handoff: Option<SceneTransitionState>,
}

impl InvestigationScene {
    pub(crate) fn new(config: SceneConfig, transition: Option<SceneTransitionState>) -> Self {
        let ledger = match &transition {
            Some(transition) => InvestigationLedger::from_entries(transition.discovered.clone()),
            None => InvestigationLedger::new(),
        };
        Self {
            config,
            actors: ActorRegistry::default(),
            clue_data: Vec::new(),
            placements: Vec::new(),
            corpse_clue: None,
            corpse_position: None,
            ledger,
            dialogue: None,
            handoff: transition,
        }
    }

    pub(crate) fn key(&self) -> &str {
        &self.config.key
    }

    pub(crate) fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub(crate) fn actors(&self) -> &ActorRegistry {
        &self.actors
    }

    pub(crate) fn placements(&self) -> &[ScenePlacement] {
        &self.placements
    }

    pub(crate) fn corpse_clue(&self) -> Option<&ClueInfo> {
        self.corpse_clue.as_ref()
    }

    pub(crate) fn memory_book(&self) -> &[ClueEntry] {
        self.ledger.entries()
    }

    pub(crate) fn dialogue(&self) -> Option<&DialogueExchange> {
        self.dialogue.as_ref()
    }

    pub(crate) fn player_position(&self) -> WorldPosition {
        self.actors.player_position().unwrap_or_default()
    }

    pub(crate) fn move_player_to(&mut self, position: WorldPosition) -> bool {
        self.actors.set_position(PLAYER_ID, position)
    }

    pub(crate) fn capture_transition(&self) -> SceneTransitionState {
        SceneTransitionState::capture(&self.ledger, &self.clue_data)
    }

    fn player_within(&self, target: WorldPosition) -> bool {
        self.player_position().distance_to(target) <= INTERACT_DISTANCE_PX
    }

    fn record_clue(
        &mut self,
        info: &ClueInfo,
        clue_log: &mut dyn ClueLogSink,
        sink: &mut dyn NotificationSink,
    ) {
        match self.ledger.record(info) {
            RecordOutcome::Duplicate => {
                sink.notify(Notification::ClueAlreadyRecorded {
                    text: info.text.clone(),
                });
                sink.notify(Notification::Toast {
                    message: TOAST_CLUE_DUPLICATE.to_string(),
                    warning: true,
                });
            }
            RecordOutcome::Recorded => {
                if let Some(entry) = self.ledger.latest().cloned() {
                    if let Err(error) = clue_log.log_clue(&entry) {
                        warn!(error = %error, "clue_log_failed");
                    }
                    sink.notify(Notification::ClueRecorded { entry });
                }
                sink.notify(Notification::Toast {
                    message: TOAST_CLUE_RECORDED.to_string(),
                    warning: false,
                });
            }
        }
    }
}
