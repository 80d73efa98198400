impl InvestigationScene {
    /// Loads the scene: spawns actors, resolves clue data (handoff snapshot
    /// first, remote datasets otherwise) and plans placements. A failed base
    /// fetch degrades to an empty clue set rather than blocking scene setup.
    pub(crate) fn load(
        &mut self,
        clue_source: &mut dyn ClueSource,
        rng: &mut impl Rng,
        sink: &mut dyn NotificationSink,
    ) {
        self.actors = ActorRegistry::from_scene(&self.config);
        self.corpse_position = self.config.corpse.map(|corpse| {
            self.config.grid.resolve_spawn(
                Some(corpse.spawn),
                SpawnPoint {
                    area_index: Some(corpse.area_index()),
                    tile_x: None,
                    tile_y: None,
                },
            )
        });

        self.clue_data = match self.handoff.take() {
            Some(transition) => transition.clue_data,
            None => {
                let base = clue_source.fetch_base().unwrap_or_else(|error| {
                    warn!(error = %error, "clue_base_fetch_failed_using_empty_set");
                    Default::default()
                });
                let overrides = clue_source.fetch_overrides().unwrap_or_else(|error| {
                    warn!(error = %error, "clue_override_fetch_failed_ignoring");
                    None
                });
                merge_clue_data(&base.locations, overrides)
            }
        };

        let plan = plan_clue_placements(&self.config, &self.clue_data, rng);
        self.corpse_clue = plan.corpse_clue;
        self.placements = plan
            .placements
            .into_iter()
            .map(|placement| ScenePlacement {
                position: placement.position,
                info: placement.info,
                collected: false,
            })
            .collect();
        self.dialogue = None;

        if !self.ledger.is_empty() {
            sink.notify(Notification::LedgerRestored {
                entries: self.ledger.len(),
            });
        }
        info!(
            scene = %self.config.key,
            actors = self.actors.len(),
            placements = self.placements.len(),
            has_corpse_clue = self.corpse_clue.is_some(),
            "scene_loaded"
        );
    }

    /// Player attempt to pick up the clue at `index`. Proximity-gated; a
    /// collected placement stays inert.
    pub(crate) fn inspect_clue(
        &mut self,
        index: usize,
        clue_log: &mut dyn ClueLogSink,
        sink: &mut dyn NotificationSink,
    ) {
        let Some(placement) = self.placements.get(index) else {
            sink.notify(Notification::Toast {
                message: TOAST_NOTHING_TO_INSPECT.to_string(),
                warning: true,
            });
            return;
        };
        if placement.collected {
            return;
        }
        if !self.player_within(placement.position) {
            sink.notify(Notification::Toast {
                message: TOAST_CLUE_TOO_FAR.to_string(),
                warning: true,
            });
            return;
        }

        self.placements[index].collected = true;
        let info = self.placements[index].info.clone();
        self.record_clue(&info, clue_log, sink);
    }

    /// Inspecting the corpse records its reserved clue, when there is one.
    pub(crate) fn inspect_corpse(
        &mut self,
        clue_log: &mut dyn ClueLogSink,
        sink: &mut dyn NotificationSink,
    ) {
        let (Some(position), Some(info)) = (self.corpse_position, self.corpse_clue.clone()) else {
            sink.notify(Notification::Toast {
                message: TOAST_CORPSE_EMPTY.to_string(),
                warning: true,
            });
            return;
        };
        if !self.player_within(position) {
            sink.notify(Notification::Toast {
                message: TOAST_CORPSE_TOO_FAR.to_string(),
                warning: true,
            });
            return;
        }
        self.record_clue(&info, clue_log, sink);
    }

    /// Closest conversable NPC within interaction range of the player.
    pub(crate) fn nearest_npc(&self) -> Option<&Actor> {
        self.actors
            .nearest_conversable(self.player_position(), INTERACT_DISTANCE_PX)
    }

    /// Opens (or continues) a dialogue with the named actor. Switching to a
    /// different NPC starts a fresh exchange.
    pub(crate) fn open_dialogue(&mut self, npc_id: &str) -> Result<&DialogueExchange, String> {
        let actor = self
            .actors
            .get(npc_id)
            .ok_or_else(|| format!("no actor '{npc_id}' in this scene"))?;
        if actor.kind == ActorKind::Player {
            return Err("cannot open a dialogue with the player".to_string());
        }

        let same_npc = self
            .dialogue
            .as_ref()
            .is_some_and(|exchange| exchange.npc_id() == npc_id);
        if !same_npc {
            self.dialogue = Some(DialogueExchange::open(
                actor.id.clone(),
                actor.display_name.clone(),
            ));
        }
        Ok(self.dialogue.as_ref().expect("dialogue just opened"))
    }

    pub(crate) fn send_dialogue(
        &mut self,
        message: &str,
        service: &mut dyn DialogueService,
    ) -> Result<String, String> {
        let Some(exchange) = self.dialogue.as_mut() else {
            return Err("no dialogue is open".to_string());
        };
        exchange.send(message, service).map_err(|error| match error {
            ValidationError::EmptyPlayerInput => "say something first".to_string(),
            other => other.to_string(),
        })
    }

    pub(crate) fn close_dialogue(&mut self) {
        self.dialogue = None;
    }

    pub(crate) fn minimap(&self) -> MinimapModel {
        let grid = self.config.grid;
        let world_width = grid.world_width_px().max(1.0);
        let world_height = grid.world_height_px().max(1.0);

        let areas = self
            .config
            .area_names
            .iter()
            .enumerate()
            .map(|(index, name)| MinimapArea {
                name: name.clone(),
                color: self.config.area_color(index),
            })
            .collect();
        let markers = self
            .actors
            .actors()
            .iter()
            .map(|actor| MinimapMarker {
                kind: actor.kind,
                id: actor.id.clone(),
                normalized_x: (actor.position.x / world_width).clamp(0.0, 1.0),
                normalized_y: (actor.position.y / world_height).clamp(0.0, 1.0),
            })
            .collect();

        MinimapModel {
            title: self.config.display_name.clone(),
            grid_cols: grid.grid_cols,
            grid_rows: grid.grid_rows,
            areas,
            markers,
        }
    }
}

/// Owns the active scene and the catalog; drives switches the way the scene
/// machine drives scene swaps, handing state over by value.
pub(crate) struct SceneHost {
    registry: SceneRegistry,
    scene: InvestigationScene,
    tribunal: TribunalSession,
}

impl SceneHost {
    pub(crate) fn new(
        registry: SceneRegistry,
        initial_key: &str,
        clue_source: &mut dyn ClueSource,
        rng: &mut impl Rng,
        sink: &mut dyn NotificationSink,
    ) -> Self {
        let config = registry.get(initial_key).clone();
        let mut scene = InvestigationScene::new(config, None);
        scene.load(clue_source, rng, sink);
        Self {
            registry,
            scene,
            tribunal: TribunalSession::new(),
        }
    }

    pub(crate) fn scene(&self) -> &InvestigationScene {
        &self.scene
    }

    pub(crate) fn scene_mut(&mut self) -> &mut InvestigationScene {
        &mut self.scene
    }

    pub(crate) fn tribunal(&self) -> &TribunalSession {
        &self.tribunal
    }

    pub(crate) fn tribunal_mut(&mut self) -> &mut TribunalSession {
        &mut self.tribunal
    }

    pub(crate) fn scene_catalog(&self) -> &[SceneConfig] {
        self.registry.list()
    }

    pub(crate) fn open_tribunal(
        &mut self,
        event_id: &str,
        service: &mut dyn TribunalService,
        sink: &mut dyn NotificationSink,
    ) -> Result<(), SessionError> {
        self.tribunal.open(event_id, service, None)?;
        sink.notify(Notification::TranscriptUpdated {
            lines: self.tribunal.transcript().len(),
        });
        Ok(())
    }

    pub(crate) fn tribunal_act(
        &mut self,
        action: TribunalAction,
        service: &mut dyn TribunalService,
        sink: &mut dyn NotificationSink,
    ) -> Result<(), SessionError> {
        self.tribunal.act(action, service)?;
        sink.notify(Notification::TranscriptUpdated {
            lines: self.tribunal.transcript().len(),
        });
        Ok(())
    }

    /// Switches to another scene, carrying the ledger and merged clue data
    /// across as a snapshot. Returns false when already there.
    pub(crate) fn switch_to(
        &mut self,
        target_key: &str,
        clue_source: &mut dyn ClueSource,
        rng: &mut impl Rng,
        sink: &mut dyn NotificationSink,
    ) -> bool {
        let config = self.registry.get(target_key).clone();
        if config.key == self.scene.key() {
            sink.notify(Notification::Toast {
                message: TOAST_SAME_SCENE.to_string(),
                warning: true,
            });
            return false;
        }

        let transition = self.scene.capture_transition();
        let from = self.scene.key().to_string();
        sink.notify(Notification::SceneSwitched {
            from: from.clone(),
            to: config.key.clone(),
        });
        info!(from = %from, to = %config.key, carried_clues = transition.discovered.len(), "scene_switch");

        self.scene = InvestigationScene::new(config, Some(transition));
        self.scene.load(clue_source, rng, sink);
        true
    }
}
