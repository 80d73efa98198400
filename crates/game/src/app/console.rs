//! Line-based investigation console: the stand-in presentation layer that
//! drives the scene host and prints engine state and notifications.

use std::io::{self, BufRead, Write};

use engine::{Notification, NotificationBuffer, TribunalAction, WorldPosition};
use tracing::info;

use super::bootstrap::AppWiring;
use super::investigation::{InvestigationScene, SceneHost};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ConsoleCommand {
    Help,
    Scenes,
    Switch { key: String },
    Clues,
    Inspect { index: usize },
    Corpse,
    Book,
    Npcs,
    Map,
    GotoClue { index: usize },
    GotoCorpse,
    GotoNpc { npc_id: String },
    Talk { npc_id: String },
    Say { message: String },
    Bye,
    Tribunal { event_id: String },
    Testify { input: String },
    Choose { speaker: String },
    Auto,
    Adjourn,
    Quit,
}

pub(crate) fn parse_command(line: &str) -> Result<ConsoleCommand, String> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Err("empty command".to_string());
    };
    let rest = |parts: std::str::SplitWhitespace<'_>| parts.collect::<Vec<_>>().join(" ");

    match head {
        "help" => Ok(ConsoleCommand::Help),
        "scenes" => Ok(ConsoleCommand::Scenes),
        "switch" => match parts.next() {
            Some(key) => Ok(ConsoleCommand::Switch {
                key: key.to_string(),
            }),
            None => Err("usage: switch <scene_key>".to_string()),
        },
        "clues" => Ok(ConsoleCommand::Clues),
        "inspect" => parse_index(parts.next()).map(|index| ConsoleCommand::Inspect { index }),
        "corpse" => Ok(ConsoleCommand::Corpse),
        "book" => Ok(ConsoleCommand::Book),
        "npcs" => Ok(ConsoleCommand::Npcs),
        "map" => Ok(ConsoleCommand::Map),
        "goto" => match parts.next() {
            Some("clue") => parse_index(parts.next()).map(|index| ConsoleCommand::GotoClue { index }),
            Some("corpse") => Ok(ConsoleCommand::GotoCorpse),
            Some("npc") => match parts.next() {
                Some(npc_id) => Ok(ConsoleCommand::GotoNpc {
                    npc_id: npc_id.to_string(),
                }),
                None => Err("usage: goto npc <npc_id>".to_string()),
            },
            _ => Err("usage: goto clue <n> | goto corpse | goto npc <npc_id>".to_string()),
        },
        "talk" => match parts.next() {
            Some(npc_id) => Ok(ConsoleCommand::Talk {
                npc_id: npc_id.to_string(),
            }),
            None => Err("usage: talk <npc_id>".to_string()),
        },
        "say" => {
            let message = rest(parts);
            if message.is_empty() {
                Err("usage: say <message>".to_string())
            } else {
                Ok(ConsoleCommand::Say { message })
            }
        }
        "bye" => Ok(ConsoleCommand::Bye),
        "tribunal" => match parts.next() {
            Some(event_id) => Ok(ConsoleCommand::Tribunal {
                event_id: event_id.to_string(),
            }),
            None => Err("usage: tribunal <event_id>".to_string()),
        },
        "testify" => {
            let input = rest(parts);
            if input.is_empty() {
                Err("usage: testify <statement>".to_string())
            } else {
                Ok(ConsoleCommand::Testify { input })
            }
        }
        "choose" => match parts.next() {
            Some(speaker) => Ok(ConsoleCommand::Choose {
                speaker: speaker.to_string(),
            }),
            None => Err("usage: choose <npc_id>".to_string()),
        },
        "auto" => Ok(ConsoleCommand::Auto),
        "adjourn" => Ok(ConsoleCommand::Adjourn),
        "quit" | "exit" => Ok(ConsoleCommand::Quit),
        other => Err(format!("unknown command '{other}' (try 'help')")),
    }
}

fn parse_index(token: Option<&str>) -> Result<usize, String> {
    token
        .ok_or_else(|| "missing index".to_string())?
        .parse::<usize>()
        .map_err(|_| "index must be a number".to_string())
}

pub(crate) fn run_console(wiring: AppWiring) -> Result<(), String> {
    let AppWiring {
        registry,
        mut clue_source,
        mut clue_log,
        mut dialogue,
        mut tribunal,
        initial_scene,
    } = wiring;

    let mut rng = rand::rng();
    let mut sink = NotificationBuffer::new();
    let mut host = SceneHost::new(registry, &initial_scene, &mut clue_source, &mut rng, &mut sink);
    print_notifications(&mut sink);
    print_scene_banner(host.scene());
    println!("Type 'help' for commands.");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout()
            .flush()
            .map_err(|error| format!("flush stdout: {error}"))?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.map_err(|error| format!("read stdin: {error}"))?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(error) => {
                println!("error: {error}");
                continue;
            }
        };
        if command == ConsoleCommand::Quit {
            break;
        }

        execute(
            command,
            &mut host,
            &mut clue_source,
            &mut clue_log,
            &mut dialogue,
            &mut tribunal,
            &mut rng,
            &mut sink,
        );
        print_notifications(&mut sink);
    }

    info!("console_session_ended");
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn execute(
    command: ConsoleCommand,
    host: &mut SceneHost,
    clue_source: &mut super::services::FileClueSource,
    clue_log: &mut super::services::FileClueLog,
    dialogue: &mut super::services::OfflineDialogueService,
    tribunal: &mut super::services::FileTribunalService,
    rng: &mut impl rand::Rng,
    sink: &mut NotificationBuffer,
) {
    match command {
        ConsoleCommand::Help => print_help(),
        ConsoleCommand::Scenes => {
            let active = host.scene().key().to_string();
            for config in host.scene_catalog() {
                let marker = if config.key == active { "*" } else { " " };
                println!("{marker} {} — {} ({})", config.key, config.display_name, config.summary);
            }
        }
        ConsoleCommand::Switch { key } => {
            if host.switch_to(&key, clue_source, rng, sink) {
                print_scene_banner(host.scene());
            }
        }
        ConsoleCommand::Clues => {
            for (index, placement) in host.scene().placements().iter().enumerate() {
                let state = if placement.collected { "collected" } else { "lit" };
                println!(
                    "[{index}] {} ({:.0},{:.0}) — {state}",
                    placement.info.area, placement.position.x, placement.position.y
                );
            }
            if host.scene().corpse_clue().is_some() {
                println!("[corpse] something lies here worth inspecting");
            }
        }
        ConsoleCommand::Inspect { index } => {
            host.scene_mut().inspect_clue(index, clue_log, sink);
        }
        ConsoleCommand::Corpse => {
            host.scene_mut().inspect_corpse(clue_log, sink);
        }
        ConsoleCommand::Book => {
            let entries = host.scene().memory_book();
            if entries.is_empty() {
                println!("The memory book is empty.");
            }
            for entry in entries {
                println!("{} — {}: {}", entry.area, entry.beast, entry.text);
            }
        }
        ConsoleCommand::Npcs => {
            for actor in host.scene().actors().actors() {
                println!(
                    "{} ({:?}) at ({:.0},{:.0})",
                    actor.id, actor.kind, actor.position.x, actor.position.y
                );
            }
        }
        ConsoleCommand::Map => {
            let minimap = host.scene().minimap();
            println!("{} [{}x{}]", minimap.title, minimap.grid_cols, minimap.grid_rows);
            for (index, area) in minimap.areas.iter().enumerate() {
                println!("  area {index}: {} (#{:06x})", area.name, area.color);
            }
            for marker in &minimap.markers {
                println!(
                    "  {:?} {} at ({:.2},{:.2})",
                    marker.kind, marker.id, marker.normalized_x, marker.normalized_y
                );
            }
        }
        ConsoleCommand::GotoClue { index } => {
            match host.scene().placements().get(index).map(|p| p.position) {
                Some(position) => walk_to(host.scene_mut(), position),
                None => println!("no clue [{index}] here"),
            }
        }
        ConsoleCommand::GotoCorpse => {
            let corpse = host.scene().config().corpse;
            match corpse {
                Some(corpse) => {
                    let position = host
                        .scene()
                        .config()
                        .grid
                        .resolve_spawn(Some(corpse.spawn), Default::default());
                    walk_to(host.scene_mut(), position);
                }
                None => println!("there is no corpse in this scene"),
            }
        }
        ConsoleCommand::GotoNpc { npc_id } => {
            match host.scene().actors().get(&npc_id).map(|actor| actor.position) {
                Some(position) => walk_to(host.scene_mut(), position),
                None => println!("no actor '{npc_id}' in this scene"),
            }
        }
        ConsoleCommand::Talk { npc_id } => match host.scene_mut().open_dialogue(&npc_id) {
            Ok(exchange) => {
                println!("[{}] {}", exchange.npc_name(), exchange.history()[0].text);
            }
            Err(error) => println!("error: {error}"),
        },
        ConsoleCommand::Say { message } => {
            match host.scene_mut().send_dialogue(&message, dialogue) {
                Ok(reply) => {
                    let npc_name = host
                        .scene()
                        .dialogue()
                        .map(|exchange| exchange.npc_name().to_string())
                        .unwrap_or_default();
                    println!("[{npc_name}] {reply}");
                }
                Err(error) => println!("error: {error}"),
            }
        }
        ConsoleCommand::Bye => {
            host.scene_mut().close_dialogue();
            println!("You step back from the conversation.");
        }
        ConsoleCommand::Tribunal { event_id } => {
            match host.open_tribunal(&event_id, tribunal, sink) {
                Ok(()) => print_transcript(host),
                Err(error) => println!("error: {error}"),
            }
        }
        ConsoleCommand::Testify { input } => {
            run_tribunal_action(host, tribunal, sink, TribunalAction::Player { input })
        }
        ConsoleCommand::Choose { speaker } => {
            run_tribunal_action(host, tribunal, sink, TribunalAction::Choose { speaker })
        }
        ConsoleCommand::Auto => run_tribunal_action(host, tribunal, sink, TribunalAction::Auto),
        ConsoleCommand::Adjourn => {
            host.tribunal_mut().close();
            println!("The tribunal is adjourned.");
        }
        ConsoleCommand::Quit => {}
    }
}

fn run_tribunal_action(
    host: &mut SceneHost,
    tribunal: &mut super::services::FileTribunalService,
    sink: &mut NotificationBuffer,
    action: TribunalAction,
) {
    match host.tribunal_act(action, tribunal, sink) {
        Ok(()) => {
            if let Some(line) = host.tribunal().latest_line() {
                println!("[{}] {}", line.speaker, line.text);
            }
        }
        Err(error) => println!("error: {error}"),
    }
}

fn print_transcript(host: &SceneHost) {
    let session = host.tribunal();
    if let Some(event) = session.event() {
        println!("== {} ==", event.name);
    }
    for line in session.transcript() {
        println!("[{}] {}", line.speaker, line.text);
    }
}

fn walk_to(scene: &mut InvestigationScene, position: WorldPosition) {
    scene.move_player_to(position);
    println!("You walk to ({:.0},{:.0}).", position.x, position.y);
}

fn print_scene_banner(scene: &InvestigationScene) {
    let config = scene.config();
    println!("== {} ==", config.display_name);
    println!("{}", config.summary);
}

fn print_notifications(sink: &mut NotificationBuffer) {
    for notification in sink.drain() {
        match notification {
            Notification::Toast { message, warning } => {
                if warning {
                    println!("! {message}");
                } else {
                    println!("* {message}");
                }
            }
            Notification::ClueRecorded { entry } => {
                println!("* New clue: {} — {}: {}", entry.area, entry.beast, entry.text);
            }
            Notification::ClueAlreadyRecorded { .. } => {}
            Notification::TranscriptUpdated { lines } => {
                println!("* Transcript now has {lines} lines.");
            }
            Notification::SceneSwitched { from, to } => {
                println!("* Leaving {from} for {to}...");
            }
            Notification::LedgerRestored { entries } => {
                println!("* Memory book restored with {entries} clues.");
            }
        }
    }
}

fn print_help() {
    println!(
        "scenes | switch <key> | clues | inspect <n> | corpse | book | npcs | map\n\
         goto clue <n> | goto corpse | goto npc <id>\n\
         talk <npc_id> | say <message> | bye\n\
         tribunal <event_id> | testify <statement> | choose <npc_id> | auto | adjourn\n\
         quit"
    );
}
