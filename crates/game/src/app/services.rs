//! File-backed adapters for the engine's remote ports. These stand in for
//! the HTTP backend when playing offline: datasets come from `assets/`, the
//! clue log is appended under `cache/`, and tribunal lines are synthesized
//! deterministically from the event file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use engine::{
    ClueDataset, ClueEntry, ClueLogSink, ClueSource, DialogueReply, DialogueRequest,
    DialogueService, HistoryLine, OverridePayload, RawHistoryLine, TransportError,
    TribunalActRequest, TribunalActResponse, TribunalEvent, TribunalEventResponse,
    TribunalService,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

/// The backend keeps only the most recent transcript window.
const HISTORY_WINDOW: usize = 30;
/// How far back speaker selection looks for mentioned suspects.
const MENTION_WINDOW: usize = 8;
const JUDGE_SPEAKER: &str = "Judge";

pub(crate) struct FileClueSource {
    base_path: PathBuf,
    override_path: PathBuf,
}

impl FileClueSource {
    pub(crate) fn new(base_path: PathBuf, override_path: PathBuf) -> Self {
        Self {
            base_path,
            override_path,
        }
    }
}

impl ClueSource for FileClueSource {
    fn fetch_base(&mut self) -> Result<ClueDataset, TransportError> {
        let raw = fs::read_to_string(&self.base_path).map_err(|error| {
            TransportError::Unavailable(format!(
                "read '{}': {error}",
                self.base_path.display()
            ))
        })?;
        parse_json(&raw).map_err(TransportError::Malformed)
    }

    fn fetch_overrides(&mut self) -> Result<Option<OverridePayload>, TransportError> {
        let raw = match fs::read_to_string(&self.override_path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => {
                return Err(TransportError::Unavailable(format!(
                    "read '{}': {error}",
                    self.override_path.display()
                )))
            }
        };
        parse_json(&raw)
            .map(Some)
            .map_err(TransportError::Malformed)
    }
}

/// Appends discovered clues to a JSON log, written atomically so a crash
/// cannot leave a truncated file. An unreadable log starts over empty.
pub(crate) struct FileClueLog {
    path: PathBuf,
}

impl FileClueLog {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_existing(&self) -> Vec<ClueEntry> {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_default()
    }
}

impl ClueLogSink for FileClueLog {
    fn log_clue(&mut self, entry: &ClueEntry) -> Result<(), TransportError> {
        let mut log = self.read_existing();
        log.push(entry.clone());
        let json = serde_json::to_string_pretty(&log)
            .map_err(|error| TransportError::Malformed(format!("encode clue log: {error}")))?;
        write_text_atomic(&self.path, &json).map_err(|error| {
            TransportError::Unavailable(format!("write '{}': {error}", self.path.display()))
        })?;
        debug!(path = %self.path.display(), entries = log.len(), "clue_logged");
        Ok(())
    }
}

/// Reports unavailability so the engine's local reply generator engages.
pub(crate) struct OfflineDialogueService;

impl DialogueService for OfflineDialogueService {
    fn chat(&mut self, _request: &DialogueRequest<'_>) -> Result<DialogueReply, TransportError> {
        Err(TransportError::Unavailable(
            "dialogue service not configured".to_string(),
        ))
    }
}

#[derive(Debug, Deserialize)]
struct StoredEvent {
    #[serde(flatten)]
    event: TribunalEvent,
    #[serde(default)]
    game_logs: Vec<RawHistoryLine>,
}

/// Offline stand-in for the tribunal backend: events come from a JSON file,
/// speaker selection follows the moderator's rotation rules deterministically,
/// and trial lines are synthesized from the event's clues.
pub(crate) struct FileTribunalService {
    events_path: PathBuf,
}

impl FileTribunalService {
    pub(crate) fn new(events_path: PathBuf) -> Self {
        Self { events_path }
    }

    fn load_events(&self) -> Result<Vec<StoredEvent>, TransportError> {
        let raw = fs::read_to_string(&self.events_path).map_err(|error| {
            TransportError::Unavailable(format!(
                "read '{}': {error}",
                self.events_path.display()
            ))
        })?;
        parse_json(&raw).map_err(TransportError::Malformed)
    }

    fn find_event(&self, event_id: &str) -> Result<StoredEvent, TransportError> {
        self.load_events()?
            .into_iter()
            .find(|stored| stored.event.id == event_id)
            .ok_or_else(|| TransportError::NotFound(event_id.to_string()))
    }
}

impl TribunalService for FileTribunalService {
    fn fetch_event(&mut self, event_id: &str) -> Result<TribunalEventResponse, TransportError> {
        let stored = self.find_event(event_id)?;
        Ok(TribunalEventResponse {
            event: stored.event,
            history: stored.game_logs,
        })
    }

    fn act(
        &mut self,
        request: &TribunalActRequest<'_>,
    ) -> Result<TribunalActResponse, TransportError> {
        let stored = self.find_event(request.event_id)?;
        let event = &stored.event;
        if event.npcs.is_empty() {
            return Ok(rejected("event has no speakers"));
        }

        let mut history: Vec<HistoryLine> = request
            .history
            .iter()
            .rev()
            .take(HISTORY_WINDOW)
            .rev()
            .cloned()
            .collect();

        if request.action == "player" {
            let Some(input) = request.player_input.map(str::trim).filter(|s| !s.is_empty())
            else {
                return Ok(rejected("Player input required"));
            };
            history.push(HistoryLine::new(JUDGE_SPEAKER, input));
        }

        let speaker = if request.action == "choose" {
            request
                .speaker
                .filter(|speaker| event.npcs.iter().any(|npc| npc == speaker))
                .unwrap_or(event.npcs[0].as_str())
                .to_string()
        } else {
            next_speaker(event, &history)
        };

        let line = synthesize_line(event, &speaker, &history);
        history.push(HistoryLine::new(speaker, line));
        if history.len() > HISTORY_WINDOW {
            history.drain(..history.len() - HISTORY_WINDOW);
        }

        Ok(TribunalActResponse {
            success: true,
            history: history
                .into_iter()
                .map(|line| RawHistoryLine::WellFormed {
                    speaker: line.speaker,
                    text: line.text,
                })
                .collect(),
            error: None,
        })
    }
}

fn rejected(reason: &str) -> TribunalActResponse {
    TribunalActResponse {
        success: false,
        history: Vec::new(),
        error: Some(reason.to_string()),
    }
}

/// Moderator rotation: prefer the suspect mentioned most recently, never the
/// one who just spoke; otherwise advance through the roster.
fn next_speaker(event: &TribunalEvent, history: &[HistoryLine]) -> String {
    let last_npc_speaker = history
        .iter()
        .rev()
        .find(|line| event.npcs.iter().any(|npc| npc == &line.speaker))
        .map(|line| line.speaker.clone());

    let recent = history.iter().rev().take(MENTION_WINDOW);
    let mut mentioned: Option<&str> = None;
    for line in recent {
        let lowered = line.text.to_lowercase();
        for npc in &event.npcs {
            if lowered.contains(npc.as_str()) && Some(npc.as_str()) != last_npc_speaker.as_deref() {
                mentioned = Some(npc.as_str());
                break;
            }
        }
        if mentioned.is_some() {
            break;
        }
    }
    if let Some(npc) = mentioned {
        return npc.to_string();
    }

    match last_npc_speaker {
        Some(last) => {
            let index = event
                .npcs
                .iter()
                .position(|npc| npc == &last)
                .unwrap_or(0);
            event.npcs[(index + 1) % event.npcs.len()].clone()
        }
        None => event.npcs[0].clone(),
    }
}

/// Deterministic trial line referencing the event's clues in rotation.
fn synthesize_line(event: &TribunalEvent, speaker: &str, history: &[HistoryLine]) -> String {
    let clue = if event.p_clues.is_empty() {
        None
    } else {
        event.p_clues[history.len() % event.p_clues.len()].display_text()
    };

    match (history.len() % 3, clue) {
        (0, Some(clue)) => format!("You call \"{clue}\" evidence? I can explain it, Judge."),
        (1, Some(clue)) => {
            format!("Ask the others about \"{clue}\" before you point your gavel at me.")
        }
        (_, Some(clue)) => format!("I, {speaker}, saw nothing that night. \"{clue}\" proves it."),
        (0, None) => "The eclipse hides more than it shows, Judge.".to_string(),
        (1, None) => "I answer only to the moon, not to this court.".to_string(),
        (_, None) => format!("{speaker} has nothing further to say."),
    }
}

fn parse_json<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, T>(&mut deserializer) {
        Ok(value) => Ok(value),
        Err(error) => {
            let path = error.path().to_string();
            let source = error.into_inner();
            if path.is_empty() || path == "." {
                Err(format!("parse json: {source}"))
            } else {
                Err(format!("parse json at {path}: {source}"))
            }
        }
    }
}

fn write_text_atomic(path: &Path, text: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = temp_path_for(path);
    fs::write(&tmp_path, text)?;
    replace_file(&tmp_path, path)
}

fn replace_file(tmp_path: &Path, final_path: &Path) -> io::Result<()> {
    match fs::remove_file(final_path) {
        Ok(_) => {}
        Err(error) if error.kind() == io::ErrorKind::NotFound => {}
        Err(error) => {
            let _ = fs::remove_file(tmp_path);
            return Err(error);
        }
    }

    if let Err(error) = fs::rename(tmp_path, final_path) {
        let _ = fs::remove_file(tmp_path);
        return Err(error);
    }
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("log.tmp");
    let tmp_name = format!("{file_name}.tmp");
    match path.parent() {
        Some(parent) => parent.join(tmp_name),
        None => PathBuf::from(tmp_name),
    }
}

#[cfg(test)]
mod tests {
    use engine::normalize_history;
    use tempfile::TempDir;

    use super::*;

    fn write(path: &Path, content: &str) {
        fs::write(path, content).expect("write fixture");
    }

    fn events_fixture(dir: &Path) -> PathBuf {
        let path = dir.join("events.json");
        write(
            &path,
            r#"[{
                "id": "moon_eclipse_tribunal",
                "name": "The Bleeding Altar",
                "description": "Who bled the altar dry?",
                "npcs": ["bifang", "kui", "jiuweihu"],
                "p_clues": [{"text": "a trail of white fur"}, {"clue": "two puncture wounds"}],
                "game_logs": [
                    {"speaker": "Judge", "text": "The tribunal convenes."},
                    {"jiuweihu": "How curious you all are."}
                ]
            }]"#,
        );
        path
    }

    #[test]
    fn clue_source_returns_none_for_missing_override_file() {
        let temp = TempDir::new().expect("temp");
        let base_path = temp.path().join("clues.json");
        write(
            &base_path,
            r#"{"locations": [{"name": "Qingqiu Village", "beast": "jiuweihu", "clues": [{"clue": "fur"}]}]}"#,
        );

        let mut source =
            FileClueSource::new(base_path, temp.path().join("crime_clues.json"));
        let base = source.fetch_base().expect("base");
        assert_eq!(base.locations.len(), 1);
        assert_eq!(source.fetch_overrides().expect("overrides"), None);
    }

    #[test]
    fn clue_source_reports_json_path_on_malformed_base() {
        let temp = TempDir::new().expect("temp");
        let base_path = temp.path().join("clues.json");
        write(&base_path, r#"{"locations": [{"beast": "jiuweihu"}]}"#);

        let mut source = FileClueSource::new(base_path, temp.path().join("missing.json"));
        let error = source.fetch_base().expect_err("malformed");
        let TransportError::Malformed(message) = error else {
            panic!("expected malformed error");
        };
        assert!(message.contains("locations"));
    }

    #[test]
    fn clue_log_appends_across_calls_and_survives_garbage() {
        let temp = TempDir::new().expect("temp");
        let path = temp.path().join("cache").join("discovered_clues.json");
        let mut log = FileClueLog::new(path.clone());

        let entry = ClueEntry {
            area: "Qingqiu Village".to_string(),
            beast: "jiuweihu".to_string(),
            text: "a trail of white fur".to_string(),
            timestamp_ms: 1,
        };
        log.log_clue(&entry).expect("first");
        log.log_clue(&ClueEntry {
            text: "two puncture wounds".to_string(),
            timestamp_ms: 2,
            ..entry.clone()
        })
        .expect("second");

        let stored: Vec<ClueEntry> =
            serde_json::from_str(&fs::read_to_string(&path).expect("read")).expect("parse");
        assert_eq!(stored.len(), 2);

        write(&path, "not json");
        log.log_clue(&entry).expect("restart");
        let stored: Vec<ClueEntry> =
            serde_json::from_str(&fs::read_to_string(&path).expect("read")).expect("parse");
        assert_eq!(stored.len(), 1);
    }

    #[test]
    fn tribunal_fetch_returns_event_with_legacy_history_shapes() {
        let temp = TempDir::new().expect("temp");
        let mut service = FileTribunalService::new(events_fixture(temp.path()));

        let response = service.fetch_event("moon_eclipse_tribunal").expect("event");
        assert_eq!(response.event.npcs.len(), 3);
        let history = normalize_history(response.history);
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].speaker, "jiuweihu");

        let missing = service.fetch_event("no_such_event").expect_err("missing");
        assert!(matches!(missing, TransportError::NotFound(_)));
    }

    #[test]
    fn player_action_appends_judge_line_then_a_suspect_line() {
        let temp = TempDir::new().expect("temp");
        let mut service = FileTribunalService::new(events_fixture(temp.path()));

        let response = service
            .act(&TribunalActRequest {
                event_id: "moon_eclipse_tribunal",
                action: "player",
                history: &[],
                speaker: None,
                player_input: Some("Kui, where were you at moonrise?"),
            })
            .expect("act");
        assert!(response.success);

        let history = normalize_history(response.history);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].speaker, "Judge");
        // The accused suspect is put on the stand.
        assert_eq!(history[1].speaker, "kui");
    }

    #[test]
    fn player_action_without_input_is_rejected_not_crashed() {
        let temp = TempDir::new().expect("temp");
        let mut service = FileTribunalService::new(events_fixture(temp.path()));

        let response = service
            .act(&TribunalActRequest {
                event_id: "moon_eclipse_tribunal",
                action: "player",
                history: &[],
                speaker: None,
                player_input: None,
            })
            .expect("act");
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("Player input required"));
    }

    #[test]
    fn auto_rotation_never_repeats_the_previous_speaker() {
        let temp = TempDir::new().expect("temp");
        let mut service = FileTribunalService::new(events_fixture(temp.path()));

        let history = vec![HistoryLine::new("bifang", "It was not my flame.")];
        let response = service
            .act(&TribunalActRequest {
                event_id: "moon_eclipse_tribunal",
                action: "auto",
                history: &history,
                speaker: None,
                player_input: None,
            })
            .expect("act");
        let normalized = normalize_history(response.history);
        let latest = normalized.last().expect("line");
        assert_ne!(latest.speaker, "bifang");
    }

    #[test]
    fn chosen_speaker_outside_the_roster_falls_back_to_the_first() {
        let temp = TempDir::new().expect("temp");
        let mut service = FileTribunalService::new(events_fixture(temp.path()));

        let response = service
            .act(&TribunalActRequest {
                event_id: "moon_eclipse_tribunal",
                action: "choose",
                history: &[],
                speaker: Some("xiangliu"),
                player_input: None,
            })
            .expect("act");
        let normalized = normalize_history(response.history);
        assert_eq!(normalized.last().expect("line").speaker, "bifang");
    }

    #[test]
    fn history_is_truncated_to_the_transcript_window() {
        let temp = TempDir::new().expect("temp");
        let mut service = FileTribunalService::new(events_fixture(temp.path()));

        let history: Vec<HistoryLine> = (0..40)
            .map(|index| HistoryLine::new("Judge", format!("statement {index}")))
            .collect();
        let response = service
            .act(&TribunalActRequest {
                event_id: "moon_eclipse_tribunal",
                action: "auto",
                history: &history,
                speaker: None,
                player_input: None,
            })
            .expect("act");
        assert_eq!(normalize_history(response.history).len(), HISTORY_WINDOW);
    }
}
