//! End-to-end tests for the ingestion pipeline.
//!
//! Device output is replayed from in-memory buffers through the same
//! source, state machine, aggregator and file store the CLI uses.

use std::io::Cursor;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use laser_core::{
    ChannelPresenter, ExitReason, IngestOutcome, IngestionLoop, JsonFileStore, Notification,
    PlayerName, PlayerRecord, RecordAggregator, RecordBook, RecordStore, ReaderSource,
    SerialSource, SessionMachine, SessionResult,
};
use tempfile::TempDir;

fn run_capture(
    player: &str,
    capture: &[u8],
    store: JsonFileStore,
) -> (IngestOutcome, Vec<Notification>) {
    let source = ReaderSource::new("capture", Cursor::new(capture.to_vec()));
    run_source(player, source, store)
}

fn run_source<S: laser_core::LineSource>(
    player: &str,
    source: S,
    store: JsonFileStore,
) -> (IngestOutcome, Vec<Notification>) {
    let (tx, rx): (_, Receiver<Notification>) = mpsc::channel();
    let (aggregator, load_error) = RecordAggregator::open(store);
    assert!(load_error.is_none());

    let outcome = IngestionLoop::new(
        source,
        SessionMachine::new(PlayerName::new(player).unwrap()),
        ChannelPresenter::new(tx),
        aggregator,
    )
    .run();

    (outcome, rx.try_iter().collect())
}

fn finished_sessions(notifications: &[Notification]) -> Vec<SessionResult> {
    notifications
        .iter()
        .filter_map(|n| match n {
            Notification::SessionFinished(result, _) => Some(result.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_scenario_single_session_on_empty_store() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("game_records.json");

    let (outcome, notifications) = run_capture(
        "Alice",
        b"noise\nGAME START\nHIT\nHIT\nMISS\nGAME STOP\n",
        JsonFileStore::new(&path),
    );

    assert_eq!(outcome.reason, ExitReason::EndOfStream);
    assert_eq!(
        finished_sessions(&notifications),
        vec![SessionResult {
            player: "Alice".to_string(),
            score: 2,
            missed: 1,
        }]
    );

    let book = JsonFileStore::new(&path).load().unwrap();
    assert_eq!(
        book.get("Alice"),
        Some(&PlayerRecord {
            total_score: 2,
            total_missed: 1,
            games_played: 1,
        })
    );
}

#[test]
fn test_scenario_stop_without_start() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("game_records.json");

    let (outcome, notifications) = run_capture("Alice", b"GAME STOP\n", JsonFileStore::new(&path));

    assert_eq!(outcome.reason, ExitReason::EndOfStream);
    assert!(notifications.is_empty());
    assert!(!path.exists());
}

#[test]
fn test_scenario_device_missing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("game_records.json");
    let mut existing = RecordBook::new();
    existing.insert(
        "Alice".to_string(),
        PlayerRecord {
            total_score: 7,
            total_missed: 2,
            games_played: 3,
        },
    );
    JsonFileStore::new(&path).save(&existing).unwrap();

    let source = SerialSource::new(
        "/dev/laser-target-does-not-exist",
        9600,
        Duration::from_millis(50),
    );
    let (outcome, notifications) = run_source("Alice", source, JsonFileStore::new(&path));

    assert_eq!(outcome.reason, ExitReason::DeviceUnavailable);
    assert!(!outcome.session.is_running());
    assert_eq!(notifications.len(), 1);
    assert!(matches!(notifications[0], Notification::ConnectionError(_)));
    assert_eq!(JsonFileStore::new(&path).load().unwrap(), existing);
}

#[test]
fn test_scenario_two_sessions_same_player() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("game_records.json");

    run_capture(
        "Bob",
        b"GAME START\nHIT\nHIT\nHIT\nGAME STOP\n",
        JsonFileStore::new(&path),
    );
    let (_, notifications) = run_capture(
        "Bob",
        b"GAME START\r\nHIT\r\nMISS\r\nMISS\r\nGAME STOP\r\n",
        JsonFileStore::new(&path),
    );

    let expected = PlayerRecord {
        total_score: 4,
        total_missed: 2,
        games_played: 2,
    };
    assert_eq!(
        notifications.last(),
        Some(&Notification::SessionFinished(
            SessionResult {
                player: "Bob".to_string(),
                score: 1,
                missed: 2,
            },
            expected,
        ))
    );
    assert_eq!(JsonFileStore::new(&path).load().unwrap().get("Bob"), Some(&expected));
}

#[test]
fn test_sequential_results_match_combined_result() {
    let dir = TempDir::new().unwrap();
    let sequential_path = dir.path().join("sequential.json");
    let combined_path = dir.path().join("combined.json");

    run_capture(
        "Eve",
        b"GAME START\nHIT\nMISS\nGAME STOP\nGAME START\nHIT\nHIT\nMISS\nGAME STOP\n",
        JsonFileStore::new(&sequential_path),
    );
    let (aggregator, _) = RecordAggregator::open(JsonFileStore::new(&combined_path));
    aggregator.apply(&SessionResult {
        player: "Eve".to_string(),
        score: 3,
        missed: 2,
    });

    let sequential = JsonFileStore::new(&sequential_path).load().unwrap();
    let combined = JsonFileStore::new(&combined_path).load().unwrap();
    let (seq, comb) = (sequential.get("Eve").unwrap(), combined.get("Eve").unwrap());
    assert_eq!(seq.total_score, comb.total_score);
    assert_eq!(seq.total_missed, comb.total_missed);
    assert_eq!(seq.games_played, 2);
}

#[test]
fn test_noisy_device_output() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("game_records.json");

    let mut capture = Vec::new();
    capture.extend_from_slice(b"boot v1.2\n\n   \nHIT\n");
    capture.extend_from_slice(b"\xfe\xffGAME START\r\n");
    capture.extend_from_slice(b"target 2 HIT\nH\xc3IT\n");
    capture.extend_from_slice(&[b'#'; 2000]);
    capture.extend_from_slice(b"\nMISS\nGAME STOP");

    let (_, notifications) = run_capture("Zoë", &capture, JsonFileStore::new(&path));

    assert_eq!(
        finished_sessions(&notifications),
        vec![SessionResult {
            player: "Zoë".to_string(),
            score: 2,
            missed: 1,
        }]
    );
}
