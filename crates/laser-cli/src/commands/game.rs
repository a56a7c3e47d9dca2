//! Shared game loop for `play` and `replay`.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use anyhow::{Result, bail};
use laser_core::{
    ChannelPresenter, Config, ExitReason, IngestionLoop, JsonFileStore, LineSource, Notification,
    PlayerName, RecordAggregator, SessionMachine, SharedRecords,
};
use tracing::{debug, info};

use crate::input;
use crate::view::{ConsoleView, UiEvent, format_records_table};

const UI_POLL: Duration = Duration::from_millis(100);

/// Run one game session against `source` until the stream ends or the
/// user quits.
pub fn run<S>(
    source: S,
    player: PlayerName,
    config: &Config,
) -> Result<()>
where
    S: LineSource + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<UiEvent>();
    let mut view = ConsoleView::new(player.clone());

    let (aggregator, load_error) = RecordAggregator::open(JsonFileStore::new(&config.records.path));
    let records = aggregator.shared();

    println!("{}", view.header());
    if let Some(e) = load_error {
        println!("{}", view.apply(&Notification::StoreError(e.to_string())));
    }

    info!("Listening on {}", source.describe());
    let ingest = IngestionLoop::new(
        source,
        SessionMachine::new(player),
        ChannelPresenter::new(tx.clone()),
        aggregator,
    );
    let cancel = ingest.cancel_token();

    let cancel_ctrlc = cancel.clone();
    ctrlc::set_handler(move || {
        info!("Received Ctrl+C, stopping...");
        cancel_ctrlc.cancel();
    })?;
    let keyboard = input::spawn_keyboard_monitor(cancel.clone(), tx);
    let handle = ingest.start()?;
    println!("Press q or Esc to quit, r to show records.");

    // Render until the ingestion thread exits (stream ended, device lost,
    // or the user quit)
    while !handle.is_finished() {
        match rx.recv_timeout(UI_POLL) {
            Ok(event) => render(&mut view, &records, event),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    // Stops the keyboard monitor when the stream ended on its own
    cancel.cancel();
    let outcome = handle.join();
    for event in rx.try_iter() {
        render(&mut view, &records, event);
    }
    if keyboard.join().is_err() {
        debug!("Keyboard monitor panicked");
    }

    match outcome.map(|o| o.reason) {
        Some(ExitReason::Cancelled) | Some(ExitReason::EndOfStream) => Ok(()),
        Some(reason) => bail!("game ended: {}", reason),
        None => bail!("game ended unexpectedly"),
    }
}

fn render(view: &mut ConsoleView, records: &SharedRecords, event: UiEvent) {
    match event {
        UiEvent::Game(notification) => println!("{}", view.apply(&notification)),
        UiEvent::ShowRecords => println!("{}", format_records_table(&records.snapshot())),
    }
}
