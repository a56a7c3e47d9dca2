//! Device ingestion loop.
//!
//! Runs on its own thread: reads lines from a [`LineSource`], classifies
//! them, drives the [`SessionMachine`] and reports every transition to a
//! [`Presenter`]. Finished sessions are folded into the record book.
//!
//! Each loop owns a [`CancelToken`]. It is checked before each bounded read
//! and again before acting on a line, so a stop request is honoured within
//! one read timeout and no event is processed after it.
//!
//! ## Example
//!
//! ```ignore
//! let ingest = IngestionLoop::new(source, machine, presenter, aggregator);
//! let cancel = ingest.cancel_token(); // e.g. for a Ctrl+C handler
//! let handle = ingest.start()?;
//! // ...
//! handle.stop();
//! let outcome = handle.join();
//! ```

use std::thread::{self, JoinHandle};

use strum::Display;
use tracing::{debug, error, info, warn};

use crate::cancel::CancelToken;
use crate::error::Result;
use crate::game::{Event, SessionMachine, SessionState, Transition};
use crate::presenter::Presenter;
use crate::record::{Applied, RecordAggregator, RecordStore};
use crate::source::{LineSource, ReadLine, ReadLines};

const THREAD_NAME: &str = "ingest";

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ExitReason {
    #[strum(serialize = "cancelled")]
    Cancelled,
    #[strum(serialize = "end of stream")]
    EndOfStream,
    #[strum(serialize = "device unavailable")]
    DeviceUnavailable,
    #[strum(serialize = "stream interrupted")]
    StreamInterrupted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOutcome {
    pub reason: ExitReason,
    /// Session state when the loop exited. A session interrupted mid-game is
    /// left as it was, still marked running.
    pub session: SessionState,
}

pub struct IngestionLoop<S, P, R> {
    source: S,
    machine: SessionMachine,
    presenter: P,
    aggregator: RecordAggregator<R>,
    cancel: CancelToken,
}

impl<S, P, R> IngestionLoop<S, P, R>
where
    S: LineSource,
    P: Presenter,
    R: RecordStore,
{
    pub fn new(
        source: S,
        machine: SessionMachine,
        presenter: P,
        aggregator: RecordAggregator<R>,
    ) -> Self {
        Self {
            source,
            machine,
            presenter,
            aggregator,
            cancel: CancelToken::new(),
        }
    }

    /// Token that stops this loop; may be cancelled before the loop starts
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Run the loop on a dedicated thread
    pub fn start(self) -> Result<IngestHandle>
    where
        S: Send + 'static,
        P: Send + 'static,
        R: Send + 'static,
    {
        let cancel = self.cancel.clone();
        let thread = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || self.run())?;
        Ok(IngestHandle { cancel, thread })
    }

    /// Run the loop on the current thread until it exits
    pub fn run(mut self) -> IngestOutcome {
        let reason = self.ingest();
        let session = self.machine.snapshot();
        info!(
            "Ingestion stopped ({}), last session: {} hits / {} misses",
            reason, session.score, session.missed
        );
        IngestOutcome { reason, session }
    }

    fn ingest(&mut self) -> ExitReason {
        let device = self.source.describe();
        let mut reader = match self.source.open(&self.cancel) {
            Ok(reader) => reader,
            Err(e) => {
                warn!("Could not open {}: {}", device, e);
                self.presenter.on_connection_error(&e.to_string());
                return ExitReason::DeviceUnavailable;
            }
        };
        debug!("Reading from {}", device);

        let reason = loop {
            if self.cancel.is_cancelled() {
                break ExitReason::Cancelled;
            }

            match reader.read_line() {
                Ok(ReadLine::Line(line)) => {
                    if self.cancel.is_cancelled() {
                        debug!("Dropping line received after stop request: {:?}", line);
                        break ExitReason::Cancelled;
                    }
                    self.process_line(&line);
                }
                Ok(ReadLine::Timeout) => continue,
                Ok(ReadLine::Eof) => break ExitReason::EndOfStream,
                Err(e) => {
                    error!("Lost connection to {}: {}", device, e);
                    self.presenter.on_stream_error(&e.to_string());
                    break ExitReason::StreamInterrupted;
                }
            }
        };

        drop(reader);
        debug!("Released {}", device);
        reason
    }

    fn process_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        let event = Event::classify(line);
        if event.is_recognized() {
            debug!("{} <- {:?}", event, line);
        }

        let Some(transition) = self.machine.handle(&event) else {
            return;
        };

        match transition {
            Transition::Started => {
                info!("Game started for {}", self.machine.state().player);
                self.presenter.on_status_changed(true);
            }
            Transition::Scored(score) => self.presenter.on_score_changed(score),
            Transition::Missed(missed) => self.presenter.on_missed_changed(missed),
            Transition::Stopped(result) => {
                info!(
                    "Game stopped for {}: {} hits, {} misses",
                    result.player, result.score, result.missed
                );
                self.presenter.on_status_changed(false);

                match self.aggregator.apply(&result) {
                    Applied::Skipped => {}
                    Applied::Saved(record) => {
                        self.presenter.on_session_finished(&result, &record);
                    }
                    Applied::Unsaved(record, e) => {
                        self.presenter.on_session_finished(&result, &record);
                        self.presenter.on_store_error(&e.to_string());
                    }
                }
            }
        }
    }
}

/// Handle to a running ingestion thread
pub struct IngestHandle {
    cancel: CancelToken,
    thread: JoinHandle<IngestOutcome>,
}

impl IngestHandle {
    /// Ask the loop to exit. Returns immediately; the loop notices within
    /// one read timeout.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the loop to exit.
    ///
    /// Returns `None` if the ingestion thread panicked.
    pub fn join(self) -> Option<IngestOutcome> {
        match self.thread.join() {
            Ok(outcome) => Some(outcome),
            Err(_) => {
                error!("Ingestion thread panicked");
                None
            }
        }
    }
}
