//! # laser-core
//!
//! Core library for the laser target game host.
//!
//! This crate provides:
//! - Line framing and decoding for the board's serial output
//! - Event classification and the game session state machine
//! - The ingestion loop that connects a device to a presenter
//! - Per-player records and their persistence
//!
//! ## Wire format
//!
//! The board writes one token per line: `GAME START`, `GAME STOP`, `HIT`,
//! `MISS`. Anything else is ignored.

pub mod cancel;
pub mod config;
pub mod error;
pub mod game;
pub mod ingest;
pub mod presenter;
pub mod record;
pub mod source;

pub use cancel::CancelToken;
pub use config::{Config, DeviceConfig, RecordsConfig};
pub use error::{Error, Result};
pub use game::{
    Event, PlayerName, SessionMachine, SessionResult, SessionState, SessionStatus, Transition,
};
pub use ingest::{ExitReason, IngestHandle, IngestOutcome, IngestionLoop};
pub use presenter::{ChannelPresenter, Notification, Presenter};
pub use record::{
    Applied, JsonFileStore, MemoryStore, PlayerRecord, RecordAggregator, RecordBook,
    RecordStore, SharedRecords,
};
pub use source::{
    LineReader, LineSource, PacedSource, ReadLine, ReadLines, ReaderSource, SerialSource,
    available_ports,
};
