use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::{info, warn};

use super::{PlayerRecord, RecordBook, RecordStore};
use crate::error::Error;
use crate::game::SessionResult;

/// Result of folding one session into the record book
#[derive(Debug)]
pub enum Applied {
    /// The session had no player name
    Skipped,
    Saved(PlayerRecord),
    /// Updated in memory, but the store rejected the write
    Unsaved(PlayerRecord, Error),
}

/// Read-only view of the live record book.
///
/// Safe to hold on the presentation side; every read is an owned copy.
#[derive(Debug, Clone)]
pub struct SharedRecords {
    inner: Arc<RwLock<RecordBook>>,
}

impl SharedRecords {
    pub fn snapshot(&self) -> RecordBook {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Folds finished sessions into player records and flushes every change
pub struct RecordAggregator<S> {
    store: S,
    records: Arc<RwLock<RecordBook>>,
    /// Held for a whole update so books reach the store in update order
    saving: Mutex<()>,
}

impl<S: RecordStore> RecordAggregator<S> {
    /// Load the book from `store`.
    ///
    /// If the store can't be read the aggregator starts with an empty book
    /// and the load error is handed back for the caller to report.
    pub fn open(store: S) -> (Self, Option<Error>) {
        match store.load() {
            Ok(book) => (Self::with_records(store, book), None),
            Err(e) => {
                warn!("Failed to load records: {}, starting empty", e);
                (Self::with_records(store, RecordBook::new()), Some(e))
            }
        }
    }

    pub fn with_records(store: S, book: RecordBook) -> Self {
        Self {
            store,
            records: Arc::new(RwLock::new(book)),
            saving: Mutex::new(()),
        }
    }

    pub fn shared(&self) -> SharedRecords {
        SharedRecords {
            inner: Arc::clone(&self.records),
        }
    }

    /// Add `result` to its player's record and persist the whole book.
    ///
    /// Readers of [`SharedRecords`] see the update before the save starts
    /// and are never blocked by store I/O.
    pub fn apply(&self, result: &SessionResult) -> Applied {
        if result.player.is_empty() {
            return Applied::Skipped;
        }

        let _saving = self.saving.lock().unwrap_or_else(PoisonError::into_inner);
        let (record, book) = {
            let mut book = self.records.write().unwrap_or_else(PoisonError::into_inner);
            let record = book.get_or_insert(&result.player);
            record.absorb(result);
            let record = *record;
            (record, book.clone())
        };

        info!(
            "Recorded game for {}: {} hits, {} misses (total {} / {} over {} games)",
            result.player,
            result.score,
            result.missed,
            record.total_score,
            record.total_missed,
            record.games_played
        );

        match self.store.save(&book) {
            Ok(()) => Applied::Saved(record),
            Err(e) => {
                warn!("Failed to save records: {}", e);
                Applied::Unsaved(record, e)
            }
        }
    }
}
