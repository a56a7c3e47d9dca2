use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use super::RecordBook;
use crate::error::{Error, Result};

/// Durable storage for the record book
pub trait RecordStore {
    /// Read the whole book. Fails with `Error::StoreUnavailable`.
    fn load(&self) -> Result<RecordBook>;

    /// Replace the whole book. Fails with `Error::StoreWrite`.
    fn save(&self, records: &RecordBook) -> Result<()>;
}

/// Record book kept in a pretty-printed JSON file.
///
/// A missing file loads as an empty book. Saves go through a sibling
/// temporary file that is renamed over the target.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn unavailable(&self, message: impl ToString) -> Error {
        Error::StoreUnavailable {
            path: self.path.clone(),
            message: message.to_string(),
        }
    }

    fn write_error(&self, message: impl ToString) -> Error {
        Error::StoreWrite {
            path: self.path.clone(),
            message: message.to_string(),
        }
    }
}

impl RecordStore for JsonFileStore {
    fn load(&self) -> Result<RecordBook> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No record file at {}, starting empty", self.path.display());
                return Ok(RecordBook::new());
            }
            Err(e) => return Err(self.unavailable(e)),
        };

        let book: RecordBook = serde_json::from_str(&content).map_err(|e| self.unavailable(e))?;
        debug!(
            "Loaded {} player records from {}",
            book.len(),
            self.path.display()
        );
        Ok(book)
    }

    fn save(&self, records: &RecordBook) -> Result<()> {
        let content = serde_json::to_string_pretty(records).map_err(|e| self.write_error(e))?;

        let temp = self.temp_path();
        fs::write(&temp, content).map_err(|e| self.write_error(e))?;
        if let Err(e) = fs::rename(&temp, &self.path) {
            let _ = fs::remove_file(&temp);
            return Err(self.write_error(e));
        }

        debug!(
            "Saved {} player records to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Record store held in memory; clones share the same book.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    book: RecordBook,
    fail_writes: bool,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(book: RecordBook) -> Self {
        let store = Self::new();
        store.lock().book = book;
        store
    }

    /// Make every subsequent `save` fail
    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Last successfully saved book
    pub fn records(&self) -> RecordBook {
        self.lock().book.clone()
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.lock().saves
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryStoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RecordStore for MemoryStore {
    fn load(&self) -> Result<RecordBook> {
        Ok(self.records())
    }

    fn save(&self, records: &RecordBook) -> Result<()> {
        let mut inner = self.lock();
        if inner.fail_writes {
            return Err(Error::StoreWrite {
                path: PathBuf::from("<memory>"),
                message: "writes disabled".to_string(),
            });
        }
        inner.book = records.clone();
        inner.saves += 1;
        Ok(())
    }
}
