//! Cooperative cancellation for an ingestion run.
//!
//! The ingestion loop owns a [`CancelToken`] and hands clones to whoever may
//! need to stop it: the [`IngestHandle`](crate::IngestHandle), the CLI's
//! Ctrl+C and keyboard handlers, and readers that block for longer than one
//! device read (see [`PacedSource`](crate::PacedSource)).

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::debug;

/// Shared "stop reading" flag. Clones observe the same cancellation.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    cancelled: Mutex<bool>,
    wake: Condvar,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation and wake every paused reader
    pub fn cancel(&self) {
        let mut cancelled = self.lock();
        if !*cancelled {
            *cancelled = true;
            debug!("Ingestion cancelled");
        }
        self.inner.wake.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.lock()
    }

    /// Sleep for `duration` unless cancelled first.
    ///
    /// Returns `false` if the pause was cut short by cancellation.
    pub fn pause(&self, duration: Duration) -> bool {
        let guard = self.lock();
        let (guard, _) = self
            .inner
            .wake
            .wait_timeout_while(guard, duration, |cancelled| !*cancelled)
            .unwrap_or_else(PoisonError::into_inner);
        !*guard
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        self.inner
            .cancelled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
