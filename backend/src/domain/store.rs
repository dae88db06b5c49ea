//! The document store: the only component allowed to mutate or persist
//! state.
//!
//! Transactions take the whole document. The contention surface is small
//! and callers always need cross-collection consistency (an invitation
//! credits two different users in one step), so a single exclusive
//! critical section replaces any per-record lock table. Dependent
//! read-then-write sequences must run inside one `transact` call; splitting
//! the check and the write across transactions reintroduces the races the
//! store exists to prevent.

use std::sync::{Arc, Mutex, MutexGuard};

use mockable::Clock;
use tracing::{error, info};

use super::document::Document;
use super::error::Error;
use super::ports::DocumentPersistence;

/// Mutex-guarded document plus its persistence port.
pub struct DocumentStore {
    document: Mutex<Document>,
    persistence: Arc<dyn DocumentPersistence>,
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore").finish_non_exhaustive()
    }
}

impl DocumentStore {
    /// Load the durable document, or seed a fresh one on first run.
    ///
    /// First run persists the seeded document immediately so a crash before
    /// the first transaction still leaves a well-formed file behind.
    /// Reopening an existing document never re-seeds; collections a newer
    /// build knows about deserialise as empty.
    pub fn open(
        persistence: Arc<dyn DocumentPersistence>,
        clock: &dyn Clock,
    ) -> Result<Self, Error> {
        let document = match persistence.load() {
            Ok(Some(document)) => document,
            Ok(None) => {
                let seeded = Document::seeded(clock.utc());
                persistence.persist(&seeded).map_err(|err| {
                    error!(error = %err, "failed to persist seeded document");
                    Error::internal("failed to initialise document store")
                })?;
                info!(posts = seeded.posts.len(), "seeded fresh document");
                seeded
            }
            Err(err) => {
                error!(error = %err, "failed to load document");
                return Err(Error::internal("failed to load document store"));
            }
        };
        Ok(Self {
            document: Mutex::new(document),
            persistence,
        })
    }

    /// Run `mutate` with exclusive access and persist the whole document on
    /// success.
    ///
    /// On an `Err` from `mutate` nothing is persisted for this attempt; the
    /// in-memory document keeps whatever `mutate` changed before failing,
    /// so callers validate before mutating, never after. A persist failure
    /// is fatal for the request and is never retried here: a blind retry
    /// could apply credits twice.
    pub fn transact<T>(
        &self,
        mutate: impl FnOnce(&mut Document) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let mut guard = self.lock()?;
        let value = mutate(&mut guard)?;
        self.persistence.persist(&guard).map_err(|err| {
            // In-memory state is now ahead of the durable copy; treat the
            // process as state-suspect.
            error!(error = %err, "document persist failed after commit");
            Error::internal("failed to persist document")
        })?;
        Ok(value)
    }

    /// Run `read` with shared access to the current document.
    ///
    /// No persist happens; use [`Self::transact`] for anything that writes.
    pub fn snapshot<T>(&self, read: impl FnOnce(&Document) -> T) -> Result<T, Error> {
        let guard = self.lock()?;
        Ok(read(&guard))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Document>, Error> {
        self.document.lock().map_err(|_| {
            error!("document store mutex poisoned");
            Error::internal("document store unavailable")
        })
    }
}
