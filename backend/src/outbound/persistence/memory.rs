//! In-memory persistence used by tests and ephemeral deployments.

use std::sync::Mutex;

use crate::domain::document::Document;
use crate::domain::ports::{DocumentPersistence, PersistenceError};

/// Keeps the "durable" copy in memory so suites can assert on exactly what
/// a real adapter would have written.
#[derive(Default)]
pub struct InMemoryPersistence {
    document: Mutex<Option<Document>>,
}

impl InMemoryPersistence {
    /// The last persisted document, if any.
    pub fn document(&self) -> Option<Document> {
        self.document.lock().ok().and_then(|guard| guard.clone())
    }
}

impl DocumentPersistence for InMemoryPersistence {
    fn load(&self) -> Result<Option<Document>, PersistenceError> {
        self.document
            .lock()
            .map(|guard| guard.clone())
            .map_err(|_| PersistenceError::read("persistence mutex poisoned"))
    }

    fn persist(&self, document: &Document) -> Result<(), PersistenceError> {
        self.document
            .lock()
            .map(|mut guard| *guard = Some(document.clone()))
            .map_err(|_| PersistenceError::write("persistence mutex poisoned"))
    }
}
