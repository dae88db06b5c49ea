//! JSON file persistence with atomic replace.
//!
//! The whole document is serialised on every commit, written to a hidden
//! temporary file in the target directory, and renamed over the previous
//! copy so a crash mid-write can never leave a torn document behind.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::document::Document;
use crate::domain::ports::{DocumentPersistence, PersistenceError};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter storing the document as one JSON file.
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    /// Adapter writing to `path`; parent directories are created on the
    /// first persist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target path of the durable document.
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    fn temp_path(&self, file_name: &str) -> PathBuf {
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_nanos());
        self.path.with_file_name(format!(
            ".{}.tmp.{}.{}.{}",
            file_name,
            std::process::id(),
            suffix,
            counter
        ))
    }
}

impl DocumentPersistence for JsonFilePersistence {
    fn load(&self) -> Result<Option<Document>, PersistenceError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(PersistenceError::read(format!(
                    "{}: {err}",
                    self.path.display()
                )));
            }
        };
        serde_json::from_slice(&bytes).map(Some).map_err(|err| {
            PersistenceError::parse(format!("{}: {err}", self.path.display()))
        })
    }

    fn persist(&self, document: &Document) -> Result<(), PersistenceError> {
        let file_name = self
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                PersistenceError::write(format!(
                    "{}: document path must name a file",
                    self.path.display()
                ))
            })?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|err| PersistenceError::write(format!("{}: {err}", parent.display())))?;
        }

        let json = serde_json::to_vec_pretty(document)
            .map_err(|err| PersistenceError::write(err.to_string()))?;
        let temp_path = self.temp_path(file_name);
        let write_temp = |path: &Path| -> std::io::Result<()> {
            let mut file = File::create(path)?;
            file.write_all(&json)?;
            file.sync_all()
        };
        if let Err(err) = write_temp(&temp_path) {
            // Leave no stray temp file behind on a failed write.
            let _ = fs::remove_file(&temp_path);
            return Err(PersistenceError::write(format!(
                "{}: {err}",
                temp_path.display()
            )));
        }
        fs::rename(&temp_path, &self.path).map_err(|err| {
            let _ = fs::remove_file(&temp_path);
            PersistenceError::write(format!("{}: {err}", self.path.display()))
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::Utc;
    use rstest::rstest;

    use super::*;

    fn adapter_in(dir: &tempfile::TempDir) -> JsonFilePersistence {
        JsonFilePersistence::new(dir.path().join("grove.json"))
    }

    #[rstest]
    fn missing_files_load_as_first_run() {
        let dir = tempfile::tempdir().expect("tempdir");
        let adapter = adapter_in(&dir);
        assert_eq!(adapter.load().expect("load"), None);
    }

    #[rstest]
    fn documents_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let adapter = adapter_in(&dir);
        let document = Document::seeded(Utc::now());

        adapter.persist(&document).expect("persist");
        let reloaded = adapter.load().expect("load").expect("present");
        assert_eq!(reloaded, document);
    }

    #[rstest]
    fn persists_replace_rather_than_append() {
        let dir = tempfile::tempdir().expect("tempdir");
        let adapter = adapter_in(&dir);
        let document = Document::seeded(Utc::now());
        adapter.persist(&document).expect("persist");

        let mut emptied = document.clone();
        emptied.posts.clear();
        adapter.persist(&emptied).expect("persist again");

        let reloaded = adapter.load().expect("load").expect("present");
        assert!(reloaded.posts.is_empty());
        let leftovers = std::fs::read_dir(dir.path())
            .expect("read dir")
            .filter_map(Result::ok)
            .count();
        assert_eq!(leftovers, 1, "temp files must not accumulate");
    }

    #[rstest]
    fn corrupt_files_surface_parse_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let adapter = adapter_in(&dir);
        std::fs::write(adapter.path(), b"not json").expect("write");

        let err = adapter.load().expect_err("corrupt file");
        assert!(matches!(
            err,
            crate::domain::ports::PersistenceError::Parse { .. }
        ));
    }

    #[rstest]
    fn parent_directories_are_created_on_persist() {
        let dir = tempfile::tempdir().expect("tempdir");
        let adapter = JsonFilePersistence::new(dir.path().join("nested/state/grove.json"));
        adapter.persist(&Document::default()).expect("persist");
        assert!(adapter.path().exists());
    }
}
