//! Durable persistence behaviour with the JSON file adapter.
//!
//! Exercises first-run seeding, reopen-without-reseed, migration of
//! documents missing newer collections, and state surviving a full
//! close-and-reopen cycle.

use std::sync::Arc;

use backend::domain::auth::{LoginCredentials, RegistrationDetails};
use backend::domain::store::DocumentStore;
use backend::outbound::persistence::JsonFilePersistence;
use backend::test_support::{FIXTURE_PASSWORD, FixtureHasher, MutableClock, fixture_instant};

struct TempStore {
    _dir: tempfile::TempDir,
    path: std::path::PathBuf,
    clock: Arc<MutableClock>,
}

impl TempStore {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("grove.json");
        Self {
            _dir: dir,
            path,
            clock: Arc::new(MutableClock::new(fixture_instant())),
        }
    }

    fn open(&self) -> Arc<DocumentStore> {
        let persistence = Arc::new(JsonFilePersistence::new(self.path.clone()));
        Arc::new(DocumentStore::open(persistence, self.clock.as_ref()).expect("open store"))
    }

    fn accounts(&self, store: &Arc<DocumentStore>) -> backend::domain::accounts::AccountService {
        backend::domain::accounts::AccountService::new(
            store.clone(),
            Arc::new(FixtureHasher),
            self.clock.clone(),
        )
    }
}

#[test]
fn first_run_writes_a_seeded_file() {
    let temp = TempStore::new();
    assert!(!temp.path.exists());

    let store = temp.open();
    assert!(temp.path.exists(), "first run must persist immediately");
    let posts = store.snapshot(|doc| doc.posts.len()).expect("snapshot");
    assert_eq!(posts, 4);
}

#[test]
fn reopening_preserves_state_instead_of_reseeding() {
    let temp = TempStore::new();
    {
        let store = temp.open();
        let accounts = temp.accounts(&store);
        let details = RegistrationDetails::try_from_parts("ada", FIXTURE_PASSWORD, None)
            .expect("valid details");
        accounts.register(&details).expect("register");
    }

    // A fresh process over the same file sees the registered account and
    // does not duplicate the seed posts.
    let store = temp.open();
    let accounts = temp.accounts(&store);
    let creds = LoginCredentials::try_from_parts("ada", FIXTURE_PASSWORD).expect("valid creds");
    accounts.login(&creds).expect("login after reopen");
    let posts = store.snapshot(|doc| doc.posts.len()).expect("snapshot");
    assert_eq!(posts, 4);
}

#[test]
fn documents_missing_collections_gain_empty_defaults() {
    let temp = TempStore::new();
    // A document written before the journal collections existed.
    std::fs::write(
        &temp.path,
        r#"{"users": [], "posts": [], "invitations": []}"#,
    )
    .expect("write legacy document");

    let store = temp.open();
    let (posts, moods, plantings) = store
        .snapshot(|doc| {
            (
                doc.posts.len(),
                doc.mood_entries.len(),
                doc.planting_entries.len(),
            )
        })
        .expect("snapshot");
    assert_eq!(posts, 0, "present collections must not be overwritten");
    assert_eq!(moods, 0);
    assert_eq!(plantings, 0);
}

#[test]
fn every_committed_transaction_is_durable() {
    let temp = TempStore::new();
    {
        let store = temp.open();
        store
            .transact(|doc| {
                doc.posts.clear();
                Ok(())
            })
            .expect("commit");
    }

    let store = temp.open();
    let posts = store.snapshot(|doc| doc.posts.len()).expect("snapshot");
    assert_eq!(posts, 0, "the committed clear must survive a reopen");
}
