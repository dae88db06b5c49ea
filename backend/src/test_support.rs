//! Shared test doubles and fixtures.
//!
//! Compiled for unit tests and, behind the `test-support` feature, for the
//! integration suites under `tests/`.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::accounts::AccountService;
use crate::domain::auth::RegistrationDetails;
use crate::domain::journal::Journal;
use crate::domain::ports::{DocumentPersistence, PasswordHashError, PasswordHasher};
use crate::domain::post::PostBoard;
use crate::domain::store::DocumentStore;
use crate::domain::user::{Identity, InviteCode, UserId, Username};
use crate::outbound::persistence::InMemoryPersistence;

/// Password used by every fixture account.
pub const FIXTURE_PASSWORD: &str = "correct horse battery staple";

/// A clock whose current instant tests move by hand.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Clock starting at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Move the clock forward.
    pub fn advance(&self, delta: Duration) {
        let delta = match TimeDelta::from_std(delta) {
            Ok(delta) => delta,
            Err(error) => {
                panic!("failed to convert Duration to TimeDelta: {error}; delta={delta:?}")
            }
        };
        *self.lock_clock() += delta;
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Deterministic instant the fixture clock starts at.
pub fn fixture_instant() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0) {
        chrono::LocalResult::Single(instant) => instant,
        _ => panic!("fixture instant must be unambiguous"),
    }
}

/// Identity with a random id for tests that never touch the store.
pub fn fixture_identity(name: &str) -> Identity {
    Identity {
        id: UserId::random(),
        username: match Username::new(name) {
            Ok(username) => username,
            Err(err) => panic!("fixture username {name:?} invalid: {err}"),
        },
    }
}

/// Hasher that stores passwords under a marker prefix instead of hashing.
///
/// Argon2 dominates test wall-clock time; suites that are not about
/// password hashing use this stand-in.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureHasher;

impl PasswordHasher for FixtureHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        Ok(format!("plain:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        hash.strip_prefix("plain:") == Some(password)
    }
}

/// Store, clock, and persistence bundle shared by the domain suites.
pub struct StoreFixture {
    /// The shared store under test.
    pub store: Arc<DocumentStore>,
    /// Hand-driven clock injected into every service.
    pub clock: Arc<MutableClock>,
    /// In-memory "durable" copy for persistence assertions.
    pub persistence: Arc<InMemoryPersistence>,
}

impl StoreFixture {
    /// Account service wired with the fixture hasher and clock.
    pub fn accounts(&self) -> AccountService {
        AccountService::new(
            self.store.clone(),
            Arc::new(FixtureHasher),
            self.clock.clone(),
        )
    }

    /// Register an account with no invite code.
    pub fn register(&self, name: &str) -> Identity {
        self.register_details(name, None)
    }

    /// Register an account redeeming `code`.
    pub fn register_with_code(&self, name: &str, code: &InviteCode) -> Identity {
        self.register_details(name, Some(code.as_ref()))
    }

    fn register_details(&self, name: &str, code: Option<&str>) -> Identity {
        let details = match RegistrationDetails::try_from_parts(name, FIXTURE_PASSWORD, code) {
            Ok(details) => details,
            Err(err) => panic!("fixture registration for {name:?} invalid: {err}"),
        };
        match self.accounts().register(&details) {
            Ok((identity, _summary)) => identity,
            Err(err) => panic!("fixture registration for {name:?} failed: {err}"),
        }
    }

    /// Current energy balance of `id`.
    pub fn energy_of(&self, id: UserId) -> u64 {
        self.lookup(id, |doc| doc.user_by_id(id).map(|user| user.energy))
    }

    /// Invite code owned by `id`.
    pub fn invite_code_of(&self, id: UserId) -> InviteCode {
        self.lookup(id, |doc| {
            doc.user_by_id(id).map(|user| user.invite_code.clone())
        })
    }

    fn lookup<T>(
        &self,
        id: UserId,
        read: impl FnOnce(&crate::domain::document::Document) -> Option<T>,
    ) -> T {
        match self.store.snapshot(read) {
            Ok(Some(value)) => value,
            Ok(None) => panic!("user {id} not in fixture store"),
            Err(err) => panic!("fixture snapshot failed: {err}"),
        }
    }
}

/// Fresh in-memory fixture with an unseeded, empty document.
///
/// An empty document keeps post and growth counts meaningful; store
/// seeding behaviour has its own suite.
pub fn memory_fixture() -> StoreFixture {
    let persistence = Arc::new(InMemoryPersistence::default());
    let clock = Arc::new(MutableClock::new(fixture_instant()));
    if let Err(err) = persistence.persist(&crate::domain::document::Document::default()) {
        panic!("fixture persistence failed: {err}");
    }
    let store = match DocumentStore::open(persistence.clone(), clock.as_ref()) {
        Ok(store) => Arc::new(store),
        Err(err) => panic!("fixture store failed to open: {err}"),
    };
    StoreFixture {
        store,
        clock,
        persistence,
    }
}

/// HTTP state over the fixture's store, with the fixture hasher and the
/// static quiz source.
pub fn http_state(fixture: &StoreFixture) -> crate::inbound::http::state::HttpState {
    crate::inbound::http::state::HttpState::new(
        fixture.store.clone(),
        Arc::new(FixtureHasher),
        Arc::new(crate::outbound::quiz::StaticQuizSource),
        fixture.clock.clone(),
    )
}

/// Post board over a fresh in-memory fixture.
pub fn memory_board() -> (PostBoard, Arc<MutableClock>) {
    let fixture = memory_fixture();
    let clock = fixture.clock.clone();
    (PostBoard::new(fixture.store, clock.clone()), clock)
}

/// Journal over a fresh in-memory fixture.
pub fn memory_journal() -> (Journal, Arc<MutableClock>) {
    let fixture = memory_fixture();
    let clock = fixture.clock.clone();
    (Journal::new(fixture.store, clock.clone()), clock)
}
