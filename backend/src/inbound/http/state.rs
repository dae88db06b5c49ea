//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and ports and remain testable without real
//! I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::accounts::AccountService;
use crate::domain::energy::EnergyLedger;
use crate::domain::growth::GrowthTracker;
use crate::domain::journal::Journal;
use crate::domain::ports::{PasswordHasher, QuizSource};
use crate::domain::post::PostBoard;
use crate::domain::referral::ReferralGraph;
use crate::domain::store::DocumentStore;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration, login, and profile lookups.
    pub accounts: Arc<AccountService>,
    /// Energy credits.
    pub energy: Arc<EnergyLedger>,
    /// Invite-code assists.
    pub referrals: Arc<ReferralGraph>,
    /// Post publishing, feeds, and likes.
    pub board: Arc<PostBoard>,
    /// Journal appends and lists.
    pub journal: Arc<Journal>,
    /// Growth rollups.
    pub growth: Arc<GrowthTracker>,
    /// Daily quiz provider.
    pub quiz: Arc<dyn QuizSource>,
}

impl HttpState {
    /// Wire every service over one shared store.
    pub fn new(
        store: Arc<DocumentStore>,
        hasher: Arc<dyn PasswordHasher>,
        quiz: Arc<dyn QuizSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            accounts: Arc::new(AccountService::new(store.clone(), hasher, clock.clone())),
            energy: Arc::new(EnergyLedger::new(store.clone())),
            referrals: Arc::new(ReferralGraph::new(store.clone(), clock.clone())),
            board: Arc::new(PostBoard::new(store.clone(), clock.clone())),
            journal: Arc::new(Journal::new(store.clone(), clock.clone())),
            growth: Arc::new(GrowthTracker::new(store, clock)),
            quiz,
        }
    }
}
