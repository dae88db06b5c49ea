//! The energy ledger.
//!
//! Energy is the sole reward currency: a non-negative per-user balance
//! that only ever increases. There is no spend operation anywhere in the
//! system, and no upper bound on a balance.

use std::sync::Arc;

use super::document::Document;
use super::error::Error;
use super::store::DocumentStore;
use super::user::UserId;

/// Reward for a generic collect action when the caller names no amount.
pub const COLLECT_REWARD: u64 = 10;

/// Reward clients claim for a correctly answered daily quiz.
pub const QUIZ_REWARD: u64 = 20;

/// Credit `amount` energy to a user inside an open transaction.
///
/// `amount` must be at least 1 and the user must exist; both checks run
/// before any mutation. Returns the new balance. Other engines call this
/// directly so that multi-user credits stay inside one transaction.
pub fn credit(doc: &mut Document, user_id: UserId, amount: u64) -> Result<u64, Error> {
    if amount == 0 {
        return Err(Error::invalid_request("amount must be a positive integer"));
    }
    let user = doc
        .user_by_id_mut(user_id)
        .ok_or_else(|| Error::not_found("user not found"))?;
    user.energy = user.energy.saturating_add(amount);
    Ok(user.energy)
}

/// Transactional wrapper over [`credit`] for the collect endpoint.
pub struct EnergyLedger {
    store: Arc<DocumentStore>,
}

impl EnergyLedger {
    /// Construct a ledger over the shared store.
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    /// Credit the caller, defaulting to [`COLLECT_REWARD`], and return the
    /// new balance.
    pub fn collect(&self, user_id: UserId, amount: Option<u64>) -> Result<u64, Error> {
        let amount = amount.unwrap_or(COLLECT_REWARD);
        self.store.transact(move |doc| credit(doc, user_id, amount))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;
    use crate::test_support::memory_fixture;

    #[rstest]
    fn collect_defaults_to_ten() {
        let fixture = memory_fixture();
        let ada = fixture.register("ada");
        let ledger = EnergyLedger::new(fixture.store.clone());

        assert_eq!(ledger.collect(ada.id, None).expect("collect"), COLLECT_REWARD);
        assert_eq!(ledger.collect(ada.id, Some(QUIZ_REWARD)).expect("collect"), 30);
    }

    #[rstest]
    fn zero_amounts_are_rejected_without_mutation() {
        let fixture = memory_fixture();
        let ada = fixture.register("ada");
        let ledger = EnergyLedger::new(fixture.store.clone());

        let err = ledger.collect(ada.id, Some(0)).expect_err("zero must fail");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(fixture.energy_of(ada.id), 0);
    }

    #[rstest]
    fn unknown_users_are_not_found() {
        let fixture = memory_fixture();
        let ledger = EnergyLedger::new(fixture.store.clone());
        let err = ledger
            .collect(crate::domain::UserId::random(), None)
            .expect_err("unknown user must fail");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
