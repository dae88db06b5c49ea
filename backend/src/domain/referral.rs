//! The referral graph: who invited whom, and who boosted whom.
//!
//! Two flows feed the graph. Registration-time linkage rewards the owner
//! of a redeemed invite code and the newcomer. Assists let an existing
//! user boost another through their code, with a one-time first-assist
//! incentive. Both flows validate everything before crediting anyone, so
//! a rejected request never moves a balance.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;
use utoipa::ToSchema;

use super::document::{Assist, Document, Invitation, RecordId};
use super::energy;
use super::error::Error;
use super::store::DocumentStore;
use super::user::{InviteCode, User, UserId};

/// Energy granted to the owner of a redeemed code at registration.
pub const INVITER_REWARD: u64 = 50;

/// Energy granted to a newcomer who registered with a valid code.
pub const INVITEE_REWARD: u64 = 20;

/// Helper bonus for their first-ever assist.
pub const FIRST_ASSIST_BONUS: u64 = 30;

/// Helper bonus for every assist after the first.
pub const REPEAT_ASSIST_BONUS: u64 = 5;

/// Energy granted to the assisted user, regardless of ordinal.
pub const ASSIST_TARGET_REWARD: u64 = 10;

/// Outcome of a successful assist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssistOutcome {
    /// Energy granted to the helper.
    pub energy_added: u64,
    /// Whether this was the helper's first-ever assist.
    pub first_time_bonus: bool,
}

/// Link a not-yet-inserted user to the owner of `code`, inside the
/// registration transaction.
///
/// An unknown code is not an error: registration proceeds with no linkage.
/// A known code sets `invited_by`, credits the inviter
/// [`INVITER_REWARD`], adds [`INVITEE_REWARD`] to the in-memory newcomer
/// before their first persist, and appends exactly one [`Invitation`].
/// Runs at most once per new user by construction, so no uniqueness check
/// is needed here.
pub(crate) fn link_invite(
    doc: &mut Document,
    joiner: &mut User,
    code: &InviteCode,
    now: DateTime<Utc>,
) -> Result<(), Error> {
    let Some(inviter_id) = doc.user_by_invite_code(code).map(|user| user.id) else {
        return Ok(());
    };
    joiner.invited_by = Some(inviter_id);
    joiner.energy = joiner.energy.saturating_add(INVITEE_REWARD);
    energy::credit(doc, inviter_id, INVITER_REWARD)?;
    doc.invitations.push(Invitation {
        inviter_id,
        invitee_id: joiner.id,
        timestamp: now,
    });
    Ok(())
}

/// Assist validation and recording.
pub struct ReferralGraph {
    store: Arc<DocumentStore>,
    clock: Arc<dyn Clock>,
}

impl ReferralGraph {
    /// Construct a graph over the shared store.
    pub fn new(store: Arc<DocumentStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Boost the owner of `code` on behalf of `helper`.
    ///
    /// Rules, checked in order before any credit is applied:
    /// - the code must belong to someone (`NotFound`);
    /// - the helper must exist (`NotFound`);
    /// - a helper cannot assist themselves (`InvalidRequest`);
    /// - each (helper, target) pair assists at most once (`Conflict`).
    ///
    /// The helper's bonus is [`FIRST_ASSIST_BONUS`] on their first-ever
    /// assist and [`REPEAT_ASSIST_BONUS`] afterwards; the target always
    /// receives [`ASSIST_TARGET_REWARD`].
    pub fn assist(&self, helper: UserId, code: &InviteCode) -> Result<AssistOutcome, Error> {
        let now = self.clock.utc();
        self.store.transact(move |doc| {
            let target = doc
                .user_by_invite_code(code)
                .map(|user| user.id)
                .ok_or_else(|| Error::not_found("unknown invite code"))?;
            if doc.user_by_id(helper).is_none() {
                return Err(Error::not_found("user not found"));
            }
            if target == helper {
                return Err(Error::invalid_request("cannot assist yourself"));
            }
            if doc
                .assists
                .iter()
                .any(|assist| assist.helper_id == helper && assist.target_id == target)
            {
                return Err(Error::conflict("already assisted this member"));
            }

            let first_time_bonus = !doc.assists.iter().any(|assist| assist.helper_id == helper);
            let energy_added = if first_time_bonus {
                FIRST_ASSIST_BONUS
            } else {
                REPEAT_ASSIST_BONUS
            };

            energy::credit(doc, target, ASSIST_TARGET_REWARD)?;
            energy::credit(doc, helper, energy_added)?;
            doc.assists.push(Assist {
                id: RecordId::random(),
                helper_id: helper,
                target_id: target,
                timestamp: now,
            });

            Ok(AssistOutcome {
                energy_added,
                first_time_bonus,
            })
        })
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
    fn registering_with_a_code_rewards_both_sides() {
        let fixture = memory_fixture();
        let ada = fixture.register("ada");
        let code = fixture.invite_code_of(ada.id);
        let brin = fixture.register_with_code("brin", &code);

        assert_eq!(fixture.energy_of(ada.id), INVITER_REWARD);
        assert_eq!(fixture.energy_of(brin.id), INVITEE_REWARD);
        let invitations = fixture
            .store
            .snapshot(|doc| doc.invitations.clone())
            .expect("snapshot");
        assert_eq!(invitations.len(), 1);
        assert_eq!(invitations[0].inviter_id, ada.id);
        assert_eq!(invitations[0].invitee_id, brin.id);
    }

    #[rstest]
    fn unknown_codes_register_without_linkage() {
        let fixture = memory_fixture();
        let code = InviteCode::new("zzzzzz").expect("well formed");
        let solo = fixture.register_with_code("solo", &code);

        assert_eq!(fixture.energy_of(solo.id), 0);
        let invitations = fixture
            .store
            .snapshot(|doc| doc.invitations.len())
            .expect("snapshot");
        assert_eq!(invitations, 0);
    }

    #[rstest]
    fn first_assist_pays_thirty_then_five() {
        let fixture = memory_fixture();
        let ada = fixture.register("ada");
        let brin = fixture.register("brin");
        let casey = fixture.register("casey");
        let graph = ReferralGraph::new(fixture.store.clone(), fixture.clock.clone());

        let first = graph
            .assist(casey.id, &fixture.invite_code_of(ada.id))
            .expect("first assist");
        assert_eq!(first.energy_added, FIRST_ASSIST_BONUS);
        assert!(first.first_time_bonus);

        let second = graph
            .assist(casey.id, &fixture.invite_code_of(brin.id))
            .expect("second assist");
        assert_eq!(second.energy_added, REPEAT_ASSIST_BONUS);
        assert!(!second.first_time_bonus);

        assert_eq!(fixture.energy_of(ada.id), ASSIST_TARGET_REWARD);
        assert_eq!(fixture.energy_of(brin.id), ASSIST_TARGET_REWARD);
        assert_eq!(
            fixture.energy_of(casey.id),
            FIRST_ASSIST_BONUS + REPEAT_ASSIST_BONUS
        );
    }

    #[rstest]
    fn repeated_pairs_conflict_and_leave_balances_alone() {
        let fixture = memory_fixture();
        let ada = fixture.register("ada");
        let brin = fixture.register("brin");
        let graph = ReferralGraph::new(fixture.store.clone(), fixture.clock.clone());
        let code = fixture.invite_code_of(ada.id);

        graph.assist(brin.id, &code).expect("first assist");
        let ada_energy = fixture.energy_of(ada.id);
        let brin_energy = fixture.energy_of(brin.id);

        let err = graph.assist(brin.id, &code).expect_err("duplicate pair");
        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(fixture.energy_of(ada.id), ada_energy);
        assert_eq!(fixture.energy_of(brin.id), brin_energy);
    }

    #[rstest]
    fn self_assist_is_rejected_regardless_of_state() {
        let fixture = memory_fixture();
        let ada = fixture.register("ada");
        let graph = ReferralGraph::new(fixture.store.clone(), fixture.clock.clone());

        let err = graph
            .assist(ada.id, &fixture.invite_code_of(ada.id))
            .expect_err("self assist");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(fixture.energy_of(ada.id), 0);
    }

    #[rstest]
    fn unknown_codes_are_not_found() {
        let fixture = memory_fixture();
        let ada = fixture.register("ada");
        let graph = ReferralGraph::new(fixture.store.clone(), fixture.clock.clone());
        let err = graph
            .assist(ada.id, &InviteCode::new("nope42").expect("well formed"))
            .expect_err("unknown code");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
