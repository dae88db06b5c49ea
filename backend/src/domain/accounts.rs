//! Account registration, login, and profile lookup.
//!
//! Password hashing is an external capability behind the
//! [`PasswordHasher`] port and always runs outside the store's critical
//! section: hashing is the slowest step of registration and must not
//! serialise every other request behind it.

use std::sync::Arc;

use mockable::Clock;
use tracing::{error, info, warn};

use super::auth::{LoginCredentials, RegistrationDetails};
use super::error::Error;
use super::ports::PasswordHasher;
use super::referral;
use super::store::DocumentStore;
use super::user::{Identity, InviteCode, User, UserId, UserSummary};

/// Registration, login, and profile operations.
pub struct AccountService {
    store: Arc<DocumentStore>,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
}

impl AccountService {
    /// Construct the service over the shared store.
    pub fn new(
        store: Arc<DocumentStore>,
        hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            hasher,
            clock,
        }
    }

    /// Create an account, optionally linking it to an inviter.
    ///
    /// Username uniqueness, invite linkage, and the insert all happen in
    /// one transaction so no other registration can observe the document
    /// in between.
    pub fn register(&self, details: &RegistrationDetails) -> Result<(Identity, UserSummary), Error> {
        let password_hash = self.hasher.hash(details.password()).map_err(|err| {
            error!(error = %err, "password hashing failed");
            Error::internal("failed to process credentials")
        })?;
        let username = details.username().clone();
        let invite_code = details.invite_code().cloned();
        let now = self.clock.utc();

        let (identity, summary) = self.store.transact(move |doc| {
            if doc.user_by_username(&username).is_some() {
                return Err(Error::conflict("username already taken"));
            }

            let mut rng = rand::thread_rng();
            let own_code = loop {
                let candidate = InviteCode::generate(&mut rng);
                if doc.user_by_invite_code(&candidate).is_none() {
                    break candidate;
                }
            };

            let mut user = User {
                id: UserId::random(),
                username,
                password_hash,
                energy: 0,
                invite_code: own_code,
                invited_by: None,
                created_at: now,
            };
            if let Some(code) = invite_code.as_ref() {
                referral::link_invite(doc, &mut user, code, now)?;
            }

            let identity = user.identity();
            let summary = UserSummary::from(&user);
            doc.users.push(user);
            Ok((identity, summary))
        })?;

        info!(user = %identity.username, linked = summary.energy > 0, "account registered");
        Ok((identity, summary))
    }

    /// Authenticate an existing account.
    ///
    /// The stored hash is cloned out of a snapshot and verified after the
    /// lock is released.
    pub fn login(&self, credentials: &LoginCredentials) -> Result<(Identity, UserSummary), Error> {
        let username = credentials.username().clone();
        let user = self
            .store
            .snapshot(move |doc| doc.user_by_username(&username).cloned())?
            .ok_or_else(|| Error::not_found("user not found"))?;

        if !self.hasher.verify(credentials.password(), &user.password_hash) {
            warn!(user = %user.username, "login rejected");
            return Err(Error::unauthorized("invalid credentials"));
        }

        Ok((user.identity(), UserSummary::from(&user)))
    }

    /// Current summary for an authenticated caller.
    pub fn profile(&self, user_id: UserId) -> Result<UserSummary, Error> {
        self.store
            .snapshot(move |doc| doc.user_by_id(user_id).map(UserSummary::from))?
            .ok_or_else(|| Error::not_found("user not found"))
    }
}
