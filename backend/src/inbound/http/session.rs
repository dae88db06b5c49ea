//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations such as persisting or requiring the caller's
//! identity. A missing credential and a present-but-invalid one both map
//! to 401, but with distinct messages so clients can tell them apart.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, Identity, UserId, Username};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const USERNAME_KEY: &str = "username";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated identity in the session cookie.
    pub fn persist_identity(&self, identity: &Identity) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, identity.id.to_string())
            .and_then(|()| self.0.insert(USERNAME_KEY, identity.username.to_string()))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current identity from the session, if present.
    ///
    /// Returns `Ok(None)` when no credential was supplied and an
    /// `unauthorized` error when one was supplied but does not decode.
    pub fn identity(&self) -> Result<Option<Identity>, Error> {
        let raw_id = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        let Some(raw_id) = raw_id else {
            return Ok(None);
        };
        let raw_name = self
            .0
            .get::<String>(USERNAME_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;

        let id = UserId::parse(&raw_id).map_err(|error| {
            warn!(%error, "invalid user id in session cookie");
            Error::unauthorized("session credential invalid")
        })?;
        let username = raw_name
            .ok_or_else(|| Error::unauthorized("session credential invalid"))
            .and_then(|name| {
                Username::new(name).map_err(|error| {
                    warn!(%error, "invalid username in session cookie");
                    Error::unauthorized("session credential invalid")
                })
            })?;
        Ok(Some(Identity { id, username }))
    }

    /// Require an authenticated identity or return `401 Unauthorized`.
    pub fn require_identity(&self) -> Result<Identity, Error> {
        self.identity()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
