//! Authentication primitives such as login and registration payloads.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a service.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{InviteCode, UserValidationError, Username};

/// Domain error returned when credential payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    /// Username failed validation.
    Username(UserValidationError),
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Username(err) => write!(f, "{err}"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// Validated login credentials.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty but retains caller-provided whitespace to avoid
///   surprising credential comparisons.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    username: Username,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(
        username: &str,
        password: &str,
    ) -> Result<Self, CredentialValidationError> {
        let username = Username::new(username).map_err(CredentialValidationError::Username)?;
        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username suitable for user lookups.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration payload.
///
/// The invite code is optional, and redeeming one can never fail a
/// registration: a code that is malformed or matches nobody simply creates
/// an unlinked account, exactly as an absent code does.
#[derive(Debug, Clone)]
pub struct RegistrationDetails {
    credentials: LoginCredentials,
    invite_code: Option<InviteCode>,
}

impl RegistrationDetails {
    /// Construct registration details from raw inputs.
    pub fn try_from_parts(
        username: &str,
        password: &str,
        invite_code: Option<&str>,
    ) -> Result<Self, CredentialValidationError> {
        let credentials = LoginCredentials::try_from_parts(username, password)?;
        // A code of the wrong shape cannot belong to anyone; treat it like
        // an unknown code rather than a validation failure.
        let invite_code = invite_code.and_then(|raw| InviteCode::new(raw).ok());
        Ok(Self {
            credentials,
            invite_code,
        })
    }

    /// Username for the new account.
    pub fn username(&self) -> &Username {
        self.credentials.username()
    }

    /// Password for the new account.
    pub fn password(&self) -> &str {
        self.credentials.password()
    }

    /// Invite code supplied by the caller, if any.
    pub fn invite_code(&self) -> Option<&InviteCode> {
        self.invite_code.as_ref()
    }
}
