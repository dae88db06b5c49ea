//! User identity and account value types.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before any engine touches the document.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Maximum number of characters accepted in a username.
pub const USERNAME_MAX_CHARS: usize = 32;

/// Number of characters in an invite code.
pub const INVITE_CODE_LEN: usize = 6;

/// Validation errors returned by the identity value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Username exceeded [`USERNAME_MAX_CHARS`].
    #[error("username must be at most {max} characters")]
    UsernameTooLong {
        /// Permitted maximum.
        max: usize,
    },
    /// User id did not parse as a UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// Invite code was not exactly [`INVITE_CODE_LEN`] alphanumeric characters.
    #[error("invite code must be {len} letters or digits")]
    InvalidInviteCode {
        /// Required code length.
        len: usize,
    },
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validate and construct an identifier from string input.
    pub fn parse(raw: &str) -> Result<Self, UserValidationError> {
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated username.
///
/// ## Invariants
/// - Trimmed of surrounding whitespace and non-empty.
/// - At most [`USERNAME_MAX_CHARS`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Construct a username from raw input, trimming surrounding whitespace.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if trimmed.chars().count() > USERNAME_MAX_CHARS {
            return Err(UserValidationError::UsernameTooLong {
                max: USERNAME_MAX_CHARS,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Short shareable code owned by exactly one user.
///
/// Codes are [`INVITE_CODE_LEN`] ASCII alphanumeric characters, compared
/// case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct InviteCode(String);

impl InviteCode {
    /// Validate and construct a code from string input.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = raw.as_ref();
        let valid =
            raw.chars().count() == INVITE_CODE_LEN && raw.chars().all(|c| c.is_ascii_alphanumeric());
        if valid {
            Ok(Self(raw.to_owned()))
        } else {
            Err(UserValidationError::InvalidInviteCode {
                len: INVITE_CODE_LEN,
            })
        }
    }

    /// Generate a fresh random code.
    ///
    /// Uniqueness against the document is the caller's responsibility; the
    /// registration transaction retries until the code is unclaimed.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let code: String = rng
            .sample_iter(&Alphanumeric)
            .take(INVITE_CODE_LEN)
            .map(char::from)
            .collect();
        Self(code)
    }
}

impl AsRef<str> for InviteCode {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for InviteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<InviteCode> for String {
    fn from(value: InviteCode) -> Self {
        value.0
    }
}

impl TryFrom<String> for InviteCode {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Authenticated caller identity, as resolved from the session credential.
///
/// The core never inspects how the credential was produced; it consumes only
/// this pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Stable user identifier.
    pub id: UserId,
    /// Username at the time the session was issued.
    pub username: Username,
}

/// Stored user record.
///
/// `energy` only ever increases and `password_hash` is an opaque string
/// produced by the hashing port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Stable identifier.
    pub id: UserId,
    /// Unique display/login name.
    pub username: Username,
    /// Opaque password hash (PHC string).
    pub password_hash: String,
    /// Point balance; monotonically non-decreasing.
    pub energy: u64,
    /// Unique shareable invite code.
    pub invite_code: InviteCode,
    /// Id of the user whose code was supplied at registration, if any.
    pub invited_by: Option<UserId>,
    /// Registration instant.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Identity pair for this user.
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

/// Public view of a user returned by account endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// Stable identifier.
    pub id: UserId,
    /// Display/login name.
    pub username: Username,
    /// Current energy balance.
    pub energy: u64,
    /// Shareable invite code.
    pub invite_code: InviteCode,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            energy: user.energy,
            invite_code: user.invite_code.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyUsername)]
    #[case("   ", UserValidationError::EmptyUsername)]
    #[case(
        "a-name-well-beyond-thirty-two-characters-long",
        UserValidationError::UsernameTooLong { max: USERNAME_MAX_CHARS }
    )]
    fn invalid_usernames(#[case] raw: &str, #[case] expected: UserValidationError) {
        let err = Username::new(raw).expect_err("invalid input must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  ada  ", "ada")]
    #[case("quiet forest", "quiet forest")]
    fn usernames_are_trimmed(#[case] raw: &str, #[case] expected: &str) {
        let name = Username::new(raw).expect("valid input");
        assert_eq!(name.as_ref(), expected);
    }

    #[rstest]
    #[case("abc12")]
    #[case("abc1234")]
    #[case("abc-12")]
    #[case("")]
    fn malformed_invite_codes_are_rejected(#[case] raw: &str) {
        InviteCode::new(raw).expect_err("malformed code must fail");
    }

    #[rstest]
    fn generated_codes_validate() {
        let mut rng = rand::thread_rng();
        for _ in 0..32 {
            let code = InviteCode::generate(&mut rng);
            InviteCode::new(code.as_ref()).expect("generated codes are well formed");
        }
    }

    #[rstest]
    fn user_ids_round_trip_through_strings() {
        let id = UserId::random();
        let parsed = UserId::parse(&id.to_string()).expect("round trip");
        assert_eq!(parsed, id);
        UserId::parse("not-a-uuid").expect_err("garbage must fail");
    }
}
