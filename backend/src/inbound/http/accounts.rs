//! Account API handlers.
//!
//! ```text
//! POST /api/v1/register {"username":"ada","password":"pw","inviteCode":"aB3xY9"}
//! POST /api/v1/login    {"username":"ada","password":"pw"}
//! GET  /api/v1/me
//! ```
//!
//! Successful register/login responses carry the user summary in the body
//! and the session credential in the `session` cookie.

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::auth::{CredentialValidationError, LoginCredentials, RegistrationDetails};
use crate::domain::{Error, UserSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Registration request body for `POST /api/v1/register`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Desired username.
    pub username: String,
    /// Plaintext password; hashed before it ever reaches the store.
    pub password: String,
    /// Another user's invite code, if the caller was invited.
    #[serde(default)]
    pub invite_code: Option<String>,
}

impl TryFrom<RegisterRequest> for RegistrationDetails {
    type Error = CredentialValidationError;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password, value.invite_code.as_deref())
    }
}

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Account username.
    pub username: String,
    /// Account password.
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = CredentialValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

fn map_credential_error(err: CredentialValidationError) -> Error {
    let field = match &err {
        CredentialValidationError::Username(_) => "username",
        CredentialValidationError::EmptyPassword => "password",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

/// Create an account and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = UserSummary,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Username already taken", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<web::Json<UserSummary>> {
    let details =
        RegistrationDetails::try_from(payload.into_inner()).map_err(map_credential_error)?;
    let (identity, summary) = state.accounts.register(&details)?;
    session.persist_identity(&identity)?;
    Ok(web::Json(summary))
}

/// Authenticate a user and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = UserSummary,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 404, description = "Unknown user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<UserSummary>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_credential_error)?;
    let (identity, summary) = state.accounts.login(&credentials)?;
    session.persist_identity(&identity)?;
    Ok(web::Json(summary))
}

/// Summary of the authenticated caller.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Caller summary", body = UserSummary),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Account no longer exists", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "me"
)]
#[get("/me")]
pub async fn me(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserSummary>> {
    let identity = session.require_identity()?;
    Ok(web::Json(state.accounts.profile(identity.id)?))
}
