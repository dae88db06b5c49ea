//! Assist API handlers.
//!
//! ```text
//! POST /api/v1/assists {"inviteCode": "aB3xY9"}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};

use crate::domain::referral::AssistOutcome;
use crate::domain::{Error, InviteCode};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Assist request body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssistRequest {
    /// Invite code of the member to boost.
    pub invite_code: String,
}

/// Boost another member through their invite code.
#[utoipa::path(
    post,
    path = "/api/v1/assists",
    request_body = AssistRequest,
    responses(
        (status = 200, description = "Assist recorded", body = AssistOutcome),
        (status = 400, description = "Self-assist", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown invite code", body = Error),
        (status = 409, description = "Pair already assisted", body = Error)
    ),
    tags = ["referrals"],
    operation_id = "assist"
)]
#[post("/assists")]
pub async fn assist(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AssistRequest>,
) -> ApiResult<web::Json<AssistOutcome>> {
    let identity = session.require_identity()?;
    // A code of the wrong shape cannot belong to anyone.
    let code = InviteCode::new(&payload.invite_code)
        .map_err(|_| Error::not_found("unknown invite code"))?;
    Ok(web::Json(state.referrals.assist(identity.id, &code)?))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use serde_json::{Value, json};

    use super::*;
    use crate::inbound::http::accounts::register;
    use crate::test_support::{http_state, memory_fixture};

    fn assist_app(
        state: HttpState,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().service(
            web::scope("/api/v1")
                .wrap(crate::inbound::http::test_utils::test_session_middleware())
                .app_data(web::Data::new(state))
                .service(register)
                .service(assist),
        )
    }

    #[actix_web::test]
    async fn assisting_pays_the_first_time_bonus_once() {
        let fixture = memory_fixture();
        let ada = fixture.register("ada");
        let brin = fixture.register("brin");
        let app = test::init_service(assist_app(http_state(&fixture))).await;

        let register_res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(json!({"username": "casey", "password": "pw"}))
                .to_request(),
        )
        .await;
        let cookie = register_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned();

        let first = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/assists")
                .cookie(cookie.clone())
                .set_json(json!({"inviteCode": fixture.invite_code_of(ada.id).as_ref()}))
                .to_request(),
        )
        .await;
        assert_eq!(first.status(), StatusCode::OK);
        let body: Value = test::read_body_json(first).await;
        assert_eq!(body["energyAdded"], 30);
        assert_eq!(body["firstTimeBonus"], true);

        let second = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/assists")
                .cookie(cookie.clone())
                .set_json(json!({"inviteCode": fixture.invite_code_of(brin.id).as_ref()}))
                .to_request(),
        )
        .await;
        let body: Value = test::read_body_json(second).await;
        assert_eq!(body["energyAdded"], 5);
        assert_eq!(body["firstTimeBonus"], false);

        let repeat = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/assists")
                .cookie(cookie)
                .set_json(json!({"inviteCode": fixture.invite_code_of(ada.id).as_ref()}))
                .to_request(),
        )
        .await;
        assert_eq!(repeat.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn malformed_codes_resolve_to_nobody() {
        let fixture = memory_fixture();
        let app = test::init_service(assist_app(http_state(&fixture))).await;
        let register_res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(json!({"username": "ada", "password": "pw"}))
                .to_request(),
        )
        .await;
        let cookie = register_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned();

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/assists")
                .cookie(cookie)
                .set_json(json!({"inviteCode": "way-too-long-to-be-a-code"}))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
