//! Post API handlers.
//!
//! ```text
//! POST /api/v1/posts {"content":"...","isPublic":true,"scheduledTime":"2031-01-01T00:00:00Z"}
//! GET  /api/v1/posts?scope=mine
//! POST /api/v1/posts/{id}/like
//! ```

use actix_web::{get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::post::{PostDraft, PostId, PostKind, PostView, Scope};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Post creation request body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    /// Body text; must not be blank.
    pub content: String,
    /// Share with everyone, or keep to the author.
    #[serde(default)]
    pub is_public: bool,
    /// Post flavour; defaults to a mood share.
    #[serde(default)]
    pub kind: PostKind,
    /// Optional short title.
    #[serde(default)]
    pub title: Option<String>,
    /// Image reference, if any.
    #[serde(default)]
    pub image: Option<String>,
    /// Video reference, if any.
    #[serde(default)]
    pub video: Option<String>,
    /// Audio reference, if any.
    #[serde(default)]
    pub audio: Option<String>,
    /// Free-form mood tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Hide the author's name on the public feed.
    #[serde(default)]
    pub is_anonymous: bool,
    /// Defer public release until this instant.
    #[serde(default)]
    pub scheduled_time: Option<DateTime<Utc>>,
}

impl TryFrom<CreatePostRequest> for PostDraft {
    type Error = crate::domain::post::PostValidationError;

    fn try_from(value: CreatePostRequest) -> Result<Self, Self::Error> {
        let mut draft = Self::new(value.content)?;
        draft.kind = value.kind;
        draft.title = value.title.unwrap_or_default();
        draft.image = value.image;
        draft.video = value.video;
        draft.audio = value.audio;
        draft.tags = value.tags;
        draft.is_public = value.is_public;
        draft.is_anonymous = value.is_anonymous;
        draft.scheduled_time = value.scheduled_time;
        Ok(draft)
    }
}

/// Feed selection query for `GET /api/v1/posts`.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListPostsQuery {
    /// `mine` or `public`; defaults to `public`.
    #[serde(default)]
    pub scope: Option<Scope>,
}

/// Post-like counter response.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    /// New like count.
    pub likes: u64,
}

/// Publish a post.
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 200, description = "Post created", body = PostView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["posts"],
    operation_id = "createPost"
)]
#[post("/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreatePostRequest>,
) -> ApiResult<web::Json<PostView>> {
    let identity = session.require_identity()?;
    let draft =
        PostDraft::try_from(payload.into_inner()).map_err(|err| Error::invalid_request(err.to_string()))?;
    Ok(web::Json(state.board.publish(&identity, draft)?))
}

/// List posts, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    params(ListPostsQuery),
    responses(
        (status = 200, description = "Posts in scope", body = [PostView]),
        (status = 400, description = "Invalid scope", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["posts"],
    operation_id = "listPosts"
)]
#[get("/posts")]
pub async fn list_posts(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListPostsQuery>,
) -> ApiResult<web::Json<Vec<PostView>>> {
    let identity = session.require_identity()?;
    let scope = query.scope.unwrap_or(Scope::Public);
    Ok(web::Json(state.board.list(&identity, scope)?))
}

/// Like a post; every call increments.
#[utoipa::path(
    post,
    path = "/api/v1/posts/{id}/like",
    params(("id" = Uuid, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "New like count", body = LikeResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Post not found", body = Error)
    ),
    tags = ["posts"],
    operation_id = "likePost"
)]
#[post("/posts/{id}/like")]
pub async fn like_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<LikeResponse>> {
    session.require_identity()?;
    let likes = state.board.like(PostId::from(path.into_inner()))?;
    Ok(web::Json(LikeResponse { likes }))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use serde_json::{Value, json};

    use super::*;
    use crate::inbound::http::accounts::register;
    use crate::test_support::{http_state, memory_fixture};

    fn post_app(
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
                .service(create_post)
                .service(list_posts)
                .service(like_post),
        )
    }

    async fn register_cookie(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        username: &str,
    ) -> actix_web::cookie::Cookie<'static> {
        let res = test::call_service(
            app,
            test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(json!({"username": username, "password": "pw"}))
                .to_request(),
        )
        .await;
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned()
    }

    #[actix_web::test]
    async fn private_posts_stay_out_of_the_public_feed() {
        let fixture = memory_fixture();
        let app = test::init_service(post_app(http_state(&fixture))).await;
        let cookie = register_cookie(&app, "ada").await;

        let created = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/posts")
                .cookie(cookie.clone())
                .set_json(json!({"content": "just for me", "isPublic": false}))
                .to_request(),
        )
        .await;
        assert_eq!(created.status(), StatusCode::OK);

        let mine = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/posts?scope=mine")
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        let mine: Value = test::read_body_json(mine).await;
        assert_eq!(mine.as_array().map(Vec::len), Some(1));

        let public = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/posts?scope=public")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let public: Value = test::read_body_json(public).await;
        assert_eq!(public.as_array().map(Vec::len), Some(0));
    }

    #[actix_web::test]
    async fn unknown_scopes_are_bad_requests() {
        let fixture = memory_fixture();
        let app = test::init_service(post_app(http_state(&fixture))).await;
        let cookie = register_cookie(&app, "ada").await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/posts?scope=everything")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn likes_accumulate_per_call() {
        let fixture = memory_fixture();
        let app = test::init_service(post_app(http_state(&fixture))).await;
        let cookie = register_cookie(&app, "ada").await;

        let created = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/posts")
                .cookie(cookie.clone())
                .set_json(json!({"content": "likeable", "isPublic": true}))
                .to_request(),
        )
        .await;
        let created: Value = test::read_body_json(created).await;
        let id = created["id"].as_str().expect("id").to_owned();

        for expected in 1..=3 {
            let res = test::call_service(
                &app,
                test::TestRequest::post()
                    .uri(&format!("/api/v1/posts/{id}/like"))
                    .cookie(cookie.clone())
                    .to_request(),
            )
            .await;
            let body: Value = test::read_body_json(res).await;
            assert_eq!(body["likes"], expected);
        }
    }

    #[actix_web::test]
    async fn blank_content_is_a_bad_request() {
        let fixture = memory_fixture();
        let app = test::init_service(post_app(http_state(&fixture))).await;
        let cookie = register_cookie(&app, "ada").await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/posts")
                .cookie(cookie)
                .set_json(json!({"content": "   "}))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
