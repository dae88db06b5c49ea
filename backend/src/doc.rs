//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct which generates the OpenAPI specification
//! for the REST API: every `/api/v1` endpoint, the health probes, the
//! shared error envelope, and the session cookie security scheme. Swagger
//! UI serves the result in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/register or /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Grove backend API",
        description = "HTTP interface for the community wellness service."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::me,
        crate::inbound::http::energy::collect,
        crate::inbound::http::referral::assist,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::list_posts,
        crate::inbound::http::posts::like_post,
        crate::inbound::http::quiz::daily_quiz,
        crate::inbound::http::journal::add_mood,
        crate::inbound::http::journal::list_moods,
        crate::inbound::http::journal::add_meditation,
        crate::inbound::http::journal::add_story,
        crate::inbound::http::journal::list_stories,
        crate::inbound::http::journal::add_memorial,
        crate::inbound::http::journal::list_memorials,
        crate::inbound::http::journal::add_planting,
        crate::inbound::http::journal::list_plantings,
        crate::inbound::http::growth::growth_stats,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        crate::domain::error::Error,
        crate::domain::error::ErrorCode,
        crate::domain::user::UserSummary,
        crate::domain::referral::AssistOutcome,
        crate::domain::post::PostView,
        crate::domain::post::PostKind,
        crate::domain::post::Scope,
        crate::domain::quiz::Quiz,
        crate::domain::journal::MoodEntry,
        crate::domain::journal::MeditationRecord,
        crate::domain::journal::MemoryStory,
        crate::domain::journal::Narration,
        crate::domain::journal::Memorial,
        crate::domain::journal::MemorialAudience,
        crate::domain::journal::PlantingEntry,
        crate::domain::growth::GrowthSnapshot,
        crate::inbound::http::accounts::RegisterRequest,
        crate::inbound::http::accounts::LoginRequest,
        crate::inbound::http::energy::CollectRequest,
        crate::inbound::http::energy::EnergyBalance,
        crate::inbound::http::referral::AssistRequest,
        crate::inbound::http::posts::CreatePostRequest,
        crate::inbound::http::posts::LikeResponse,
        crate::inbound::http::journal::MoodRequest,
        crate::inbound::http::journal::MeditationRequest,
        crate::inbound::http::journal::StoryRequest,
        crate::inbound::http::journal::MemorialRequest,
        crate::inbound::http::journal::PlantingRequest,
    ))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use utoipa::OpenApi;

    use super::*;

    #[test]
    fn every_api_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/register",
            "/api/v1/login",
            "/api/v1/me",
            "/api/v1/energy/collect",
            "/api/v1/assists",
            "/api/v1/posts",
            "/api/v1/posts/{id}/like",
            "/api/v1/quiz/daily",
            "/api/v1/journal/moods",
            "/api/v1/journal/meditations",
            "/api/v1/stories",
            "/api/v1/memorials",
            "/api/v1/plantings",
            "/api/v1/growth",
            "/health/ready",
            "/health/live",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing path {path}");
        }
    }
}
