//! HTTP application assembly.
//!
//! `build_app` wires the session middleware, the `/api/v1` scope, health
//! probes, and (in debug builds) Swagger UI. `main` and the integration
//! suites both go through it so tests exercise the same routing table the
//! binary serves.

pub mod config;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::health::HealthState;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{accounts, energy, growth, health, journal, posts, quiz, referral};

/// Cookie session middleware with the production cookie attributes.
pub fn session_middleware(key: Key, cookie_secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .build()
}

/// Assemble the application served by the binary and the test harnesses.
pub fn build_app(
    health_state: web::Data<HealthState>,
    state: HttpState,
    key: Key,
    cookie_secure: bool,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1")
        .wrap(session_middleware(key, cookie_secure))
        .app_data(web::Data::new(state))
        .service(accounts::register)
        .service(accounts::login)
        .service(accounts::me)
        .service(energy::collect)
        .service(referral::assist)
        .service(posts::create_post)
        .service(posts::list_posts)
        .service(posts::like_post)
        .service(quiz::daily_quiz)
        .service(journal::add_mood)
        .service(journal::list_moods)
        .service(journal::add_meditation)
        .service(journal::add_story)
        .service(journal::list_stories)
        .service(journal::add_memorial)
        .service(journal::list_memorials)
        .service(journal::add_planting)
        .service(journal::list_plantings)
        .service(growth::growth_stats);

    let app = App::new()
        .app_data(health_state)
        .service(api)
        .service(health::ready)
        .service(health::live);

    #[cfg(debug_assertions)]
    let app =
        app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}
