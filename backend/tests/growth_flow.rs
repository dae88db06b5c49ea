//! Growth rollup over the full HTTP application.

use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web};
use serde_json::{Value, json};

use backend::inbound::http::health::HealthState;
use backend::server::build_app;
use backend::test_support::{http_state, memory_fixture};

async fn register(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    username: &str,
) -> Cookie<'static> {
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

async fn post_json(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    cookie: &Cookie<'static>,
    uri: &str,
    body: Value,
) {
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri(uri)
            .cookie(cookie.clone())
            .set_json(body)
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "{uri}: {}", res.status());
}

#[actix_web::test]
async fn growth_counts_reflect_activity() {
    let fixture = memory_fixture();
    let app = test::init_service(build_app(
        web::Data::new(HealthState::new()),
        http_state(&fixture),
        Key::generate(),
        false,
    ))
    .await;
    let cookie = register(&app, "ada").await;

    post_json(
        &app,
        &cookie,
        "/api/v1/posts",
        json!({"content": "hello grove", "isPublic": true}),
    )
    .await;
    post_json(
        &app,
        &cookie,
        "/api/v1/journal/moods",
        json!({"mood": "calm", "content": "settled"}),
    )
    .await;
    for minutes in [10, 20] {
        post_json(
            &app,
            &cookie,
            "/api/v1/journal/meditations",
            json!({"minutes": minutes}),
        )
        .await;
    }
    post_json(
        &app,
        &cookie,
        "/api/v1/stories",
        json!({"title": "the old bench", "content": "we sat there"}),
    )
    .await;
    post_json(
        &app,
        &cookie,
        "/api/v1/memorials",
        json!({"name": "Old oak"}),
    )
    .await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/growth")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert!(res.status().is_success());
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["posts"], 1);
    assert_eq!(body["moodEntries"], 1);
    assert_eq!(body["meditationSessions"], 2);
    assert_eq!(body["meditationMinutes"], 30);
    assert_eq!(body["memoryStories"], 1);
    assert_eq!(body["memorials"], 1);
    assert_eq!(body["daysActive"], 1);
    assert_eq!(body["energy"], 0);
}

#[actix_web::test]
async fn growth_requires_a_session() {
    let fixture = memory_fixture();
    let app = test::init_service(build_app(
        web::Data::new(HealthState::new()),
        http_state(&fixture),
        Key::generate(),
        false,
    ))
    .await;

    let res =
        test::call_service(&app, test::TestRequest::get().uri("/api/v1/growth").to_request()).await;
    assert_eq!(res.status().as_u16(), 401);
}
