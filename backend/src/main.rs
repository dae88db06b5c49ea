//! Backend entry-point: wires the document store, REST endpoints, and
//! OpenAPI docs.

use std::env;
use std::sync::Arc;

use actix_web::cookie::Key;
use actix_web::{HttpServer, web};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use backend::domain::store::DocumentStore;
use backend::inbound::http::health::HealthState;
use backend::inbound::http::state::HttpState;
use backend::outbound::password::Argon2PasswordHasher;
use backend::outbound::persistence::JsonFilePersistence;
use backend::outbound::quiz::StaticQuizSource;
use backend::server::config::StoreSettings;
use backend::server::build_app;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    let key = match std::fs::read(&key_path) {
        Ok(bytes) => Key::derive_from(&bytes),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Key::generate()
            } else {
                return Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )));
            }
        }
    };

    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);

    let settings = StoreSettings::load_from_iter(env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load configuration: {e}")))?;
    let clock = Arc::new(DefaultClock);
    let persistence = Arc::new(JsonFilePersistence::new(settings.data_file()));
    let store = DocumentStore::open(persistence, clock.as_ref())
        .map_err(|e| std::io::Error::other(format!("failed to open document store: {e}")))?;
    let state = HttpState::new(
        Arc::new(store),
        Arc::new(Argon2PasswordHasher),
        Arc::new(StaticQuizSource),
        clock,
    );

    let health_state = web::Data::new(HealthState::new());
    // Clone for server factory so readiness probe remains accessible.
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(
            server_health_state.clone(),
            state.clone(),
            key.clone(),
            cookie_secure,
        )
    })
    .bind(("0.0.0.0", 8080))?;

    health_state.mark_ready();
    server.run().await
}
