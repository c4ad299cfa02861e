pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vibe_cards_core::UserStore;

use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::services::sessions::{SessionRegistry, UserSession};
use crate::services::storage::JsonFileStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<JsonFileStore>,
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(store: JsonFileStore) -> Self {
        Self {
            store: Arc::new(store),
            sessions: Arc::new(SessionRegistry::new()),
        }
    }

    /// Run `f` against one user's decks and session on the blocking pool,
    /// since loading and saving deck files are blocking file operations.
    pub async fn with_user<T, F>(&self, user_id: &str, f: F) -> Result<T>
    where
        F: FnOnce(&mut UserSession, &UserStore<'_, JsonFileStore>) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let state = self.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || state.sessions.with_user(&state.store, &user_id, f))
            .await
            .map_err(|err| ApiError::Internal(format!("session task failed: {err}")))?
    }
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    let user_routes = Router::new()
        // Deck routes
        .route("/decks", get(routes::decks::list).post(routes::decks::create))
        .route("/decks/:name", get(routes::decks::show).delete(routes::decks::delete))
        .route("/decks/:name/cards", post(routes::decks::add_card))
        .route("/decks/:name/cards/:id", delete(routes::decks::remove_card))
        .route("/export", get(routes::decks::export))
        // Session routes
        .route("/session", get(routes::study::snapshot))
        .route("/session/select", post(routes::study::select))
        .route("/session/start", post(routes::study::start))
        .route("/session/restart", post(routes::study::restart))
        .route("/session/exit", post(routes::study::exit))
        .route("/session/advance", post(routes::study::advance))
        .route("/session/reveal", post(routes::study::reveal))
        .route("/session/write", post(routes::study::write))
        .route("/session/choice", post(routes::study::choice))
        .route("/session/self-grade", post(routes::study::self_grade))
        .route("/session/persist", post(routes::study::persist));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/users/:user", user_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!(data_dir = %config.data_dir.display(), "Using deck storage");
    let state = AppState::new(JsonFileStore::new(&config.data_dir));
    let app = router(state);

    let addr = config.addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
