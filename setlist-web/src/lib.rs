//! setlist-web library - Setlist builder web service
//!
//! Credential-authenticated CRUD over a user's songs, with the two-phase
//! collection reorder behind PUT /api/songs/reorder.

use axum::Router;
use sqlx::SqlitePool;

pub mod api;
pub mod db;
pub mod error;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
}

impl AppState {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
///
/// Song and settings routes require a session; registration, login, and
/// the health endpoint do not.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post, put};
    use tower_http::trace::TraceLayer;

    // Protected routes (require a valid session cookie)
    let protected = Router::new()
        .route(
            "/api/songs",
            get(api::songs::list_songs).post(api::songs::create_song),
        )
        .route("/api/songs/reorder", put(api::reorder::reorder_songs))
        .route(
            "/api/songs/:id",
            put(api::songs::update_song).delete(api::songs::delete_song),
        )
        .route("/api/settings", get(api::settings::get_settings))
        .route("/api/auth/logout", post(api::auth::logout))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth::session_middleware,
        ));

    // Public routes (no authentication)
    let public = Router::new()
        .route("/api/auth/register", post(api::auth::register))
        .route("/api/auth/login", post(api::auth::login))
        .merge(api::health_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
