pub mod auth;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod reports;
pub mod sessions;
pub mod uploads;

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use civic_db::Database;

use crate::middleware::{require_authority, require_citizen};
use crate::sessions::SessionStore;
use crate::uploads::{PhotoStore, UPLOADS_PREFIX};

/// 60 MB request limit for report submissions (five photos plus fields).
const MAX_REPORT_BODY: usize = 60 * 1024 * 1024;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub sessions: Arc<dyn SessionStore>,
    pub photos: PhotoStore,
    /// Directory holding the single-page frontend; `index.html` is served
    /// for every path that matches nothing else.
    pub public_dir: PathBuf,
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/auth/citizen", post(auth::citizen_login))
        .route("/api/auth/authority", post(auth::authority_login))
        .route("/api/health", get(health));

    let citizen_routes = Router::new()
        .route("/api/reports", post(reports::create_report))
        .route_layer(from_fn_with_state(state.clone(), require_citizen))
        .layer(DefaultBodyLimit::max(MAX_REPORT_BODY));

    let authority_routes = Router::new()
        .route("/api/reports", get(reports::list_reports))
        .route_layer(from_fn_with_state(state.clone(), require_authority));

    let frontend = ServeDir::new(&state.public_dir)
        .fallback(ServeFile::new(state.public_dir.join("index.html")));

    Router::new()
        .merge(public_routes)
        .merge(citizen_routes)
        .merge(authority_routes)
        .nest_service(UPLOADS_PREFIX, ServeDir::new(state.photos.dir()))
        .fallback_service(frontend)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
