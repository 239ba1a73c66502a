//! Route wiring

pub mod auth;
pub mod drive;
pub mod ingest;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::{Json, Router};
use drivegen_core::{Error, Result};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
///
/// CORS is restricted to the configured client origin with credentials so
/// the browser sends the session cookie on fetch calls.
pub fn router(state: AppState) -> Result<Router> {
    let origin: HeaderValue = state
        .client_url
        .parse()
        .map_err(|_| Error::Config(format!("invalid client URL: {}", state.client_url)))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Ok(Router::new()
        .route("/auth/google", get(auth::begin))
        .route("/auth/google/callback", get(auth::callback))
        .route("/auth/status", get(auth::status))
        .route("/auth/logout", get(auth::logout))
        .route("/drive/connect", get(drive::connect))
        .route("/drive/files", get(drive::files))
        .route("/drive/file-content/{file_id}", get(drive::file_content))
        .route("/ingest", post(ingest::ingest))
        .route("/generate", post(ingest::generate))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
