//! Ingestion and generation routes

use axum::extract::State;
use axum::Json;
use drivegen_core::{assemble_prompt, IngestedExample};
use serde::Deserialize;
use tracing::debug;

use crate::error::ApiError;
use crate::session::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestRequest {
    pub file_id: String,
    pub content: String,
}

/// POST /ingest — append unconditionally; always succeeds once authenticated.
pub async fn ingest(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(req): Json<IngestRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .ingest
        .append(IngestedExample {
            file_id: req.file_id,
            content: req.content,
        })
        .await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
}

/// POST /generate — concatenate the prompt with everything ingested and
/// hand the result to the generation backend.
pub async fn generate(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let examples = state.ingest.snapshot().await?;
    debug!(examples = examples.len(), "assembling generation prompt");

    let assembled = assemble_prompt(&req.prompt, &examples);
    let generated = state.backend.generate(&assembled).await?;

    Ok(Json(serde_json::json!({ "generatedContent": generated })))
}
