//! Drive proxy routes
//!
//! Every handler takes `CurrentUser` first: an anonymous request is
//! rejected with a 401 before any upstream call is made.

use axum::extract::{Path, State};
use axum::response::Redirect;
use axum::Json;

use crate::error::ApiError;
use crate::session::CurrentUser;
use crate::state::AppState;

/// GET /drive/connect — 401 when anonymous, else back to the profile page.
pub async fn connect(State(state): State<AppState>, _user: CurrentUser) -> Redirect {
    Redirect::to(&format!("{}/profile", state.client_url))
}

/// GET /drive/files
pub async fn files(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let files = state
        .drive
        .list_files(&user.record.access_token, state.page_size)
        .await?;
    Ok(Json(serde_json::json!({ "files": files })))
}

/// GET /drive/file-content/{file_id}
pub async fn file_content(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(file_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let content = state
        .drive
        .get_file_content(&user.record.access_token, &file_id)
        .await?;
    Ok(Json(serde_json::json!({ "fileId": file_id, "content": content })))
}
