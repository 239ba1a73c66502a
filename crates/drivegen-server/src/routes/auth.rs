//! OAuth sign-in routes

use axum::extract::{Query, State};
use axum::response::Redirect;
use axum::Json;
use axum_extra::extract::CookieJar;
use drivegen_core::SessionId;
use serde::Deserialize;
use tracing::{info, warn};

use crate::session::{clear_session_cookie, session_cookie, CurrentUser};
use crate::state::AppState;

/// GET /auth/google — send the user agent to the consent screen.
pub async fn begin(State(state): State<AppState>) -> Redirect {
    Redirect::to(&state.auth.authorization_url())
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

/// GET /auth/google/callback — complete the exchange and create the session.
///
/// Failures redirect to the client's failure page with the reason in the
/// query string; the reason is also logged here with detail.
pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(CookieJar, Redirect), Redirect> {
    if let Some(error) = &params.error {
        warn!(error = %error, "provider returned an error at callback");
        return Err(failure_redirect(&state.client_url, error));
    }

    let code = params
        .code
        .ok_or_else(|| failure_redirect(&state.client_url, "missing_code"))?;

    let user = state.auth.complete_authorization(&code).await.map_err(|e| {
        warn!(error = %e, "authorization exchange failed");
        failure_redirect(&state.client_url, "exchange_failed")
    })?;

    let session_id = state.sessions.create(user).await.map_err(|e| {
        warn!(error = %e, "session creation failed");
        failure_redirect(&state.client_url, "session_failed")
    })?;

    info!(session_id = %session_id, "login successful");

    let cookie = session_cookie(&state.cookie_name, &session_id, state.secure_cookies);
    let target = format!("{}/profile", state.client_url);
    Ok((jar.add(cookie), Redirect::to(&target)))
}

/// GET /auth/status — the stored profile, or 401 via the extractor.
pub async fn status(user: CurrentUser) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "user": user.record }))
}

/// GET /auth/logout — destroy the session and send the browser home.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    if let Some(cookie) = jar.get(&state.cookie_name) {
        let session_id = SessionId::from_string(cookie.value());
        if let Err(e) = state.sessions.delete(&session_id).await {
            warn!(error = %e, "session deletion failed during logout");
        }
    }

    let jar = jar.remove(clear_session_cookie(&state.cookie_name));
    (jar, Redirect::to(&state.client_url))
}

fn failure_redirect(client_url: &str, reason: &str) -> Redirect {
    let encoded = urlencoding::encode(reason);
    Redirect::to(&format!("{}/auth/failure?error={}", client_url, encoded))
}
