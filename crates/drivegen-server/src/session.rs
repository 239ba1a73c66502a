//! Session cookie plumbing and the authenticated-request guard

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use drivegen_core::{SessionId, UserRecord};

use crate::error::ApiError;
use crate::state::AppState;

/// Create the session cookie set at callback time.
///
/// The value is a random server-side lookup key; HttpOnly keeps it away
/// from the picker widget and other page scripts.
pub fn session_cookie(name: &str, session_id: &SessionId, secure: bool) -> Cookie<'static> {
    Cookie::build((name.to_string(), session_id.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/".to_string())
        .build()
}

/// Create the removal cookie used at logout.
pub fn clear_session_cookie(name: &str) -> Cookie<'static> {
    Cookie::build((name.to_string(), ""))
        .path("/".to_string())
        .max_age(time::Duration::ZERO)
        .build()
}

/// Authenticated user extracted from the session cookie.
///
/// Use as an extractor in protected handlers: rejection is a 401 and the
/// handler body (and any upstream call inside it) never runs.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub session_id: SessionId,
    pub record: UserRecord,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Unauthorized)?;

        let session_id = jar
            .get(&state.cookie_name)
            .map(|c| SessionId::from_string(c.value()))
            .ok_or(ApiError::Unauthorized)?;

        let record = state
            .sessions
            .find(&session_id)
            .await
            .map_err(ApiError::from)?
            .ok_or(ApiError::Unauthorized)?;

        Ok(CurrentUser { session_id, record })
    }
}
