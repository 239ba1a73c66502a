//! Application state with dependency-injected stores
//!
//! Handlers depend on the `SessionStore`, `IngestStore` and
//! `GenerationBackend` traits rather than concrete types, so the in-memory
//! implementations can be swapped for real databases or test doubles.

use std::sync::Arc;

use drivegen_auth::AuthClient;
use drivegen_core::{GenerationBackend, IngestStore, SessionStore};
use drivegen_drive::DriveClient;

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<dyn SessionStore>,
    pub ingest: Arc<dyn IngestStore>,
    pub auth: Arc<AuthClient>,
    pub drive: Arc<DriveClient>,
    pub backend: Arc<dyn GenerationBackend>,

    /// Origin of the browser client, used for post-auth redirects.
    pub client_url: String,

    /// Name of the session cookie.
    pub cookie_name: String,

    /// Secure flag for the session cookie.
    pub secure_cookies: bool,

    /// Page size for file listing.
    pub page_size: u32,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        ingest: Arc<dyn IngestStore>,
        auth: Arc<AuthClient>,
        drive: Arc<DriveClient>,
        backend: Arc<dyn GenerationBackend>,
        client_url: impl Into<String>,
        cookie_name: impl Into<String>,
        secure_cookies: bool,
        page_size: u32,
    ) -> Self {
        Self {
            sessions,
            ingest,
            auth,
            drive,
            backend,
            client_url: client_url.into(),
            cookie_name: cookie_name.into(),
            secure_cookies,
            page_size,
        }
    }
}
