//! Drivegen Server
//!
//! HTTP surface for the drivegen service: Google OAuth sign-in, session
//! cookies, Drive proxy endpoints, ingestion and generation.
//!
//! Session lifecycle: `Anonymous` → (GET /auth/google) `Authorizing` →
//! (callback success) `Authenticated` → (GET /auth/logout) `Anonymous`.
//! A failed callback redirects back to the failure page and leaves the
//! session anonymous. There is no automatic expiry transition.

pub mod config;
pub mod error;
pub mod routes;
pub mod session;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
