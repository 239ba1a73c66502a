//! Drivegen Identity Gateway
//!
//! Google OAuth2 authorization-code flow:
//! - Build the consent-screen URL for the requested scopes
//! - Exchange an authorization code for tokens
//! - Fetch the user profile and combine everything into a `UserRecord`
//!
//! Token refresh is deliberately absent: the access token captured at login
//! time is reused for every downstream call until it expires.

pub mod client;
pub mod config;

pub use client::{AuthClient, GoogleProfile, TokenResponse};
pub use config::OAuthConfig;
