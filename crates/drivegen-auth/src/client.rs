//! OAuth2 client: consent URL, code exchange, profile fetch

use std::time::Duration;

use drivegen_core::{Error, Result, UserRecord};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::OAuthConfig;

/// Upstream request timeout. A hung provider call fails the request instead
/// of blocking it indefinitely.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Token response from the Google token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Profile from the Google userinfo endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleProfile {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// OAuth2 authorization client for Google.
pub struct AuthClient {
    config: OAuthConfig,
    http: Client,
}

impl AuthClient {
    /// Create a new auth client.
    ///
    /// # Errors
    /// Returns `Error::Config` if the HTTP client cannot be built.
    pub fn new(config: OAuthConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Drivegen/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { config, http })
    }

    /// Use a custom HTTP client (for connection pool reuse or testing).
    #[must_use]
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// Build the consent-screen URL the user agent is redirected to.
    ///
    /// `access_type=offline` asks the provider for a refresh token; the
    /// token is stored but never used.
    #[must_use]
    pub fn authorization_url(&self) -> String {
        let scope = self.config.scopes.join(" ");

        let mut url = self.config.auth_url.clone();
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", self.config.redirect_uri.as_str())
            .append_pair("scope", &scope)
            .append_pair("access_type", "offline");

        url.into()
    }

    /// Exchange an authorization code for tokens.
    ///
    /// # Errors
    /// Returns `Error::AuthExchange` if the code is invalid/expired, the
    /// provider rejects the credentials, or the call fails.
    #[instrument(skip(self, code))]
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];

        let response = self
            .http
            .post(self.config.token_url.clone())
            .form(&params)
            .send()
            .await
            .map_err(|e| Error::AuthExchange(format!("token request failed: {}", e)))?;

        let response = Self::ensure_success(response, "token exchange").await?;
        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| Error::AuthExchange(format!("malformed token response: {}", e)))
    }

    /// Fetch the user profile using an access token.
    ///
    /// # Errors
    /// Returns `Error::AuthExchange` if the userinfo call fails.
    #[instrument(skip(self, access_token))]
    pub async fn fetch_profile(&self, access_token: &str) -> Result<GoogleProfile> {
        let response = self
            .http
            .get(self.config.userinfo_url.clone())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| Error::AuthExchange(format!("userinfo request failed: {}", e)))?;

        let response = Self::ensure_success(response, "userinfo request").await?;
        response
            .json::<GoogleProfile>()
            .await
            .map_err(|e| Error::AuthExchange(format!("malformed userinfo response: {}", e)))
    }

    /// Complete the authorization-code exchange: trade the code for tokens,
    /// fetch the profile, and combine both into a `UserRecord`.
    ///
    /// The caller persists the record into the session store on success and
    /// redirects to the failure page on error.
    pub async fn complete_authorization(&self, code: &str) -> Result<UserRecord> {
        let tokens = self.exchange_code(code).await?;
        let profile = self.fetch_profile(&tokens.access_token).await?;

        debug!(user_id = %profile.id, "authorization exchange complete");

        Ok(UserRecord {
            id: profile.id,
            display_name: profile.name.unwrap_or_default(),
            emails: profile.email.into_iter().collect(),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        })
    }

    /// Checks HTTP response status; returns the response on success or an
    /// `AuthExchange` error carrying the provider's detail.
    async fn ensure_success(
        response: reqwest::Response,
        operation: &'static str,
    ) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(Error::AuthExchange(format!(
            "{} rejected with status {}: {}",
            operation, status, body
        )))
    }
}
