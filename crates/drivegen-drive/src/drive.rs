//! Google Drive v3 connector

use drivegen_core::{Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::client::{create_client, HttpClientConfig};

/// Mime type of native Google documents, which must be exported rather than
/// downloaded.
const GOOGLE_DOC_MIME: &str = "application/vnd.google-apps.document";

/// Export target for native documents.
const EXPORT_MIME: &str = "text/plain";

/// Drive connector configuration
#[derive(Debug, Clone)]
pub struct DriveConfig {
    /// Base URL for the Drive API (default: https://www.googleapis.com/drive/v3)
    pub base_url: String,

    /// Maximum accepted file content size in bytes. Content is accumulated
    /// in memory before responding, so the cap bounds per-request memory.
    pub max_content_bytes: usize,

    /// HTTP client configuration
    pub client_config: HttpClientConfig,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.googleapis.com/drive/v3".to_string(),
            max_content_bytes: 10 * 1024 * 1024,
            client_config: HttpClientConfig::default(),
        }
    }
}

impl DriveConfig {
    /// Set the base URL (for tests against a mock server)
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the content size cap
    #[must_use]
    pub fn with_max_content_bytes(mut self, max: usize) -> Self {
        self.max_content_bytes = max;
        self
    }
}

/// File metadata as exposed to the application. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub id: String,
    pub name: String,
    #[serde(
        rename = "mimeType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileListResponse {
    #[serde(default)]
    files: Vec<FileDescriptor>,
}

/// Google Drive connector
pub struct DriveClient {
    config: DriveConfig,
    client: Client,
}

impl DriveClient {
    /// Create a new Drive connector
    ///
    /// # Errors
    /// Returns `Error::Config` if the HTTP client cannot be built.
    pub fn new(config: DriveConfig) -> Result<Self> {
        let client = create_client(&config.client_config)?;
        Ok(Self { config, client })
    }

    /// List up to `page_size` file descriptors (id and name only).
    ///
    /// # Errors
    /// Returns `Error::Upstream` on any network or auth failure, including
    /// an expired access token (no refresh is attempted).
    #[instrument(skip(self, access_token))]
    pub async fn list_files(
        &self,
        access_token: &str,
        page_size: u32,
    ) -> Result<Vec<FileDescriptor>> {
        let response = self
            .client
            .get(format!("{}/files", self.config.base_url))
            .bearer_auth(access_token)
            .query(&[
                ("pageSize", page_size.to_string().as_str()),
                ("fields", "files(id, name)"),
            ])
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("file list request failed: {}", e)))?;

        let response = Self::ensure_success(response, "file list").await?;
        let list: FileListResponse = response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("malformed file list response: {}", e)))?;

        // The API honors pageSize, but the bound is ours to guarantee
        let mut files = list.files;
        files.truncate(page_size as usize);

        debug!(count = files.len(), "listed drive files");
        Ok(files)
    }

    /// Fetch the content of a single file as text.
    ///
    /// Metadata is fetched first to branch on mime type: native Google
    /// documents are exported as plain text, everything else is downloaded
    /// as raw media. The body is drained to completion before returning, so
    /// the whole file is held in memory; the configured cap fails oversized
    /// content with `Error::PayloadTooLarge`.
    ///
    /// # Errors
    /// - `Error::Upstream` if the metadata fetch, export, or download fails
    /// - `Error::PayloadTooLarge` if the content exceeds the configured cap
    #[instrument(skip(self, access_token))]
    pub async fn get_file_content(&self, access_token: &str, file_id: &str) -> Result<String> {
        let metadata = self.get_metadata(access_token, file_id).await?;

        let request = if metadata.mime_type.as_deref() == Some(GOOGLE_DOC_MIME) {
            debug!(file_id, "exporting native document as plain text");
            self.client
                .get(format!("{}/files/{}/export", self.config.base_url, file_id))
                .query(&[("mimeType", EXPORT_MIME)])
        } else {
            debug!(file_id, mime_type = ?metadata.mime_type, "downloading raw media");
            self.client
                .get(format!("{}/files/{}", self.config.base_url, file_id))
                .query(&[("alt", "media")])
        };

        let response = request
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("content request failed: {}", e)))?;

        let response = Self::ensure_success(response, "content fetch").await?;
        self.drain_text(response).await
    }

    /// Fetch metadata for a single file.
    async fn get_metadata(&self, access_token: &str, file_id: &str) -> Result<FileDescriptor> {
        let response = self
            .client
            .get(format!("{}/files/{}", self.config.base_url, file_id))
            .bearer_auth(access_token)
            .query(&[("fields", "id, name, mimeType")])
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("metadata request failed: {}", e)))?;

        let response = Self::ensure_success(response, "metadata fetch").await?;
        response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("malformed metadata response: {}", e)))
    }

    /// Accumulate the response body chunk by chunk, enforcing the size cap.
    ///
    /// A partial body on stream error is discarded, never returned.
    async fn drain_text(&self, mut response: reqwest::Response) -> Result<String> {
        let limit = self.config.max_content_bytes;

        // Reject early when the upstream declares an oversized body
        if let Some(len) = response.content_length() {
            if len as usize > limit {
                return Err(Error::PayloadTooLarge { limit });
            }
        }

        let mut buf: Vec<u8> = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| Error::Upstream(format!("content stream failed: {}", e)))?
        {
            if buf.len() + chunk.len() > limit {
                return Err(Error::PayloadTooLarge { limit });
            }
            buf.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Checks HTTP response status; returns the response on success or an
    /// `Upstream` error carrying the provider's detail.
    async fn ensure_success(
        response: reqwest::Response,
        operation: &'static str,
    ) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        warn!("drive API {} failed with status {}", operation, status);
        Err(Error::Upstream(format!(
            "{} rejected with status {}: {}",
            operation, status, body
        )))
    }
}
