use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Origin of the browser client; redirect target and allowed CORS origin.
    #[serde(default = "default_client_url")]
    pub client_url: String,

    #[serde(default)]
    pub google: GoogleConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub drive: DriveSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoogleConfig {
    pub client_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    /// OAuth callback URL registered with the provider.
    pub callback_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Secure flag on the session cookie; enable behind HTTPS.
    #[serde(default)]
    pub secure_cookies: bool,

    /// Accepted for deployment parity. Session cookies carry only a random
    /// server-side lookup key, so they are not signed with this secret.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveSettings {
    /// Page size for file listing.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Per-request cap on fetched file content, in bytes.
    #[serde(default = "default_max_content_bytes")]
    pub max_content_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            client_url: default_client_url(),
            google: GoogleConfig::default(),
            session: SessionConfig::default(),
            drive: DriveSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            secure_cookies: false,
            secret: None,
        }
    }
}

impl Default for DriveSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_content_bytes: default_max_content_bytes(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ServerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        let config = if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml::from_str(&contents)?
        } else {
            // Default to YAML
            serde_yaml::from_str(&contents)?
        };

        Ok(config)
    }

    /// Merge environment variables into config (env vars take precedence)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("DRIVEGEN_HOST") {
            self.host = val;
        }

        if let Ok(val) = std::env::var("DRIVEGEN_PORT") {
            if let Ok(port) = val.parse::<u16>() {
                self.port = port;
            }
        }

        if let Ok(val) = std::env::var("DRIVEGEN_CLIENT_URL") {
            self.client_url = val;
        }

        // Provider credentials (no DRIVEGEN_ prefix for these)
        if let Ok(val) = std::env::var("GOOGLE_CLIENT_ID") {
            self.google.client_id = Some(val);
        }

        if let Ok(val) = std::env::var("GOOGLE_CLIENT_SECRET") {
            self.google.client_secret = Some(val);
        }

        if let Ok(val) = std::env::var("DRIVEGEN_CALLBACK_URL") {
            self.google.callback_url = Some(val);
        }

        if let Ok(val) = std::env::var("DRIVEGEN_SESSION_SECRET") {
            self.session.secret = Some(val);
        }

        if let Ok(val) = std::env::var("DRIVEGEN_SECURE_COOKIES") {
            if let Ok(enabled) = val.parse::<bool>() {
                self.session.secure_cookies = enabled;
            }
        }

        if let Ok(val) = std::env::var("DRIVEGEN_LOG_LEVEL") {
            self.logging.level = val;
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_client_url() -> String {
    "http://localhost:5173".to_string()
}

fn default_cookie_name() -> String {
    "drivegen_sid".to_string()
}

fn default_page_size() -> u32 {
    10
}

fn default_max_content_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}
