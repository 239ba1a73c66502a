//! Drivegen server binary
//!
//! A small web service that signs a user in with Google OAuth2, proxies
//! Drive file listing and content fetch through the delegated token, and
//! feeds ingested file contents into a generation backend.
//!
//! Usage:
//! ```bash
//! # With config file
//! drivegen-server --config config.yaml
//!
//! # Or with environment variables
//! GOOGLE_CLIENT_ID=... GOOGLE_CLIENT_SECRET=... \
//!   DRIVEGEN_CALLBACK_URL=http://localhost:5000/auth/google/callback \
//!   drivegen-server
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use drivegen_auth::{AuthClient, OAuthConfig};
use drivegen_core::{EchoBackend, MemoryIngestStore, MemorySessionStore};
use drivegen_drive::{DriveClient, DriveConfig};
use drivegen_server::{router, AppState, ServerConfig};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Drivegen Server - Google Drive ingestion for text generation
#[derive(Parser)]
#[command(name = "drivegen-server")]
#[command(about = "Drivegen server: OAuth sign-in and Drive-to-generation proxy", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to configuration file (YAML or TOML)
    #[arg(short, long, value_name = "FILE", env = "DRIVEGEN_CONFIG")]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server (default if no command specified)
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ServerConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path))?,
        None => ServerConfig::default(),
    };
    config.merge_env();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Some(Commands::Serve) | None => serve(config).await,
    }
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let client_id = config
        .google
        .client_id
        .clone()
        .context("GOOGLE_CLIENT_ID is required")?;
    let client_secret = config
        .google
        .client_secret
        .clone()
        .context("GOOGLE_CLIENT_SECRET is required")?;
    let callback_url = config
        .google
        .callback_url
        .clone()
        .context("DRIVEGEN_CALLBACK_URL is required")?;

    let oauth = OAuthConfig::new(
        client_id,
        client_secret,
        callback_url
            .parse()
            .with_context(|| format!("invalid callback URL: {}", callback_url))?,
    );
    let auth = Arc::new(AuthClient::new(oauth)?);

    let drive = Arc::new(DriveClient::new(
        DriveConfig::default().with_max_content_bytes(config.drive.max_content_bytes),
    )?);

    let state = AppState::new(
        Arc::new(MemorySessionStore::new()),
        Arc::new(MemoryIngestStore::new()),
        auth,
        drive,
        Arc::new(EchoBackend),
        config.client_url.clone(),
        config.session.cookie_name.clone(),
        config.session.secure_cookies,
        config.drive.page_size,
    );

    let app = router(state)?;

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("invalid listen address")?;

    info!("Drivegen server listening on http://{}", addr);
    info!("   Sign-in:  http://{}/auth/google", addr);
    info!("   Client:   {}", config.client_url);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
