//! Drivegen Drive Connector
//!
//! Egress connector for the Google Drive v3 API:
//! - List file metadata with a page-size bound
//! - Fetch file content, exporting native Google documents as plain text and
//!   downloading everything else as raw media
//!
//! Content is drained to completion before responding, with a running size
//! cap; there is no token refresh and no retry.

pub mod client;
pub mod drive;

pub use client::HttpClientConfig;
pub use drive::{DriveClient, DriveConfig, FileDescriptor};
