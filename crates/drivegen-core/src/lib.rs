//! Drivegen Core
//!
//! Shared types and stores for the drivegen service:
//! - Error taxonomy and `Result` alias
//! - Session records and the `SessionStore` abstraction
//! - Ingested examples, the `IngestStore` abstraction and prompt assembly
//! - The `GenerationBackend` seam
//!
//! Known limitations, reproduced deliberately from the system this service
//! models: access tokens are never refreshed (proxy calls fail once the
//! login-time token expires), the ingestion store is global rather than
//! per-user, and sessions have no server-side expiry.

pub mod error;
pub mod ingest;
pub mod session;

pub use error::{Error, Result};
pub use ingest::{
    assemble_prompt, EchoBackend, GenerationBackend, IngestStore, IngestedExample,
    MemoryIngestStore, EXAMPLE_DELIMITER,
};
pub use session::{MemorySessionStore, SessionId, SessionStore, UserRecord};
