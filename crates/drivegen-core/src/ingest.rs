//! Ingested examples, the ingest store and prompt assembly
//!
//! The ingest store is append-only and unbounded: no dedup, no size cap, no
//! TTL, and it is shared across all sessions rather than scoped per user.
//! Both are documented limitations carried over from the system this models,
//! not intentional cache semantics.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::Result;

/// Delimiter placed between the prompt and each ingested example.
pub const EXAMPLE_DELIMITER: &str = "\n\n---\n\n";

/// A (file, content) pair submitted for ingestion. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestedExample {
    pub file_id: String,
    pub content: String,
}

/// Ingest store trait
///
/// `append` always succeeds for the in-memory implementation: no validation
/// of content size or duplicate file IDs.
#[async_trait]
pub trait IngestStore: Send + Sync {
    /// Append an example unconditionally.
    async fn append(&self, example: IngestedExample) -> Result<()>;

    /// Snapshot of everything ingested so far, in insertion order.
    async fn snapshot(&self) -> Result<Vec<IngestedExample>>;
}

/// In-memory, unbounded ingest store.
#[derive(Debug, Default)]
pub struct MemoryIngestStore {
    examples: RwLock<Vec<IngestedExample>>,
}

impl MemoryIngestStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IngestStore for MemoryIngestStore {
    async fn append(&self, example: IngestedExample) -> Result<()> {
        self.examples.write().await.push(example);
        Ok(())
    }

    async fn snapshot(&self) -> Result<Vec<IngestedExample>> {
        Ok(self.examples.read().await.clone())
    }
}

/// Concatenate a prompt with every ingested example, separated by
/// [`EXAMPLE_DELIMITER`], in ingestion order.
pub fn assemble_prompt(prompt: &str, examples: &[IngestedExample]) -> String {
    let mut assembled = String::from(prompt);
    for example in examples {
        assembled.push_str(EXAMPLE_DELIMITER);
        assembled.push_str(&example.content);
    }
    assembled
}

/// Seam for the downstream text-generation call.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Produce generated text for the assembled prompt.
    async fn generate(&self, assembled: &str) -> Result<String>;
}

/// Stand-in backend that returns the assembled prompt verbatim.
///
/// Substitute a real model client here for an actual generation call.
#[derive(Debug, Default)]
pub struct EchoBackend;

#[async_trait]
impl GenerationBackend for EchoBackend {
    async fn generate(&self, assembled: &str) -> Result<String> {
        Ok(assembled.to_string())
    }
}
