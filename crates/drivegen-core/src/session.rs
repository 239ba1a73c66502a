//! Session records and the session store abstraction
//!
//! The `SessionStore` trait decouples request handlers from where sessions
//! live, so the in-memory store can be swapped for an externally shared
//! keyed store (or a test double) without touching handler code.
//!
//! A session record exists if and only if the user has completed at least
//! one successful authorization in the current cookie-scoped session. There
//! is no automatic expiry: records live until logout deletes them.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::Result;

/// Opaque session identifier carried in the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a new random session ID.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Create from an existing string (e.g. a cookie value).
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Provider profile plus the delegated tokens captured at login time.
///
/// The access token is short-lived and never refreshed; downstream proxy
/// calls fail with `Error::Upstream` once it expires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Provider-assigned user identifier.
    pub id: String,

    /// Display name from the provider profile.
    pub display_name: String,

    /// Email addresses from the provider profile.
    #[serde(default)]
    pub emails: Vec<String>,

    /// Delegated access token for the storage API.
    pub access_token: String,

    /// Refresh token, when the provider issued one. Stored but unused.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Session store trait
///
/// Implementations:
/// - `MemorySessionStore`: process-local, for the single-process deployment
///
/// Scaling beyond one process requires an externally shared implementation
/// behind this same trait.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a user record and return the new session ID.
    ///
    /// # Errors
    /// - `Error::Upstream` wrapping store-specific failures in external
    ///   implementations; the in-memory store is infallible.
    async fn create(&self, user: UserRecord) -> Result<SessionId>;

    /// Look up the record for a session ID, if any.
    async fn find(&self, id: &SessionId) -> Result<Option<UserRecord>>;

    /// Delete a session. Deleting an unknown ID is a no-op.
    async fn delete(&self, id: &SessionId) -> Result<()>;
}

/// In-memory session store.
///
/// Shared mutable state across all concurrent requests; the lock is required
/// on a multi-threaded runtime.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<SessionId, UserRecord>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, user: UserRecord) -> Result<SessionId> {
        let id = SessionId::generate();
        self.sessions.write().await.insert(id.clone(), user);
        Ok(id)
    }

    async fn find(&self, id: &SessionId) -> Result<Option<UserRecord>> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn delete(&self, id: &SessionId) -> Result<()> {
        self.sessions.write().await.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> UserRecord {
        UserRecord {
            id: "u1".to_string(),
            display_name: "Jane".to_string(),
            emails: vec!["jane@example.com".to_string()],
            access_token: "tok1".to_string(),
            refresh_token: None,
        }
    }

    #[test]
    fn test_session_id_generation_is_unique() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_create_then_find_returns_record() {
        let store = MemorySessionStore::new();
        let id = store.create(test_user()).await.unwrap();

        let found = store.find(&id).await.unwrap();
        assert_eq!(found, Some(test_user()));
    }

    #[tokio::test]
    async fn test_find_unknown_session_is_none() {
        let store = MemorySessionStore::new();
        let found = store
            .find(&SessionId::from_string("nope"))
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_session() {
        let store = MemorySessionStore::new();
        let id = store.create(test_user()).await.unwrap();

        store.delete(&id).await.unwrap();
        assert!(store.find(&id).await.unwrap().is_none());

        // Deleting again is a no-op
        store.delete(&id).await.unwrap();
    }

    #[test]
    fn test_user_record_wire_shape_is_camel_case() {
        let json = serde_json::to_value(test_user()).unwrap();
        assert_eq!(json["displayName"], "Jane");
        assert_eq!(json["accessToken"], "tok1");
        // Absent refresh token is omitted, not null
        assert!(json.get("refreshToken").is_none());
    }
}
