//! Document store abstraction.
//!
//! Request handlers write recipes and queries through the [`DocumentStore`]
//! trait as best-effort log entries: a failed write is logged and turned
//! into a missing id by [`create_best_effort`], never into an HTTP error.
//!
//! | Implementation | Backing |
//! |----------------|---------|
//! | [`SqliteStore`] | SQLite `documents` table via `sqlx` |
//! | [`InMemoryStore`] | `Vec` behind a `RwLock`, for tests |

pub mod memory;
pub mod sqlite;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

/// Collection name for recipes produced by the image resolver.
pub const RECIPE_KIND: &str = "recipe";
/// Collection name for logged ingredient queries.
pub const RECIPE_QUERY_KIND: &str = "recipe_query";

/// A stored document as returned by [`DocumentStore::get_documents`].
#[derive(Debug, Clone, Serialize)]
pub struct StoredDocument {
    pub id: String,
    pub kind: String,
    pub created_at: String,
    pub payload: Value,
}

/// Append-only document storage.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document into the `kind` collection, returning its id.
    async fn create_document(&self, kind: &str, payload: Value) -> Result<String>;

    /// Names of at most `limit` collections, sorted by name.
    async fn list_collections(&self, limit: usize) -> Result<Vec<String>>;

    /// Most recent documents first, optionally restricted to one collection.
    async fn get_documents(&self, kind: Option<&str>, limit: usize)
        -> Result<Vec<StoredDocument>>;
}

/// The server's view of its document store.
#[derive(Clone)]
pub enum StoreHandle {
    /// No database configured.
    Unconfigured,
    /// Connected and migrated.
    Ready(Arc<dyn DocumentStore>),
    /// A database was configured but opening it failed.
    Failed(String),
}

impl StoreHandle {
    /// The store to write to, if one is available.
    pub fn store(&self) -> Option<&dyn DocumentStore> {
        match self {
            StoreHandle::Ready(store) => Some(store.as_ref()),
            _ => None,
        }
    }
}

/// Add `created_at` / `updated_at` timestamps to an object payload.
/// Non-object payloads are wrapped as `{ "value": ... }` first.
pub fn stamp_payload(payload: Value, now: chrono::DateTime<chrono::Utc>) -> Value {
    let mut object = match payload {
        Value::Object(map) => map,
        other => {
            let mut map = serde_json::Map::new();
            map.insert("value".to_string(), other);
            map
        }
    };
    let ts = Value::String(now.to_rfc3339());
    object.insert("created_at".to_string(), ts.clone());
    object.insert("updated_at".to_string(), ts);
    Value::Object(object)
}

/// Serialize `payload` and write it, swallowing any failure.
///
/// Returns `None` when no store is configured or the write failed; the
/// failure is logged at `warn`.
pub async fn create_best_effort<T: Serialize>(
    store: Option<&dyn DocumentStore>,
    kind: &str,
    payload: &T,
) -> Option<String> {
    let store = store?;

    let value = match serde_json::to_value(payload) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(kind, error = %e, "failed to serialize document");
            return None;
        }
    };

    match store.create_document(kind, value).await {
        Ok(id) => {
            tracing::debug!(kind, %id, "stored document");
            Some(id)
        }
        Err(e) => {
            tracing::warn!(kind, error = %e, "failed to store document");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use serde_json::json;

    struct FailingStore;

    #[async_trait]
    impl DocumentStore for FailingStore {
        async fn create_document(&self, _kind: &str, _payload: Value) -> Result<String> {
            bail!("disk full")
        }

        async fn list_collections(&self, _limit: usize) -> Result<Vec<String>> {
            bail!("disk full")
        }

        async fn get_documents(
            &self,
            _kind: Option<&str>,
            _limit: usize,
        ) -> Result<Vec<StoredDocument>> {
            bail!("disk full")
        }
    }

    #[test]
    fn test_stamp_payload_object() {
        let now = chrono::Utc::now();
        let stamped = stamp_payload(json!({ "title": "x" }), now);
        assert_eq!(stamped["title"], "x");
        assert_eq!(stamped["created_at"], now.to_rfc3339());
        assert_eq!(stamped["created_at"], stamped["updated_at"]);
    }

    #[test]
    fn test_stamp_payload_wraps_scalars() {
        let stamped = stamp_payload(json!(42), chrono::Utc::now());
        assert_eq!(stamped["value"], 42);
        assert!(stamped.get("created_at").is_some());
    }

    #[tokio::test]
    async fn test_best_effort_without_store() {
        let id = create_best_effort(None, RECIPE_KIND, &json!({ "a": 1 })).await;
        assert!(id.is_none());
    }

    #[tokio::test]
    async fn test_best_effort_swallows_failure() {
        let store = FailingStore;
        let id = create_best_effort(
            Some(&store as &dyn DocumentStore),
            RECIPE_KIND,
            &json!({ "a": 1 }),
        )
        .await;
        assert!(id.is_none());
    }

    #[tokio::test]
    async fn test_best_effort_returns_id() {
        let store = InMemoryStore::new();
        let id = create_best_effort(
            Some(&store as &dyn DocumentStore),
            RECIPE_QUERY_KIND,
            &json!({ "a": 1 }),
        )
        .await;
        assert!(id.is_some());
        assert_eq!(store.len(), 1);
    }
}
