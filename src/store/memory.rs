//! In-memory [`DocumentStore`] for tests.
//!
//! Documents live in a `Vec` behind `std::sync::RwLock`, in insertion order.

use std::sync::RwLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use super::{stamp_payload, DocumentStore, StoredDocument};

/// In-memory store for tests.
pub struct InMemoryStore {
    docs: RwLock<Vec<StoredDocument>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(Vec::new()),
        }
    }

    /// Number of stored documents across all collections.
    pub fn len(&self) -> usize {
        self.docs.read().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn create_document(&self, kind: &str, payload: Value) -> Result<String> {
        let now = chrono::Utc::now();
        let id = Uuid::new_v4().to_string();
        let doc = StoredDocument {
            id: id.clone(),
            kind: kind.to_string(),
            created_at: now.to_rfc3339(),
            payload: stamp_payload(payload, now),
        };

        self.docs
            .write()
            .map_err(|_| anyhow!("document lock poisoned"))?
            .push(doc);
        Ok(id)
    }

    async fn list_collections(&self, limit: usize) -> Result<Vec<String>> {
        let docs = self.docs.read().map_err(|_| anyhow!("document lock poisoned"))?;
        let mut kinds: Vec<String> = docs.iter().map(|d| d.kind.clone()).collect();
        kinds.sort();
        kinds.dedup();
        kinds.truncate(limit);
        Ok(kinds)
    }

    async fn get_documents(
        &self,
        kind: Option<&str>,
        limit: usize,
    ) -> Result<Vec<StoredDocument>> {
        let docs = self.docs.read().map_err(|_| anyhow!("document lock poisoned"))?;
        Ok(docs
            .iter()
            .rev()
            .filter(|d| kind.map_or(true, |k| d.kind == k))
            .take(limit)
            .cloned()
            .collect())
    }
}
