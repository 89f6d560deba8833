//! Stored request history.
//!
//! Request handling never reads the store back; this listing exists for the
//! `recipe-ai history` command only.

use anyhow::{Context, Result};

use crate::config::Config;
use crate::store::{DocumentStore, SqliteStore, StoredDocument};

/// Fetch the most recent stored documents, optionally from one collection.
pub async fn get_history(
    config: &Config,
    kind: Option<&str>,
    limit: usize,
) -> Result<Vec<StoredDocument>> {
    let db_config = config
        .db
        .as_ref()
        .context("no [db] section configured and DATABASE_URL is not set")?;

    let store = SqliteStore::open(db_config).await?;
    let docs = store.get_documents(kind, limit).await;
    store.close().await;
    docs
}

/// CLI entry point: calls `get_history` and prints to stdout.
pub async fn run_history(config: &Config, kind: Option<&str>, limit: usize) -> Result<()> {
    let docs = get_history(config, kind, limit).await?;

    if docs.is_empty() {
        println!("No stored documents.");
        return Ok(());
    }

    for doc in &docs {
        println!("{}  {:<13} {}", doc.created_at, doc.kind, doc.id);
        println!("  {}", summarize(doc));
    }

    Ok(())
}

fn summarize(doc: &StoredDocument) -> String {
    if let Some(title) = doc.payload.get("title").and_then(|t| t.as_str()) {
        let filename = doc
            .payload
            .get("image_filename")
            .and_then(|f| f.as_str())
            .unwrap_or("-");
        return format!("{} (from {})", title, filename);
    }

    let list = |key: &str| -> String {
        doc.payload
            .get(key)
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|i| i.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default()
    };

    format!("[{}] -> [{}]", list("ingredients"), list("matches"))
}
