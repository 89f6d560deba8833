//! Service and datastore reachability report for `GET /test`.
//!
//! Building the report never fails: store errors are folded into
//! [`DatabaseStatus`] with a truncated detail message.

use serde::Serialize;

use crate::config::{DATABASE_NAME_VAR, DATABASE_URL_VAR};
use crate::store::StoreHandle;

/// Maximum number of collection names reported.
pub const MAX_COLLECTIONS: usize = 10;
/// Maximum length, in characters, of an error detail.
pub const MAX_DETAIL_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum DatabaseStatus {
    /// No database is configured.
    Uninitialized,
    /// Connected and collections could be listed.
    Connected,
    /// Connected, but listing collections failed.
    ConnectedWithError(String),
    /// The database could not be opened.
    Error(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticsReport {
    /// Always `"running"`: the handler executing proves the process is up.
    pub backend: &'static str,
    pub database: DatabaseStatus,
    pub connection_status: &'static str,
    /// Whether `DATABASE_URL` is set. The value itself is never reported.
    pub database_url: bool,
    /// Whether `DATABASE_NAME` is set.
    pub database_name: bool,
    pub collections: Vec<String>,
}

/// Probe the store and assemble the report.
///
/// `is_set` reports whether an environment variable is present.
pub async fn collect<F>(handle: &StoreHandle, is_set: F) -> DiagnosticsReport
where
    F: Fn(&str) -> bool,
{
    let mut collections = Vec::new();

    let (database, connection_status) = match handle {
        StoreHandle::Unconfigured => (DatabaseStatus::Uninitialized, "Not Connected"),
        StoreHandle::Failed(err) => (DatabaseStatus::Error(truncate_detail(err)), "Not Connected"),
        StoreHandle::Ready(store) => match store.list_collections(MAX_COLLECTIONS).await {
            Ok(mut names) => {
                names.truncate(MAX_COLLECTIONS);
                collections = names;
                (DatabaseStatus::Connected, "Connected")
            }
            Err(e) => (
                DatabaseStatus::ConnectedWithError(truncate_detail(&format!("{:#}", e))),
                "Connected",
            ),
        },
    };

    DiagnosticsReport {
        backend: "running",
        database,
        connection_status,
        database_url: is_set(DATABASE_URL_VAR),
        database_name: is_set(DATABASE_NAME_VAR),
        collections,
    }
}

/// Keep the first [`MAX_DETAIL_CHARS`] characters of an error message.
pub fn truncate_detail(msg: &str) -> String {
    msg.chars().take(MAX_DETAIL_CHARS).collect()
}
