//! Store configuration and backing-medium selection.
//!
//! # Responsibility
//! - Describe which backing medium a caller wants, in a serde-friendly shape.
//! - Open the matching repository behind the `TodoRepository` trait.
//!
//! # Invariants
//! - Callers depend only on `Box<dyn TodoRepository>`; swapping media never
//!   changes call sites.
//! - Degraded startup (failed load) is reported, never swallowed.
//!
//! ## Example
//!
//! ```json
//! { "medium": "sqlite", "path": "/data/todoey.sqlite3" }
//! ```

use crate::repo::document_repo::DocumentTodoRepository;
use crate::repo::sqlite_repo::SqliteTodoRepository;
use crate::repo::{RepoError, RepoResult, TodoRepository};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Backing medium selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "medium", rename_all = "snake_case")]
pub enum StoreConfig {
    /// Process-local store; nothing survives a restart.
    #[default]
    Memory,
    /// Single JSON document on disk.
    Document { path: PathBuf },
    /// SQLite database file.
    Sqlite { path: PathBuf },
}

impl StoreConfig {
    /// Parses a JSON configuration value.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Short medium name used in log events.
    pub fn medium(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Document { .. } => "document",
            Self::Sqlite { .. } => "sqlite",
        }
    }
}

/// Repository opened in degraded-tolerant mode.
///
/// When `load_error` is set after an SQLite failure, `repo` is a process-local
/// store: writes and `persist` succeed but never reach the configured file.
/// `medium` names the store actually in use.
pub struct OpenedStore {
    pub repo: Box<dyn TodoRepository>,
    /// Medium behind `repo`; differs from the configured one after a fallback.
    pub medium: &'static str,
    /// Load failure that forced an empty store, if any.
    pub load_error: Option<RepoError>,
}

/// Opens the configured medium and hydrates it.
///
/// # Errors
/// - `RepoError::Storage` when the medium cannot be opened or read.
pub fn open_store(config: &StoreConfig) -> RepoResult<Box<dyn TodoRepository>> {
    let repo: Box<dyn TodoRepository> = match config {
        StoreConfig::Memory => Box::new(DocumentTodoRepository::in_memory()),
        StoreConfig::Document { path } => Box::new(DocumentTodoRepository::open(path.clone())?),
        StoreConfig::Sqlite { path } => Box::new(SqliteTodoRepository::open(path)?),
    };
    info!(
        "event=store_open module=config status=ok medium={}",
        config.medium()
    );
    Ok(repo)
}

/// Opens the configured medium, coming up empty when loading fails.
///
/// A document store keeps its file attached, unread, so the next write
/// replaces the unreadable document. An unusable SQLite file falls back to a
/// process-local store reported as `medium == "memory"`.
pub fn open_store_or_empty(config: &StoreConfig) -> OpenedStore {
    match open_store(config) {
        Ok(repo) => OpenedStore {
            repo,
            medium: config.medium(),
            load_error: None,
        },
        Err(err) => {
            warn!(
                "event=store_open module=config status=degraded medium={} error_code={} error={}",
                config.medium(),
                err.code(),
                err
            );
            let (repo, medium) = match config {
                StoreConfig::Document { path } => {
                    (DocumentTodoRepository::empty_at(path.clone()), "document")
                }
                _ => (DocumentTodoRepository::in_memory(), "memory"),
            };
            let repo: Box<dyn TodoRepository> = Box::new(repo);
            OpenedStore {
                repo,
                medium,
                load_error: Some(err),
            }
        }
    }
}
