//! Storage core for a single-user to-do list.
//! Categories own ordered items; every backing medium sits behind one trait.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;

pub use config::{open_store, open_store_or_empty, OpenedStore, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::{Category, CategoryId, DEFAULT_COLOUR_TAG};
pub use model::item::{Item, ItemId};
pub use model::ValidationError;
pub use query::item_query::{fold_for_search, matches_search, sort_items, ItemSort};
pub use repo::document_repo::DocumentTodoRepository;
pub use repo::sqlite_repo::SqliteTodoRepository;
pub use repo::{RecordRef, RepoError, RepoResult, StorageError, TodoRepository};
pub use service::todo_service::TodoService;

/// Minimal health-check API for linkage probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
