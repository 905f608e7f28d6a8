//! Storage engine contract and its backing-medium implementations.
//!
//! # Responsibility
//! - Define the `TodoRepository` capability trait callers depend on.
//! - Provide one implementation per backing medium (JSON document, SQLite).
//!
//! # Invariants
//! - Every successful mutation commits to the backing medium exactly once
//!   before returning.
//! - A failed mutation leaves the in-memory model unchanged.
//! - Unknown ids are reported as `RepoError::NotFound`, never ignored.

pub mod document;
pub mod document_repo;
pub mod sqlite_repo;

use crate::db::DbError;
use crate::model::category::{Category, CategoryId};
use crate::model::item::{Item, ItemId};
use crate::model::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Record a `NotFound` error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordRef {
    Category(CategoryId),
    Item(ItemId),
}

impl Display for RecordRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Category(id) => write!(f, "category {id}"),
            Self::Item(id) => write!(f, "item {id}"),
        }
    }
}

/// Backing-medium failure.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    Io(std::io::Error),
    Encoding(serde_json::Error),
    /// Persisted state violates record invariants.
    InvalidData(String),
    /// Connection was not migrated before use.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "store i/o failed: {err}"),
            Self::Encoding(err) => write!(f, "store document encoding failed: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Encoding(err) => Some(err),
            _ => None,
        }
    }
}

/// Error returned by every storage engine and query operation.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    NotFound(RecordRef),
    Storage(StorageError),
}

impl RepoError {
    /// Short machine-friendly code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::Storage(_) => "storage",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(target) => write!(f, "{target} not found"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for RepoError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Storage(StorageError::Db(value))
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(StorageError::Db(DbError::Sqlite(value)))
    }
}

impl From<std::io::Error> for RepoError {
    fn from(value: std::io::Error) -> Self {
        Self::Storage(StorageError::Io(value))
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Storage(StorageError::Encoding(value))
    }
}

/// Storage engine contract shared by every backing medium.
///
/// Reads return owned snapshots; callers never mutate records directly.
pub trait TodoRepository {
    /// Appends a new category. Fails on a blank name.
    fn create_category(&mut self, name: &str, colour_tag: &str) -> RepoResult<Category>;
    /// All categories in creation order.
    fn list_categories(&self) -> RepoResult<Vec<Category>>;
    fn get_category(&self, id: CategoryId) -> RepoResult<Category>;
    fn set_category_colour(&mut self, id: CategoryId, colour_tag: &str) -> RepoResult<Category>;
    /// Removes the category and every item it owns.
    fn delete_category(&mut self, id: CategoryId) -> RepoResult<()>;

    /// Appends a new item to `category_id`.
    ///
    /// An unknown category is reported before a blank title.
    fn create_item(&mut self, category_id: CategoryId, title: &str) -> RepoResult<Item>;
    /// Items owned by `category_id` in insertion order.
    fn list_items(&self, category_id: CategoryId) -> RepoResult<Vec<Item>>;
    fn get_item(&self, id: ItemId) -> RepoResult<Item>;
    fn toggle_done(&mut self, id: ItemId) -> RepoResult<Item>;
    fn rename_item(&mut self, id: ItemId, title: &str) -> RepoResult<Item>;
    fn delete_item(&mut self, id: ItemId) -> RepoResult<()>;

    /// Flushes current state to the backing medium.
    fn persist(&mut self) -> RepoResult<()>;
    /// Rehydrates state from the backing medium.
    fn load(&mut self) -> RepoResult<()>;
}

impl<T: TodoRepository + ?Sized> TodoRepository for Box<T> {
    fn create_category(&mut self, name: &str, colour_tag: &str) -> RepoResult<Category> {
        (**self).create_category(name, colour_tag)
    }

    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        (**self).list_categories()
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Category> {
        (**self).get_category(id)
    }

    fn set_category_colour(&mut self, id: CategoryId, colour_tag: &str) -> RepoResult<Category> {
        (**self).set_category_colour(id, colour_tag)
    }

    fn delete_category(&mut self, id: CategoryId) -> RepoResult<()> {
        (**self).delete_category(id)
    }

    fn create_item(&mut self, category_id: CategoryId, title: &str) -> RepoResult<Item> {
        (**self).create_item(category_id, title)
    }

    fn list_items(&self, category_id: CategoryId) -> RepoResult<Vec<Item>> {
        (**self).list_items(category_id)
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Item> {
        (**self).get_item(id)
    }

    fn toggle_done(&mut self, id: ItemId) -> RepoResult<Item> {
        (**self).toggle_done(id)
    }

    fn rename_item(&mut self, id: ItemId, title: &str) -> RepoResult<Item> {
        (**self).rename_item(id, title)
    }

    fn delete_item(&mut self, id: ItemId) -> RepoResult<()> {
        (**self).delete_item(id)
    }

    fn persist(&mut self) -> RepoResult<()> {
        (**self).persist()
    }

    fn load(&mut self) -> RepoResult<()> {
        (**self).load()
    }
}
