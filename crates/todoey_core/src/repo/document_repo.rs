//! Document-backed repository for the in-memory and JSON file media.
//!
//! # Responsibility
//! - Keep the whole store as one `TodoDocument` value.
//! - Write the full document after every mutation when a file is attached.
//!
//! # Invariants
//! - Mutations run against a copy; the live state is swapped only after the
//!   document write succeeds.
//! - File writes go to a sibling temp file that is renamed over the target.

use super::document::TodoDocument;
use super::{RepoResult, TodoRepository};
use crate::model::category::{Category, CategoryId};
use crate::model::item::{Item, ItemId};
use log::{debug, error, info, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use uuid::Uuid;

/// Repository holding the store as a single structured document.
#[derive(Debug, Clone, Default)]
pub struct DocumentTodoRepository {
    path: Option<PathBuf>,
    state: TodoDocument,
}

impl DocumentTodoRepository {
    /// Creates an empty repository with no backing file.
    ///
    /// `persist` and `load` are no-ops for this medium.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Attaches a document file and hydrates state from it.
    ///
    /// A missing file yields an empty store; the file is created on the first
    /// write.
    pub fn open(path: impl Into<PathBuf>) -> RepoResult<Self> {
        let mut repo = Self::empty_at(path);
        repo.load()?;
        Ok(repo)
    }

    /// Like [`DocumentTodoRepository::open`], but reports a failed load and
    /// comes up empty instead of failing.
    ///
    /// The next successful write replaces the unreadable file.
    pub fn open_or_empty(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::open(path.clone()) {
            Ok(repo) => repo,
            Err(err) => {
                warn!(
                    "event=store_load module=repo status=degraded medium=document error_code={} error={}",
                    err.code(),
                    err
                );
                Self::empty_at(path)
            }
        }
    }

    /// Empty store attached to `path` without reading it.
    pub(crate) fn empty_at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            state: TodoDocument::default(),
        }
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read-only view of the current document.
    pub fn document(&self) -> &TodoDocument {
        &self.state
    }

    fn mutate<T, F>(&mut self, op: &str, apply: F) -> RepoResult<T>
    where
        F: FnOnce(&mut TodoDocument) -> RepoResult<T>,
    {
        let mut next = self.state.clone();
        let output = match apply(&mut next) {
            Ok(output) => output,
            Err(err) => {
                debug!(
                    "event={op} module=repo status=rejected medium=document error_code={}",
                    err.code()
                );
                return Err(err);
            }
        };
        self.write(&next)?;
        self.state = next;
        debug!("event={op} module=repo status=ok medium=document");
        Ok(output)
    }

    fn write(&self, document: &TodoDocument) -> RepoResult<()> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };

        let started_at = Instant::now();
        match write_document(path, document) {
            Ok(()) => {
                debug!(
                    "event=store_persist module=repo status=ok medium=document duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_persist module=repo status=error medium=document duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}

impl TodoRepository for DocumentTodoRepository {
    fn create_category(&mut self, name: &str, colour_tag: &str) -> RepoResult<Category> {
        let category = Category::new(name, colour_tag)?;
        self.mutate("category_create", |document| {
            document.push_category(&category);
            Ok(())
        })?;
        Ok(category)
    }

    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        Ok(self.state.categories())
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Category> {
        self.state.category(id)
    }

    fn set_category_colour(&mut self, id: CategoryId, colour_tag: &str) -> RepoResult<Category> {
        self.mutate("category_recolour", |document| {
            document.set_category_colour(id, colour_tag)
        })
    }

    fn delete_category(&mut self, id: CategoryId) -> RepoResult<()> {
        self.mutate("category_delete", |document| {
            document.remove_category(id).map(|_| ())
        })
    }

    fn create_item(&mut self, category_id: CategoryId, title: &str) -> RepoResult<Item> {
        self.state.category(category_id)?;
        let item = Item::new(category_id, title)?;
        self.mutate("item_create", |document| document.push_item(&item))?;
        Ok(item)
    }

    fn list_items(&self, category_id: CategoryId) -> RepoResult<Vec<Item>> {
        self.state.items(category_id)
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Item> {
        self.state.item(id)
    }

    fn toggle_done(&mut self, id: ItemId) -> RepoResult<Item> {
        self.mutate("item_toggle", |document| {
            document.update_item(id, |item| {
                item.toggle();
                Ok(())
            })
        })
    }

    fn rename_item(&mut self, id: ItemId, title: &str) -> RepoResult<Item> {
        self.mutate("item_rename", |document| {
            document.update_item(id, |item| item.rename(title).map_err(Into::into))
        })
    }

    fn delete_item(&mut self, id: ItemId) -> RepoResult<()> {
        self.mutate("item_delete", |document| {
            document.remove_item(id).map(|_| ())
        })
    }

    fn persist(&mut self) -> RepoResult<()> {
        self.write(&self.state)
    }

    fn load(&mut self) -> RepoResult<()> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };

        let started_at = Instant::now();
        let loaded = match read_document(path) {
            Ok(document) => document,
            Err(err) => {
                error!(
                    "event=store_load module=repo status=error medium=document duration_ms={} error_code={} error={}",
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                return Err(err);
            }
        };

        info!(
            "event=store_load module=repo status=ok medium=document duration_ms={} categories={} items={}",
            started_at.elapsed().as_millis(),
            loaded.categories.len(),
            loaded.item_count()
        );
        self.state = loaded;
        Ok(())
    }
}

fn read_document(path: &Path) -> RepoResult<TodoDocument> {
    match fs::read(path) {
        Ok(bytes) => TodoDocument::from_slice(&bytes),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(TodoDocument::default()),
        Err(err) => Err(err.into()),
    }
}

fn write_document(path: &Path, document: &TodoDocument) -> RepoResult<()> {
    let content = serde_json::to_vec_pretty(document)?;
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("todoey");
    let tmp_path = dir.join(format!(".{file_name}-{}.tmp", Uuid::new_v4()));
    if let Err(err) = fs::write(&tmp_path, content) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err.into());
    }
    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err.into());
    }
    Ok(())
}
