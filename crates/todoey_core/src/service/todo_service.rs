//! To-do use-case service.
//!
//! # Responsibility
//! - Expose storage and query operations to the presentation layer.
//! - Track the explicitly selected category.
//!
//! # Invariants
//! - Service APIs never bypass repository validation or persistence.
//! - The selection only ever names a category that existed when selected;
//!   deleting or failing to reload it clears the selection.

use crate::model::category::{palette_colour_for, Category, CategoryId};
use crate::model::item::{Item, ItemId};
use crate::query::item_query::{self, ItemSort};
use crate::repo::{RecordRef, RepoError, RepoResult, TodoRepository};
use log::debug;
use uuid::Uuid;

/// Service facade over any backing medium.
pub struct TodoService<R: TodoRepository> {
    repo: R,
    selected: Option<CategoryId>,
}

impl<R: TodoRepository> TodoService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            selected: None,
        }
    }

    /// Read-only access to the wrapped repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Returns the wrapped repository, dropping the selection.
    pub fn into_inner(self) -> R {
        self.repo
    }

    pub fn create_category(&mut self, name: &str, colour_tag: &str) -> RepoResult<Category> {
        self.repo.create_category(name, colour_tag)
    }

    /// Creates a category with a colour picked from the flat palette.
    pub fn create_category_with_palette(&mut self, name: &str) -> RepoResult<Category> {
        let colour = palette_colour_for(Uuid::new_v4());
        self.repo.create_category(name, colour)
    }

    pub fn list_categories(&self) -> RepoResult<Vec<Category>> {
        self.repo.list_categories()
    }

    pub fn get_category(&self, id: CategoryId) -> RepoResult<Category> {
        self.repo.get_category(id)
    }

    pub fn set_category_colour(
        &mut self,
        id: CategoryId,
        colour_tag: &str,
    ) -> RepoResult<Category> {
        self.repo.set_category_colour(id, colour_tag)
    }

    /// Deletes a category and its items, clearing it from the selection.
    pub fn delete_category(&mut self, id: CategoryId) -> RepoResult<()> {
        self.repo.delete_category(id)?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Ok(())
    }

    pub fn create_item(&mut self, category_id: CategoryId, title: &str) -> RepoResult<Item> {
        self.repo.create_item(category_id, title)
    }

    pub fn get_item(&self, id: ItemId) -> RepoResult<Item> {
        self.repo.get_item(id)
    }

    pub fn toggle_done(&mut self, id: ItemId) -> RepoResult<Item> {
        self.repo.toggle_done(id)
    }

    pub fn rename_item(&mut self, id: ItemId, title: &str) -> RepoResult<Item> {
        self.repo.rename_item(id, title)
    }

    pub fn delete_item(&mut self, id: ItemId) -> RepoResult<()> {
        self.repo.delete_item(id)
    }

    /// Items of one category; `ItemSort::ByTitle` is the default view.
    pub fn items_for_category(
        &self,
        category_id: CategoryId,
        sort: ItemSort,
    ) -> RepoResult<Vec<Item>> {
        item_query::items_for_category(&self.repo, category_id, sort)
    }

    /// Title search within one category, oldest match first.
    pub fn search_items(&self, category_id: CategoryId, substring: &str) -> RepoResult<Vec<Item>> {
        item_query::search_items(&self.repo, category_id, substring)
    }

    /// Selects a category and returns its default-sorted items.
    ///
    /// The previous selection is kept when `id` is unknown.
    pub fn set_selected_category(&mut self, id: CategoryId) -> RepoResult<Vec<Item>> {
        let items = self.items_for_category(id, ItemSort::ByTitle)?;
        self.selected = Some(id);
        debug!(
            "event=category_select module=service status=ok items={}",
            items.len()
        );
        Ok(items)
    }

    pub fn selected_category(&self) -> Option<CategoryId> {
        self.selected
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Reloads the selected category's default-sorted items.
    ///
    /// Returns an empty list when nothing is selected.
    pub fn reload_selected(&self) -> RepoResult<Vec<Item>> {
        match self.selected {
            Some(id) => self.items_for_category(id, ItemSort::ByTitle),
            None => Ok(Vec::new()),
        }
    }

    pub fn persist(&mut self) -> RepoResult<()> {
        self.repo.persist()
    }

    /// Rehydrates the repository and drops a selection that no longer exists.
    pub fn load(&mut self) -> RepoResult<()> {
        self.repo.load()?;
        if let Some(id) = self.selected {
            match self.repo.get_category(id) {
                Ok(_) => {}
                Err(RepoError::NotFound(RecordRef::Category(_))) => self.selected = None,
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }
}
