//! Structured-document layout for file and in-memory backing media.
//!
//! # Responsibility
//! - Define the serialized shape: categories with embedded ordered items.
//! - Apply record mutations to a document value.
//!
//! # Invariants
//! - Category and item ids are unique across the whole document.
//! - `Item::category_id` is implied by nesting and rebuilt on read.
//! - Vector order is the insertion order for both categories and items.

use super::{RecordRef, RepoError, RepoResult, StorageError};
use crate::model::category::{Category, CategoryId};
use crate::model::item::{Item, ItemId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Layout version written into every document.
pub const DOCUMENT_VERSION: u32 = 1;

/// Whole-store document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoDocument {
    pub version: u32,
    #[serde(default)]
    pub categories: Vec<CategoryEntry>,
}

/// One category with its owned items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub colour_tag: String,
    #[serde(default)]
    pub items: Vec<ItemEntry>,
}

/// One item without its owner back-reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemEntry {
    pub id: ItemId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub done: bool,
    pub created_at: i64,
}

impl CategoryEntry {
    fn to_category(&self) -> Category {
        Category {
            id: self.id,
            name: self.name.clone(),
            colour_tag: self.colour_tag.clone(),
        }
    }
}

impl ItemEntry {
    fn to_item(&self, category_id: CategoryId) -> Item {
        Item {
            id: self.id,
            title: self.title.clone(),
            done: self.done,
            created_at: self.created_at,
            category_id,
        }
    }
}

impl From<&Item> for ItemEntry {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
            done: item.done,
            created_at: item.created_at,
        }
    }
}

impl Default for TodoDocument {
    fn default() -> Self {
        Self {
            version: DOCUMENT_VERSION,
            categories: Vec::new(),
        }
    }
}

impl TodoDocument {
    /// Decodes and validates a serialized document.
    pub fn from_slice(bytes: &[u8]) -> RepoResult<Self> {
        let document: Self = serde_json::from_slice(bytes)?;
        document.validate()?;
        Ok(document)
    }

    /// Checks layout version and record invariants of a decoded document.
    pub fn validate(&self) -> Result<(), StorageError> {
        if self.version != DOCUMENT_VERSION {
            return Err(StorageError::InvalidData(format!(
                "unsupported document version {}; expected {DOCUMENT_VERSION}",
                self.version
            )));
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            if category.name.trim().is_empty() {
                return Err(StorageError::InvalidData(format!(
                    "category {} has a blank name",
                    category.id
                )));
            }
            if !seen.insert(category.id) {
                return Err(StorageError::InvalidData(format!(
                    "duplicate id {} in document",
                    category.id
                )));
            }
            for item in &category.items {
                if !seen.insert(item.id) {
                    return Err(StorageError::InvalidData(format!(
                        "duplicate id {} in document",
                        item.id
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn categories(&self) -> Vec<Category> {
        self.categories
            .iter()
            .map(CategoryEntry::to_category)
            .collect()
    }

    pub fn category(&self, id: CategoryId) -> RepoResult<Category> {
        self.categories
            .iter()
            .find(|entry| entry.id == id)
            .map(CategoryEntry::to_category)
            .ok_or(RepoError::NotFound(RecordRef::Category(id)))
    }

    pub fn items(&self, category_id: CategoryId) -> RepoResult<Vec<Item>> {
        let entry = self.category_entry(category_id)?;
        Ok(entry
            .items
            .iter()
            .map(|item| item.to_item(entry.id))
            .collect())
    }

    pub fn item(&self, id: ItemId) -> RepoResult<Item> {
        let (category_idx, item_idx) = self.locate_item(id)?;
        let category = &self.categories[category_idx];
        Ok(category.items[item_idx].to_item(category.id))
    }

    /// Appends `category` after every existing one.
    pub fn push_category(&mut self, category: &Category) {
        self.categories.push(CategoryEntry {
            id: category.id,
            name: category.name.clone(),
            colour_tag: category.colour_tag.clone(),
            items: Vec::new(),
        });
    }

    pub fn set_category_colour(&mut self, id: CategoryId, colour_tag: &str) -> RepoResult<Category> {
        let entry = self.category_entry_mut(id)?;
        entry.colour_tag = colour_tag.to_string();
        Ok(entry.to_category())
    }

    /// Removes a category together with its items.
    pub fn remove_category(&mut self, id: CategoryId) -> RepoResult<CategoryEntry> {
        let index = self
            .categories
            .iter()
            .position(|entry| entry.id == id)
            .ok_or(RepoError::NotFound(RecordRef::Category(id)))?;
        Ok(self.categories.remove(index))
    }

    /// Appends `item` to its owning category.
    pub fn push_item(&mut self, item: &Item) -> RepoResult<()> {
        let entry = self.category_entry_mut(item.category_id)?;
        entry.items.push(ItemEntry::from(item));
        Ok(())
    }

    /// Applies `edit` to one item and returns the edited snapshot.
    pub fn update_item<F>(&mut self, id: ItemId, edit: F) -> RepoResult<Item>
    where
        F: FnOnce(&mut Item) -> RepoResult<()>,
    {
        let (category_idx, item_idx) = self.locate_item(id)?;
        let category = &mut self.categories[category_idx];
        let mut item = category.items[item_idx].to_item(category.id);
        edit(&mut item)?;
        category.items[item_idx] = ItemEntry::from(&item);
        Ok(item)
    }

    pub fn remove_item(&mut self, id: ItemId) -> RepoResult<Item> {
        let (category_idx, item_idx) = self.locate_item(id)?;
        let category = &mut self.categories[category_idx];
        let removed = category.items.remove(item_idx);
        Ok(removed.to_item(category.id))
    }

    /// Total number of items across every category.
    pub fn item_count(&self) -> usize {
        self.categories.iter().map(|entry| entry.items.len()).sum()
    }

    fn category_entry(&self, id: CategoryId) -> RepoResult<&CategoryEntry> {
        self.categories
            .iter()
            .find(|entry| entry.id == id)
            .ok_or(RepoError::NotFound(RecordRef::Category(id)))
    }

    fn category_entry_mut(&mut self, id: CategoryId) -> RepoResult<&mut CategoryEntry> {
        self.categories
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or(RepoError::NotFound(RecordRef::Category(id)))
    }

    fn locate_item(&self, id: ItemId) -> RepoResult<(usize, usize)> {
        self.categories
            .iter()
            .enumerate()
            .find_map(|(category_idx, entry)| {
                entry
                    .items
                    .iter()
                    .position(|item| item.id == id)
                    .map(|item_idx| (category_idx, item_idx))
            })
            .ok_or(RepoError::NotFound(RecordRef::Item(id)))
    }
}
