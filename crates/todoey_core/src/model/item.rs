//! Item record.
//!
//! # Invariants
//! - `created_at` is assigned once at creation and never rewritten.
//! - `category_id` always names the owning category while the item exists.

use super::category::CategoryId;
use super::{normalize_required, now_epoch_ms, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of an item.
pub type ItemId = Uuid;

/// A single to-do entry owned by exactly one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    /// Display title. Empty only for records rehydrated from storage.
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub done: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    pub category_id: CategoryId,
}

impl Item {
    /// Builds a not-done item stamped with the current time.
    ///
    /// Fails with `ValidationError::BlankItemTitle` when `title` is blank.
    pub fn new(category_id: CategoryId, title: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            id: Uuid::new_v4(),
            title: normalize_required(title, ValidationError::BlankItemTitle)?,
            done: false,
            created_at: now_epoch_ms(),
            category_id,
        })
    }

    /// Flips the completion flag.
    pub fn toggle(&mut self) {
        self.done = !self.done;
    }

    /// Replaces the title after validation.
    pub fn rename(&mut self, title: &str) -> Result<(), ValidationError> {
        self.title = normalize_required(title, ValidationError::BlankItemTitle)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Item;
    use crate::model::ValidationError;
    use uuid::Uuid;

    #[test]
    fn new_item_starts_not_done() {
        let item = Item::new(Uuid::new_v4(), "Buy milk").unwrap();
        assert!(!item.done);
        assert!(item.created_at > 0);
    }

    #[test]
    fn toggle_twice_restores_flag() {
        let mut item = Item::new(Uuid::new_v4(), "Buy milk").unwrap();
        item.toggle();
        assert!(item.done);
        item.toggle();
        assert!(!item.done);
    }

    #[test]
    fn rename_rejects_blank_title_and_keeps_previous() {
        let mut item = Item::new(Uuid::new_v4(), "Buy milk").unwrap();
        let err = item.rename("  ").unwrap_err();
        assert_eq!(err, ValidationError::BlankItemTitle);
        assert_eq!(item.title, "Buy milk");
    }
}
