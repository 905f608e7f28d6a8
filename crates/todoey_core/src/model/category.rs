//! Category record.
//!
//! # Invariants
//! - `name` is non-blank and trimmed for records built through `Category::new`.
//! - `colour_tag` is opaque to storage; only presentation interprets it.

use super::{normalize_required, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a category.
pub type CategoryId = Uuid;

/// Colour tag a presentation layer falls back to when a category has none.
pub const DEFAULT_COLOUR_TAG: &str = "1D9BF6";

/// Flat palette used when a category is created without an explicit colour.
pub const FLAT_PALETTE: &[&str] = &[
    "E74C3C", "E67E22", "F1C40F", "2ECC71", "1ABC9C", "3498DB", "9B59B6", "34495E",
    "16A085", "27AE60", "2980B9", "8E44AD", "D35400", "C0392B", "7F8C8D", "1D9BF6",
];

/// A named grouping that owns zero or more items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub colour_tag: String,
}

impl Category {
    /// Builds a category with a fresh id.
    ///
    /// Fails with `ValidationError::BlankCategoryName` when `name` is blank.
    pub fn new(name: &str, colour_tag: impl Into<String>) -> Result<Self, ValidationError> {
        Self::with_id(Uuid::new_v4(), name, colour_tag)
    }

    /// Builds a category with a caller-provided id.
    ///
    /// Used when rehydrating persisted records.
    pub fn with_id(
        id: CategoryId,
        name: &str,
        colour_tag: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id,
            name: normalize_required(name, ValidationError::BlankCategoryName)?,
            colour_tag: colour_tag.into(),
        })
    }
}

/// Picks a palette colour for `id`.
///
/// The choice is stable for a given id, and v4 ids spread evenly over the
/// palette.
pub fn palette_colour_for(id: CategoryId) -> &'static str {
    let bytes = id.as_bytes();
    let index = usize::from(bytes[bytes.len() - 1]) % FLAT_PALETTE.len();
    FLAT_PALETTE[index]
}
