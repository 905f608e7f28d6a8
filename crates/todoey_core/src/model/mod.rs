//! Record types for the to-do store.
//!
//! # Responsibility
//! - Define the `Category` and `Item` records shared by every backing medium.
//! - Own input validation for record-creating and record-editing requests.
//!
//! # Invariants
//! - Every record is identified by a UUID v4 that is never reused.
//! - A `Category` exclusively owns its `Item`s; `Item::category_id` is a
//!   lookup back-reference only.

pub mod category;
pub mod item;

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

/// Input validation failure for record writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Category name is blank after trim.
    BlankCategoryName,
    /// Item title is blank after trim.
    BlankItemTitle,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankCategoryName => write!(f, "category name must not be blank"),
            Self::BlankItemTitle => write!(f, "item title must not be blank"),
        }
    }
}

impl Error for ValidationError {}

/// Trims `value` and rejects it with `error` when nothing remains.
pub(crate) fn normalize_required(
    value: &str,
    error: ValidationError,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    Ok(trimmed.to_string())
}

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}
