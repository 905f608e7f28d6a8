//! Query layer over item snapshots.
//!
//! # Responsibility
//! - Scope item lists to one category.
//! - Order items by title or creation time.
//! - Match titles by case- and diacritic-insensitive substring.
//!
//! # Invariants
//! - Queries never mutate storage.
//! - Sorting is stable, so ties keep insertion order.

pub mod item_query;
