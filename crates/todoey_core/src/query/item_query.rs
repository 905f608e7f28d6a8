//! Category-scoped item listing and title search.
//!
//! # Invariants
//! - Default listing is ordered by case-insensitive title.
//! - Search results are ordered by `created_at`; a blank search falls back to
//!   the default listing.
//! - A non-blank search is matched as typed, surrounding spaces included.

use crate::model::category::CategoryId;
use crate::model::item::Item;
use crate::repo::{RepoResult, TodoRepository};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Item ordering applied by list queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ItemSort {
    /// Case-insensitive lexicographic title, ascending.
    #[default]
    ByTitle,
    /// Creation time, oldest first.
    ByCreatedAt,
}

/// Lists the items of `category_id` in the requested order.
///
/// A category with no items yields an empty list.
pub fn items_for_category<R>(
    repo: &R,
    category_id: CategoryId,
    sort: ItemSort,
) -> RepoResult<Vec<Item>>
where
    R: TodoRepository + ?Sized,
{
    let mut items = repo.list_items(category_id)?;
    sort_items(&mut items, sort);
    Ok(items)
}

/// Searches item titles of `category_id` for `substring`.
///
/// An empty or whitespace-only `substring` clears the search.
pub fn search_items<R>(repo: &R, category_id: CategoryId, substring: &str) -> RepoResult<Vec<Item>>
where
    R: TodoRepository + ?Sized,
{
    if substring.trim().is_empty() {
        return items_for_category(repo, category_id, ItemSort::ByTitle);
    }
    let needle = fold_for_search(substring);

    let mut items = repo
        .list_items(category_id)?
        .into_iter()
        .filter(|item| matches_folded(&item.title, &needle))
        .collect::<Vec<_>>();
    sort_items(&mut items, ItemSort::ByCreatedAt);
    Ok(items)
}

/// Stable in-place sort of an item snapshot.
pub fn sort_items(items: &mut [Item], sort: ItemSort) {
    match sort {
        ItemSort::ByTitle => items.sort_by_cached_key(|item| item.title.to_lowercase()),
        ItemSort::ByCreatedAt => items.sort_by_key(|item| item.created_at),
    }
}

/// Returns whether `title` contains `substring`, ignoring case and diacritics.
pub fn matches_search(title: &str, substring: &str) -> bool {
    matches_folded(title, &fold_for_search(substring))
}

/// Decomposes `value`, drops combining marks and lowercases the rest.
///
/// `"Crème Brûlée"` folds to `"creme brulee"`.
pub fn fold_for_search(value: &str) -> String {
    value
        .nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
        .collect()
}

fn matches_folded(title: &str, folded_needle: &str) -> bool {
    fold_for_search(title).contains(folded_needle)
}
