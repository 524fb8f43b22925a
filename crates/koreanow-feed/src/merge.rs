//! Merge, order, and cap feed items.

use std::collections::HashSet;

use koreanow_core::NewsItem;

/// Merge freshly fetched items with the previously persisted ones.
///
/// Fresh items come first, in fetch order. An existing item survives only if
/// no fresh item shares its `link`. The first occurrence of a link wins, so
/// the result never holds two items with the same link.
#[must_use]
pub fn merge_items(fresh: Vec<NewsItem>, existing: Vec<NewsItem>) -> Vec<NewsItem> {
    let mut seen: HashSet<String> = HashSet::with_capacity(fresh.len() + existing.len());
    let mut merged = Vec::with_capacity(fresh.len() + existing.len());

    for item in fresh.into_iter().chain(existing) {
        if seen.insert(item.link.clone()) {
            merged.push(item);
        }
    }

    merged
}

/// Sort by `pub_date` descending and keep the first `cap` items.
///
/// The sort is stable: items with equal dates keep their merge order. An
/// empty `pub_date` sorts after every dated item.
#[must_use]
pub fn finalize_items(mut items: Vec<NewsItem>, cap: usize) -> Vec<NewsItem> {
    items.sort_by(|a, b| b.pub_date.cmp(&a.pub_date));
    items.truncate(cap);
    items
}
