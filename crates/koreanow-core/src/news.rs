//! News feed domain types.
//!
//! [`NewsItem`] is the unit persisted in the feed file; [`FeedDocument`] is the
//! whole file. Every field is `#[serde(default)]` so feeds written by older
//! runs (or by hand) still load.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Title used when the upstream record carries none.
pub const UNTITLED: &str = "제목 없음";

/// Author used when the upstream record carries none.
pub const DEFAULT_AUTHOR: &str = "대한민국 정책브리핑";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    #[serde(default)]
    pub title: String,
    /// Dedup key within a feed.
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub summary: String,
    /// Article body HTML; equals `summary` when the detail page yielded nothing.
    #[serde(default)]
    pub full_content: String,
    /// Source timestamp as delivered upstream. Sorted lexicographically.
    #[serde(default)]
    pub pub_date: String,
    #[serde(default)]
    pub author: String,
    /// Always `https://` or empty.
    #[serde(default)]
    pub thumbnail_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedDocument {
    #[serde(default)]
    pub items: Vec<NewsItem>,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub fetched_at: String,
}

impl FeedDocument {
    /// Wrap `items`, stamping `total` and `fetched_at`.
    #[must_use]
    pub fn new(items: Vec<NewsItem>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            total: items.len(),
            items,
            fetched_at: fetched_at.to_rfc3339_opts(SecondsFormat::Micros, false),
        }
    }
}
