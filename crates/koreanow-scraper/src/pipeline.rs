//! One ingestion run: fetch, enrich, merge, rewrite.

use std::time::Duration;

use chrono::Utc;
use koreanow_core::{FeedDocument, NewsItem};
use koreanow_feed::{finalize_items, merge_items, FeedStore};

use crate::api::{DateWindow, NewsApiClient};
use crate::detail::DetailFetcher;
use crate::error::ScraperError;
use crate::image::{extract_first_image, force_https};
use crate::types::{ArticleDetail, NewsRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Pause after each detail page fetch.
    pub detail_delay: Duration,
    /// Maximum number of items kept in the feed file.
    pub feed_cap: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            detail_delay: Duration::from_millis(300),
            feed_cap: 100,
        }
    }
}

pub struct IngestPipeline {
    api: NewsApiClient,
    detail: DetailFetcher,
    store: FeedStore,
    settings: PipelineSettings,
}

impl IngestPipeline {
    #[must_use]
    pub fn new(
        api: NewsApiClient,
        detail: DetailFetcher,
        store: FeedStore,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            api,
            detail,
            store,
            settings,
        }
    }

    #[must_use]
    pub fn store(&self) -> &FeedStore {
        &self.store
    }

    /// Runs ingestion for the three days ending today (local time).
    ///
    /// # Errors
    ///
    /// See [`IngestPipeline::run_for`].
    pub async fn run(&self) -> Result<FeedDocument, ScraperError> {
        self.run_for(&DateWindow::today()).await
    }

    /// Fetches every page for `window`, enriches each record with its detail
    /// page, merges with the stored feed and rewrites the file.
    ///
    /// Detail failures never abort the run. The feed file is left untouched
    /// when the API fetch fails.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Http`] / [`ScraperError::Xml`] from the API fetch.
    /// - [`ScraperError::Feed`] if the feed file cannot be written.
    pub async fn run_for(&self, window: &DateWindow) -> Result<FeedDocument, ScraperError> {
        let existing = self.store.load_items().await;
        let existing_count = existing.len();

        let records = self.api.fetch_all(window).await?;
        let fetched_count = records.len();

        let mut fresh = Vec::with_capacity(records.len());
        for record in records {
            fresh.push(self.enrich(record).await);
        }
        let with_image = fresh.iter().filter(|i| !i.thumbnail_url.is_empty()).count();

        let items = finalize_items(merge_items(fresh, existing), self.settings.feed_cap);
        let document = FeedDocument::new(items, Utc::now());
        self.store.write(&document).await?;

        tracing::info!(
            path = %self.store.path().display(),
            fetched = fetched_count,
            with_image,
            existing = existing_count,
            total = document.total,
            "feed updated"
        );
        Ok(document)
    }

    async fn enrich(&self, record: NewsRecord) -> NewsItem {
        let detail = if record.link.is_empty() {
            ArticleDetail::default()
        } else {
            let detail = self.detail.fetch_detail(&record.link).await;
            if !self.settings.detail_delay.is_zero() {
                tokio::time::sleep(self.settings.detail_delay).await;
            }
            detail
        };
        build_item(record, detail)
    }
}

/// Combines an API record with whatever its detail page yielded.
///
/// The thumbnail falls back to the first image in the summary, and the full
/// content falls back to the summary itself.
#[must_use]
pub fn build_item(record: NewsRecord, detail: ArticleDetail) -> NewsItem {
    let thumbnail = detail
        .image
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| extract_first_image(&record.summary));
    let full_content = detail
        .full_content
        .filter(|html| !html.is_empty())
        .unwrap_or_else(|| record.summary.clone());

    NewsItem {
        title: record.title,
        link: record.link,
        summary: record.summary,
        full_content,
        pub_date: record.pub_date,
        author: record.author,
        thumbnail_url: force_https(&thumbnail),
    }
}
