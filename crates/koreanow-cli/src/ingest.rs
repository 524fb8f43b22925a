//! One-shot ingestion wiring: config → clients → pipeline.

use std::path::Path;
use std::time::{Duration, Instant};

use koreanow_core::AppConfig;
use koreanow_feed::FeedStore;
use koreanow_scraper::{
    DetailFetcher, IngestPipeline, NewsApiClient, PagingPolicy, PipelineSettings,
};

/// Builds the ingestion pipeline from configuration.
///
/// `output` overrides `config.feed_path` when given.
///
/// # Errors
///
/// Fails when the news service key is missing or an HTTP client cannot be
/// constructed.
pub(crate) fn build_pipeline(
    config: &AppConfig,
    output: Option<&Path>,
) -> anyhow::Result<IngestPipeline> {
    let paging = PagingPolicy {
        page_size: config.page_size,
        max_pages: config.max_pages,
        page_delay: Duration::from_millis(config.page_delay_ms),
    };
    let api = NewsApiClient::with_base_url(
        &config.news_api_url,
        config.news_service_key.as_deref().unwrap_or_default(),
        config.news_api_timeout_secs,
        paging,
    )?;
    let detail = DetailFetcher::new(config.detail_timeout_secs)?;
    let store = FeedStore::new(output.map_or_else(|| config.feed_path.clone(), Path::to_path_buf));
    let settings = PipelineSettings {
        detail_delay: Duration::from_millis(config.detail_delay_ms),
        feed_cap: config.feed_cap,
    };

    Ok(IngestPipeline::new(api, detail, store, settings))
}

/// Runs one ingestion pass and prints a summary line.
///
/// # Errors
///
/// Propagates pipeline construction errors and any run-aborting failure
/// (API fetch, feed write).
pub(crate) async fn run_fetch(config: &AppConfig, output: Option<&Path>) -> anyhow::Result<()> {
    let pipeline = build_pipeline(config, output)?;
    let started = Instant::now();

    let document = pipeline.run().await?;

    tracing::info!(
        total = document.total,
        elapsed_ms = started.elapsed().as_millis(),
        "fetch complete"
    );
    println!(
        "wrote {} items to {}",
        document.total,
        pipeline.store().path().display()
    );
    Ok(())
}
