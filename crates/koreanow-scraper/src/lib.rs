//! Scraping and ingestion for the korea-now policy news feed.
//!
//! - [`api`]: paginated client for the data.go.kr policy news XML API.
//! - [`detail`]: fetches an article page and pulls out its body and thumbnail.
//! - [`image`]: regex fallback that finds a usable image URL in raw HTML.
//! - [`pipeline`]: one ingestion run, from API fetch to feed file rewrite.

pub mod api;
pub mod detail;
pub mod error;
pub mod image;
pub mod pipeline;
pub mod types;

pub use api::{DateWindow, EndReason, NewsApiClient, PageOutcome, PagingPolicy};
pub use detail::{extract_detail, DetailFetcher};
pub use error::ScraperError;
pub use image::extract_first_image;
pub use pipeline::{build_item, IngestPipeline, PipelineSettings};
pub use types::{ArticleDetail, NewsRecord};
