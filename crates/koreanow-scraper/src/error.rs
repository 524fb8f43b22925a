use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("news API service key is not configured (set KOREANOW_NEWS_SERVICE_KEY)")]
    MissingServiceKey,

    #[error("feed error: {0}")]
    Feed(#[from] koreanow_feed::FeedError),
}
