//! Client for the data.go.kr policy news list API.

mod envelope;
mod window;

use std::fmt;
use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

use crate::error::ScraperError;
use crate::types::NewsRecord;

pub use envelope::{parse_envelope, Envelope, RawItem};
pub use window::DateWindow;

pub const DEFAULT_BASE_URL: &str =
    "https://apis.data.go.kr/1371000/policyNewsService/policyNewsList";

/// How many pages to request and how to pace them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingPolicy {
    /// `numOfRows`; a page shorter than this is the last one.
    pub page_size: u32,
    pub max_pages: u32,
    /// Pause between consecutive page requests.
    pub page_delay: Duration,
}

impl Default for PagingPolicy {
    fn default() -> Self {
        Self {
            page_size: 50,
            max_pages: 5,
            page_delay: Duration::from_millis(500),
        }
    }
}

/// Why pagination stopped before reaching a short page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndReason {
    HttpStatus(u16),
    ResultCode {
        code: String,
        message: Option<String>,
    },
    MissingBody,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HttpStatus(status) => write!(f, "HTTP status {status}"),
            Self::ResultCode { code, message } => write!(
                f,
                "result code {code} ({})",
                message.as_deref().unwrap_or("no message")
            ),
            Self::MissingBody => f.write_str("response has no body element"),
        }
    }
}

/// Outcome of one page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Records on this page; may be empty.
    Records(Vec<NewsRecord>),
    /// The API reported an error or returned no body. Treated as end of data.
    EndOfData(EndReason),
}

pub struct NewsApiClient {
    client: Client,
    base_url: Url,
    service_key: String,
    paging: PagingPolicy,
}

impl NewsApiClient {
    /// Creates a client against the public endpoint.
    ///
    /// # Errors
    ///
    /// See [`NewsApiClient::with_base_url`].
    pub fn new(
        service_key: &str,
        timeout_secs: u64,
        paging: PagingPolicy,
    ) -> Result<Self, ScraperError> {
        Self::with_base_url(DEFAULT_BASE_URL, service_key, timeout_secs, paging)
    }

    /// Creates a client against a custom endpoint (e.g. a local mock server).
    ///
    /// # Errors
    ///
    /// - [`ScraperError::MissingServiceKey`] if `service_key` is blank.
    /// - [`ScraperError::InvalidUrl`] if `base_url` does not parse.
    /// - [`ScraperError::Http`] if the `reqwest::Client` cannot be built.
    pub fn with_base_url(
        base_url: &str,
        service_key: &str,
        timeout_secs: u64,
        paging: PagingPolicy,
    ) -> Result<Self, ScraperError> {
        if service_key.trim().is_empty() {
            return Err(ScraperError::MissingServiceKey);
        }
        let base_url = Url::parse(base_url).map_err(|e| ScraperError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url,
            service_key: service_key.to_owned(),
            paging,
        })
    }

    #[must_use]
    pub fn paging(&self) -> PagingPolicy {
        self.paging
    }

    fn page_url(&self, page_no: u32, window: &DateWindow) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("serviceKey", &self.service_key)
            .append_pair("pageNo", &page_no.to_string())
            .append_pair("numOfRows", &self.paging.page_size.to_string())
            .append_pair("startDate", &window.start_param())
            .append_pair("endDate", &window.end_param());
        url
    }

    /// Requests one page.
    ///
    /// A non-200 status, a non-success result code, or a missing `<body>`
    /// yield [`PageOutcome::EndOfData`] rather than an error.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Http`] on network failure or timeout.
    /// - [`ScraperError::Xml`] when a 200 response is not well-formed XML.
    pub async fn fetch_page(
        &self,
        page_no: u32,
        window: &DateWindow,
    ) -> Result<PageOutcome, ScraperError> {
        let url = self.page_url(page_no, window);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Ok(PageOutcome::EndOfData(EndReason::HttpStatus(
                status.as_u16(),
            )));
        }

        let body = response.text().await?;
        let envelope = parse_envelope(&body)?;

        if !envelope.is_success() {
            return Ok(PageOutcome::EndOfData(EndReason::ResultCode {
                code: envelope.result_code.unwrap_or_default(),
                message: envelope.result_msg,
            }));
        }

        let Some(items) = envelope.items else {
            return Ok(PageOutcome::EndOfData(EndReason::MissingBody));
        };

        Ok(PageOutcome::Records(
            items.iter().map(NewsRecord::from_fields).collect(),
        ))
    }

    /// Fetches pages 1..=`max_pages` for `window`, stopping early on an
    /// empty or short page or on [`PageOutcome::EndOfData`].
    ///
    /// # Errors
    ///
    /// Returns the error from [`NewsApiClient::fetch_page`] when page 1
    /// fails. A failure on a later page is logged and ends paging with the
    /// records gathered so far.
    pub async fn fetch_all(&self, window: &DateWindow) -> Result<Vec<NewsRecord>, ScraperError> {
        let page_size = usize::try_from(self.paging.page_size).unwrap_or(usize::MAX);
        let mut records = Vec::new();

        for page_no in 1..=self.paging.max_pages {
            if page_no > 1 && !self.paging.page_delay.is_zero() {
                tokio::time::sleep(self.paging.page_delay).await;
            }

            let outcome = match self.fetch_page(page_no, window).await {
                Ok(outcome) => outcome,
                Err(e) if page_no == 1 => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        page = page_no,
                        error = %e,
                        kept = records.len(),
                        "news API page failed; keeping earlier pages"
                    );
                    break;
                }
            };

            match outcome {
                PageOutcome::EndOfData(reason) => {
                    tracing::warn!(page = page_no, %reason, "news API stopped returning data");
                    break;
                }
                PageOutcome::Records(page) => {
                    let count = page.len();
                    records.extend(page);
                    tracing::info!(
                        page = page_no,
                        count,
                        total = records.len(),
                        "fetched news API page"
                    );
                    if count < page_size {
                        break;
                    }
                }
            }
        }

        Ok(records)
    }
}
