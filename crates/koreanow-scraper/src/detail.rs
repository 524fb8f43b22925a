//! Article detail page fetch and extraction.

use std::sync::LazyLock;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER};
use reqwest::{Client, StatusCode};
use scraper::{Html, Selector};

use crate::error::ScraperError;
use crate::image::{force_https, is_trusted_source, resolve_src};
use crate::types::ArticleDetail;

/// Desktop browser identity; the briefing site serves a stripped page otherwise.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const ACCEPT_VALUE: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE_VALUE: &str = "ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7";
const REFERER_VALUE: &str = "https://www.korea.kr/";

/// Body containers, most specific first.
const CONTENT_SELECTORS: &[&str] = &[
    "div.contentArea",
    "div.articleBody",
    "div.viewContent",
    "div.newsView",
    "article",
];

const IMAGE_SELECTORS: &[&str] = &[
    "div.contentArea img",
    "div.articleBody img",
    "div.viewContent img",
    "article img",
    ".imageWrap img",
    ".cardnews img",
    r#"img[src*="newsWeb/resources/attaches"]"#,
    r#"img[src*="korea.kr"]"#,
];

static CONTENT: LazyLock<Vec<Selector>> = LazyLock::new(|| compile(CONTENT_SELECTORS));
static IMAGES: LazyLock<Vec<Selector>> = LazyLock::new(|| compile(IMAGE_SELECTORS));

fn compile(sources: &[&str]) -> Vec<Selector> {
    sources
        .iter()
        .map(|s| Selector::parse(s).expect("valid CSS selector"))
        .collect()
}

/// Fetches article pages with browser-like headers.
///
/// Every failure mode (bad URL, non-200, network error) degrades to an
/// empty [`ArticleDetail`] and a `warn!` line; the ingestion run continues.
pub struct DetailFetcher {
    client: Client,
}

impl DetailFetcher {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(timeout_secs: u64) -> Result<Self, ScraperError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE),
        );
        headers.insert(REFERER, HeaderValue::from_static(REFERER_VALUE));

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(headers)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches `url` and extracts its body HTML and best image.
    ///
    /// URLs that are empty or not `http(s)` are rejected without a request.
    pub async fn fetch_detail(&self, url: &str) -> ArticleDetail {
        if url.is_empty() || !url.starts_with("http") {
            tracing::debug!(url, "skipping detail fetch for non-http link");
            return ArticleDetail::default();
        }

        match self.try_fetch(url).await {
            Ok(detail) => detail,
            Err(e) => {
                tracing::warn!(url, error = %e, "detail page fetch failed");
                ArticleDetail::default()
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<ArticleDetail, ScraperError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }
        let body = response.text().await?;
        Ok(extract_detail(&body))
    }
}

/// Extracts the article body and thumbnail from a detail page.
///
/// The body is the outer HTML of the first element matching the content
/// selectors. The image is the first `<img>` (by selector priority, then
/// document order) whose `src` or `data-src` resolves to an absolute URL on
/// the briefing host; it is always returned with `https://`.
#[must_use]
pub fn extract_detail(html: &str) -> ArticleDetail {
    let document = Html::parse_document(html);

    let full_content = CONTENT
        .iter()
        .find_map(|selector| document.select(selector).next())
        .map(|element| element.html());

    let image = IMAGES.iter().find_map(|selector| {
        document.select(selector).find_map(|img| {
            let attrs = img.value();
            let src = attrs
                .attr("src")
                .filter(|s| !s.is_empty())
                .or_else(|| attrs.attr("data-src"))
                .unwrap_or_default();
            resolve_src(src)
                .filter(|url| is_trusted_source(url))
                .map(|url| force_https(&url))
        })
    });

    ArticleDetail {
        image,
        full_content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_tables_compile() {
        assert_eq!(CONTENT.len(), CONTENT_SELECTORS.len());
        assert_eq!(IMAGES.len(), IMAGE_SELECTORS.len());
    }

    #[test]
    fn content_area_wins_over_article() {
        let html = r#"<html><body>
            <article><p>outer</p></article>
            <div class="contentArea"><p>본문</p></div>
        </body></html>"#;
        let detail = extract_detail(html);
        let content = detail.full_content.expect("content");
        assert!(content.starts_with(r#"<div class="contentArea">"#));
        assert!(content.contains("본문"));
    }

    #[test]
    fn falls_back_to_article_element() {
        let html = "<html><body><article><p>only</p></article></body></html>";
        let detail = extract_detail(html);
        assert_eq!(
            detail.full_content.as_deref(),
            Some("<article><p>only</p></article>")
        );
    }

    #[test]
    fn page_without_known_containers_has_no_content() {
        let detail = extract_detail("<html><body><p>bare</p></body></html>");
        assert_eq!(detail, ArticleDetail::default());
    }

    #[test]
    fn root_relative_image_is_resolved_to_briefing_host() {
        let html = r#"<div class="contentArea">
            <img src="/newsWeb/resources/attaches/2025.05/01/photo.jpg">
        </div>"#;
        let detail = extract_detail(html);
        assert_eq!(
            detail.image.as_deref(),
            Some("https://www.korea.kr/newsWeb/resources/attaches/2025.05/01/photo.jpg")
        );
    }

    #[test]
    fn lazy_loaded_image_uses_data_src() {
        let html = r#"<div class="articleBody">
            <img data-src="http://www.korea.kr/images/lazy.png">
        </div>"#;
        let detail = extract_detail(html);
        assert_eq!(
            detail.image.as_deref(),
            Some("https://www.korea.kr/images/lazy.png")
        );
    }

    #[test]
    fn foreign_and_inline_images_are_skipped() {
        let html = r#"<div class="contentArea">
            <img src="data:image/png;base64,AAAA">
            <img src="https://ads.example.com/banner.jpg">
            <img src="https://www.korea.kr/real.jpg">
        </div>"#;
        let detail = extract_detail(html);
        assert_eq!(detail.image.as_deref(), Some("https://www.korea.kr/real.jpg"));
    }

    #[test]
    fn attachment_image_outside_containers_is_found() {
        let html = r#"<body><p>x</p>
            <img src="https://cdn.example.net/newsWeb/resources/attaches/a.jpg">
        </body>"#;
        let detail = extract_detail(html);
        assert_eq!(
            detail.image.as_deref(),
            Some("https://cdn.example.net/newsWeb/resources/attaches/a.jpg")
        );
        assert_eq!(detail.full_content, None);
    }
}
