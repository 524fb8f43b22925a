//! Regex-based image discovery for API summary HTML.
//!
//! The detail-page extractor in [`crate::detail`] uses a real HTML parser;
//! this module is the cheap fallback for the snippet the API already returned.

use std::sync::LazyLock;

use regex::Regex;

/// Origin that root-relative asset paths are resolved against.
pub const ASSET_ORIGIN: &str = "https://www.korea.kr";

/// Path fragment shared by every briefing attachment URL.
pub const ATTACHMENT_PATH: &str = "newsWeb/resources/attaches";

const TRUSTED_HOST: &str = "korea.kr";

static QUOTED_SRC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img[^>]+src\s*=\s*["']([^"']+)["']"#).expect("valid regex")
});
static BARE_SRC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<img[^>]+src\s*=\s*([^\s>]+)").expect("valid regex"));
static IMAGE_EXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(jpg|jpeg|png|gif|webp)(\?|$)").expect("valid extension regex")
});

/// Returns the first usable image URL in `html`, or an empty string.
///
/// Candidates come from quoted `src` attributes first, then unquoted ones.
/// A candidate is kept when it has a known image extension or points at the
/// briefing host. Root-relative paths are resolved against [`ASSET_ORIGIN`],
/// spaces are percent-encoded and `http://` is upgraded to `https://`.
#[must_use]
pub fn extract_first_image(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }

    let quoted = QUOTED_SRC_RE.captures_iter(html);
    let bare = BARE_SRC_RE.captures_iter(html);

    quoted
        .chain(bare)
        .filter_map(|caps| caps.get(1))
        .find_map(|m| accept_candidate(m.as_str()))
        .unwrap_or_default()
}

fn accept_candidate(raw: &str) -> Option<String> {
    let absolute = resolve_src(raw)?;
    if !IMAGE_EXT_RE.is_match(&absolute) && !is_trusted_source(&absolute) {
        return None;
    }
    Some(force_https(&absolute.replace(' ', "%20")))
}

/// Resolves an `<img>` source against [`ASSET_ORIGIN`].
///
/// Returns `None` for empty values, `data:` URIs and anything that is not
/// an absolute http(s) URL after resolution.
pub(crate) fn resolve_src(src: &str) -> Option<String> {
    let src = src.trim();
    if src.is_empty() || src.starts_with("data:") {
        return None;
    }
    let absolute = if src.starts_with('/') {
        format!("{ASSET_ORIGIN}{src}")
    } else {
        src.to_owned()
    };
    absolute.starts_with("http").then_some(absolute)
}

/// True when the URL is served by the briefing site or its attachment store.
pub(crate) fn is_trusted_source(url: &str) -> bool {
    url.contains(TRUSTED_HOST) || url.contains(ATTACHMENT_PATH)
}

/// Rewrites a leading `http://` to `https://`. Other input is returned as-is.
#[must_use]
pub fn force_https(url: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_owned(),
    }
}
