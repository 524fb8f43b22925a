//! Read and rewrite the feed file on disk.

use std::path::{Path, PathBuf};

use koreanow_core::{FeedDocument, NewsItem};
use tokio::fs;

use crate::error::FeedError;

/// Handle on the feed JSON file.
#[derive(Debug, Clone)]
pub struct FeedStore {
    path: PathBuf,
}

impl FeedStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the items of the currently persisted feed.
    ///
    /// A missing file yields an empty list. An unreadable or unparsable file
    /// is logged and also yields an empty list; it is never fatal.
    pub async fn load_items(&self) -> Vec<NewsItem> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no existing feed file");
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read existing feed");
                return Vec::new();
            }
        };

        match serde_json::from_str::<FeedDocument>(&raw) {
            Ok(doc) => {
                tracing::info!(path = %self.path.display(), count = doc.items.len(), "loaded existing feed");
                doc.items
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "existing feed is not valid JSON; starting empty");
                Vec::new()
            }
        }
    }

    /// Replace the feed file with `doc`, pretty-printed as UTF-8 JSON.
    ///
    /// The document is written to a sibling temp file first and renamed over
    /// the target, so a failed write leaves the previous feed in place. The
    /// parent directory is created when missing.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Serialize`] if the document cannot be encoded and
    /// [`FeedError::Io`] if the directory, temp file, or rename fails.
    pub async fn write(&self, doc: &FeedDocument) -> Result<(), FeedError> {
        let json = serde_json::to_string_pretty(doc)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| FeedError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let tmp = self.temp_path();
        fs::write(&tmp, json.as_bytes())
            .await
            .map_err(|source| FeedError::Io {
                path: tmp.clone(),
                source,
            })?;

        if let Err(source) = fs::rename(&tmp, &self.path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(FeedError::Io {
                path: self.path.clone(),
                source,
            });
        }

        tracing::info!(path = %self.path.display(), count = doc.items.len(), "wrote feed");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn item(link: &str) -> NewsItem {
        NewsItem {
            title: "정책 뉴스".to_string(),
            link: link.to_string(),
            summary: "<p>요약</p>".to_string(),
            full_content: "<p>요약</p>".to_string(),
            pub_date: "2025-10-31 09:00:00".to_string(),
            author: koreanow_core::DEFAULT_AUTHOR.to_string(),
            thumbnail_url: String::new(),
        }
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FeedStore::new(dir.path().join("absent.json"));
        assert!(store.load_items().await.is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("korea_now.json");
        std::fs::write(&path, "{ not json").expect("seed corrupt file");
        let store = FeedStore::new(&path);
        assert!(store.load_items().await.is_empty());
    }

    #[tokio::test]
    async fn write_creates_parent_dir_and_reloads() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("data").join("korea_now.json");
        let store = FeedStore::new(&path);

        let doc = FeedDocument::new(vec![item("a"), item("b")], Utc::now());
        store.write(&doc).await.expect("write feed");

        let items = store.load_items().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].link, "a");
        assert!(!path.with_file_name("korea_now.json.tmp").exists());
    }

    #[tokio::test]
    async fn write_is_indented_and_keeps_hangul_unescaped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("korea_now.json");
        let store = FeedStore::new(&path);

        store
            .write(&FeedDocument::new(vec![item("a")], Utc::now()))
            .await
            .expect("write feed");

        let raw = std::fs::read_to_string(&path).expect("read back");
        assert!(raw.contains("\n  \"items\""));
        assert!(raw.contains("정책 뉴스"));
        assert!(raw.contains("\"total\": 1"));
    }

    #[tokio::test]
    async fn write_overwrites_previous_feed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FeedStore::new(dir.path().join("korea_now.json"));

        store
            .write(&FeedDocument::new(vec![item("a"), item("b")], Utc::now()))
            .await
            .expect("first write");
        store
            .write(&FeedDocument::new(vec![item("c")], Utc::now()))
            .await
            .expect("second write");

        let items = store.load_items().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].link, "c");
    }
}
