use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub feed_path: PathBuf,
    pub news_api_url: String,
    pub news_service_key: Option<String>,
    pub news_api_timeout_secs: u64,
    pub detail_timeout_secs: u64,
    pub page_size: u32,
    pub max_pages: u32,
    pub page_delay_ms: u64,
    pub detail_delay_ms: u64,
    pub feed_cap: usize,
    pub fetch_schedule: String,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub chat_model: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("feed_path", &self.feed_path)
            .field("news_api_url", &self.news_api_url)
            .field(
                "news_service_key",
                &self.news_service_key.as_ref().map(|_| "[redacted]"),
            )
            .field("news_api_timeout_secs", &self.news_api_timeout_secs)
            .field("detail_timeout_secs", &self.detail_timeout_secs)
            .field("page_size", &self.page_size)
            .field("max_pages", &self.max_pages)
            .field("page_delay_ms", &self.page_delay_ms)
            .field("detail_delay_ms", &self.detail_delay_ms)
            .field("feed_cap", &self.feed_cap)
            .field("fetch_schedule", &self.fetch_schedule)
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("openai_base_url", &self.openai_base_url)
            .field("chat_model", &self.chat_model)
            .finish()
    }
}
