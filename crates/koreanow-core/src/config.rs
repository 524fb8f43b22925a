use std::str::FromStr;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_NEWS_API_URL: &str =
    "https://apis.data.go.kr/1371000/policyNewsService/policyNewsList";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let env = parse_environment(&or_default("KOREANOW_ENV", "development"))?;

    let bind_addr = parse_var(&lookup, "KOREANOW_BIND_ADDR", "0.0.0.0:8888")?;
    let log_level = or_default("KOREANOW_LOG_LEVEL", "info");
    let feed_path = PathBuf::from(or_default("KOREANOW_FEED_PATH", "data/korea_now.json"));

    let news_api_url = or_default("KOREANOW_NEWS_API_URL", DEFAULT_NEWS_API_URL);
    let news_service_key = optional("KOREANOW_NEWS_SERVICE_KEY");
    let news_api_timeout_secs = parse_var(&lookup, "KOREANOW_NEWS_API_TIMEOUT_SECS", "15")?;
    let detail_timeout_secs = parse_var(&lookup, "KOREANOW_DETAIL_TIMEOUT_SECS", "10")?;
    let page_size = parse_var(&lookup, "KOREANOW_PAGE_SIZE", "50")?;
    let max_pages = parse_var(&lookup, "KOREANOW_MAX_PAGES", "5")?;
    let page_delay_ms = parse_var(&lookup, "KOREANOW_PAGE_DELAY_MS", "500")?;
    let detail_delay_ms = parse_var(&lookup, "KOREANOW_DETAIL_DELAY_MS", "300")?;
    let feed_cap = parse_var(&lookup, "KOREANOW_FEED_CAP", "100")?;
    let fetch_schedule = or_default("KOREANOW_FETCH_SCHEDULE", "0 0 */6 * * *");

    let openai_api_key = optional("OPENAI_API_KEY");
    let openai_base_url = or_default("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL);
    let chat_model = or_default("KOREANOW_CHAT_MODEL", "gpt-4o-mini");

    if page_size == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "KOREANOW_PAGE_SIZE".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        feed_path,
        news_api_url,
        news_service_key,
        news_api_timeout_secs,
        detail_timeout_secs,
        page_size,
        max_pages,
        page_delay_ms,
        detail_delay_ms,
        feed_cap,
        fetch_schedule,
        openai_api_key,
        openai_base_url,
        chat_model,
    })
}

/// Parse `var` (or `default` when unset) into `T`, reporting the variable
/// name on failure.
fn parse_var<F, T>(lookup: &F, var: &str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(var).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "KOREANOW_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
