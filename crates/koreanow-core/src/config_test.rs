use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "KOREANOW_ENV"));
}

#[test]
fn build_app_config_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:8888");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.feed_path.to_str(), Some("data/korea_now.json"));
    assert_eq!(cfg.news_api_url, DEFAULT_NEWS_API_URL);
    assert!(cfg.news_service_key.is_none());
    assert_eq!(cfg.news_api_timeout_secs, 15);
    assert_eq!(cfg.detail_timeout_secs, 10);
    assert_eq!(cfg.page_size, 50);
    assert_eq!(cfg.max_pages, 5);
    assert_eq!(cfg.page_delay_ms, 500);
    assert_eq!(cfg.detail_delay_ms, 300);
    assert_eq!(cfg.feed_cap, 100);
    assert!(cfg.openai_api_key.is_none());
    assert_eq!(cfg.openai_base_url, DEFAULT_OPENAI_BASE_URL);
    assert_eq!(cfg.chat_model, "gpt-4o-mini");
}

#[test]
fn build_app_config_reads_credentials() {
    let mut map = HashMap::new();
    map.insert("KOREANOW_NEWS_SERVICE_KEY", "svc-key");
    map.insert("OPENAI_API_KEY", "sk-test");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.news_service_key.as_deref(), Some("svc-key"));
    assert_eq!(cfg.openai_api_key.as_deref(), Some("sk-test"));
}

#[test]
fn blank_credentials_are_treated_as_missing() {
    let mut map = HashMap::new();
    map.insert("OPENAI_API_KEY", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.openai_api_key.is_none());
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("KOREANOW_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "KOREANOW_BIND_ADDR"),
        "expected InvalidEnvVar(KOREANOW_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn page_delay_override() {
    let mut map = HashMap::new();
    map.insert("KOREANOW_PAGE_DELAY_MS", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.page_delay_ms, 0);
}

#[test]
fn page_size_invalid() {
    let mut map = HashMap::new();
    map.insert("KOREANOW_PAGE_SIZE", "fifty");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "KOREANOW_PAGE_SIZE"),
        "expected InvalidEnvVar(KOREANOW_PAGE_SIZE), got: {result:?}"
    );
}

#[test]
fn page_size_zero_is_rejected() {
    let mut map = HashMap::new();
    map.insert("KOREANOW_PAGE_SIZE", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::InvalidEnvVar { .. })));
}

#[test]
fn feed_cap_override() {
    let mut map = HashMap::new();
    map.insert("KOREANOW_FEED_CAP", "20");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.feed_cap, 20);
}

#[test]
fn debug_output_redacts_secrets() {
    let mut map = HashMap::new();
    map.insert("KOREANOW_NEWS_SERVICE_KEY", "svc-secret");
    map.insert("OPENAI_API_KEY", "sk-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("svc-secret"));
    assert!(!rendered.contains("sk-secret"));
    assert!(rendered.contains("[redacted]"));
}
