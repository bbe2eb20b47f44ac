use std::fs;
use stocktoons_news::NewsError;
use stocktoons_news::config::{Config, FeedSource};
use stocktoons_news::news::Category;

#[test]
fn missing_file_is_created_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let config = Config::load_from(&path).unwrap();
    assert!(path.exists());
    assert_eq!(config.cache_max_age_secs, 300);
    assert_eq!(config.news_sources.len(), Config::default().news_sources.len());
}

#[test]
fn save_then_load_keeps_feeds() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    let mut config = Config::test_config();
    config.news_sources.push(FeedSource {
        url: "https://example.com/rss".to_string(),
        category: Category::Crypto,
        publisher: Some("Example".to_string()),
        featured: true,
    });
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded.news_sources, config.news_sources);
    assert_eq!(loaded.tracked_tickers, vec!["AAPL", "TSLA"]);
}

#[test]
fn load_normalizes_file_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{
            "news_sources": ["https://example.com/feed"],
            "tracked_tickers": ["nvda", "NVDA", "dis"],
            "request_timeout_secs": 0
        }"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.tracked_tickers, vec!["NVDA", "DIS"]);
    assert_eq!(config.request_timeout_secs, 15);
    assert_eq!(config.news_sources[0].category, Category::General);
    assert_eq!(config.bind_addr, "127.0.0.1:8787");
}

#[test]
fn load_rejects_invalid_feed_url() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"news_sources": ["::not a url::"]}"#).unwrap();
    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, NewsError::Config(_)), "{err:?}");
}

#[test]
fn load_rejects_malformed_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, "{ not json").unwrap();
    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, NewsError::Json(_)), "{err:?}");
}
