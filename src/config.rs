use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{NewsError, Result};
use crate::news::Category;

/// One upstream RSS/Atom feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "FeedSourceRepr")]
pub struct FeedSource {
    pub url: String,
    pub category: Category,
    /// Outlet label; derived from the feed host when absent
    pub publisher: Option<String>,
    /// Newest entry of this feed is flagged as the featured story
    pub featured: bool,
}

impl FeedSource {
    pub fn new(url: &str, category: Category) -> Self {
        Self {
            url: url.to_string(),
            category,
            publisher: None,
            featured: false,
        }
    }
}

/// Older config files listed feeds as bare URL strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum FeedSourceRepr {
    Url(String),
    Full {
        url: String,
        #[serde(default)]
        category: Category,
        #[serde(default)]
        publisher: Option<String>,
        #[serde(default)]
        featured: bool,
    },
}

impl From<FeedSourceRepr> for FeedSource {
    fn from(repr: FeedSourceRepr) -> Self {
        match repr {
            FeedSourceRepr::Url(url) => FeedSource::new(&url, Category::General),
            FeedSourceRepr::Full {
                url,
                category,
                publisher,
                featured,
            } => FeedSource {
                url,
                category,
                publisher,
                featured,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_news_sources")]
    pub news_sources: Vec<FeedSource>,
    /// Tickers looked up in headlines to fill `relatedStocks` and mark hot news
    #[serde(default = "default_tracked_tickers")]
    pub tracked_tickers: Vec<String>,
    #[serde(default = "default_cache_max_age")]
    pub cache_max_age_secs: u64,
    #[serde(default = "default_hot_window")]
    pub hot_window_hours: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_news_sources() -> Vec<FeedSource> {
    vec![
        FeedSource {
            url: "https://feeds.content.dowjones.io/public/rss/mw_topstories".to_string(),
            category: Category::Markets,
            publisher: Some("MarketWatch".to_string()),
            featured: true,
        },
        FeedSource::new(
            "https://www.cnbc.com/id/19854910/device/rss/rss.html",
            Category::Tech,
        ),
        FeedSource::new(
            "https://www.cnbc.com/id/15839135/device/rss/rss.html",
            Category::Earnings,
        ),
        FeedSource::new(
            "https://www.cnbc.com/id/20910258/device/rss/rss.html",
            Category::Economy,
        ),
        FeedSource::new(
            "https://www.coindesk.com/arc/outboundfeeds/rss/",
            Category::Crypto,
        ),
    ]
}

fn default_tracked_tickers() -> Vec<String> {
    ["AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "NVDA", "META", "DIS", "NKE"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_cache_max_age() -> u64 {
    300
}

fn default_hot_window() -> u64 {
    6
}

fn default_request_timeout() -> u64 {
    15
}

fn default_bind_addr() -> String {
    "127.0.0.1:8787".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            news_sources: default_news_sources(),
            tracked_tickers: default_tracked_tickers(),
            cache_max_age_secs: default_cache_max_age(),
            hot_window_hours: default_hot_window(),
            request_timeout_secs: default_request_timeout(),
            bind_addr: default_bind_addr(),
        }
    }
}

impl Config {
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| NewsError::Config("could not find config directory".to_string()))?
            .join("stocktoons");

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        Ok(config_dir.join("config.json"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Read `path`, writing defaults there first if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Config::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = fs::read_to_string(path)?;
        let mut config: Config = serde_json::from_str(&content)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Uppercase and dedupe tickers, replace zero durations with defaults.
    pub fn normalize(&mut self) {
        let mut tickers: Vec<String> = Vec::with_capacity(self.tracked_tickers.len());
        for t in &self.tracked_tickers {
            let t = t.trim().to_uppercase();
            if !t.is_empty() && !tickers.contains(&t) {
                tickers.push(t);
            }
        }
        self.tracked_tickers = tickers;

        if self.cache_max_age_secs == 0 {
            self.cache_max_age_secs = default_cache_max_age();
        }
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = default_request_timeout();
        }
    }

    pub fn validate(&self) -> Result<()> {
        for feed in &self.news_sources {
            url::Url::parse(&feed.url)
                .map_err(|e| NewsError::Config(format!("invalid feed url {}: {e}", feed.url)))?;
        }
        self.bind_addr
            .parse::<SocketAddr>()
            .map_err(|e| NewsError::Config(format!("invalid bind_addr {}: {e}", self.bind_addr)))?;
        Ok(())
    }

    pub fn cache_max_age(&self) -> Duration {
        Duration::from_secs(self.cache_max_age_secs)
    }

    pub fn hot_window(&self) -> Duration {
        Duration::from_secs(self.hot_window_hours * 3600)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Config with no feeds and short timings, for tests and offline runs.
    #[doc(hidden)]
    pub fn test_config() -> Self {
        Self {
            news_sources: Vec::new(),
            tracked_tickers: vec!["AAPL".to_string(), "TSLA".to_string()],
            cache_max_age_secs: 60,
            hot_window_hours: 6,
            request_timeout_secs: 5,
            bind_addr: "127.0.0.1:0".to_string(),
        }
    }
}
