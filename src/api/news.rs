use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use super::NewsSource;
use crate::config::FeedSource;
use crate::error::{NewsError, Result};
use crate::news::{Article, title_contains_ticker};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Extract a short publisher name from the feed URL's domain.
/// e.g. "https://www.cnbc.com/id/100003114/device/rss/rss.html" → "CNBC"
pub fn publisher_from_url(url: &str) -> String {
    let host = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
        .split(['/', ':'])
        .next()
        .unwrap_or(url)
        .trim_start_matches("www.")
        .trim_start_matches("rss.")
        .trim_start_matches("feeds.");

    match host {
        "cnbc.com" => "CNBC".to_string(),
        "content.dowjones.io" | "marketwatch.com" => "MarketWatch".to_string(),
        "coindesk.com" => "CoinDesk".to_string(),
        "finance.yahoo.com" => "Yahoo Finance".to_string(),
        "reuters.com" => "Reuters".to_string(),
        "feedburner.com" => "Feedburner".to_string(),
        // Fallback: use domain as-is, dropping TLD
        other => other.split('.').next().unwrap_or(other).to_string(),
    }
}

/// Drop markup from feed text, decode common entities and collapse
/// whitespace.
pub fn strip_tags(html: &str) -> String {
    const ENTITIES: &[(&str, char)] = &[
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&nbsp;", ' '),
        ("&quot;", '"'),
        ("&#39;", '\''),
        ("&apos;", '\''),
    ];

    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    let mut rest = html;
    while let Some(c) = rest.chars().next() {
        match c {
            '<' => {
                in_tag = true;
                rest = &rest[1..];
            }
            '>' if in_tag => {
                in_tag = false;
                out.push(' ');
                rest = &rest[1..];
            }
            _ if in_tag => rest = &rest[c.len_utf8()..],
            '&' => match ENTITIES.iter().find(|(e, _)| rest.starts_with(e)) {
                Some((e, decoded)) => {
                    out.push(*decoded);
                    rest = &rest[e.len()..];
                }
                None => {
                    out.push('&');
                    rest = &rest[1..];
                }
            },
            _ => {
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Pulls articles from a set of RSS/Atom feeds.
pub struct RssSource {
    client: Client,
    feeds: Vec<FeedSource>,
    tracked_tickers: Vec<String>,
    hot_window: Duration,
}

impl RssSource {
    pub fn new(
        feeds: Vec<FeedSource>,
        tracked_tickers: Vec<String>,
        hot_window: Duration,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            feeds,
            tracked_tickers,
            hot_window,
        })
    }

    async fn fetch_feed(&self, feed: &FeedSource) -> Result<Vec<Article>> {
        let response = self
            .client
            .get(&feed.url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NewsError::Upstream(format!(
                "{} returned {}",
                feed.url,
                response.status()
            )));
        }

        let bytes = response.bytes().await?;
        let parsed = feed_rs::parser::parse(&bytes[..])?;

        let publisher = feed
            .publisher
            .clone()
            .unwrap_or_else(|| publisher_from_url(&feed.url));
        let now = Utc::now();

        let mut items: Vec<Article> = parsed
            .entries
            .into_iter()
            .map(|entry| {
                let title = entry
                    .title
                    .map(|t| strip_tags(&t.content))
                    .unwrap_or_else(|| "(no title)".to_string());
                let published_at = entry.published.or(entry.updated).unwrap_or(now);
                let url = entry.links.into_iter().next().map(|l| l.href);
                let summary = entry
                    .summary
                    .map(|s| strip_tags(&s.content))
                    .unwrap_or_default();
                let content = entry
                    .content
                    .and_then(|c| c.body)
                    .map(|b| strip_tags(&b))
                    .unwrap_or_default();
                let id = if !entry.id.is_empty() {
                    entry.id
                } else if let Some(link) = &url {
                    link.clone()
                } else {
                    format!("{}:{}", publisher, title)
                };

                let related: Vec<&String> = self
                    .tracked_tickers
                    .iter()
                    .filter(|t| {
                        title_contains_ticker(&title, t) || title_contains_ticker(&summary, t)
                    })
                    .collect();
                let is_hot = is_recent(published_at, now, self.hot_window) || !related.is_empty();

                Article {
                    id,
                    title,
                    summary,
                    content,
                    category: feed.category,
                    source: publisher.clone(),
                    published_at,
                    related_stocks: Vec::new(),
                    is_hot,
                    is_featured: false,
                    url,
                }
                .with_related_stocks(related)
            })
            .collect();

        if feed.featured {
            if let Some(newest) = items.iter_mut().max_by_key(|a| a.published_at) {
                newest.is_featured = true;
            }
        }

        debug!(url = %feed.url, count = items.len(), "feed parsed");
        Ok(items)
    }
}

fn is_recent(published_at: DateTime<Utc>, now: DateTime<Utc>, window: Duration) -> bool {
    match chrono::Duration::from_std(window) {
        Ok(window) => now.signed_duration_since(published_at) <= window,
        Err(_) => true,
    }
}

#[async_trait]
impl NewsSource for RssSource {
    async fn fetch(&self) -> Result<Vec<Article>> {
        if self.feeds.is_empty() {
            return Ok(Vec::new());
        }

        let futures: Vec<_> = self.feeds.iter().map(|f| self.fetch_feed(f)).collect();
        let results = futures::future::join_all(futures).await;

        let mut failures = Vec::new();
        let mut all_items: Vec<Article> = Vec::new();
        for (feed, result) in self.feeds.iter().zip(results) {
            match result {
                Ok(items) => all_items.extend(items),
                Err(e) => {
                    warn!(url = %feed.url, error = %e, "feed fetch failed");
                    failures.push(format!("{}: {}", feed.url, e));
                }
            }
        }

        if failures.len() == self.feeds.len() {
            return Err(NewsError::Upstream(failures.join("; ")));
        }

        all_items.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(all_items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publisher_known_hosts() {
        assert_eq!(
            publisher_from_url("https://www.cnbc.com/id/19854910/device/rss/rss.html"),
            "CNBC"
        );
        assert_eq!(
            publisher_from_url("https://feeds.content.dowjones.io/public/rss/mw_topstories"),
            "MarketWatch"
        );
    }

    #[test]
    fn publisher_fallback_drops_tld_and_port() {
        assert_eq!(publisher_from_url("http://example.org/feed"), "example");
        assert_eq!(publisher_from_url("http://127.0.0.1:4000/rss"), "127");
    }

    #[test]
    fn strip_tags_removes_markup() {
        assert_eq!(
            strip_tags("<p>Stocks <b>rally</b></p>\n after  Fed"),
            "Stocks rally after Fed"
        );
        assert_eq!(strip_tags("plain"), "plain");
        assert_eq!(strip_tags("AT&amp;T &lt;earnings&gt;"), "AT&T <earnings>");
        assert_eq!(strip_tags("R&D"), "R&D");
    }

    #[test]
    fn recent_within_window() {
        let now = Utc::now();
        let hour = Duration::from_secs(3600);
        assert!(is_recent(now - chrono::Duration::minutes(30), now, hour));
        assert!(!is_recent(now - chrono::Duration::hours(2), now, hour));
    }
}
