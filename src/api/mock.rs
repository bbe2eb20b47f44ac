use async_trait::async_trait;
use chrono::{Duration, Utc};

use super::NewsSource;
use crate::error::Result;
use crate::news::{Article, Category};

/// Serves a fixed article list. Used for offline runs and as the provider
/// when no feeds are configured.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    articles: Vec<Article>,
}

impl StaticSource {
    pub fn new(articles: Vec<Article>) -> Self {
        Self { articles }
    }

    /// Hand-written stories timestamped relative to now.
    pub fn curated() -> Self {
        let now = Utc::now();
        let entry = |id: &str,
                     title: &str,
                     summary: &str,
                     content: &str,
                     category: Category,
                     source: &str,
                     hours_ago: i64,
                     tickers: &[&str],
                     is_hot: bool,
                     is_featured: bool| {
            Article {
                id: id.to_string(),
                title: title.to_string(),
                summary: summary.to_string(),
                content: content.to_string(),
                category,
                source: source.to_string(),
                published_at: now - Duration::hours(hours_ago),
                related_stocks: Vec::new(),
                is_hot,
                is_featured,
                url: None,
            }
            .with_related_stocks(tickers)
        };

        Self::new(vec![
            entry(
                "st-001",
                "Fed holds rates steady as inflation cools",
                "The Federal Reserve kept its benchmark rate unchanged and signalled cuts could come later this year.",
                "Policymakers pointed to slowing price growth and a steady job market.",
                Category::Economy,
                "StockToons Desk",
                1,
                &[],
                true,
                true,
            ),
            entry(
                "st-002",
                "Apple unveils new iPhone lineup",
                "Apple showed off its latest phones and a faster chip at its fall event.",
                "Shares moved little as investors weighed pricing against demand.",
                Category::Tech,
                "StockToons Desk",
                3,
                &["AAPL"],
                true,
                false,
            ),
            entry(
                "st-003",
                "Nvidia earnings beat expectations again",
                "Data-center demand pushed revenue past analyst estimates.",
                "The company raised guidance for the next quarter.",
                Category::Earnings,
                "Market Wire",
                5,
                &["NVDA"],
                true,
                false,
            ),
            entry(
                "st-004",
                "Disney parks draw record summer crowds",
                "Theme park attendance hit an all-time high, helping offset streaming costs.",
                "",
                Category::Earnings,
                "Market Wire",
                9,
                &["DIS"],
                false,
                false,
            ),
            entry(
                "st-005",
                "S&P 500 closes at a new high",
                "Broad gains in tech and consumer stocks lifted the index.",
                "Trading volume was near its monthly average.",
                Category::Markets,
                "StockToons Desk",
                12,
                &["SPY"],
                false,
                false,
            ),
            entry(
                "st-006",
                "Bitcoin swings after regulatory headlines",
                "Crypto prices bounced around as traders digested new rules.",
                "",
                Category::Crypto,
                "Coin Report",
                20,
                &[],
                false,
                false,
            ),
            entry(
                "st-007",
                "Nike shoes sell out during back-to-school rush",
                "Retailers reported strong sneaker sales in August.",
                "",
                Category::Markets,
                "Market Wire",
                30,
                &["NKE"],
                false,
                false,
            ),
        ])
    }
}

#[async_trait]
impl NewsSource for StaticSource {
    async fn fetch(&self) -> Result<Vec<Article>> {
        Ok(self.articles.clone())
    }
}
