#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use stocktoons_news::api::NewsSource;
use stocktoons_news::error::{NewsError, Result};
use stocktoons_news::news::{Article, Category, NewsService};

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 12, 0, 0).unwrap()
}

pub fn make_article(id: &str, title: &str, summary: &str, hours_ago: i64) -> Article {
    Article {
        id: id.to_string(),
        title: title.to_string(),
        summary: summary.to_string(),
        content: String::new(),
        category: Category::Markets,
        source: "Test Wire".to_string(),
        published_at: base_time() - ChronoDuration::hours(hours_ago),
        related_stocks: Vec::new(),
        is_hot: false,
        is_featured: false,
        url: None,
    }
}

pub fn hot(mut article: Article) -> Article {
    article.is_hot = true;
    article
}

pub fn featured(mut article: Article) -> Article {
    article.is_featured = true;
    article
}

/// Scriptable upstream: counts calls, can fail on demand and can stall.
#[derive(Default)]
pub struct TestSource {
    articles: Mutex<Vec<Article>>,
    calls: AtomicUsize,
    failing: AtomicBool,
    delay: Mutex<Duration>,
}

impl TestSource {
    pub fn new(articles: Vec<Article>) -> Arc<Self> {
        Arc::new(Self {
            articles: Mutex::new(articles),
            ..Default::default()
        })
    }

    pub fn set_articles(&self, articles: Vec<Article>) {
        *self.articles.lock().unwrap() = articles;
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NewsSource for TestSource {
    async fn fetch(&self) -> Result<Vec<Article>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(NewsError::Upstream("provider unavailable".to_string()));
        }
        Ok(self.articles.lock().unwrap().clone())
    }
}

/// Upstream whose every fetch is a brand new cycle: call n returns a single
/// hot, featured article with id `gen{n}`.
#[derive(Default)]
pub struct RollingSource {
    calls: AtomicUsize,
}

impl RollingSource {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NewsSource for RollingSource {
    async fn fetch(&self) -> Result<Vec<Article>> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let article = make_article(&format!("gen{n}"), "Rolling", "", 1);
        Ok(vec![featured(hot(article))])
    }
}

pub fn service_for(source: &Arc<TestSource>) -> Arc<NewsService> {
    let source: Arc<dyn NewsSource> = source.clone();
    Arc::new(NewsService::new(source, Duration::from_secs(60)))
}

/// Two-article snapshot from the ranking scenario: title hit vs summary hit.
pub fn fed_snapshot() -> Vec<Article> {
    vec![
        make_article("tech", "Tech rally", "Stocks climb after the Fed mentioned patience", 1),
        make_article("fed", "Fed raises rates", "Policy tightens again", 2),
    ]
}
