//! In-memory article snapshot with recency, hot and featured views.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::model::Article;
use crate::api::NewsSource;
use crate::error::Result;

/// Immutable view of one fetch cycle. Replaced wholesale, never patched.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub articles: Arc<[Article]>,
    pub fetched_at: Instant,
}

impl Snapshot {
    /// Sort newest first (stable) and keep the first occurrence of every id.
    fn build(mut articles: Vec<Article>) -> Self {
        articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        let mut seen = HashSet::new();
        articles.retain(|a| seen.insert(a.id.clone()));
        Self {
            articles: articles.into(),
            fetched_at: Instant::now(),
        }
    }

    fn is_stale(&self, max_age: Duration) -> bool {
        self.fetched_at.elapsed() >= max_age
    }
}

pub struct NewsService {
    source: Arc<dyn NewsSource>,
    max_age: Duration,
    snapshot: RwLock<Option<Snapshot>>,
    // Serialises upstream fetches so concurrent readers of a stale cache
    // trigger one request, not one each.
    refresh_lock: Mutex<()>,
}

impl NewsService {
    pub fn new(source: Arc<dyn NewsSource>, max_age: Duration) -> Self {
        Self {
            source,
            max_age,
            snapshot: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Full snapshot, newest first. Fetches when the cache is empty or older
    /// than `max_age`. On failure the previous snapshot stays readable
    /// through [`NewsService::cached`].
    pub async fn fetch_all_news(&self) -> Result<Arc<[Article]>> {
        if let Some(articles) = self.fresh().await {
            debug!("news cache hit");
            return Ok(articles);
        }

        let _guard = self.refresh_lock.lock().await;
        // Another caller may have refreshed while we waited.
        if let Some(articles) = self.fresh().await {
            debug!("news cache filled by concurrent refresh");
            return Ok(articles);
        }

        debug!("news cache miss, fetching upstream");
        let fetched = match self.source.fetch().await {
            Ok(articles) => articles,
            Err(e) => {
                warn!(error = %e, "upstream news fetch failed");
                return Err(e);
            }
        };

        let snapshot = Snapshot::build(fetched);
        let articles = Arc::clone(&snapshot.articles);
        info!(count = articles.len(), "news snapshot replaced");
        *self.snapshot.write().await = Some(snapshot);
        Ok(articles)
    }

    /// Articles flagged hot, in recency order. Empty is a valid answer.
    pub async fn get_hot_news(&self) -> Result<Vec<Article>> {
        let articles = self.fetch_all_news().await?;
        Ok(hot_of(&articles))
    }

    /// The flagged featured article, or the most recent one when none is
    /// flagged. `None` only for an empty snapshot.
    pub async fn get_featured_story(&self) -> Result<Option<Article>> {
        let articles = self.fetch_all_news().await?;
        Ok(pick_featured(&articles).cloned())
    }

    /// Current snapshot without touching upstream, stale or not.
    pub async fn cached(&self) -> Option<Snapshot> {
        self.snapshot.read().await.clone()
    }

    /// Drop the snapshot so the next read refetches.
    pub async fn invalidate(&self) {
        *self.snapshot.write().await = None;
        debug!("news cache invalidated");
    }

    async fn fresh(&self) -> Option<Arc<[Article]>> {
        let guard = self.snapshot.read().await;
        guard
            .as_ref()
            .filter(|s| !s.is_stale(self.max_age))
            .map(|s| Arc::clone(&s.articles))
    }
}

/// Hot articles of one snapshot, order preserved.
pub fn hot_of(articles: &[Article]) -> Vec<Article> {
    articles.iter().filter(|a| a.is_hot).cloned().collect()
}

/// Featured pick over a recency-ordered slice.
pub fn pick_featured(articles: &[Article]) -> Option<&Article> {
    articles
        .iter()
        .find(|a| a.is_featured)
        .or_else(|| articles.first())
}
