//! Orchestration between the news service and whatever renders it.
//!
//! The controller holds two independent pieces of state: the primary news
//! views (all, hot, featured) and the search results. Both are guarded by a
//! generation counter so that a superseded request can never overwrite the
//! result of a newer one.

mod search;

use chrono::{DateTime, Utc};
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{NewsError, Result};
use crate::news::{Article, NewsService, hot_of, pick_featured};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStatus {
    #[default]
    Idle,
    Searching,
    Ready,
    Error,
}

/// Which of the three primary reads a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewsView {
    All,
    Hot,
    Featured,
}

impl NewsView {
    pub fn label(&self) -> &'static str {
        match self {
            NewsView::All => "all news",
            NewsView::Hot => "hot news",
            NewsView::Featured => "featured story",
        }
    }
}

/// Every view that failed during one refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshError {
    pub failures: Vec<(NewsView, String)>,
}

impl RefreshError {
    pub fn failed(&self, view: NewsView) -> bool {
        self.failures.iter().any(|(v, _)| *v == view)
    }
}

impl fmt::Display for RefreshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .failures
            .iter()
            .map(|(view, msg)| format!("{}: {}", view.label(), msg))
            .collect();
        write!(f, "refresh failed ({})", parts.join("; "))
    }
}

impl std::error::Error for RefreshError {}

#[derive(Debug, Clone, Default)]
pub struct NewsState {
    pub status: LoadState,
    pub all_news: Vec<Article>,
    pub hot_news: Vec<Article>,
    pub featured: Option<Article>,
    pub last_updated: Option<DateTime<Utc>>,
    pub error: Option<RefreshError>,
}

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub status: SearchStatus,
    pub query: String,
    pub results: Vec<Article>,
    pub error: Option<String>,
}

/// Point-in-time copy of the controller state for rendering.
#[derive(Debug, Clone, Default)]
pub struct ControllerSnapshot {
    pub news: NewsState,
    pub search: SearchState,
}

pub struct NewsController {
    service: Arc<NewsService>,
    request_timeout: Duration,
    state: Mutex<ControllerSnapshot>,
    refresh_generation: AtomicU64,
    search_generation: AtomicU64,
}

impl NewsController {
    pub fn new(service: Arc<NewsService>, request_timeout: Duration) -> Self {
        Self {
            service,
            request_timeout,
            state: Mutex::new(ControllerSnapshot::default()),
            refresh_generation: AtomicU64::new(0),
            search_generation: AtomicU64::new(0),
        }
    }

    pub fn service(&self) -> &Arc<NewsService> {
        &self.service
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        self.lock().clone()
    }

    /// Load all three views from one pinned snapshot, so hot and featured are
    /// always drawn from the same fetch cycle as the full list. Content is
    /// only replaced on success; otherwise every view is reported failed and
    /// the previous content stays in place. A refresh overtaken by a newer
    /// one is dropped.
    pub async fn refresh(&self) -> std::result::Result<(), RefreshError> {
        let generation = self.refresh_generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.lock();
            state.news.status = LoadState::Loading;
            state.news.error = None;
        }
        debug!(generation, "news refresh started");

        let pinned = self.bounded(self.service.fetch_all_news()).await;

        if self.refresh_generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "stale news refresh discarded");
            return Ok(());
        }

        let mut state = self.lock();
        match pinned {
            Ok(all) => {
                let hot = hot_of(&all);
                let featured = pick_featured(&all).cloned();
                info!(
                    all = all.len(),
                    hot = hot.len(),
                    featured = featured.is_some(),
                    "news refreshed"
                );
                state.news.all_news = all.to_vec();
                state.news.hot_news = hot;
                state.news.featured = featured;
                state.news.last_updated = Some(Utc::now());
                state.news.status = LoadState::Ready;
                state.news.error = None;
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                let failures = [NewsView::All, NewsView::Hot, NewsView::Featured]
                    .into_iter()
                    .map(|view| (view, message.clone()))
                    .collect();
                let err = RefreshError { failures };
                warn!(error = %err, "news refresh failed");
                state.news.status = LoadState::Error;
                state.news.error = Some(err.clone());
                Err(err)
            }
        }
    }

    async fn bounded<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.request_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(NewsError::Timeout(self.request_timeout)),
        }
    }

    // No await happens while this guard is held.
    fn lock(&self) -> MutexGuard<'_, ControllerSnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
