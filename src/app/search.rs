use std::sync::atomic::Ordering;
use tracing::{debug, warn};

use super::{NewsController, SearchState, SearchStatus};
use crate::news::search;

impl NewsController {
    /// Search the current snapshot. Blank queries clear the results without
    /// running the engine. Only the most recent call may write its outcome;
    /// a failure is recorded in the search state and leaves the primary
    /// news untouched.
    pub async fn search_news(&self, query: &str) {
        let generation = self.search_generation.fetch_add(1, Ordering::SeqCst) + 1;

        if query.trim().is_empty() {
            let mut state = self.lock();
            state.search = SearchState {
                status: SearchStatus::Ready,
                query: query.to_string(),
                results: Vec::new(),
                error: None,
            };
            return;
        }

        {
            let mut state = self.lock();
            state.search.status = SearchStatus::Searching;
            state.search.query = query.to_string();
            state.search.error = None;
        }

        let outcome = self.bounded(self.service.fetch_all_news()).await;

        if self.search_generation.load(Ordering::SeqCst) != generation {
            debug!(query, generation, "stale search result discarded");
            return;
        }

        let mut state = self.lock();
        match outcome {
            Ok(articles) => {
                let results = search(query, &articles);
                debug!(query, count = results.len(), "search finished");
                state.search.results = results;
                state.search.status = SearchStatus::Ready;
            }
            Err(e) => {
                warn!(query, error = %e, "search failed");
                state.search.results.clear();
                state.search.error = Some(e.to_string());
                state.search.status = SearchStatus::Error;
            }
        }
    }

    /// Reset search to idle and orphan any search still in flight.
    pub fn clear_search(&self) {
        self.search_generation.fetch_add(1, Ordering::SeqCst);
        self.lock().search = SearchState::default();
    }
}
