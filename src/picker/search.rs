//! Text search session
//!
//! Turns keystrokes into forward-search requests without flooding the
//! geocoding service. Every request is tagged with a sequence number and a
//! response is only rendered if its number is still the latest one issued,
//! so a slow answer to an old query can never replace a newer list.

use crate::config::defaults::{DEFAULT_COUNTRY_CODES, DEFAULT_MIN_QUERY_LEN, DEFAULT_SEARCH_LIMIT};
use crate::error::Result;
use crate::geo::{Candidate, GeocodingClient};
use crate::picker::runtime_handle;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Search tuning
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// Shortest input that issues a request
    pub min_query_len: usize,
    /// Delay between the last keystroke and the request
    pub debounce: Duration,
    /// Country codes passed to the geocoder, None for worldwide
    pub country_filter: Option<String>,
    /// Maximum number of candidates
    pub limit: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            min_query_len: DEFAULT_MIN_QUERY_LEN,
            debounce: Duration::ZERO,
            country_filter: Some(DEFAULT_COUNTRY_CODES.to_string()),
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

/// The rendered result list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "candidates", rename_all = "snake_case")]
pub enum SearchResults {
    /// Nothing shown
    Hidden,
    /// The "no results" placeholder
    NoResults,
    /// Candidate list
    Candidates(Vec<Candidate>),
}

impl SearchResults {
    pub fn candidates(&self) -> &[Candidate] {
        match self {
            Self::Candidates(candidates) => candidates,
            _ => &[],
        }
    }
}

/// A forward search request
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub text: String,
    pub seq: u64,
}

/// Candidates produced for a query
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub seq: u64,
    pub candidates: Vec<Candidate>,
}

/// Handle to an issued search
///
/// Dropping it leaves the search running.
#[derive(Debug)]
pub struct SearchTask {
    seq: u64,
    handle: JoinHandle<bool>,
}

impl SearchTask {
    /// Sequence number of the query
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Wait for the search; true if its results were rendered
    pub async fn finished(self) -> bool {
        self.handle.await.unwrap_or(false)
    }
}

#[derive(Debug, Default)]
struct SessionState {
    input: String,
    seq: u64,
}

struct SessionInner<G> {
    geocoder: Arc<G>,
    options: SearchOptions,
    state: Mutex<SessionState>,
    results: watch::Sender<SearchResults>,
}

/// Debounced, staleness-guarded forward search
pub struct SearchSession<G> {
    inner: Arc<SessionInner<G>>,
}

impl<G> Clone for SearchSession<G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<G: GeocodingClient + 'static> SearchSession<G> {
    pub fn new(geocoder: Arc<G>, options: SearchOptions) -> Self {
        let (results, _) = watch::channel(SearchResults::Hidden);
        Self {
            inner: Arc::new(SessionInner {
                geocoder,
                options,
                state: Mutex::new(SessionState::default()),
                results,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Handle a change of the search input
    ///
    /// Short input hides the list and invalidates any search in flight.
    /// Otherwise a new query is issued after the debounce delay; the
    /// returned task resolves once its response is applied or discarded.
    ///
    /// Issuing a query needs a tokio runtime; without one this fails with
    /// `Error::Runtime` and the session is left as it was.
    pub fn on_input(&self, text: &str) -> Result<Option<SearchTask>> {
        let mut state = self.state();
        if text.chars().count() < self.inner.options.min_query_len {
            state.input = text.to_string();
            state.seq += 1;
            self.inner.results.send_replace(SearchResults::Hidden);
            return Ok(None);
        }

        let runtime = runtime_handle()?;
        state.input = text.to_string();
        state.seq += 1;
        let query = SearchQuery {
            text: text.to_string(),
            seq: state.seq,
        };
        drop(state);

        debug!(query = %query.text, seq = query.seq, "search input");
        let seq = query.seq;
        let session = self.clone();
        let handle = runtime.spawn(async move { session.run(query).await });
        Ok(Some(SearchTask { seq, handle }))
    }

    async fn run(&self, query: SearchQuery) -> bool {
        let options = &self.inner.options;
        if !options.debounce.is_zero() {
            tokio::time::sleep(options.debounce).await;
        }
        if !self.is_current(query.seq) {
            debug!(seq = query.seq, "query superseded before dispatch");
            return false;
        }

        let candidates = match self
            .inner
            .geocoder
            .forward_search(&query.text, options.country_filter.as_deref(), options.limit)
            .await
        {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(error = %e, query = %query.text, "search failed");
                Vec::new()
            }
        };

        self.apply(SearchResult {
            seq: query.seq,
            candidates,
        })
    }

    /// Render a result if it answers the latest query
    ///
    /// Returns false when the result was discarded as stale.
    pub fn apply(&self, result: SearchResult) -> bool {
        let state = self.state();
        if result.seq != state.seq {
            debug!(seq = result.seq, current = state.seq, "discarding stale search result");
            return false;
        }

        let rendered = if result.candidates.is_empty() {
            SearchResults::NoResults
        } else {
            SearchResults::Candidates(result.candidates)
        };
        self.inner.results.send_replace(rendered);
        true
    }

    /// Clear the input text and the result list
    pub fn dismiss(&self) {
        let mut state = self.state();
        state.input.clear();
        state.seq += 1;
        self.inner.results.send_replace(SearchResults::Hidden);
    }

    pub fn is_current(&self, seq: u64) -> bool {
        self.state().seq == seq
    }

    /// Sequence number of the latest query
    pub fn current_seq(&self) -> u64 {
        self.state().seq
    }

    /// Current search input text
    pub fn input(&self) -> String {
        self.state().input.clone()
    }

    /// Currently rendered result list
    pub fn results(&self) -> SearchResults {
        self.inner.results.borrow().clone()
    }

    /// Follow result list changes
    pub fn subscribe(&self) -> watch::Receiver<SearchResults> {
        self.inner.results.subscribe()
    }

    pub fn options(&self) -> &SearchOptions {
        &self.inner.options
    }
}
