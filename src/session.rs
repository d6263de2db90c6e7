//! Observable search state for a host UI
//!
//! [`LocationSearch`] drives one provider on behalf of a search box. It keeps
//! at most one request current: starting a new search marks the previous one
//! as superseded, and a superseded response is dropped without touching the
//! published state. The network call itself is not aborted.

use crate::{
    error::SearchError,
    types::{DebugOptions, LocationResult, SearchProvider, SearchRequest},
    viewer::Viewer,
};
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

/// User-facing status line shown in place of results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMessage {
    NoLocationsFound,
    ErrorOccurred,
}

impl fmt::Display for SearchMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMessage::NoLocationsFound => {
                write!(f, "Sorry, no locations match your search query.")
            }
            SearchMessage::ErrorOccurred => write!(
                f,
                "An error occurred while searching. Please check your internet connection or try again later."
            ),
        }
    }
}

/// Snapshot of the search box state published to subscribers
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub is_searching: bool,
    pub message: Option<SearchMessage>,
    pub results: Vec<LocationResult>,
    generation: u64,
}

impl SearchState {
    /// Identifier of the most recent search started
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// How a call to [`LocationSearch::search`] ended
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Blank text, no request was sent
    Ignored,
    /// A newer search started before this one finished; state untouched
    Superseded,
    /// The provider found nothing
    NoResults,
    /// The provider returned this many results
    Found(usize),
    /// The request failed; the error was reported through the message
    Failed(SearchError),
}

/// Request settings applied to every search
#[derive(Debug, Clone, Default)]
pub struct SearchDefaults {
    pub max_results: Option<u32>,
    pub language: Option<String>,
    pub region: Option<String>,
    pub timeout: Option<u64>,
    pub debug: Option<DebugOptions>,
}

/// Search box model bound to one provider
#[derive(Debug)]
pub struct LocationSearch {
    provider: Arc<dyn SearchProvider>,
    defaults: SearchDefaults,
    state: watch::Sender<SearchState>,
}

impl LocationSearch {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            provider,
            defaults: SearchDefaults::default(),
            state,
        }
    }

    pub fn with_defaults(mut self, defaults: SearchDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Name of the underlying provider as shown to users
    pub fn name(&self) -> String {
        self.provider.display_name()
    }

    /// Receive every state change
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// Current state snapshot
    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Search for `text`, publishing progress and results to subscribers
    pub async fn search(&self, text: &str) -> SearchOutcome {
        let blank = text.trim().is_empty();

        let mut generation = 0;
        self.state.send_modify(|state| {
            state.generation += 1;
            generation = state.generation;
            state.results.clear();
            state.is_searching = !blank;
            state.message = None;
        });

        if blank {
            return SearchOutcome::Ignored;
        }

        log::info!(
            "search provider={} query={:?} generation={generation}",
            self.provider.name(),
            text
        );

        let request = self.request_for(text);
        let response = self.provider.search(&request).await;

        let mut outcome = SearchOutcome::Superseded;
        self.state.send_if_modified(|state| {
            if state.generation != generation {
                return false;
            }

            state.is_searching = false;
            outcome = match response {
                Ok(results) if results.is_empty() => {
                    state.message = Some(SearchMessage::NoLocationsFound);
                    SearchOutcome::NoResults
                }
                Ok(results) => {
                    let count = results.len();
                    state.results = results;
                    SearchOutcome::Found(count)
                }
                Err(e) => {
                    log::warn!(
                        "search provider={} generation={generation} failed: {e}",
                        self.provider.name()
                    );
                    state.message = Some(SearchMessage::ErrorOccurred);
                    SearchOutcome::Failed(e)
                }
            };
            true
        });

        if outcome == SearchOutcome::Superseded {
            log::debug!("search generation={generation} superseded, response dropped");
        }

        outcome
    }

    /// Run the click action of result `index`. Returns `false` when the
    /// index is out of range or the result has no coordinates.
    pub fn select(&self, index: usize, viewer: &dyn Viewer) -> bool {
        let state = self.state.borrow();
        match state.results.get(index) {
            Some(result) => result.zoom_to(viewer),
            None => false,
        }
    }

    fn request_for(&self, text: &str) -> SearchRequest {
        SearchRequest {
            query: text.to_string(),
            max_results: self.defaults.max_results,
            language: self.defaults.language.clone(),
            region: self.defaults.region.clone(),
            timeout: self.defaults.timeout.or(SearchRequest::default().timeout),
            debug: self.defaults.debug.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{GeoPoint, ZoomTarget};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Debug, Default)]
    struct CountingProvider {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl SearchProvider for CountingProvider {
        fn name(&self) -> &str {
            "counting"
        }

        async fn search(&self, request: &SearchRequest) -> crate::Result<Vec<LocationResult>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SearchError::HttpError {
                    message: "Request failed with status: 502 Bad Gateway".to_string(),
                    status_code: Some(502),
                    response_body: None,
                });
            }
            let point = GeoPoint::new(-35.3081, 149.1245).unwrap();
            Ok(vec![LocationResult {
                name: request.query.clone(),
                address: None,
                rating: None,
                open_now: None,
                location: Some(point),
                zoom: Some(ZoomTarget::around(&point, 0.01, Duration::from_secs(1))),
                is_important: true,
                provider: Some("counting".to_string()),
                raw: None,
            }])
        }
    }

    #[tokio::test]
    async fn test_blank_query_sends_nothing() {
        let provider = Arc::new(CountingProvider::default());
        let search = LocationSearch::new(provider.clone());

        assert_eq!(search.search("   ").await, SearchOutcome::Ignored);
        assert_eq!(search.search("").await, SearchOutcome::Ignored);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);

        let state = search.state();
        assert!(!state.is_searching);
        assert!(state.results.is_empty());
        assert_eq!(state.message, None);
    }

    #[tokio::test]
    async fn test_found_results_published() {
        let search = LocationSearch::new(Arc::new(CountingProvider::default()));
        let mut rx = search.subscribe();

        assert_eq!(search.search("Canberra").await, SearchOutcome::Found(1));
        assert!(rx.has_changed().unwrap());

        let state = rx.borrow_and_update().clone();
        assert!(!state.is_searching);
        assert_eq!(state.results[0].name, "Canberra");
        assert_eq!(state.message, None);
    }

    #[tokio::test]
    async fn test_failure_sets_error_message() {
        let search = LocationSearch::new(Arc::new(CountingProvider {
            fail: true,
            ..Default::default()
        }));

        assert!(matches!(
            search.search("Canberra").await,
            SearchOutcome::Failed(SearchError::HttpError { .. })
        ));

        let state = search.state();
        assert_eq!(state.message, Some(SearchMessage::ErrorOccurred));
        assert!(state.results.is_empty());
        assert!(!state.is_searching);
    }

    #[test]
    fn test_message_text() {
        assert_eq!(
            SearchMessage::NoLocationsFound.to_string(),
            "Sorry, no locations match your search query."
        );
        assert!(SearchMessage::ErrorOccurred
            .to_string()
            .starts_with("An error occurred while searching"));
    }
}
