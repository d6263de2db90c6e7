//! # placesearch
//!
//! Location search for map viewers. A provider turns free text into a list of
//! [`LocationResult`]s; selecting a result flies the host [`Viewer`] camera to
//! a small square around it. [`LocationSearch`] wraps a provider with the
//! observable state a search box needs and drops stale responses.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use placesearch::{providers::GooglePlacesProvider, LocationSearch, LogViewer, SearchOutcome};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let google = GooglePlacesProvider::new("YOUR_GOOGLE_MAPS_KEY")?;
//!     let search = LocationSearch::new(Arc::new(google));
//!
//!     if let SearchOutcome::Found(n) = search.search("Sydney Opera House").await {
//!         println!("{n} locations");
//!         search.select(0, &LogViewer);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod geo;
pub mod providers;
pub mod session;
pub mod types;
pub mod utils;
pub mod viewer;

// Re-export common types
pub use error::{SearchError, SearchResult as Result};
pub use geo::{GeoPoint, Rectangle, ZoomTarget};
pub use session::{LocationSearch, SearchDefaults, SearchMessage, SearchOutcome, SearchState};
pub use types::{DebugOptions, LocationResult, SearchProvider, SearchRequest};
pub use viewer::{LogViewer, Viewer};

/// Run a single search against a provider and return its results
///
/// Unlike [`LocationSearch::search`], failures are returned to the caller,
/// annotated with troubleshooting hints.
///
/// # Examples
///
/// ```rust,no_run
/// use placesearch::{search_locations, providers::GooglePlacesProvider, SearchRequest};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = GooglePlacesProvider::new("api_key")?;
/// let results = search_locations(&provider, &SearchRequest::new("Uluru")).await?;
/// # Ok(())
/// # }
/// ```
pub async fn search_locations(
    provider: &dyn SearchProvider,
    request: &SearchRequest,
) -> Result<Vec<LocationResult>> {
    use utils::debug;

    if request.is_blank() {
        return Err(SearchError::InvalidInput(
            "A search query is required".to_string(),
        ));
    }

    debug::log(
        &request.debug,
        "Performing search",
        &format!("provider: {}, query: {}", provider.name(), request.query),
    );

    match provider.search(request).await {
        Ok(results) => {
            debug::log_response(
                &request.debug,
                &format!("Received {} results", results.len()),
            );
            Ok(results)
        }
        Err(error) => {
            let troubleshooting = get_troubleshooting_info(provider.name(), &error);
            let detailed_error = format!(
                "Search with provider '{}' failed: {}\n\nTroubleshooting: {}",
                provider.name(),
                error,
                troubleshooting
            );

            debug::log(&request.debug, "Search error", &detailed_error);
            Err(SearchError::ProviderError(detailed_error))
        }
    }
}

/// Get provider-specific troubleshooting information based on error
fn get_troubleshooting_info(provider_name: &str, error: &SearchError) -> String {
    let suggestion = match error {
        SearchError::AuthenticationError(_) => Some(
            "The API key was rejected. Check that it is valid, that billing is enabled and that the Places API is enabled for it.",
        ),
        SearchError::RateLimit(_) => {
            Some("You've exceeded the request quota for this API. Try again later or reduce your request frequency.")
        }
        SearchError::Timeout { .. } => {
            Some("The request timed out. Check your network connection or raise the timeout.")
        }
        SearchError::ParseError(_) => {
            Some("The response was not in the expected format. Check that the base URL points at a Places Text Search endpoint.")
        }
        SearchError::HttpError { .. } => match error.status_code() {
            Some(401 | 403) => Some("This is likely an authentication issue. Check your API key and make sure it's valid and has the correct permissions."),
            Some(400) => Some("This is likely due to invalid request parameters. Check your query and other search options."),
            Some(429) => Some("You've exceeded the rate limit for this API. Try again later or reduce your request frequency."),
            Some(500..=599) => Some("The search provider is experiencing server issues. Try again later."),
            _ => None,
        },
        _ => None,
    };

    if let Some(suggestion) = suggestion {
        return suggestion.to_string();
    }

    match provider_name {
        providers::google_places::PROVIDER_NAME => format!(
            "Make sure {} holds a valid Google Maps API key with the Places API enabled.",
            providers::google_places::ENV_API_KEY
        ),
        _ => format!(
            "Check your {provider_name} API credentials and make sure your search request is valid."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    // Mock provider for testing
    #[derive(Debug)]
    struct MockProvider {
        name: String,
        error: Option<SearchError>,
        results: Vec<LocationResult>,
    }

    impl MockProvider {
        fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                error: None,
                results: vec![
                    LocationResult {
                        name: "Flinders Street Station".to_string(),
                        address: Some("Flinders St, Melbourne VIC 3000".to_string()),
                        rating: Some(4.4),
                        open_now: Some(true),
                        location: Some(GeoPoint::new(-37.8183, 144.9671).unwrap()),
                        zoom: None,
                        is_important: true,
                        provider: Some(name.to_string()),
                        raw: None,
                    },
                    LocationResult {
                        name: "Federation Square".to_string(),
                        address: None,
                        rating: None,
                        open_now: None,
                        location: None,
                        zoom: None,
                        is_important: true,
                        provider: Some(name.to_string()),
                        raw: None,
                    },
                ],
            }
        }

        fn with_error(mut self, error: SearchError) -> Self {
            self.error = Some(error);
            self
        }
    }

    #[async_trait]
    impl SearchProvider for MockProvider {
        fn name(&self) -> &str {
            &self.name
        }

        async fn search(&self, _request: &SearchRequest) -> Result<Vec<LocationResult>> {
            match &self.error {
                Some(error) => Err(error.clone()),
                None => Ok(self.results.clone()),
            }
        }
    }

    #[tokio::test]
    async fn test_search_locations_success() {
        let provider = MockProvider::new("test");
        let results = search_locations(&provider, &SearchRequest::new("melbourne"))
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "Flinders Street Station");
        assert_eq!(results[0].provider, Some("test".to_string()));
    }

    #[tokio::test]
    async fn test_search_locations_blank_query() {
        let provider = MockProvider::new("test");

        match search_locations(&provider, &SearchRequest::new("  ")).await {
            Err(SearchError::InvalidInput(msg)) => assert!(msg.contains("search query")),
            other => panic!("Expected InvalidInput error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_search_locations_provider_error() {
        let provider = MockProvider::new("test").with_error(SearchError::HttpError {
            message: "Unauthorized".to_string(),
            status_code: Some(401),
            response_body: None,
        });

        match search_locations(&provider, &SearchRequest::new("melbourne")).await {
            Err(SearchError::ProviderError(msg)) => {
                assert!(msg.contains("failed"));
                assert!(msg.contains("authentication issue"));
            }
            other => panic!("Expected ProviderError, got {other:?}"),
        }
    }

    #[test]
    fn test_troubleshooting_info_errors() {
        let test_cases = vec![
            (
                SearchError::AuthenticationError("The provided API key is invalid.".to_string()),
                "api key was rejected",
            ),
            (
                SearchError::RateLimit("quota".to_string()),
                "quota",
            ),
            (SearchError::Timeout { timeout_ms: 100 }, "timed out"),
            (
                SearchError::HttpError {
                    status_code: Some(400),
                    message: "Bad Request".to_string(),
                    response_body: None,
                },
                "invalid request parameters",
            ),
            (
                SearchError::HttpError {
                    status_code: Some(503),
                    message: "Service Unavailable".to_string(),
                    response_body: None,
                },
                "server issues",
            ),
        ];

        for (error, expected_text) in test_cases {
            let info = get_troubleshooting_info("test", &error);
            assert!(
                info.to_lowercase().contains(expected_text),
                "Expected '{info}' to contain '{expected_text}'"
            );
        }
    }

    #[test]
    fn test_troubleshooting_info_providers() {
        let generic_error = SearchError::Other("test error".to_string());

        let info = get_troubleshooting_info("google", &generic_error);
        assert!(info.contains("GOOGLE_MAPS_API_KEY"));

        let info = get_troubleshooting_info("nominatim", &generic_error);
        assert!(info.contains("nominatim API credentials"));
    }
}
