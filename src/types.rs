//! Core types and traits for location search

use crate::error::SearchError;
use crate::geo::{GeoPoint, ZoomTarget};
use crate::viewer::Viewer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A location returned by a search provider, ready to show in a result list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationResult {
    /// Display name of the place
    pub name: String,
    /// Human-readable address
    pub address: Option<String>,
    /// Average user rating
    pub rating: Option<f64>,
    /// Whether the place is open right now
    pub open_now: Option<bool>,
    /// Coordinates of the place, absent when the provider returned none or invalid ones
    pub location: Option<GeoPoint>,
    /// Camera target used when the result is selected
    pub zoom: Option<ZoomTarget>,
    /// Whether the host should rank this result above non-important ones
    pub is_important: bool,
    /// The search provider that returned this result
    pub provider: Option<String>,
    /// Raw response data from the provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
}

impl LocationResult {
    /// Click action: fly the viewer camera to this result.
    ///
    /// Returns `false` without touching the viewer when the result has no
    /// usable coordinates.
    pub fn zoom_to(&self, viewer: &dyn Viewer) -> bool {
        match &self.zoom {
            Some(target) => {
                viewer.zoom_to(&target.rectangle, target.flight_duration);
                true
            }
            None => false,
        }
    }
}

/// Debug options for location search
#[derive(Debug, Clone, Default)]
pub struct DebugOptions {
    /// Enable verbose logging
    pub enabled: bool,
    /// Log request details (URLs, parameters)
    pub log_requests: bool,
    /// Log response summaries
    pub log_responses: bool,
}

/// Parameters of a single location search
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Free text entered by the user
    pub query: String,
    /// Maximum number of results to keep
    pub max_results: Option<u32>,
    /// Language code for result names and addresses
    pub language: Option<String>,
    /// Region code used to bias results (ccTLD, e.g. "au")
    pub region: Option<String>,
    /// Custom timeout in milliseconds
    pub timeout: Option<u64>,
    /// Debug options
    pub debug: Option<DebugOptions>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// True when the query contains nothing but whitespace
    pub fn is_blank(&self) -> bool {
        self.query.trim().is_empty()
    }
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            max_results: None,
            language: None,
            region: None,
            timeout: Some(15000), // 15 seconds
            debug: None,
        }
    }
}

/// Trait that all location search providers implement
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync + std::fmt::Debug {
    /// Short identifier of the provider
    fn name(&self) -> &str;

    /// Name shown to users above the provider's results
    fn display_name(&self) -> String {
        self.name().to_string()
    }

    /// Search for locations matching the request
    async fn search(&self, request: &SearchRequest) -> Result<Vec<LocationResult>, SearchError>;

    /// Get provider configuration (for debugging/logging)
    fn config(&self) -> HashMap<String, String> {
        HashMap::new()
    }
}

/// Provider configuration trait for consistent configuration patterns
pub trait ProviderConfig {
    /// Validate the configuration
    fn validate(&self) -> Result<(), SearchError>;

    /// Get the base URL for API requests
    fn base_url(&self) -> &str;

    /// Get API key if required
    fn api_key(&self) -> Option<&str> {
        None
    }
}
