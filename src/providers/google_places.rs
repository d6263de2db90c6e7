//! Google Places Text Search provider

use crate::{
    error::{SearchError, SearchResult},
    geo::{GeoPoint, ZoomTarget, DEFAULT_FLIGHT_DURATION_SECS, DEFAULT_ZOOM_WIDTH_DEGREES},
    types::{LocationResult, ProviderConfig, SearchProvider, SearchRequest},
    utils::{
        debug,
        http::{build_url, normalize_url, HttpClient, DEFAULT_TIMEOUT_MS},
    },
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::time::Duration;

pub const PROVIDER_NAME: &str = "google";

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place/textsearch/json";
const DEFAULT_FIELDS: &[&str] = &[
    "formatted_address",
    "name",
    "rating",
    "opening_hours",
    "geometry",
];

pub const ENV_API_KEY: &str = "GOOGLE_MAPS_API_KEY";
pub const ENV_BASE_URL: &str = "GOOGLE_PLACES_URL";
pub const ENV_FLIGHT_DURATION: &str = "GOOGLE_PLACES_FLIGHT_DURATION";

/// Places Text Search response types
#[derive(Debug, Deserialize)]
struct PlacesResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<PlaceHit>,
}

#[derive(Debug, Deserialize, Serialize)]
struct PlaceHit {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    formatted_address: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    opening_hours: Option<OpeningHours>,
    #[serde(default)]
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize, Serialize)]
struct OpeningHours {
    #[serde(default)]
    open_now: Option<bool>,
}

#[derive(Debug, Deserialize, Serialize)]
struct Geometry {
    #[serde(default)]
    location: Option<LatLng>,
}

#[derive(Debug, Deserialize, Serialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Google Places configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GooglePlacesConfig {
    /// Google Maps API key
    #[serde(alias = "key", alias = "googleMapsKey")]
    pub api_key: String,
    /// Text Search endpoint
    #[serde(alias = "url")]
    pub base_url: String,
    /// Place fields requested from the API
    pub fields: Vec<String>,
    /// Camera flight duration when a result is selected
    pub flight_duration_seconds: f64,
    /// Width of the square the camera zooms to
    pub zoom_width_degrees: f64,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for GooglePlacesConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            fields: DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect(),
            flight_duration_seconds: DEFAULT_FLIGHT_DURATION_SECS,
            zoom_width_degrees: DEFAULT_ZOOM_WIDTH_DEGREES,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl GooglePlacesConfig {
    /// Parse a JSON configuration object
    pub fn from_json_str(json: &str) -> SearchResult<Self> {
        let mut config: Self = serde_json::from_str(json)
            .map_err(|e| SearchError::ConfigError(format!("Invalid Google Places config: {e}")))?;
        config.base_url = normalize_url(&config.base_url);
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> SearchResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            SearchError::ConfigError(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&contents)
    }

    /// Build a configuration from environment variables
    pub fn from_env() -> SearchResult<Self> {
        let api_key = env::var(ENV_API_KEY).map_err(|_| {
            SearchError::ConfigError(format!("{ENV_API_KEY} environment variable is not set"))
        })?;

        let mut config = Self {
            api_key,
            ..Default::default()
        };
        config.apply_env_overrides()?;

        Ok(config)
    }

    pub fn flight_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.flight_duration_seconds)
            .unwrap_or_else(|_| Duration::from_secs_f64(DEFAULT_FLIGHT_DURATION_SECS))
    }

    /// Apply `GOOGLE_PLACES_URL` and `GOOGLE_PLACES_FLIGHT_DURATION` when set
    pub fn apply_env_overrides(&mut self) -> SearchResult<()> {
        if let Ok(url) = env::var(ENV_BASE_URL) {
            self.base_url = normalize_url(&url);
        }

        if let Ok(duration) = env::var(ENV_FLIGHT_DURATION) {
            self.flight_duration_seconds = duration.trim().parse().map_err(|_| {
                SearchError::ConfigError(format!(
                    "{ENV_FLIGHT_DURATION} must be a number of seconds, got '{duration}'"
                ))
            })?;
        }

        Ok(())
    }
}

impl ProviderConfig for GooglePlacesConfig {
    fn validate(&self) -> Result<(), SearchError> {
        if self.api_key.trim().is_empty() {
            return Err(SearchError::ConfigError(
                "Google Maps API key is required".to_string(),
            ));
        }
        if self.fields.is_empty() {
            return Err(SearchError::ConfigError(
                "At least one place field must be requested".to_string(),
            ));
        }
        if self.flight_duration_seconds <= 0.0
            || Duration::try_from_secs_f64(self.flight_duration_seconds).is_err()
        {
            return Err(SearchError::ConfigError(format!(
                "Flight duration must be a positive number of seconds, got {}",
                self.flight_duration_seconds
            )));
        }
        if !self.zoom_width_degrees.is_finite() || self.zoom_width_degrees <= 0.0 {
            return Err(SearchError::ConfigError(format!(
                "Zoom width must be positive, got {}",
                self.zoom_width_degrees
            )));
        }
        if self.timeout_ms == 0 {
            return Err(SearchError::ConfigError(
                "Request timeout must be at least 1ms".to_string(),
            ));
        }
        Ok(())
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_key(&self) -> Option<&str> {
        Some(&self.api_key)
    }
}

/// Google Places Text Search provider
#[derive(Debug)]
pub struct GooglePlacesProvider {
    config: GooglePlacesConfig,
    http_client: HttpClient,
}

impl GooglePlacesProvider {
    /// Create a new provider with an API key and default settings
    pub fn new(api_key: &str) -> SearchResult<Self> {
        Self::with_config(GooglePlacesConfig {
            api_key: api_key.to_string(),
            ..Default::default()
        })
    }

    /// Create a new provider with custom configuration
    pub fn with_config(config: GooglePlacesConfig) -> SearchResult<Self> {
        config.validate()?;

        Ok(Self {
            http_client: HttpClient::with_timeout(config.timeout_ms)?,
            config,
        })
    }

    /// Create a provider from `GOOGLE_MAPS_API_KEY` and friends
    pub fn from_env() -> SearchResult<Self> {
        Self::with_config(GooglePlacesConfig::from_env()?)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.config.base_url = normalize_url(base_url);
        self
    }

    pub fn settings(&self) -> &GooglePlacesConfig {
        &self.config
    }

    /// Query parameters in request order. The key is always last.
    fn query_params<'a>(
        &'a self,
        request: &'a SearchRequest,
        fields: &'a str,
    ) -> Vec<(&'a str, &'a str)> {
        let mut params = vec![
            ("input", request.query.trim()),
            ("inputtype", "textquery"),
            ("fields", fields),
        ];

        if let Some(language) = &request.language {
            params.push(("language", language.as_str()));
        }
        if let Some(region) = &request.region {
            params.push(("region", region.as_str()));
        }

        params.push(("key", self.config.api_key.as_str()));
        params
    }

    /// Build the search URL with parameters
    fn build_search_url(&self, request: &SearchRequest) -> SearchResult<String> {
        let fields = self.config.fields.join(",");
        build_url(&self.config.base_url, &self.query_params(request, &fields))
    }

    /// Same URL with the key masked, for logs
    fn redacted_search_url(&self, request: &SearchRequest) -> String {
        let fields = self.config.fields.join(",");
        let params: Vec<(&str, &str)> = self
            .query_params(request, &fields)
            .into_iter()
            .map(|(k, v)| if k == "key" { (k, "***") } else { (k, v) })
            .collect();
        build_url(&self.config.base_url, &params).unwrap_or_else(|_| self.config.base_url.clone())
    }

    fn check_status(response: &PlacesResponse) -> SearchResult<()> {
        let detail = || {
            response
                .error_message
                .clone()
                .unwrap_or_else(|| "no details provided".to_string())
        };

        match response.status.as_deref() {
            None | Some("OK") | Some("ZERO_RESULTS") => Ok(()),
            Some("REQUEST_DENIED") => Err(SearchError::AuthenticationError(detail())),
            Some("OVER_QUERY_LIMIT") | Some("OVER_DAILY_LIMIT") => {
                Err(SearchError::RateLimit(detail()))
            }
            Some("INVALID_REQUEST") => Err(SearchError::InvalidInput(detail())),
            Some(status) => Err(SearchError::ProviderError(format!(
                "Places API returned status {status}: {}",
                detail()
            ))),
        }
    }

    fn to_location_result(&self, hit: PlaceHit) -> LocationResult {
        let location = hit
            .geometry
            .as_ref()
            .and_then(|g| g.location.as_ref())
            .and_then(|ll| match GeoPoint::new(ll.lat, ll.lng) {
                Ok(point) => Some(point),
                Err(e) => {
                    log::warn!(
                        "Ignoring coordinates of '{}': {e}",
                        hit.name.as_deref().unwrap_or("")
                    );
                    None
                }
            });

        let zoom = location.map(|point| {
            ZoomTarget::around(
                &point,
                self.config.zoom_width_degrees,
                self.config.flight_duration(),
            )
        });

        let raw = serde_json::to_value(&hit).ok();
        let name = hit
            .name
            .or_else(|| hit.formatted_address.clone())
            .unwrap_or_else(|| "Unnamed location".to_string());

        LocationResult {
            name,
            address: hit.formatted_address,
            rating: hit.rating,
            open_now: hit.opening_hours.and_then(|h| h.open_now),
            location,
            zoom,
            is_important: true,
            provider: Some(PROVIDER_NAME.to_string()),
            raw,
        }
    }
}

#[async_trait::async_trait]
impl SearchProvider for GooglePlacesProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn display_name(&self) -> String {
        "Google Search Locations".to_string()
    }

    async fn search(&self, request: &SearchRequest) -> SearchResult<Vec<LocationResult>> {
        if request.is_blank() {
            return Err(SearchError::InvalidInput(
                "A search query is required".to_string(),
            ));
        }

        debug::log_request(
            &request.debug,
            "Places Text Search request",
            &self.redacted_search_url(request),
        );

        let url = self.build_search_url(request)?;

        let mut headers = HashMap::new();
        headers.insert("Accept".to_string(), "application/json".to_string());

        let response: PlacesResponse = self
            .http_client
            .get_json_with_headers(&url, headers, request.timeout.map(Duration::from_millis))
            .await?;

        Self::check_status(&response)?;

        debug::log_response(
            &request.debug,
            &format!(
                "Places Text Search returned {} results (status {})",
                response.results.len(),
                response.status.as_deref().unwrap_or("none")
            ),
        );

        let mut results: Vec<LocationResult> = response
            .results
            .into_iter()
            .map(|hit| self.to_location_result(hit))
            .collect();

        if let Some(max_results) = request.max_results {
            results.truncate(max_results as usize);
        }

        Ok(results)
    }

    fn config(&self) -> HashMap<String, String> {
        let mut config = HashMap::new();
        config.insert("api_key".to_string(), "***".to_string()); // Hide API key
        config.insert("base_url".to_string(), self.config.base_url.clone());
        config.insert("fields".to_string(), self.config.fields.join(","));
        config.insert(
            "flight_duration_seconds".to_string(),
            self.config.flight_duration_seconds.to_string(),
        );
        config
    }
}
