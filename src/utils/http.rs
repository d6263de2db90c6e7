//! HTTP utilities for making requests to places APIs

use crate::error::{SearchError, SearchResult};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!("placesearch/", env!("CARGO_PKG_VERSION"));

/// Default request timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 15000;

/// HTTP client wrapper with search-specific functionality
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    default_timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with custom timeout
    pub fn with_timeout(timeout_ms: u64) -> SearchResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| SearchError::ConfigError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            default_timeout: Duration::from_millis(timeout_ms),
        })
    }

    pub fn timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Make a GET request with headers and deserialize the JSON response
    pub async fn get_json_with_headers<T>(
        &self,
        url: &str,
        headers: HashMap<String, String>,
        timeout: Option<Duration>,
    ) -> SearchResult<T>
    where
        T: DeserializeOwned,
    {
        let timeout = timeout.unwrap_or(self.default_timeout);
        let mut request = self.client.get(url).timeout(timeout);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| with_timeout_ms(e.into(), timeout))?;

        self.handle_response_json(response)
            .await
            .map_err(|e| with_timeout_ms(e, timeout))
    }

    /// Handle HTTP response and deserialize as JSON
    async fn handle_response_json<T>(&self, response: Response) -> SearchResult<T>
    where
        T: DeserializeOwned,
    {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            let json = serde_json::from_str::<T>(&body)?;
            Ok(json)
        } else {
            let status_code = status.as_u16();
            let response_body = response.text().await.ok();

            Err(SearchError::HttpError {
                message: format!("Request failed with status: {status}"),
                status_code: Some(status_code),
                response_body,
            })
        }
    }
}

fn with_timeout_ms(error: SearchError, timeout: Duration) -> SearchError {
    match error {
        SearchError::Timeout { .. } => SearchError::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        },
        other => other,
    }
}

/// Build a URL with query parameters, keeping the given order
pub fn build_url(base_url: &str, params: &[(&str, &str)]) -> SearchResult<String> {
    let mut url = Url::parse(base_url)?;

    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in params {
            pairs.append_pair(key, value);
        }
    }

    Ok(url.to_string())
}

/// Normalize URL by ensuring it has a proper scheme
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("//") {
        format!("https:{url}")
    } else if !url.starts_with("http://") && !url.starts_with("https://") {
        format!("https://{url}")
    } else {
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_encodes_query_text() {
        let url = build_url(
            "https://maps.googleapis.com/maps/api/place/textsearch/json",
            &[("input", "Fish & Chips, St Kilda"), ("key", "abc")],
        )
        .unwrap();

        assert_eq!(
            url,
            "https://maps.googleapis.com/maps/api/place/textsearch/json?input=Fish+%26+Chips%2C+St+Kilda&key=abc"
        );
    }

    #[test]
    fn test_build_url_rejects_relative_base() {
        assert!(matches!(
            build_url("/place/textsearch/json", &[]),
            Err(SearchError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(
            normalize_url("//maps.googleapis.com/api"),
            "https://maps.googleapis.com/api"
        );
        assert_eq!(normalize_url("localhost:8080"), "https://localhost:8080");
        assert_eq!(normalize_url("http://127.0.0.1:9000"), "http://127.0.0.1:9000");
        assert_eq!(normalize_url(" https://a.b/c "), "https://a.b/c");
    }

    #[test]
    fn test_client_timeout() {
        let client = HttpClient::with_timeout(2500).unwrap();
        assert_eq!(client.timeout(), Duration::from_millis(2500));
    }
}
