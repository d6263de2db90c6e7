//! Error types for location search

use thiserror::Error;

/// Result type alias for search operations
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Error types for location search operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    /// HTTP request failed
    #[error("HTTP request failed: {message}")]
    HttpError {
        message: String,
        status_code: Option<u16>,
        response_body: Option<String>,
    },

    /// Invalid input parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Provider-specific error
    #[error("Provider error: {0}")]
    ProviderError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Parsing error
    #[error("Parsing error: {0}")]
    ParseError(String),

    /// Timeout error
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Rate limit or quota exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    /// API key rejected
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// Generic error for unhandled cases
    #[error("Search error: {0}")]
    Other(String),
}

impl SearchError {
    /// HTTP status code attached to the error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SearchError::HttpError { status_code, .. } => *status_code,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(error: reqwest::Error) -> Self {
        // The request URL carries the API key as a query parameter.
        let error = error.without_url();

        if error.is_timeout() {
            // Callers that know the configured timeout replace this value.
            SearchError::Timeout { timeout_ms: 0 }
        } else if error.is_status() {
            let status_code = error.status().map(|s| s.as_u16());
            let message = error.to_string();

            if let Some(401 | 403) = status_code {
                SearchError::AuthenticationError(message)
            } else if let Some(429) = status_code {
                SearchError::RateLimit(message)
            } else {
                SearchError::HttpError {
                    message,
                    status_code,
                    response_body: None,
                }
            }
        } else if error.is_decode() {
            SearchError::ParseError(format!("Response body could not be decoded: {error}"))
        } else {
            SearchError::HttpError {
                message: error.to_string(),
                status_code: None,
                response_body: None,
            }
        }
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(error: serde_json::Error) -> Self {
        SearchError::ParseError(format!("JSON parsing failed: {error}"))
    }
}

impl From<url::ParseError> for SearchError {
    fn from(error: url::ParseError) -> Self {
        SearchError::InvalidInput(format!("Invalid URL: {error}"))
    }
}

impl From<std::io::Error> for SearchError {
    fn from(error: std::io::Error) -> Self {
        SearchError::Other(format!("IO error: {error}"))
    }
}
