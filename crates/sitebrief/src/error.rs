//! Error types for sitebrief

use std::time::Duration;
use thiserror::Error;

/// Prefix shown to the user in front of every fetch failure
pub const FETCH_ERROR_PREFIX: &str = "Error fetching website:";

/// Errors that can occur while fetching the page to analyze
#[derive(Debug, Error)]
pub enum FetchError {
    /// URL is missing
    #[error("Missing required parameter: url")]
    MissingUrl,

    /// URL could not be parsed by the HTTP client
    #[error("Invalid URL '{0}'")]
    InvalidUrl(String),

    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuildError(#[source] reqwest::Error),

    /// Request did not complete within the fetch timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Failed to connect to server
    #[error("Failed to connect to server")]
    ConnectError(#[source] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP {status} for url: {url}")]
    HttpStatus { status: u16, url: String },

    /// Other request error
    #[error("Request failed: {0}")]
    RequestError(String),
}

impl FetchError {
    /// Create an error from a reqwest error
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(timeout)
        } else if err.is_connect() {
            FetchError::ConnectError(err)
        } else {
            FetchError::RequestError(err.to_string())
        }
    }

    /// Message shown to the user when the pipeline halts on this error
    pub fn user_message(&self) -> String {
        let mut message = format!("{} {}", FETCH_ERROR_PREFIX, self);
        // Connect errors carry the useful detail in their source
        if let FetchError::ConnectError(source) = self {
            message.push_str(&format!(" ({})", source));
        }
        message
    }
}

/// Errors returned by the generation backend
///
/// Only the rendered description is inspected when deciding whether to move
/// on to the next fallback model, see [`GenerationError::is_quota`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    /// Backend answered with an error status
    #[error("{status} {message}")]
    Api { status: u16, message: String },

    /// Request never produced a response
    #[error("{0}")]
    Transport(String),

    /// Backend answered but the reply carried no text
    #[error("Response contained no text: {reason}")]
    EmptyResponse { reason: String },

    /// Reply body could not be decoded
    #[error("Invalid response from generation service: {0}")]
    Decode(String),

    /// Failed to build HTTP client
    #[error("Failed to create generation client: {0}")]
    ClientBuild(String),
}

impl GenerationError {
    /// Raw error description as shown to the user
    pub fn description(&self) -> String {
        self.to_string()
    }

    /// True if the failure means the caller ran out of quota or hit a rate limit
    pub fn is_quota(&self) -> bool {
        is_quota_description(&self.description())
    }
}

/// Classify an error description as a quota or rate-limit failure
///
/// Matches a literal `429` or a case-insensitive `quota` anywhere in the text.
pub fn is_quota_description(description: &str) -> bool {
    description.contains("429") || description.to_lowercase().contains("quota")
}
