//! Page fetching
//!
//! One GET per analysis with a browser-like User-Agent and a fixed overall
//! timeout. No retries at this layer; any failure is returned as a
//! [`FetchError`] and halts the pipeline before generation.

use crate::error::FetchError;
use crate::DEFAULT_USER_AGENT;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Overall fetch timeout (connect + headers + body)
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Raw page body on success, the cause on failure
pub type FetchResult = Result<String, FetchError>;

/// Options for fetching the page to analyze
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// User-Agent sent with the request
    pub user_agent: String,
    /// Overall request timeout
    pub timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

/// Fetch a URL and return the raw response body
///
/// Network errors, timeouts and non-2xx statuses all surface as errors.
pub async fn fetch_page(url: &str, options: &FetchOptions) -> FetchResult {
    let url = url.trim();
    if url.is_empty() {
        return Err(FetchError::MissingUrl);
    }

    let parsed = Url::parse(url).map_err(|_| FetchError::InvalidUrl(url.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(FetchError::InvalidUrl(url.to_string()));
    }

    // Build headers
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&options.user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
    );
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,text/plain;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

    // Build client
    let client = reqwest::Client::builder()
        .default_headers(headers)
        .timeout(options.timeout)
        .build()
        .map_err(FetchError::ClientBuildError)?;

    debug!(url = %parsed, timeout = ?options.timeout, "Fetching page");

    let response = client
        .get(parsed)
        .send()
        .await
        .map_err(|e| FetchError::from_reqwest(e, options.timeout))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus {
            status: status.as_u16(),
            url: response.url().to_string(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| FetchError::from_reqwest(e, options.timeout))?;

    debug!(bytes = body.len(), "Page fetched");
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_options_default() {
        let options = FetchOptions::default();
        assert_eq!(options.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(options.timeout, Duration::from_secs(10));
        assert!(options.user_agent.starts_with("Mozilla/5.0"));
    }

    #[tokio::test]
    async fn test_fetch_empty_url() {
        let result = fetch_page("  ", &FetchOptions::default()).await;
        assert!(matches!(result, Err(FetchError::MissingUrl)));
    }

    #[tokio::test]
    async fn test_fetch_malformed_url() {
        let result = fetch_page("not a url", &FetchOptions::default()).await;
        let err = result.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
        assert!(err.user_message().starts_with("Error fetching website:"));
    }

    #[tokio::test]
    async fn test_fetch_unsupported_scheme() {
        let result = fetch_page("ftp://example.com/file", &FetchOptions::default()).await;
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }
}
