//! Gemini REST client
//!
//! Implements [`GenerationBackend`] over the public `generativelanguage` API.
//! Credentials and endpoint come from an explicit [`GeminiConfig`]; nothing is
//! read from process-wide state.

use crate::backend::{GenerationBackend, ModelInfo};
use crate::error::GenerationError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Page size requested when listing models
const LIST_PAGE_SIZE: &str = "1000";

/// Client configuration
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key sent with every request
    pub api_key: String,
    /// API root, without trailing slash
    pub base_url: String,
    /// Per-request timeout; `None` leaves requests unbounded
    pub timeout: Option<Duration>,
}

impl GeminiConfig {
    /// Config for the public endpoint with the given key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    /// Point the client at another API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Bound every request by a timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Gemini API client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl GeminiClient {
    /// Create a client from an explicit configuration
    pub fn new(config: GeminiConfig) -> Result<Self, GenerationError> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| GenerationError::ClientBuild("API key is not a valid header value".to_string()))?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| GenerationError::ClientBuild(e.to_string()))?;

        Ok(Self { config, http })
    }

    /// Current configuration
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> Result<Url, GenerationError> {
        let base = self.config.base_url.trim_end_matches('/');
        Url::parse(&format!("{}/{}", base, path))
            .map_err(|e| GenerationError::ClientBuild(format!("invalid endpoint: {}", e)))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, GenerationError> {
        let response = request
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(api_error(status, &body))
        }
    }
}

#[async_trait]
impl GenerationBackend for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, GenerationError> {
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self.endpoint("models")?;
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("pageSize", LIST_PAGE_SIZE);
                if let Some(ref token) = page_token {
                    query.append_pair("pageToken", token);
                }
            }

            debug!(%url, "Listing models");
            let body = self.send(self.http.get(url)).await?;
            let page: ListModelsResponse =
                serde_json::from_str(&body).map_err(|e| GenerationError::Decode(e.to_string()))?;
            models.extend(page.models);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(models)
    }

    async fn generate(&self, model: &str, prompt: &str) -> Result<String, GenerationError> {
        let url = self.endpoint(&format!("{}:generateContent", model_path(model)))?;
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        debug!(model, prompt_chars = prompt.chars().count(), "Requesting generation");
        let body = self.send(self.http.post(url).json(&request)).await?;
        let response: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| GenerationError::Decode(e.to_string()))?;

        response_text(response)
    }
}

/// Model names are addressed as `models/<id>`
fn model_path(model: &str) -> String {
    if model.starts_with("models/") || model.starts_with("tunedModels/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}

fn api_error(status: reqwest::StatusCode, body: &str) -> GenerationError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());

    GenerationError::Api {
        status: status.as_u16(),
        message,
    }
}

fn response_text(response: GenerateContentResponse) -> Result<String, GenerationError> {
    let block_reason = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason);

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(GenerationError::EmptyResponse {
            reason: block_reason.unwrap_or_else(|| "no candidates returned".to_string()),
        });
    };

    let text: String = candidate
        .content
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(GenerationError::EmptyResponse {
            reason: candidate
                .finish_reason
                .unwrap_or_else(|| "candidate has no text parts".to_string()),
        });
    }

    Ok(text)
}
