//! Analysis pipeline: fetch, extract, generate
//!
//! [`Analyzer`] wires the page fetcher, the text extractor and the report
//! generator together. It is configured once through [`AnalyzerBuilder`];
//! only the API key can be swapped afterwards.

use crate::backend::{GenerationBackend, ModelName};
use crate::catalog::list_generation_models;
use crate::error::{FetchError, GenerationError};
use crate::extract::extract_visible_text;
use crate::fetch::{fetch_page, FetchOptions};
use crate::gemini::{GeminiClient, GeminiConfig};
use crate::report::{GenerationOutcome, ReportGenerator, DEFAULT_FALLBACK_MODELS};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Progress of a running analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisStatus {
    /// Downloading the page
    Fetching { url: String },
    /// Page text extracted, waiting on the generation service
    Analyzing { model: ModelName, content_chars: usize },
    /// A model hit its quota, the next one is tried
    RateLimited { model: ModelName },
    /// Pipeline finished, whatever the outcome
    Complete,
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisStatus::Fetching { url } => write!(f, "Fetching website content from {}...", url),
            AnalysisStatus::Analyzing { model, .. } => write!(
                f,
                "Analyzing with {} (trying multiple models if needed)...",
                model
            ),
            AnalysisStatus::RateLimited { model } => {
                write!(f, "Rate limit on {}, trying alternative...", model)
            }
            AnalysisStatus::Complete => write!(f, "Analysis finished"),
        }
    }
}

/// Result of one pipeline run
#[derive(Debug)]
pub enum AnalysisOutcome {
    /// The page could not be fetched; no model was called
    FetchFailed(FetchError),
    /// The generator ran and produced a report, an error or the rate-limit notice
    Generated(GenerationOutcome),
}

impl AnalysisOutcome {
    /// Text shown to the user
    pub fn render(&self) -> String {
        match self {
            AnalysisOutcome::FetchFailed(e) => e.user_message(),
            AnalysisOutcome::Generated(outcome) => outcome.render(),
        }
    }

    /// Text to keep in the session, `None` for fetch failures
    pub fn session_report(&self) -> Option<String> {
        match self {
            AnalysisOutcome::FetchFailed(_) => None,
            AnalysisOutcome::Generated(outcome) => Some(outcome.render()),
        }
    }

    /// True if a model produced a report
    pub fn is_report(&self) -> bool {
        matches!(self, AnalysisOutcome::Generated(o) if o.is_report())
    }
}

impl fmt::Display for AnalysisOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Builder for configuring the [`Analyzer`]
#[derive(Clone, Default)]
pub struct AnalyzerBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    generation_timeout: Option<Duration>,
    user_agent: Option<String>,
    fetch_timeout: Option<Duration>,
    fallback_models: Option<Vec<ModelName>>,
    backend: Option<Arc<dyn GenerationBackend>>,
}

impl AnalyzerBuilder {
    /// Create a builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// API key for the generation service
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Generation service root (tests point this at a mock server)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Bound each generation call
    pub fn generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = Some(timeout);
        self
    }

    /// Set custom User-Agent for page fetches
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Override the page fetch timeout
    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    /// Models tried after the selected one on quota errors
    pub fn fallback_models(mut self, models: Vec<ModelName>) -> Self {
        self.fallback_models = Some(models);
        self
    }

    /// Use a custom generation backend instead of the Gemini client
    pub fn backend(mut self, backend: Arc<dyn GenerationBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Build the analyzer
    pub fn build(self) -> Result<Analyzer, GenerationError> {
        let mut gemini = GeminiConfig::new(self.api_key.unwrap_or_default());
        if let Some(base_url) = self.base_url {
            gemini = gemini.with_base_url(base_url);
        }
        if let Some(timeout) = self.generation_timeout {
            gemini = gemini.with_timeout(timeout);
        }

        let backend: Arc<dyn GenerationBackend> = match self.backend {
            Some(backend) => backend,
            None => Arc::new(GeminiClient::new(gemini.clone())?),
        };

        let mut fetch_options = FetchOptions::default();
        if let Some(ua) = self.user_agent {
            fetch_options.user_agent = ua;
        }
        if let Some(timeout) = self.fetch_timeout {
            fetch_options.timeout = timeout;
        }

        let fallbacks = self
            .fallback_models
            .unwrap_or_else(|| DEFAULT_FALLBACK_MODELS.iter().map(|m| m.to_string()).collect());

        Ok(Analyzer {
            fetch_options,
            gemini,
            generator: ReportGenerator::new(backend).with_fallbacks(fallbacks),
        })
    }
}

/// Configured website analyzer
#[derive(Clone)]
pub struct Analyzer {
    fetch_options: FetchOptions,
    gemini: GeminiConfig,
    generator: ReportGenerator,
}

impl Analyzer {
    /// Create a new analyzer builder
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Options used for page fetches
    pub fn fetch_options(&self) -> &FetchOptions {
        &self.fetch_options
    }

    /// Report generator used by the pipeline
    pub fn generator(&self) -> &ReportGenerator {
        &self.generator
    }

    /// Switch to another API key for all later calls
    ///
    /// Replaces the generation backend with a Gemini client using the new key
    /// and the endpoint settings this analyzer was built with.
    pub fn set_api_key(&mut self, key: impl Into<String>) -> Result<(), GenerationError> {
        let mut config = self.gemini.clone();
        config.api_key = key.into();
        let client = GeminiClient::new(config.clone())?;

        let fallbacks = self.generator.fallbacks().to_vec();
        self.generator = ReportGenerator::new(Arc::new(client)).with_fallbacks(fallbacks);
        self.gemini = config;
        debug!("API key override applied");
        Ok(())
    }

    /// Generation-capable models, falling back to a fixed pair on error
    pub async fn models(&self) -> Vec<ModelName> {
        list_generation_models(self.generator.backend().as_ref()).await
    }

    /// Analyze `url` with `model` selected
    pub async fn analyze(&self, url: &str, model: &str) -> AnalysisOutcome {
        self.analyze_with_status(url, model, |_| {}).await
    }

    /// Analyze `url`, reporting progress through `status_callback`
    pub async fn analyze_with_status<F>(
        &self,
        url: &str,
        model: &str,
        mut status_callback: F,
    ) -> AnalysisOutcome
    where
        F: FnMut(AnalysisStatus),
    {
        status_callback(AnalysisStatus::Fetching {
            url: url.to_string(),
        });

        let html = match fetch_page(url, &self.fetch_options).await {
            Ok(html) => html,
            Err(e) => {
                debug!(url, error = %e, "Fetch failed, skipping generation");
                status_callback(AnalysisStatus::Complete);
                return AnalysisOutcome::FetchFailed(e);
            }
        };

        let content = extract_visible_text(&html);
        status_callback(AnalysisStatus::Analyzing {
            model: model.to_string(),
            content_chars: content.chars().count(),
        });

        let outcome = self
            .generator
            .generate_with_status(url, &content, model, |skipped, _| {
                status_callback(AnalysisStatus::RateLimited {
                    model: skipped.to_string(),
                })
            })
            .await;

        status_callback(AnalysisStatus::Complete);
        AnalysisOutcome::Generated(outcome)
    }
}
