//! Report generation with sequential model fallback
//!
//! Design: the prompt is tried against an ordered [`FallbackPlan`], one
//! attempt per model. A quota failure moves on to the next model, any other
//! failure stops the loop, and the first success wins. Models are never tried
//! concurrently so no quota is spent on models that were not needed.

use crate::backend::{GenerationBackend, ModelName};
use crate::error::GenerationError;
use crate::extract::{truncate_chars, MAX_CONTENT_CHARS};
use crate::prompt::build_prompt;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Models tried after the selected one, in order
pub const DEFAULT_FALLBACK_MODELS: [&str; 2] =
    ["models/gemini-2.0-flash-lite", "models/gemini-2.5-flash-lite"];

/// First line of every successful report, followed by the model name
pub const PROVENANCE_PREFIX: &str = "Analysis completed using:";

/// Returned when every model in the plan was rate limited
pub const RATE_LIMIT_NOTICE: &str = "⚠️ ALL MODELS RATE LIMITED

Your API key has exhausted its quota across all available models.

SOLUTIONS:
1. Wait 1-2 hours for quota to reset
2. Create a new API key at: https://aistudio.google.com/apikey
3. Check your usage: https://ai.dev/usage

Free tier limits:
- 15 requests per minute
- 1500 requests per day
- Limited tokens per day";

/// Markup sequences deleted from model output, longest first
const MARKUP_SEQUENCES: [&str; 5] = ["**", "*", "###", "##", "#"];

/// Ordered, non-empty list of models to try for one report
///
/// The selected model always comes first. A fallback equal to the selected
/// model is kept and simply tried twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackPlan {
    models: Vec<ModelName>,
}

impl FallbackPlan {
    /// Plan starting with `primary` followed by `fallbacks`
    pub fn new(primary: impl Into<ModelName>, fallbacks: &[ModelName]) -> Self {
        let mut models = Vec::with_capacity(fallbacks.len() + 1);
        models.push(primary.into());
        models.extend(fallbacks.iter().cloned());
        Self { models }
    }

    /// Models in the order they are tried
    pub fn models(&self) -> &[ModelName] {
        &self.models
    }

    /// The model the user selected
    pub fn primary(&self) -> &str {
        &self.models[0]
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Always false, a plan holds at least the selected model
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

/// Result of one report generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// A model produced a report; `text` is already sanitized
    Report { model: ModelName, text: String },
    /// A model failed for a reason other than quota
    Failed {
        model: ModelName,
        error: GenerationError,
    },
    /// Every model in the plan was rate limited
    Exhausted { attempted: Vec<ModelName> },
}

impl GenerationOutcome {
    /// True for a successful report
    pub fn is_report(&self) -> bool {
        matches!(self, GenerationOutcome::Report { .. })
    }

    /// The text shown to the user for this outcome
    pub fn render(&self) -> String {
        match self {
            GenerationOutcome::Report { model, text } => {
                format!("{} {}\n\n{}", PROVENANCE_PREFIX, model, text)
            }
            GenerationOutcome::Failed { model, error } => {
                format!("Error with {}: {}", model, error.description())
            }
            GenerationOutcome::Exhausted { .. } => RATE_LIMIT_NOTICE.to_string(),
        }
    }
}

impl fmt::Display for GenerationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Delete bold, italic and heading markers anywhere in the text
///
/// This is a plain sequence strip, not a markdown parser: every `*` and `#`
/// goes, including ones that were meant literally.
pub fn sanitize_report(raw: &str) -> String {
    MARKUP_SEQUENCES
        .iter()
        .fold(raw.to_string(), |text, seq| text.replace(seq, ""))
}

/// Turns page text into a report through a generation backend
#[derive(Clone)]
pub struct ReportGenerator {
    backend: Arc<dyn GenerationBackend>,
    fallbacks: Vec<ModelName>,
}

impl ReportGenerator {
    /// Create a generator with the default fallback models
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            backend,
            fallbacks: DEFAULT_FALLBACK_MODELS.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// Replace the fallback models tried after the selected one
    pub fn with_fallbacks(mut self, fallbacks: Vec<ModelName>) -> Self {
        self.fallbacks = fallbacks;
        self
    }

    /// Fallback models tried after the selected one
    pub fn fallbacks(&self) -> &[ModelName] {
        &self.fallbacks
    }

    /// Backend used for generation
    pub fn backend(&self) -> &Arc<dyn GenerationBackend> {
        &self.backend
    }

    /// Plan for a report requested with `primary` selected
    pub fn plan(&self, primary: &str) -> FallbackPlan {
        FallbackPlan::new(primary, &self.fallbacks)
    }

    /// Generate a report for `url` from its extracted `content`
    pub async fn generate(&self, url: &str, content: &str, primary: &str) -> GenerationOutcome {
        self.generate_with_status(url, content, primary, |_, _| {})
            .await
    }

    /// Generate a report, calling `on_rate_limited` for every model skipped
    /// because of quota
    pub async fn generate_with_status<F>(
        &self,
        url: &str,
        content: &str,
        primary: &str,
        mut on_rate_limited: F,
    ) -> GenerationOutcome
    where
        F: FnMut(&str, &GenerationError),
    {
        let content = truncate_chars(content, MAX_CONTENT_CHARS);
        let prompt = build_prompt(url, content);
        let plan = self.plan(primary);
        let mut attempted = Vec::with_capacity(plan.len());

        for model in plan.models() {
            attempted.push(model.clone());
            debug!(backend = self.backend.name(), model = %model, "Trying model");

            match self.backend.generate(model, &prompt).await {
                Ok(raw) => {
                    info!(model = %model, url, "Report generated");
                    return GenerationOutcome::Report {
                        model: model.clone(),
                        text: sanitize_report(&raw),
                    };
                }
                Err(e) if e.is_quota() => {
                    warn!(model = %model, error = %e, "Rate limit on model, trying alternative");
                    on_rate_limited(model, &e);
                }
                Err(e) => {
                    warn!(model = %model, error = %e, "Generation failed");
                    return GenerationOutcome::Failed {
                        model: model.clone(),
                        error: e,
                    };
                }
            }
        }

        warn!(attempted = attempted.len(), "All models rate limited");
        GenerationOutcome::Exhausted { attempted }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ModelInfo;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Backend that replays canned results and records every model called
    struct ScriptedBackend {
        replies: Mutex<VecDeque<Result<String, GenerationError>>>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedBackend {
        fn new(replies: Vec<Result<String, GenerationError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn models_called(&self) -> Vec<String> {
            self.calls.lock().unwrap().iter().map(|(m, _)| m.clone()).collect()
        }

        fn last_prompt(&self) -> String {
            self.calls.lock().unwrap().last().unwrap().1.clone()
        }
    }

    #[async_trait]
    impl GenerationBackend for ScriptedBackend {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn list_models(&self) -> Result<Vec<ModelInfo>, GenerationError> {
            Ok(Vec::new())
        }

        async fn generate(&self, model: &str, prompt: &str) -> Result<String, GenerationError> {
            self.calls
                .lock()
                .unwrap()
                .push((model.to_string(), prompt.to_string()));
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GenerationError::Transport("script exhausted".to_string())))
        }
    }

    fn quota() -> Result<String, GenerationError> {
        Err(GenerationError::Api {
            status: 429,
            message: "Resource has been exhausted (e.g. check quota).".to_string(),
        })
    }

    fn generator(backend: &Arc<ScriptedBackend>) -> ReportGenerator {
        ReportGenerator::new(backend.clone())
    }

    #[test]
    fn test_plan_order_and_duplicates() {
        let backend = ScriptedBackend::new(vec![]);
        let plan = generator(&backend).plan("models/gemini-2.0-flash-lite");
        assert_eq!(
            plan.models(),
            &[
                "models/gemini-2.0-flash-lite".to_string(),
                "models/gemini-2.0-flash-lite".to_string(),
                "models/gemini-2.5-flash-lite".to_string(),
            ]
        );
        assert_eq!(plan.primary(), "models/gemini-2.0-flash-lite");
        assert_eq!(plan.len(), 3);
        assert!(!plan.is_empty());
    }

    #[test]
    fn test_sanitize_strips_markup() {
        let raw = "## WEBSITE NAME:\n**Acme** is *great* ### really #1 ***";
        let clean = sanitize_report(raw);
        assert_eq!(clean, " WEBSITE NAME:\nAcme is great  really 1 ");
        assert!(!clean.contains('*'));
        assert!(!clean.contains('#'));
    }

    #[test]
    fn test_sanitize_leaves_plain_text() {
        let raw = "WEBSITE NAME:\nAcme - widgets & more";
        assert_eq!(sanitize_report(raw), raw);
    }

    #[tokio::test]
    async fn test_first_model_success() {
        let backend = ScriptedBackend::new(vec![Ok("**WEBSITE NAME:** Acme".to_string())]);
        let outcome = generator(&backend)
            .generate("https://acme.test", "Acme", "models/gemini-2.5-pro")
            .await;

        assert_eq!(backend.models_called(), vec!["models/gemini-2.5-pro"]);
        assert_eq!(
            outcome.render(),
            "Analysis completed using: models/gemini-2.5-pro\n\nWEBSITE NAME: Acme"
        );
        assert!(backend.last_prompt().contains("from https://acme.test"));
    }

    #[tokio::test]
    async fn test_quota_then_fallback_success() {
        let backend = ScriptedBackend::new(vec![quota(), Ok("# Report\n**Bold**".to_string())]);
        let mut skipped = Vec::new();
        let outcome = generator(&backend)
            .generate_with_status("https://acme.test", "Acme", "models/gemini-2.5-pro", |m, _| {
                skipped.push(m.to_string())
            })
            .await;

        assert_eq!(skipped, vec!["models/gemini-2.5-pro"]);
        assert_eq!(
            backend.models_called(),
            vec!["models/gemini-2.5-pro", "models/gemini-2.0-flash-lite"]
        );
        let text = outcome.render();
        assert!(text.starts_with("Analysis completed using: models/gemini-2.0-flash-lite\n\n"));
        assert!(!text.contains('*'));
        assert!(!text.contains('#'));
    }

    #[tokio::test]
    async fn test_all_quota_exhausts_plan() {
        let backend = ScriptedBackend::new(vec![
            quota(),
            Err(GenerationError::Transport("daily QUOTA exceeded".to_string())),
            quota(),
        ]);
        let outcome = generator(&backend)
            .generate("https://acme.test", "Acme", "models/gemini-2.5-pro")
            .await;

        assert_eq!(backend.models_called().len(), 3);
        assert_eq!(
            outcome,
            GenerationOutcome::Exhausted {
                attempted: vec![
                    "models/gemini-2.5-pro".to_string(),
                    "models/gemini-2.0-flash-lite".to_string(),
                    "models/gemini-2.5-flash-lite".to_string(),
                ]
            }
        );
        assert_eq!(outcome.render(), RATE_LIMIT_NOTICE);
        assert!(outcome.render().contains("1500 requests per day"));
    }

    #[tokio::test]
    async fn test_non_quota_error_stops_loop() {
        let backend = ScriptedBackend::new(vec![
            Err(GenerationError::Api {
                status: 400,
                message: "Request contains an invalid argument.".to_string(),
            }),
            Ok("never used".to_string()),
        ]);
        let outcome = generator(&backend)
            .generate("https://acme.test", "Acme", "models/gemini-2.5-pro")
            .await;

        assert_eq!(backend.models_called(), vec!["models/gemini-2.5-pro"]);
        assert_eq!(
            outcome.render(),
            "Error with models/gemini-2.5-pro: 400 Request contains an invalid argument."
        );
        assert!(!outcome.is_report());
    }

    #[tokio::test]
    async fn test_non_quota_error_after_quota() {
        let backend = ScriptedBackend::new(vec![
            quota(),
            Err(GenerationError::Transport("connection reset".to_string())),
        ]);
        let outcome = generator(&backend)
            .generate("https://acme.test", "Acme", "models/gemini-2.5-pro")
            .await;

        assert_eq!(backend.models_called().len(), 2);
        assert_eq!(
            outcome.render(),
            "Error with models/gemini-2.0-flash-lite: connection reset"
        );
    }

    #[tokio::test]
    async fn test_tried_models_are_plan_prefix() {
        let scripts: Vec<Vec<Result<String, GenerationError>>> = vec![
            vec![Ok("a".to_string())],
            vec![quota(), Ok("b".to_string())],
            vec![quota(), quota(), Ok("c".to_string())],
            vec![quota(), quota(), quota()],
            vec![Err(GenerationError::Decode("bad json".to_string()))],
            vec![quota(), Err(GenerationError::Decode("bad json".to_string()))],
        ];

        for script in scripts {
            let backend = ScriptedBackend::new(script);
            let gen = generator(&backend);
            let plan = gen.plan("models/primary");
            gen.generate("https://acme.test", "Acme", "models/primary").await;

            let called = backend.models_called();
            assert!(!called.is_empty());
            assert!(called.len() <= plan.len());
            assert_eq!(called.as_slice(), &plan.models()[..called.len()]);
        }
    }

    #[tokio::test]
    async fn test_content_capped_before_prompt() {
        let backend = ScriptedBackend::new(vec![Ok("ok".to_string())]);
        let content = "x".repeat(50_000);
        generator(&backend)
            .generate("https://acme.test", &content, "models/primary")
            .await;

        let prompt = backend.last_prompt();
        let run = format!("\n{}\n", "x".repeat(MAX_CONTENT_CHARS));
        assert!(prompt.contains(&run));
        assert!(!prompt.contains(&"x".repeat(MAX_CONTENT_CHARS + 1)));
    }

    #[tokio::test]
    async fn test_custom_fallbacks() {
        let backend = ScriptedBackend::new(vec![quota(), quota()]);
        let gen = generator(&backend).with_fallbacks(vec!["models/only-fallback".to_string()]);
        let outcome = gen.generate("https://acme.test", "Acme", "models/primary").await;

        assert_eq!(
            backend.models_called(),
            vec!["models/primary", "models/only-fallback"]
        );
        assert!(matches!(outcome, GenerationOutcome::Exhausted { .. }));
    }
}
