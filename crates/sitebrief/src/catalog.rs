//! Model catalog
//!
//! Lists the models that can be picked for a report. The listing never fails
//! from the caller's point of view: backend errors are logged and replaced by
//! [`FALLBACK_CATALOG`].

use crate::backend::{GenerationBackend, ModelName};
use tracing::{debug, warn};

/// Returned when the backend cannot be queried
pub const FALLBACK_CATALOG: [&str; 2] = ["models/gemini-2.5-flash", "models/gemini-2.0-flash-lite"];

/// Used when the backend answers with no generation-capable model at all
pub const DEFAULT_MODEL: &str = "models/gemini-2.5-flash-lite";

/// List generation-capable model names in backend order
///
/// Index 0 is the default selection.
pub async fn list_generation_models(backend: &dyn GenerationBackend) -> Vec<ModelName> {
    match backend.list_models().await {
        Ok(models) => {
            let names: Vec<ModelName> = models
                .into_iter()
                .filter(|m| m.supports_generation())
                .map(|m| m.name)
                .collect();
            debug!(backend = backend.name(), count = names.len(), "Loaded model catalog");
            names
        }
        Err(e) => {
            warn!(backend = backend.name(), error = %e, "Model listing failed, using fallback catalog");
            FALLBACK_CATALOG.iter().map(|m| m.to_string()).collect()
        }
    }
}

/// Pick the model selected by default: the first catalog entry, or
/// [`DEFAULT_MODEL`] when the catalog is empty
pub fn default_model(catalog: &[ModelName]) -> ModelName {
    catalog
        .first()
        .cloned()
        .unwrap_or_else(|| DEFAULT_MODEL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ModelInfo;
    use crate::error::GenerationError;
    use async_trait::async_trait;

    struct StaticBackend(Result<Vec<ModelInfo>, GenerationError>);

    #[async_trait]
    impl GenerationBackend for StaticBackend {
        fn name(&self) -> &'static str {
            "static"
        }

        async fn list_models(&self) -> Result<Vec<ModelInfo>, GenerationError> {
            self.0.clone()
        }

        async fn generate(&self, _model: &str, _prompt: &str) -> Result<String, GenerationError> {
            Err(GenerationError::Transport("not used".to_string()))
        }
    }

    #[tokio::test]
    async fn test_filters_generation_models_in_order() {
        let backend = StaticBackend(Ok(vec![
            ModelInfo::new("models/gemini-2.5-pro", &["generateContent"]),
            ModelInfo::new("models/text-embedding-004", &["embedContent"]),
            ModelInfo::new("models/gemini-2.0-flash-lite", &["countTokens", "generateContent"]),
        ]));
        let names = list_generation_models(&backend).await;
        assert_eq!(
            names,
            vec!["models/gemini-2.5-pro", "models/gemini-2.0-flash-lite"]
        );
        assert_eq!(default_model(&names), "models/gemini-2.5-pro");
    }

    #[tokio::test]
    async fn test_listing_failure_uses_fallback() {
        let backend = StaticBackend(Err(GenerationError::Api {
            status: 403,
            message: "API key not valid".to_string(),
        }));
        let names = list_generation_models(&backend).await;
        assert_eq!(
            names,
            vec!["models/gemini-2.5-flash", "models/gemini-2.0-flash-lite"]
        );
    }

    #[test]
    fn test_default_model_for_empty_catalog() {
        assert_eq!(default_model(&[]), DEFAULT_MODEL);
    }
}
