//! Generation backend contract
//!
//! The report generator and model catalog only talk to this trait, so the
//! remote service can be swapped for a scripted one in tests.

use crate::error::GenerationError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Opaque identifier of a generation-capable model, e.g. `models/gemini-2.5-flash`
pub type ModelName = String;

/// Capability tag a model must advertise to be usable for reports
pub const GENERATE_METHOD: &str = "generateContent";

/// A model as listed by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    /// Model identifier
    pub name: ModelName,
    /// Methods the model can be called with
    #[serde(default, rename = "supportedGenerationMethods")]
    pub supported_methods: Vec<String>,
}

impl ModelInfo {
    /// Create a model entry
    pub fn new(name: impl Into<String>, supported_methods: &[&str]) -> Self {
        Self {
            name: name.into(),
            supported_methods: supported_methods.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// Returns true if the model can generate text
    pub fn supports_generation(&self) -> bool {
        self.supported_methods.iter().any(|m| m == GENERATE_METHOD)
    }
}

/// Remote text generation service
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Short identifier for logging
    fn name(&self) -> &'static str;

    /// List every model the backend exposes
    async fn list_models(&self) -> Result<Vec<ModelInfo>, GenerationError>;

    /// Run one generation request against `model` and return its text
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supports_generation() {
        let model = ModelInfo::new("models/gemini-2.5-flash", &["generateContent", "countTokens"]);
        assert!(model.supports_generation());

        let embed = ModelInfo::new("models/text-embedding-004", &["embedContent"]);
        assert!(!embed.supports_generation());
    }

    #[test]
    fn test_model_info_deserialize() {
        let json = r#"{
            "name": "models/gemini-2.0-flash-lite",
            "displayName": "Gemini 2.0 Flash-Lite",
            "supportedGenerationMethods": ["generateContent", "countTokens"]
        }"#;
        let model: ModelInfo = serde_json::from_str(json).unwrap();
        assert_eq!(model.name, "models/gemini-2.0-flash-lite");
        assert!(model.supports_generation());
    }

    #[test]
    fn test_model_info_missing_methods() {
        let model: ModelInfo = serde_json::from_str(r#"{"name": "models/aqa"}"#).unwrap();
        assert!(model.supported_methods.is_empty());
        assert!(!model.supports_generation());
    }
}
