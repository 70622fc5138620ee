use super::{ConfigMap, FieldKind, FieldReader, ProviderConfig};
use crate::env::{EnvSource, EnvVar};
use crate::error::LlmResult;
use serde::{Deserialize, Serialize};

/// Ollama configuration.
///
/// Model tags are kept as given: Ollama tags are case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub base_url: Option<String>,
    pub model_id: String,
    pub max_retries: u32,
}

impl ProviderConfig for OllamaConfig {
    fn provider_name(&self) -> &'static str {
        "ollama"
    }

    fn from_map(raw: &ConfigMap, env: &dyn EnvSource) -> LlmResult<Self> {
        let fields = FieldReader::new(raw, env);
        Ok(Self {
            base_url: fields.optional("base_url", FieldKind::Endpoint, EnvVar::OllamaBaseUrl)?,
            model_id: fields.model_id(false)?,
            max_retries: fields.max_retries()?,
        })
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn max_retries(&self) -> u32 {
        self.max_retries
    }
}
