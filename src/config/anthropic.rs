use super::{ConfigMap, FieldKind, FieldReader, ProviderConfig};
use crate::env::{EnvSource, EnvVar};
use crate::error::LlmResult;
use serde::{Deserialize, Serialize};

/// Anthropic-specific configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnthropicConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub model_id: String,
    pub max_retries: u32,
}

impl ProviderConfig for AnthropicConfig {
    fn provider_name(&self) -> &'static str {
        "anthropic"
    }

    fn from_map(raw: &ConfigMap, env: &dyn EnvSource) -> LlmResult<Self> {
        let fields = FieldReader::new(raw, env);
        Ok(Self {
            base_url: fields.optional("base_url", FieldKind::Endpoint, EnvVar::AnthropicBaseUrl)?,
            api_key: fields.optional("api_key", FieldKind::Credential, EnvVar::AnthropicApiKey)?,
            model_id: fields.model_id(true)?,
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
