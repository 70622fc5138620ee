//! Ollama handler
//!
//! Ollama exposes an OpenAI-compatible API under `/v1`, so this handler wraps
//! the shared OpenAI client with Ollama's placeholder API key.

use super::openai_shared::{OpenAICompatibleClient, OpenAIRequest};
use super::{report_probe, LlmHandler, ModelInfo};
use crate::config::{ConfigMap, OllamaConfig, ProviderConfig};
use crate::env::EnvSource;
use crate::error::{LlmError, LlmResult};
use crate::logging::log_info;
use crate::messages::Message;

use async_trait::async_trait;

const PROVIDER: &str = "ollama";
const OLLAMA_API_KEY: &str = "ollama";

/// Local Ollama handler
#[derive(Debug)]
pub struct OllamaHandler {
    config: OllamaConfig,
    client: OpenAICompatibleClient,
}

impl OllamaHandler {
    pub fn get_config(raw: &ConfigMap, env: &dyn EnvSource) -> LlmResult<OllamaConfig> {
        OllamaConfig::from_map(raw, env)
    }

    pub fn new(raw: &ConfigMap, env: &dyn EnvSource) -> LlmResult<Self> {
        Self::from_config(Self::get_config(raw, env)?)
    }

    pub fn from_config(config: OllamaConfig) -> LlmResult<Self> {
        let base_url = config
            .base_url
            .as_deref()
            .ok_or_else(|| LlmError::invalid_endpoint("base_url", "Ollama base URL is required"))?;

        let client = OpenAICompatibleClient::openai(
            PROVIDER,
            &format!("{}/v1", base_url.trim_end_matches('/')),
            OLLAMA_API_KEY,
            config.retry_policy(),
        )?;
        log_info!(provider = PROVIDER, model = %config.model_id, "Created Ollama client");

        Ok(Self { config, client })
    }
}

#[async_trait]
impl LlmHandler for OllamaHandler {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn get_model(&self) -> ModelInfo {
        ModelInfo::new(self.config.model_id.clone())
    }

    async fn invoke(&self, messages: &[Message], system_prompt: Option<&str>) -> LlmResult<String> {
        let request = OpenAIRequest::chat(&self.config.model_id, messages, system_prompt);
        Ok(self.client.chat(&request).await?.first_text())
    }

    async fn is_valid(&self) -> bool {
        let probe = OpenAIRequest::probe(&self.config.model_id);
        report_probe(PROVIDER, self.client.chat(&probe).await.map(|_| ()))
    }
}
