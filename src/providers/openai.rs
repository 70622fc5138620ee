//! OpenAI handler
//!
//! Talks to any OpenAI chat-completions base URL. When the base URL points at
//! an Azure OpenAI resource (`azure.com`) the same handler builds the Azure
//! client instead, using the model id as the deployment name.

use super::openai_shared::{OpenAICompatibleClient, OpenAIRequest};
use super::{report_probe, LlmHandler, ModelInfo};
use crate::config::{ConfigMap, OpenAIConfig, ProviderConfig};
use crate::env::EnvSource;
use crate::error::{LlmError, LlmResult};
use crate::logging::log_info;
use crate::messages::Message;

use async_trait::async_trait;

const PROVIDER: &str = "openai";

/// OpenAI handler with the Azure branch.
#[derive(Debug)]
pub struct OpenAIHandler {
    config: OpenAIConfig,
    client: OpenAICompatibleClient,
}

impl OpenAIHandler {
    pub fn get_config(raw: &ConfigMap, env: &dyn EnvSource) -> LlmResult<OpenAIConfig> {
        OpenAIConfig::from_map(raw, env)
    }

    pub fn new(raw: &ConfigMap, env: &dyn EnvSource) -> LlmResult<Self> {
        Self::from_config(Self::get_config(raw, env)?)
    }

    /// Build the handler and its client from a validated config.
    ///
    /// # Errors
    ///
    /// - [`LlmError::InvalidEndpoint`] when no usable base URL resolved
    /// - [`LlmError::InvalidApiKey`] when the key for the selected client is missing
    /// - [`LlmError::ConfigurationError`] when Azure is selected without an API version
    pub fn from_config(config: OpenAIConfig) -> LlmResult<Self> {
        let base_url = config
            .base_url
            .as_deref()
            .ok_or_else(|| LlmError::invalid_endpoint("base_url", "Field required"))?;

        let client = if config.is_azure() {
            let api_key = config
                .azure_api_key
                .as_deref()
                .or(config.api_key.as_deref())
                .ok_or_else(|| {
                    LlmError::invalid_api_key("azure_api_key", "Azure OpenAI API key is required")
                })?;
            let api_version = config.api_version.as_deref().ok_or_else(|| {
                LlmError::configuration_error("api_version: required for Azure OpenAI")
            })?;
            let client = OpenAICompatibleClient::azure(
                PROVIDER,
                base_url,
                &config.model_id,
                api_version,
                api_key,
                config.retry_policy(),
            )?;
            log_info!(provider = PROVIDER, model = %config.model_id, "Created Azure OpenAI client");
            client
        } else {
            let api_key = config
                .api_key
                .as_deref()
                .ok_or_else(|| LlmError::invalid_api_key("api_key", "OpenAI API key is required"))?;
            let client =
                OpenAICompatibleClient::openai(PROVIDER, base_url, api_key, config.retry_policy())?;
            log_info!(provider = PROVIDER, model = %config.model_id, "Created OpenAI client");
            client
        };

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    /// Whether the Azure client was selected.
    pub fn is_azure(&self) -> bool {
        self.config.is_azure()
    }
}

#[async_trait]
impl LlmHandler for OpenAIHandler {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn get_model(&self) -> ModelInfo {
        ModelInfo::new(self.config.model_id.clone())
    }

    async fn invoke(&self, messages: &[Message], system_prompt: Option<&str>) -> LlmResult<String> {
        let request = OpenAIRequest::chat(&self.config.model_id, messages, system_prompt);
        let response = self.client.chat(&request).await?;
        Ok(response.first_text())
    }

    async fn is_valid(&self) -> bool {
        let probe = OpenAIRequest::probe(&self.config.model_id);
        report_probe(PROVIDER, self.client.chat(&probe).await.map(|_| ()))
    }
}
