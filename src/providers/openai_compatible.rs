//! OpenAI-compatible handler family
//!
//! Three handlers that each wrap one OpenAI chat-completions client, pointed
//! at a different backend:
//!
//! - [`OpenAINativeHandler`]: OpenAI itself (`OPENAI_API_KEY`, `OPENAI_API_BASE`)
//! - [`OpenAICompatibleAzureHandler`]: an Azure OpenAI resource
//!   (`AZUREAI_API_KEY`, `AZUREAI_API_BASE`, `AZUREAI_API_VERSION`)
//! - [`OpenAICompatibleClaudeHandler`]: Claude behind an OpenAI-compatible
//!   gateway (`CLAUDE_API_KEY`, `CLAUDE_ENDPOINT`)
//!
//! These handlers pass the model id through unchanged; there is no model
//! list to fall back on.

use super::openai_shared::{OpenAICompatibleClient, OpenAIRequest};
use super::{report_probe, LlmHandler, ModelInfo};
use crate::config::{
    AzureCompatibleConfig, ClaudeCompatibleConfig, ConfigMap, OpenAINativeConfig, ProviderConfig,
};
use crate::env::EnvSource;
use crate::error::LlmResult;
use crate::logging::log_info;
use crate::messages::Message;

use async_trait::async_trait;

/// Shared invoke/probe logic over one compatible client.
#[derive(Debug)]
struct CompatibleCore {
    provider: &'static str,
    model_id: String,
    client: OpenAICompatibleClient,
}

impl CompatibleCore {
    async fn completion(&self, messages: &[Message], system_prompt: Option<&str>) -> LlmResult<String> {
        let request = OpenAIRequest::chat(&self.model_id, messages, system_prompt);
        Ok(self.client.chat(&request).await?.first_text())
    }

    async fn probe(&self) -> bool {
        let probe = OpenAIRequest::probe(&self.model_id);
        report_probe(self.provider, self.client.chat(&probe).await.map(|_| ()))
    }
}

macro_rules! compatible_handler_impl {
    ($handler:ty) => {
        #[async_trait]
        impl LlmHandler for $handler {
            fn provider_name(&self) -> &'static str {
                self.core.provider
            }

            fn get_model(&self) -> ModelInfo {
                ModelInfo::new(self.core.model_id.clone())
            }

            async fn invoke(
                &self,
                messages: &[Message],
                system_prompt: Option<&str>,
            ) -> LlmResult<String> {
                self.core.completion(messages, system_prompt).await
            }

            async fn is_valid(&self) -> bool {
                self.core.probe().await
            }
        }
    };
}

// ============================================================================
// OpenAI native
// ============================================================================

#[derive(Debug)]
pub struct OpenAINativeHandler {
    config: OpenAINativeConfig,
    core: CompatibleCore,
}

impl OpenAINativeHandler {
    pub fn get_config(raw: &ConfigMap, env: &dyn EnvSource) -> LlmResult<OpenAINativeConfig> {
        OpenAINativeConfig::from_map(raw, env)
    }

    pub fn new(raw: &ConfigMap, env: &dyn EnvSource) -> LlmResult<Self> {
        Self::from_config(Self::get_config(raw, env)?)
    }

    pub fn from_config(config: OpenAINativeConfig) -> LlmResult<Self> {
        let provider = config.provider_name();
        let client = OpenAICompatibleClient::openai(
            provider,
            &config.api_base,
            &config.api_key,
            config.retry_policy(),
        )?;
        log_info!(provider = provider, model = %config.model_id, "Created OpenAI native client");

        Ok(Self {
            core: CompatibleCore {
                provider,
                model_id: config.model_id.clone(),
                client,
            },
            config,
        })
    }

    pub fn config(&self) -> &OpenAINativeConfig {
        &self.config
    }
}

compatible_handler_impl!(OpenAINativeHandler);

// ============================================================================
// Azure through the compatible family
// ============================================================================

#[derive(Debug)]
pub struct OpenAICompatibleAzureHandler {
    config: AzureCompatibleConfig,
    core: CompatibleCore,
}

impl OpenAICompatibleAzureHandler {
    pub fn get_config(raw: &ConfigMap, env: &dyn EnvSource) -> LlmResult<AzureCompatibleConfig> {
        AzureCompatibleConfig::from_map(raw, env)
    }

    pub fn new(raw: &ConfigMap, env: &dyn EnvSource) -> LlmResult<Self> {
        Self::from_config(Self::get_config(raw, env)?)
    }

    pub fn from_config(config: AzureCompatibleConfig) -> LlmResult<Self> {
        let provider = config.provider_name();
        let client = OpenAICompatibleClient::azure(
            provider,
            &config.api_base,
            &config.model_id,
            &config.api_version,
            &config.api_key,
            config.retry_policy(),
        )?;
        log_info!(provider = provider, model = %config.model_id, "Created Azure compatible client");

        Ok(Self {
            core: CompatibleCore {
                provider,
                model_id: config.model_id.clone(),
                client,
            },
            config,
        })
    }

    pub fn config(&self) -> &AzureCompatibleConfig {
        &self.config
    }
}

compatible_handler_impl!(OpenAICompatibleAzureHandler);

// ============================================================================
// Claude through an OpenAI-compatible gateway
// ============================================================================

#[derive(Debug)]
pub struct OpenAICompatibleClaudeHandler {
    config: ClaudeCompatibleConfig,
    core: CompatibleCore,
}

impl OpenAICompatibleClaudeHandler {
    pub fn get_config(raw: &ConfigMap, env: &dyn EnvSource) -> LlmResult<ClaudeCompatibleConfig> {
        ClaudeCompatibleConfig::from_map(raw, env)
    }

    pub fn new(raw: &ConfigMap, env: &dyn EnvSource) -> LlmResult<Self> {
        Self::from_config(Self::get_config(raw, env)?)
    }

    pub fn from_config(config: ClaudeCompatibleConfig) -> LlmResult<Self> {
        let provider = config.provider_name();
        let client = OpenAICompatibleClient::openai(
            provider,
            &config.endpoint,
            &config.api_key,
            config.retry_policy(),
        )?;
        log_info!(provider = provider, model = %config.model_id, "Created Claude compatible client");

        Ok(Self {
            core: CompatibleCore {
                provider,
                model_id: config.model_id.clone(),
                client,
            },
            config,
        })
    }

    pub fn config(&self) -> &ClaudeCompatibleConfig {
        &self.config
    }
}

compatible_handler_impl!(OpenAICompatibleClaudeHandler);
