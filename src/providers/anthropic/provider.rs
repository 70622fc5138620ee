//! Anthropic handler implementation

use super::conversion;
use super::types::{AnthropicRequest, AnthropicResponse};
use crate::config::{AnthropicConfig, ConfigMap, ProviderConfig};
use crate::env::EnvSource;
use crate::error::{LlmError, LlmResult};
use crate::logging::{log_debug, log_info};
use crate::messages::Message;
use crate::providers::http::{normalize_endpoint, secret_header, HttpClient};
use crate::providers::{report_probe, resolve_model, LlmHandler, ModelInfo, SupportedModel};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};

const PROVIDER: &str = "anthropic";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Models served by the Messages API, with their output ceilings.
pub const ANTHROPIC_MODELS: &[SupportedModel] = &[
    SupportedModel::new("claude-3-5-sonnet-20241022", 8192),
    SupportedModel::new("claude-3-5-haiku-20241022", 8192),
    SupportedModel::new("claude-3-opus-20240229", 4096),
    SupportedModel::new("claude-3-haiku-20240307", 4096),
];

/// Model used when the configured id is not in [`ANTHROPIC_MODELS`].
pub const ANTHROPIC_DEFAULT_MODEL: SupportedModel =
    SupportedModel::new("claude-3-5-sonnet-20241022", 8192);

/// Anthropic Claude handler
#[derive(Debug)]
pub struct AnthropicHandler {
    config: AnthropicConfig,
    model: SupportedModel,
    http: HttpClient,
    url: String,
    headers: HeaderMap,
}

impl AnthropicHandler {
    pub fn get_config(raw: &ConfigMap, env: &dyn EnvSource) -> LlmResult<AnthropicConfig> {
        AnthropicConfig::from_map(raw, env)
    }

    pub fn new(raw: &ConfigMap, env: &dyn EnvSource) -> LlmResult<Self> {
        Self::from_config(Self::get_config(raw, env)?)
    }

    /// Create a new Anthropic handler instance
    ///
    /// # Errors
    ///
    /// - [`LlmError::InvalidApiKey`] if the API key is missing or not a valid header value
    /// - [`LlmError::InvalidEndpoint`] if the base URL is missing or malformed
    pub fn from_config(config: AnthropicConfig) -> LlmResult<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .ok_or_else(|| LlmError::invalid_api_key("api_key", "Anthropic API key is required"))?;
        let base_url = config
            .base_url
            .as_deref()
            .ok_or_else(|| LlmError::invalid_endpoint("base_url", "Field required"))?;
        let base_url = normalize_endpoint("base_url", base_url)?;

        // Build headers required by Anthropic API
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", secret_header("api_key", api_key)?);
        headers.insert("anthropic-version", HeaderValue::from_static(ANTHROPIC_VERSION));

        let model = resolve_model(PROVIDER, ANTHROPIC_MODELS, &config.model_id, ANTHROPIC_DEFAULT_MODEL);
        log_info!(provider = PROVIDER, model = model.id, "Created Anthropic client");

        Ok(Self {
            http: HttpClient::new(PROVIDER, config.retry_policy())?,
            url: format!("{base_url}/v1/messages"),
            headers,
            model,
            config,
        })
    }

    pub fn config(&self) -> &AnthropicConfig {
        &self.config
    }

    /// Sends a request to the Anthropic Messages API with retry logic
    async fn send(&self, request: &AnthropicRequest) -> LlmResult<AnthropicResponse> {
        log_debug!(
            provider = PROVIDER,
            model = ?request.model,
            message_count = request.messages.len(),
            has_system = request.system.is_some(),
            "Sending Anthropic request"
        );
        self.http.post_json(&self.url, &self.headers, request).await
    }
}

#[async_trait]
impl LlmHandler for AnthropicHandler {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn get_model(&self) -> ModelInfo {
        self.model.info()
    }

    async fn invoke(&self, messages: &[Message], system_prompt: Option<&str>) -> LlmResult<String> {
        let request = conversion::build_request(
            Some(self.model.id),
            Some(self.model.max_tokens),
            messages,
            system_prompt,
        );
        let response = self.send(&request).await?;
        Ok(conversion::extract_text(response))
    }

    async fn is_valid(&self) -> bool {
        let probe = conversion::build_probe(Some(self.model.id));
        report_probe(PROVIDER, self.send(&probe).await.map(|_| ()))
    }
}
