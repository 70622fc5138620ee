use super::sigv4::{SigV4Signer, AWS_URI_ENCODE};
use crate::config::{BedrockConfig, ConfigMap, ProviderConfig};
use crate::env::EnvSource;
use crate::error::{LlmError, LlmResult};
use crate::logging::{log_debug, log_info};
use crate::messages::Message;
use crate::providers::anthropic::conversion;
use crate::providers::anthropic::types::{AnthropicRequest, AnthropicResponse};
use crate::providers::http::{normalize_endpoint, HttpClient};
use crate::providers::{report_probe, resolve_model, LlmHandler, ModelInfo, SupportedModel};

use async_trait::async_trait;
use chrono::Utc;
use percent_encoding::utf8_percent_encode;

const PROVIDER: &str = "bedrock";
const BEDROCK_ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

/// Anthropic models available on Bedrock, with their output ceilings.
pub const BEDROCK_MODELS: &[SupportedModel] = &[
    SupportedModel::new("anthropic.claude-3-7-sonnet-20250219-v1:0", 8192),
    SupportedModel::new("anthropic.claude-3-5-sonnet-20241022-v2:0", 8192),
    SupportedModel::new("anthropic.claude-3-5-haiku-20241022-v1:0", 8192),
    SupportedModel::new("anthropic.claude-3-5-sonnet-20240620-v1:0", 8192),
    SupportedModel::new("anthropic.claude-3-opus-20240229-v1:0", 4096),
    SupportedModel::new("anthropic.claude-3-sonnet-20240229-v1:0", 4096),
    SupportedModel::new("anthropic.claude-3-haiku-20240307-v1:0", 4096),
];

pub const BEDROCK_DEFAULT_MODEL: SupportedModel =
    SupportedModel::new("anthropic.claude-3-5-sonnet-20241022-v2:0", 8192);

/// Bedrock runtime handler
#[derive(Debug)]
pub struct BedrockHandler {
    config: BedrockConfig,
    model: SupportedModel,
    http: HttpClient,
    url: url::Url,
    signer: SigV4Signer,
}

impl BedrockHandler {
    pub fn get_config(raw: &ConfigMap, env: &dyn EnvSource) -> LlmResult<BedrockConfig> {
        BedrockConfig::from_map(raw, env)
    }

    pub fn new(raw: &ConfigMap, env: &dyn EnvSource) -> LlmResult<Self> {
        Self::from_config(Self::get_config(raw, env)?)
    }

    /// # Errors
    ///
    /// [`LlmError::InvalidEndpoint`] when the runtime endpoint is not a valid
    /// http(s) URL.
    pub fn from_config(config: BedrockConfig) -> LlmResult<Self> {
        let endpoint = normalize_endpoint("base_url", &config.endpoint())?;
        let model = resolve_model(PROVIDER, BEDROCK_MODELS, &config.model_id, BEDROCK_DEFAULT_MODEL);

        let raw_url = format!(
            "{endpoint}/model/{}/invoke",
            utf8_percent_encode(model.id, AWS_URI_ENCODE)
        );
        let url = url::Url::parse(&raw_url)
            .map_err(|e| LlmError::invalid_endpoint("base_url", format!("Invalid URL '{raw_url}': {e}")))?;

        let signer = SigV4Signer::new(
            config.aws_access_key.clone(),
            config.aws_secret_key.clone(),
            config.aws_session_token.clone(),
            config.aws_region.clone(),
        );

        log_info!(
            provider = PROVIDER,
            model = model.id,
            region = %config.aws_region,
            "Created Bedrock client"
        );

        Ok(Self {
            http: HttpClient::new(PROVIDER, config.retry_policy())?,
            url,
            signer,
            model,
            config,
        })
    }

    pub fn config(&self) -> &BedrockConfig {
        &self.config
    }

    /// Invoke URL, with the model id percent-encoded.
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    fn to_bedrock(mut request: AnthropicRequest) -> AnthropicRequest {
        request.model = None;
        request.anthropic_version = Some(BEDROCK_ANTHROPIC_VERSION.to_string());
        request.stream = None;
        request
    }

    async fn send(&self, request: &AnthropicRequest) -> LlmResult<AnthropicResponse> {
        let payload = serde_json::to_vec(request).map_err(|e| {
            LlmError::request_failed(format!("Failed to encode {PROVIDER} request: {e}"), Some(Box::new(e)))
        })?;

        log_debug!(
            provider = PROVIDER,
            model = self.model.id,
            message_count = request.messages.len(),
            "Sending Bedrock invoke request"
        );

        // Signed per attempt so x-amz-date stays current across retries
        self.http
            .post_bytes(self.url.as_str(), &payload, |body| {
                self.signer.sign("POST", &self.url, body, Utc::now())
            })
            .await
    }
}

#[async_trait]
impl LlmHandler for BedrockHandler {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn get_model(&self) -> ModelInfo {
        self.model.info()
    }

    async fn invoke(&self, messages: &[Message], system_prompt: Option<&str>) -> LlmResult<String> {
        let request = Self::to_bedrock(conversion::build_request(
            None,
            Some(self.model.max_tokens),
            messages,
            system_prompt,
        ));
        let response = self.send(&request).await?;
        Ok(conversion::extract_text(response))
    }

    async fn is_valid(&self) -> bool {
        let probe = Self::to_bedrock(conversion::build_probe(None));
        report_probe(PROVIDER, self.send(&probe).await.map(|_| ()))
    }
}
