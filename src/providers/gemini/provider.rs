use super::types::{GeminiContent, GeminiRequest, GeminiResponse, GenerationConfig};
use crate::config::{ConfigMap, GeminiConfig, ProviderConfig};
use crate::env::EnvSource;
use crate::error::{LlmError, LlmResult};
use crate::logging::{log_debug, log_info, log_warn};
use crate::messages::{Message, MessageRole};
use crate::providers::http::{normalize_endpoint, secret_header, HttpClient};
use crate::providers::{report_probe, LlmHandler, ModelInfo, PROBE_PROMPT};
use crate::response_parser::strip_json_code_fence;

use async_trait::async_trait;
use reqwest::header::HeaderMap;

const PROVIDER: &str = "gemini";
const USER_ROLE: &str = "user";
const MODEL_ROLE: &str = "model";

pub const GEMINI_MODELS: &[&str] = &[
    "gemini-2.0-flash-001",
    "gemini-2.0-flash-lite-preview-02-05",
    "gemini-2.0-pro-exp-02-05",
    "gemini-2.0-flash-thinking-exp-01-21",
    "gemini-2.0-flash-thinking-exp-1219",
    "gemini-2.0-flash-exp",
    "gemini-1.5-flash-002",
    "gemini-1.5-flash-exp-0827",
    "gemini-1.5-flash-8b-exp-0827",
    "gemini-1.5-pro-002",
    "gemini-1.5-pro-exp-0827",
    "gemini-exp-1206",
];

pub const GEMINI_DEFAULT_MODEL: &str = "gemini-2.0-flash-001";

/// Gemini handler. Models carry no output ceiling here.
#[derive(Debug)]
pub struct GeminiHandler {
    config: GeminiConfig,
    model: &'static str,
    http: HttpClient,
    url: String,
    headers: HeaderMap,
}

impl GeminiHandler {
    pub fn get_config(raw: &ConfigMap, env: &dyn EnvSource) -> LlmResult<GeminiConfig> {
        GeminiConfig::from_map(raw, env)
    }

    pub fn new(raw: &ConfigMap, env: &dyn EnvSource) -> LlmResult<Self> {
        Self::from_config(Self::get_config(raw, env)?)
    }

    pub fn from_config(config: GeminiConfig) -> LlmResult<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .ok_or_else(|| LlmError::invalid_api_key("api_key", "Gemini API key is required"))?;
        let base_url = config
            .base_url
            .as_deref()
            .ok_or_else(|| LlmError::invalid_endpoint("base_url", "Field required"))?;
        let base_url = normalize_endpoint("base_url", base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert("x-goog-api-key", secret_header("api_key", api_key)?);

        let model = GEMINI_MODELS
            .iter()
            .copied()
            .find(|id| *id == config.model_id)
            .unwrap_or_else(|| {
                log_warn!(
                    provider = PROVIDER,
                    requested_model = %config.model_id,
                    fallback_model = GEMINI_DEFAULT_MODEL,
                    "Unknown model id, falling back to provider default"
                );
                GEMINI_DEFAULT_MODEL
            });
        log_info!(provider = PROVIDER, model = model, "Created Gemini client");

        Ok(Self {
            http: HttpClient::new(PROVIDER, config.retry_policy())?,
            url: format!("{base_url}/v1beta/models/{model}:generateContent"),
            headers,
            model,
            config,
        })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// `user` stays `user`; every other turn is sent as `model`. System
    /// messages join the explicit prompt in the system instruction.
    pub(crate) fn build_request(messages: &[Message], system_prompt: Option<&str>) -> GeminiRequest {
        let mut system_parts: Vec<&str> = system_prompt
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .into_iter()
            .collect();

        let mut contents = Vec::with_capacity(messages.len());
        for message in messages {
            let role = match message.role {
                MessageRole::System => {
                    if !message.content.trim().is_empty() {
                        system_parts.push(message.content.trim());
                    }
                    continue;
                }
                MessageRole::User => USER_ROLE,
                MessageRole::Assistant => MODEL_ROLE,
            };
            contents.push(GeminiContent::text(Some(role), message.content.clone()));
        }

        GeminiRequest {
            contents,
            system_instruction: (!system_parts.is_empty())
                .then(|| GeminiContent::text(None, system_parts.join("\n\n"))),
            generation_config: None,
        }
    }

    fn build_probe() -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent::text(Some(USER_ROLE), PROBE_PROMPT)],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                temperature: Some(0.0),
                max_output_tokens: Some(1),
            }),
        }
    }

    async fn send(&self, request: &GeminiRequest) -> LlmResult<GeminiResponse> {
        log_debug!(
            provider = PROVIDER,
            model = self.model,
            content_count = request.contents.len(),
            "Sending Gemini request"
        );
        self.http.post_json(&self.url, &self.headers, request).await
    }
}

#[async_trait]
impl LlmHandler for GeminiHandler {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn get_model(&self) -> ModelInfo {
        ModelInfo::new(self.model)
    }

    async fn invoke(&self, messages: &[Message], system_prompt: Option<&str>) -> LlmResult<String> {
        let response = self.send(&Self::build_request(messages, system_prompt)).await?;
        Ok(strip_json_code_fence(&response.text()))
    }

    async fn is_valid(&self) -> bool {
        report_probe(PROVIDER, self.send(&Self::build_probe()).await.map(|_| ()))
    }
}
