//! HTTP client for OpenAI-compatible providers

use super::types::{OpenAIRequest, OpenAIResponse};
use crate::error::LlmResult;
use crate::logging::log_debug;
use crate::providers::http::{normalize_endpoint, secret_header, HttpClient};
use crate::retry::RetryPolicy;

use reqwest::header::{HeaderMap, AUTHORIZATION};

/// Client for one `/chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct OpenAICompatibleClient {
    http: HttpClient,
    url: String,
    headers: HeaderMap,
}

impl OpenAICompatibleClient {
    /// Client for an OpenAI-style base URL with bearer authentication.
    pub fn openai(
        provider: &'static str,
        base_url: &str,
        api_key: &str,
        retry_policy: RetryPolicy,
    ) -> LlmResult<Self> {
        let base_url = normalize_endpoint("base_url", base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            secret_header("api_key", &format!("Bearer {api_key}"))?,
        );

        log_debug!(provider = provider, base_url = %base_url, "Created OpenAI-compatible client");

        Ok(Self {
            http: HttpClient::new(provider, retry_policy)?,
            url: format!("{base_url}/chat/completions"),
            headers,
        })
    }

    /// Client for an Azure OpenAI deployment, authenticated with `api-key`.
    pub fn azure(
        provider: &'static str,
        endpoint: &str,
        deployment: &str,
        api_version: &str,
        api_key: &str,
        retry_policy: RetryPolicy,
    ) -> LlmResult<Self> {
        let endpoint = normalize_endpoint("base_url", endpoint)?;

        let mut headers = HeaderMap::new();
        headers.insert("api-key", secret_header("api_key", api_key)?);

        log_debug!(
            provider = provider,
            endpoint = %endpoint,
            deployment = deployment,
            api_version = api_version,
            "Created Azure OpenAI client"
        );

        Ok(Self {
            http: HttpClient::new(provider, retry_policy)?,
            url: format!(
                "{endpoint}/openai/deployments/{deployment}/chat/completions?api-version={api_version}"
            ),
            headers,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Execute a chat completion request with retry logic
    pub async fn chat(&self, request: &OpenAIRequest) -> LlmResult<OpenAIResponse> {
        log_debug!(
            provider = self.http.provider(),
            model = %request.model,
            message_count = request.messages.len(),
            "Sending chat completion request"
        );
        self.http.post_json(&self.url, &self.headers, request).await
    }
}
