//! Shared HTTP layer for provider clients
//!
//! Wraps a `reqwest::Client` with the retry executor and maps non-success
//! responses onto the error taxonomy:
//! - 401/403: [`LlmError::AuthenticationFailed`]
//! - 429: [`LlmError::RateLimitExceeded`] using `retry-after` (default 60s)
//! - anything else: [`LlmError::RequestFailed`] carrying the status

use crate::error::{LlmError, LlmResult};
use crate::logging::{log_debug, log_error};
use crate::retry::{RetryExecutor, RetryPolicy};

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// HTTP client owned by a single handler.
#[derive(Debug, Clone)]
pub(crate) struct HttpClient {
    provider: &'static str,
    client: reqwest::Client,
    retry_executor: RetryExecutor,
}

impl HttpClient {
    pub(crate) fn new(provider: &'static str, retry_policy: RetryPolicy) -> LlmResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(retry_policy.request_timeout)
            .build()
            .map_err(|e| {
                LlmError::configuration_error(format!("Failed to build {provider} HTTP client: {e}"))
            })?;

        Ok(Self {
            provider,
            client,
            retry_executor: RetryExecutor::new(retry_policy),
        })
    }

    pub(crate) fn provider(&self) -> &'static str {
        self.provider
    }

    /// POST a JSON body with fixed headers.
    pub(crate) async fn post_json<B, R>(&self, url: &str, headers: &HeaderMap, body: &B) -> LlmResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body).map_err(|e| {
            LlmError::request_failed(
                format!("Failed to encode {} request: {e}", self.provider),
                Some(Box::new(e)),
            )
        })?;

        self.post_bytes(url, &payload, |_| Ok(headers.clone())).await
    }

    /// POST a pre-encoded body; `headers_for` runs before every attempt so
    /// time-dependent signatures stay fresh across retries.
    pub(crate) async fn post_bytes<R, H>(&self, url: &str, payload: &[u8], headers_for: H) -> LlmResult<R>
    where
        R: DeserializeOwned,
        H: Fn(&[u8]) -> LlmResult<HeaderMap>,
    {
        let headers_for = &headers_for;
        self.retry_executor
            .execute(|| async move {
                let mut headers = headers_for(payload)?;
                headers
                    .entry(CONTENT_TYPE)
                    .or_insert(HeaderValue::from_static("application/json"));
                self.send_once(url, headers, payload).await
            })
            .await
    }

    async fn send_once<R: DeserializeOwned>(
        &self,
        url: &str,
        headers: HeaderMap,
        payload: &[u8],
    ) -> LlmResult<R> {
        log_debug!(provider = self.provider, url = %url, "Sending provider request");

        let response = self
            .client
            .post(url)
            .headers(headers)
            .body(payload.to_vec())
            .send()
            .await
            .map_err(|e| {
                log_error!(
                    provider = self.provider,
                    url = %url,
                    error = %e,
                    "HTTP request failed"
                );
                if e.is_timeout() {
                    LlmError::timeout_after(self.retry_executor.policy().request_timeout)
                } else {
                    LlmError::request_failed(
                        format!("{} request failed: {e}", self.provider),
                        Some(Box::new(e)),
                    )
                }
            })?;

        if !response.status().is_success() {
            return Err(handle_error_response(self.provider, response).await);
        }

        parse_success_response(self.provider, response).await
    }
}

/// Handle non-success HTTP responses
async fn handle_error_response(provider: &str, response: reqwest::Response) -> LlmError {
    let status = response.status();
    let retry_after = response
        .headers()
        .get("retry-after")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok());
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    log_error!(
        provider = provider,
        status = %status,
        error_text = %error_text,
        "API error response"
    );

    match status.as_u16() {
        401 | 403 => LlmError::authentication_failed(format!(
            "{provider} rejected the credentials: {}",
            error_detail(&error_text)
        )),
        429 => LlmError::rate_limit_exceeded(retry_after.unwrap_or(60)),
        code => LlmError::provider_status(
            code,
            format!("{provider} API error {status}: {}", error_detail(&error_text)),
        ),
    }
}

/// Best-effort human readable message out of a provider error body.
fn error_detail(error_text: &str) -> String {
    let parsed = serde_json::from_str::<serde_json::Value>(error_text).ok();
    let message = parsed.as_ref().and_then(|json| {
        json.pointer("/error/message")
            .or_else(|| json.get("message"))
            .or_else(|| json.get("error"))
            .and_then(|m| m.as_str())
            .map(str::to_string)
    });
    message.unwrap_or_else(|| error_text.chars().take(500).collect())
}

/// Parse successful HTTP response body
async fn parse_success_response<R: DeserializeOwned>(
    provider: &str,
    response: reqwest::Response,
) -> LlmResult<R> {
    let raw_body = response.text().await.map_err(|e| {
        log_error!(provider = provider, error = %e, "Failed to read response body");
        LlmError::response_parsing_error(format!("Failed to read {provider} response: {e}"))
    })?;

    serde_json::from_str(&raw_body).map_err(|e| {
        log_error!(
            provider = provider,
            error = %e,
            raw_body = %raw_body,
            "Failed to parse response"
        );
        LlmError::response_parsing_error(format!("Invalid {provider} response: {e}"))
    })
}

/// Header value from a secret, reported as a credential problem on failure.
pub(crate) fn secret_header(field: &str, value: &str) -> LlmResult<HeaderValue> {
    let mut header = HeaderValue::from_str(value)
        .map_err(|e| LlmError::invalid_api_key(field, format!("Invalid header value: {e}")))?;
    header.set_sensitive(true);
    Ok(header)
}

/// Validate an endpoint and strip its trailing slash.
pub(crate) fn normalize_endpoint(field: &str, value: &str) -> LlmResult<String> {
    let parsed = url::Url::parse(value)
        .map_err(|e| LlmError::invalid_endpoint(field, format!("Invalid URL '{value}': {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(LlmError::invalid_endpoint(
            field,
            format!("Unsupported URL scheme '{}'", parsed.scheme()),
        ));
    }
    Ok(value.trim_end_matches('/').to_string())
}
