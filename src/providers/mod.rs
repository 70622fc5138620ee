//! LLM handler implementations
//!
//! One handler per provider family, all behind the [`LlmHandler`] trait:
//!
//! - **openai**: OpenAI, switching to the Azure client for `azure.com` endpoints
//! - **anthropic**: Anthropic Messages API
//! - **bedrock**: Anthropic models on AWS Bedrock (SigV4 signed)
//! - **gemini**: Google Gemini `generateContent`
//! - **ollama**: local Ollama through its OpenAI-compatible endpoint
//! - **openai_compatible**: OpenAI-native, Azure and Claude gateways sharing
//!   the OpenAI protocol
//!
//! ## Architecture
//!
//! ```text
//! openai_shared/      <- OpenAI chat-completions types and client
//!      |         |              |
//! openai.rs  ollama.rs  openai_compatible.rs
//!
//! anthropic/          <- Messages API types and conversion
//!      |
//! bedrock/            <- same body, SigV4 signed transport
//!
//! gemini/             <- generateContent
//! ```
//!
//! Each handler owns exactly one client, built at construction and reused
//! for every call. Construction failures are returned as errors and leave no
//! handler behind.

pub mod anthropic;
pub mod bedrock;
pub mod gemini;
pub(crate) mod http;
pub mod ollama;
pub mod openai;
pub mod openai_compatible;
pub mod openai_shared;

pub use anthropic::AnthropicHandler;
pub use bedrock::BedrockHandler;
pub use gemini::GeminiHandler;
pub use ollama::OllamaHandler;
pub use openai::OpenAIHandler;
pub use openai_compatible::{
    OpenAICompatibleAzureHandler, OpenAICompatibleClaudeHandler, OpenAINativeHandler,
};

use crate::error::LlmResult;
use crate::logging::log_warn;
use crate::messages::Message;

use async_trait::async_trait;
use serde::Serialize;
use std::fmt::Debug;

/// Prompt sent by [`LlmHandler::is_valid`] probes.
pub const PROBE_PROMPT: &str = "Test";

/// Common contract of every provider handler.
///
/// `invoke` returns plain text: an empty string when the provider produced
/// no choice or content block, an error only when the call itself failed.
#[async_trait]
pub trait LlmHandler: Send + Sync + Debug {
    /// Canonical provider name.
    fn provider_name(&self) -> &'static str;

    /// Model the handler sends requests to.
    fn get_model(&self) -> ModelInfo;

    /// Run a non-streaming chat completion and return its text.
    async fn invoke(&self, messages: &[Message], system_prompt: Option<&str>)
        -> LlmResult<String>;

    /// Confirm the credentials with a one-token call. Never fails.
    async fn is_valid(&self) -> bool;
}

/// Resolved model identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelInfo {
    pub id: String,
    /// Output token ceiling, for providers that require one.
    pub max_tokens: Option<u32>,
}

impl ModelInfo {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            max_tokens: None,
        }
    }
}

/// Entry of a provider's static model list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportedModel {
    pub id: &'static str,
    pub max_tokens: u32,
}

impl SupportedModel {
    pub const fn new(id: &'static str, max_tokens: u32) -> Self {
        Self { id, max_tokens }
    }

    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            id: self.id.to_string(),
            max_tokens: Some(self.max_tokens),
        }
    }
}

/// Resolve a configured id against a provider's model list.
///
/// Unknown ids fall back to `default` with a warning rather than failing.
pub(crate) fn resolve_model(
    provider: &str,
    models: &[SupportedModel],
    configured: &str,
    default: SupportedModel,
) -> SupportedModel {
    match models.iter().find(|m| m.id == configured) {
        Some(model) => *model,
        None => {
            log_warn!(
                provider = provider,
                requested_model = configured,
                fallback_model = default.id,
                "Unknown model id, falling back to provider default"
            );
            default
        }
    }
}

/// Log an `is_valid` probe failure without propagating it.
pub(crate) fn report_probe(provider: &str, result: LlmResult<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            crate::logging::log_error!(
                provider = provider,
                error = %e,
                "Error validating provider credentials"
            );
            false
        }
    }
}
