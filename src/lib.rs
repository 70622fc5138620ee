//! # llm-router
//!
//! Multi-provider LLM handler registry and router: OpenAI (and Azure
//! OpenAI), Anthropic, AWS Bedrock, Google Gemini, Ollama and
//! OpenAI-compatible gateways behind one dispatch contract.
//!
//! ## Key Features
//!
//! - **One handler contract**: `invoke`, `get_model` and `is_valid` on every provider
//! - **Capability table**: supported models and required configuration per provider
//! - **Handler cache**: one handler per `(provider, model)`, built exactly once
//! - **Typed configuration**: untyped maps validated and normalised with environment fallback
//! - **Batch generation**: bounded concurrent prompts with full failure reporting
//!
//! ## Example
//!
//! ```rust,no_run
//! use llm_router::{Message, Router};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let router = Router::from_env();
//! let messages = vec![Message::user("Hello, how are you?")];
//! let reply = router.execute(&messages, "anthropic", "claude-3-5-sonnet-20241022").await?;
//! println!("{reply}");
//! # Ok(())
//! # }
//! ```

#![allow(clippy::missing_errors_doc)]

// Logging utilities (re-exports tracing with log_* naming) - internal only
pub(crate) mod logging;

pub mod batch;
pub mod capabilities;
pub mod config;
pub mod conversation;
pub mod env;
pub mod error;
pub mod messages;
pub mod providers;
pub mod response_parser;
pub mod retry;
pub mod router;
pub mod selection;
pub mod settings;

#[cfg(test)]
mod tests;

pub use batch::{generate_documents, BatchConfig, BatchExecutor, DocumentRequest};
pub use capabilities::{build_handler, CapabilityTable, HandlerBinding, ModelEntry, Provider};
pub use config::{
    AnthropicConfig, AzureCompatibleConfig, BedrockConfig, ClaudeCompatibleConfig, ConfigMap,
    GeminiConfig, OllamaConfig, OpenAIConfig, OpenAINativeConfig, ProviderConfig,
};
pub use conversation::{knowledge_base_prompt, ChatAgent};
pub use env::{EnvSource, EnvVar, MapEnv, ProcessEnv};
pub use error::{BatchFailure, LlmError, LlmResult};
pub use messages::{parse_chat_history, prepare_messages, Message, MessageRole};
pub use providers::{
    AnthropicHandler, BedrockHandler, GeminiHandler, LlmHandler, ModelInfo, OllamaHandler,
    OpenAICompatibleAzureHandler, OpenAICompatibleClaudeHandler, OpenAIHandler,
    OpenAINativeHandler,
};
pub use response_parser::{strip_json_code_fence, ResponseParser};
pub use retry::RetryPolicy;
pub use router::{Router, VerificationReport, VerificationStatus};
pub use selection::ModelSelection;
pub use settings::GatewaySettings;
