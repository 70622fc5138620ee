//! Shared OpenAI-compatible API structures and client
//!
//! Used by every handler that speaks the chat-completions protocol:
//! OpenAI and Azure OpenAI, Ollama, and the compatible gateways.
//!
//! - `types` - request/response structures
//! - `client` - HTTP client for `/chat/completions`

pub mod client;
pub mod types;

pub use client::OpenAICompatibleClient;
pub use types::*;
