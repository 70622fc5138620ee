//! Anthropic Claude handler
//!
//! This handler uses Anthropic's native Messages API.
//!
//! ## Module Organization
//!
//! - `types`: Request/response structures for Anthropic API
//! - `conversion`: Message conversion between router and Anthropic formats
//! - `provider`: Main handler implementation
//!
//! The request types and conversion are shared with the Bedrock handler,
//! which sends the same body over a signed transport.

pub(crate) mod conversion;
mod provider;
pub(crate) mod types;

#[cfg(test)]
mod tests;

pub use provider::{AnthropicHandler, ANTHROPIC_DEFAULT_MODEL, ANTHROPIC_MODELS};
pub use types::{AnthropicRequest, SystemBlock as AnthropicSystemBlock};
