//! AWS Bedrock handler for Anthropic models
//!
//! Reuses the Anthropic request body and conversion; the transport differs:
//! the model goes in the URL, the API version in the body, and every
//! request is signed with AWS Signature Version 4.

mod provider;
pub mod sigv4;

pub use provider::{BedrockHandler, BEDROCK_DEFAULT_MODEL, BEDROCK_MODELS};
pub use sigv4::SigV4Signer;
