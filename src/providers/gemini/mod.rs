//! Google Gemini handler
//!
//! Talks to the `generateContent` REST endpoint. Conversation turns become
//! alternating `user`/`model` contents and the system prompt travels as a
//! separate `systemInstruction`.

mod provider;
pub mod types;

pub use provider::{GeminiHandler, GEMINI_DEFAULT_MODEL, GEMINI_MODELS};
