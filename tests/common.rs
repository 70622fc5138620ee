//! Test helper utilities for llm-router integration tests
//!
//! Fixtures shared by the HTTP-level tests: config maps pointed at a
//! wiremock server, canned provider responses and conversations.

// Allow dead code in test utilities - functions are used across different test files
#![allow(dead_code)]

use llm_router::config::ConfigMap;
use llm_router::env::MapEnv;
use llm_router::messages::Message;
use serde_json::{json, Value};

/// Config map with retries disabled so error tests fail fast.
pub fn config_map(pairs: &[(&str, Value)]) -> ConfigMap {
    let mut map: ConfigMap = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect();
    map.entry("max_retries").or_insert(json!(0));
    map
}

/// Environment with nothing set; every value comes from the config map.
pub fn empty_env() -> MapEnv {
    MapEnv::new()
}

pub fn hello() -> Vec<Message> {
    vec![Message::user("Hello")]
}

pub fn conversation() -> Vec<Message> {
    vec![
        Message::system("You are terse"),
        Message::user("Hi"),
        Message::assistant("Hello!"),
        Message::user("What is Rust?"),
    ]
}

// ============================================================================
// Canned provider responses
// ============================================================================

pub fn openai_response(content: &str) -> Value {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "gpt-4o",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
    })
}

pub fn anthropic_response(text: &str) -> Value {
    json!({
        "id": "msg_123",
        "type": "message",
        "role": "assistant",
        "content": [{"type": "text", "text": text}],
        "model": "claude-3-5-sonnet-20241022",
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 10, "output_tokens": 5}
    })
}

pub fn gemini_response(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 4, "candidatesTokenCount": 2, "totalTokenCount": 6}
    })
}

pub fn error_body(message: &str) -> Value {
    json!({"error": {"message": message, "type": "invalid_request_error"}})
}
