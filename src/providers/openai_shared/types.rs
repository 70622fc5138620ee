//! OpenAI-compatible data structures and types

use crate::messages::{Message, MessageRole};
use crate::providers::PROBE_PROMPT;
use serde::{Deserialize, Serialize};

/// OpenAI-compatible message structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAIMessage {
    pub role: String,
    pub content: String,
}

impl From<&Message> for OpenAIMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role.as_str().to_string(),
            content: message.content.clone(),
        }
    }
}

/// OpenAI-compatible chat completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIRequest {
    pub model: String,
    pub messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

impl OpenAIRequest {
    /// Non-streaming chat request. A non-blank system prompt becomes the
    /// first message.
    pub fn chat(model: &str, messages: &[Message], system_prompt: Option<&str>) -> Self {
        let mut chat_messages = Vec::with_capacity(messages.len() + 1);
        if let Some(system) = system_prompt.map(str::trim).filter(|s| !s.is_empty()) {
            chat_messages.push(OpenAIMessage::from(&Message::new(MessageRole::System, system)));
        }
        chat_messages.extend(messages.iter().map(OpenAIMessage::from));

        Self {
            model: model.to_string(),
            messages: chat_messages,
            temperature: None,
            max_tokens: None,
            stream: Some(false),
        }
    }

    /// One-token request used to check credentials.
    pub fn probe(model: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![OpenAIMessage::from(&Message::user(PROBE_PROMPT))],
            temperature: Some(0.0),
            max_tokens: Some(1),
            stream: Some(false),
        }
    }
}

/// OpenAI-compatible chat completion response
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OpenAIResponse {
    #[serde(default)]
    pub choices: Vec<OpenAIChoice>,
    #[serde(default)]
    pub usage: Option<OpenAIUsage>,
}

impl OpenAIResponse {
    /// Content of the first choice, or an empty string.
    pub fn first_text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default()
    }
}

/// Choice in OpenAI response
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OpenAIChoice {
    pub message: OpenAIResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Message in OpenAI response choice
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OpenAIResponseMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Usage information in OpenAI response; gateways may omit any count.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct OpenAIUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}
