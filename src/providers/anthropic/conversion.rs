//! Conversion between router messages and the Anthropic request format
//!
//! Anthropic keeps the system prompt out of the message list. System text
//! from the explicit prompt and from any leading system message is merged
//! into one structured `system` block; when that text is blank the field is
//! omitted entirely.

use super::types::{AnthropicContentBlock, AnthropicMessage, AnthropicRequest, AnthropicResponse, SystemBlock};
use crate::messages::{Message, MessageRole};
use crate::providers::PROBE_PROMPT;

/// Output ceiling used when the model list gives none.
pub const FALLBACK_MAX_TOKENS: u32 = 8192;

/// Merge system text and turn the remaining messages into Anthropic turns.
///
/// Consecutive messages with the same role are combined, since the API
/// expects alternating turns.
pub(crate) fn transform_messages(
    messages: &[Message],
    system_prompt: Option<&str>,
) -> (Option<Vec<SystemBlock>>, Vec<AnthropicMessage>) {
    let mut system_parts: Vec<&str> = Vec::new();
    if let Some(prompt) = system_prompt.map(str::trim).filter(|s| !s.is_empty()) {
        system_parts.push(prompt);
    }

    let mut turns: Vec<AnthropicMessage> = Vec::with_capacity(messages.len());
    for message in messages {
        if message.role == MessageRole::System {
            let text = message.content.trim();
            if !text.is_empty() {
                system_parts.push(text);
            }
            continue;
        }

        let role = message.role.as_str();
        match turns.last_mut() {
            Some(previous) if previous.role == role => {
                previous.content.push_str("\n\n");
                previous.content.push_str(&message.content);
            }
            _ => turns.push(AnthropicMessage {
                role: role.to_string(),
                content: message.content.clone(),
            }),
        }
    }

    let system = (!system_parts.is_empty()).then(|| vec![SystemBlock::text(system_parts.join("\n\n"))]);
    (system, turns)
}

/// Non-streaming request for `model` with its output ceiling.
pub(crate) fn build_request(
    model: Option<&str>,
    max_tokens: Option<u32>,
    messages: &[Message],
    system_prompt: Option<&str>,
) -> AnthropicRequest {
    let (system, messages) = transform_messages(messages, system_prompt);
    AnthropicRequest {
        model: model.map(str::to_string),
        anthropic_version: None,
        max_tokens: max_tokens.unwrap_or(FALLBACK_MAX_TOKENS),
        system,
        messages,
        temperature: None,
        stream: Some(false),
    }
}

/// One-token request used to check credentials.
pub(crate) fn build_probe(model: Option<&str>) -> AnthropicRequest {
    AnthropicRequest {
        model: model.map(str::to_string),
        anthropic_version: None,
        max_tokens: 1,
        system: None,
        messages: vec![AnthropicMessage {
            role: MessageRole::User.as_str().to_string(),
            content: PROBE_PROMPT.to_string(),
        }],
        temperature: Some(0.0),
        stream: Some(false),
    }
}

/// Text of the first text block, or an empty string.
pub(crate) fn extract_text(response: AnthropicResponse) -> String {
    response
        .content
        .into_iter()
        .find_map(|block| match block {
            AnthropicContentBlock::Text { text } => Some(text),
            AnthropicContentBlock::Other => None,
        })
        .unwrap_or_default()
}
