//! Conversation messages
//!
//! A conversation is an ordered list of [`Message`]s. A system message, if
//! present, comes first; the remaining turns are chronological and the
//! current user prompt is always last.

use crate::error::{LlmError, LlmResult};
use crate::logging::log_warn;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageRole {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "system" => Ok(Self::System),
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            other => Err(LlmError::invalid_request(format!(
                "Unknown message role '{other}'"
            ))),
        }
    }
}

/// A single chat turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// Assemble a conversation for a single request.
///
/// The system message (when non-blank) goes first, then the history, then
/// the prompt as the final user turn. System entries inside the history are
/// dropped since only the leading system message is honoured.
pub fn prepare_messages(
    prompt: &str,
    history: &[Message],
    system_message: Option<&str>,
) -> LlmResult<Vec<Message>> {
    if prompt.trim().is_empty() {
        return Err(LlmError::invalid_request("Invalid prompt provided."));
    }

    let mut messages = Vec::with_capacity(history.len() + 2);
    if let Some(system) = system_message.filter(|s| !s.trim().is_empty()) {
        messages.push(Message::system(system));
    }

    for turn in history {
        if turn.role == MessageRole::System {
            log_warn!("Dropping system message found inside chat history");
            continue;
        }
        messages.push(turn.clone());
    }

    messages.push(Message::user(prompt));
    Ok(messages)
}

/// Parse chat history in its wire shape: `[{"user": "..."}, {"assistant": "..."}]`.
///
/// Each object normally holds a single role/content pair.
pub fn parse_chat_history(value: &Value) -> LlmResult<Vec<Message>> {
    let entries = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Array(entries) => entries,
        _ => return Err(LlmError::invalid_request("Chat history must be a list")),
    };

    let mut messages = Vec::new();
    for entry in entries {
        let Value::Object(turn) = entry else {
            return Err(LlmError::invalid_request(
                "Chat history entries must be objects",
            ));
        };
        for (role, content) in turn {
            let Value::String(content) = content else {
                return Err(LlmError::invalid_request(format!(
                    "Chat history content for '{role}' must be a string"
                )));
            };
            messages.push(Message::new(role.parse()?, content.clone()));
        }
    }
    Ok(messages)
}

/// Check the ordering rules of a conversation before dispatch.
pub fn validate_conversation(messages: &[Message]) -> LlmResult<()> {
    let Some(last) = messages.last() else {
        return Err(LlmError::invalid_request("Conversation cannot be empty"));
    };

    if let Some(position) = messages
        .iter()
        .skip(1)
        .position(|m| m.role == MessageRole::System)
    {
        return Err(LlmError::invalid_request(format!(
            "System message must be first, found at position {}",
            position + 1
        )));
    }

    if last.role != MessageRole::User {
        return Err(LlmError::invalid_request(
            "The last message must be the user prompt",
        ));
    }

    Ok(())
}
