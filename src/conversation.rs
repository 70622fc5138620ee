//! Chat agent and prompt composition helpers

use crate::error::LlmResult;
use crate::messages::{prepare_messages, Message};
use crate::router::Router;

pub const DEFAULT_SYSTEM_MESSAGE: &str = "You are helpful assistant";

/// Prefix a prompt with retrieved references the answer must stay within.
pub fn knowledge_base_prompt(prompt: &str, references: &[String]) -> String {
    format!(
        "\n\nConsider these references as strict constraints:\n{}\n\nMake sure all responses adhere to these strict exclusivity rules.\n\nUser Query:\n{prompt}",
        references.join("\n")
    )
}

/// Conversational front end that always leads with its system message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatAgent {
    system_message: String,
}

impl Default for ChatAgent {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_MESSAGE)
    }
}

impl ChatAgent {
    pub fn new(system_message: impl Into<String>) -> Self {
        Self {
            system_message: system_message.into(),
        }
    }

    pub fn system_message(&self) -> &str {
        &self.system_message
    }

    /// System message, then history, then `message` as the last user turn.
    pub fn prepare_messages(&self, message: &str, history: &[Message]) -> LlmResult<Vec<Message>> {
        prepare_messages(message, history, Some(&self.system_message))
    }

    /// Prepare the conversation and run it through `router`.
    pub async fn chat(
        &self,
        router: &Router,
        provider: &str,
        model: &str,
        message: &str,
        history: &[Message],
    ) -> LlmResult<String> {
        let messages = self.prepare_messages(message, history)?;
        router.execute(&messages, provider, model).await
    }
}
