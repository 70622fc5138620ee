//! Test helpers shared by the unit tests

use crate::capabilities::{CapabilityTable, HandlerBinding, Provider};
use crate::config::ConfigMap;
use crate::env::{EnvSource, EnvVar, MapEnv};
use crate::error::{LlmError, LlmResult};
use crate::messages::{Message, MessageRole};
use crate::providers::{LlmHandler, ModelInfo};

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

/// Environment with credentials for every provider.
pub fn create_test_env() -> MapEnv {
    MapEnv::new()
        .with_var(EnvVar::OpenAiApiKey, "sk-test")
        .with_var(EnvVar::AnthropicApiKey, "sk-ant-test")
        .with_var(EnvVar::AwsBedrockAccessKey, "AKIDEXAMPLE")
        .with_var(EnvVar::AwsBedrockSecretKey, "bedrock-secret")
        .with_var(EnvVar::GeminiApiKey, "gemini-key")
        .with_var(EnvVar::AzureAiApiKey, "azure-key")
        .with_var(EnvVar::AzureAiApiBase, "https://example.openai.azure.com")
        .with_var(EnvVar::AzureAiApiVersion, "2024-08-01-preview")
        .with_var(EnvVar::ClaudeApiKey, "claude-key")
        .with_var(EnvVar::ClaudeEndpoint, "https://claude-gateway.example.com/v1")
}

/// Config map from `(key, value)` pairs.
pub fn config_map(pairs: &[(&str, Value)]) -> ConfigMap {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

pub fn model_map(model_id: &str) -> ConfigMap {
    config_map(&[("model_id", json!(model_id))])
}

// ============================================================================
// Stub handlers
// ============================================================================

/// Replies with the model id and the last user message.
#[derive(Debug)]
pub struct EchoHandler {
    pub model: String,
}

#[async_trait]
impl LlmHandler for EchoHandler {
    fn provider_name(&self) -> &'static str {
        "echo"
    }

    fn get_model(&self) -> ModelInfo {
        ModelInfo::new(self.model.clone())
    }

    async fn invoke(&self, messages: &[Message], system_prompt: Option<&str>) -> LlmResult<String> {
        let last = messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        Ok(match system_prompt {
            Some(system) => format!("{}|{system}|{last}", self.model),
            None => format!("{}|{last}", self.model),
        })
    }

    async fn is_valid(&self) -> bool {
        true
    }
}

/// Fails every call with a provider error.
#[derive(Debug)]
pub struct FailingHandler;

#[async_trait]
impl LlmHandler for FailingHandler {
    fn provider_name(&self) -> &'static str {
        "failing"
    }

    fn get_model(&self) -> ModelInfo {
        ModelInfo::new("failing")
    }

    async fn invoke(&self, _messages: &[Message], _system_prompt: Option<&str>) -> LlmResult<String> {
        Err(LlmError::provider_status(503, "stub provider unavailable"))
    }

    async fn is_valid(&self) -> bool {
        false
    }
}

fn model_id_of(raw: &ConfigMap) -> String {
    raw.get("model_id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

pub fn echo_binding() -> HandlerBinding {
    HandlerBinding::new("EchoHandler", |raw: &ConfigMap, _env: &dyn EnvSource| {
        Ok(Arc::new(EchoHandler {
            model: model_id_of(raw),
        }) as Arc<dyn LlmHandler>)
    })
}

pub fn failing_binding() -> HandlerBinding {
    HandlerBinding::new("FailingHandler", |_raw: &ConfigMap, _env: &dyn EnvSource| {
        Ok(Arc::new(FailingHandler) as Arc<dyn LlmHandler>)
    })
}

pub fn broken_binding() -> HandlerBinding {
    HandlerBinding::new("BrokenHandler", |_raw: &ConfigMap, _env: &dyn EnvSource| {
        Err(LlmError::invalid_api_key("api_key", "Field required"))
    })
}

/// Table routing `anthropic` models to stub handlers:
/// - `echo-model`, `echo-other`: [`EchoHandler`]
/// - `failing-model`: [`FailingHandler`]
/// - `broken-model`: construction fails
/// - `unbound-model`: no handler binding
pub fn create_stub_table() -> CapabilityTable {
    let mut table = CapabilityTable::empty();
    table
        .register(Provider::Anthropic, "echo-model", vec![EnvVar::AnthropicApiKey], Some(echo_binding()))
        .register(Provider::Anthropic, "echo-other", vec![EnvVar::AnthropicApiKey], Some(echo_binding()))
        .register(Provider::Anthropic, "failing-model", vec![], Some(failing_binding()))
        .register(Provider::Anthropic, "broken-model", vec![], Some(broken_binding()))
        .register(Provider::Anthropic, "unbound-model", vec![], None);
    table
}
