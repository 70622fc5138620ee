//! Integration Tests for the OpenAI-compatible handler family
//!
//! UNIT UNDER TEST: OpenAINativeHandler, OpenAICompatibleAzureHandler,
//! OpenAICompatibleClaudeHandler, OllamaHandler
//!
//! BUSINESS RESPONSIBILITY:
//!   - Reach each backend through the OpenAI chat-completions protocol
//!   - Authenticate the way each backend expects
//!   - Pass model ids through to the request
//!
//! TEST COVERAGE:
//!   - Native bearer requests
//!   - Azure deployment path, api-version query and api-key header
//!   - Claude gateway endpoint
//!   - Ollama's /v1 endpoint without credentials
//!   - Required configuration per handler

use llm_router::env::{EnvVar, MapEnv};
use llm_router::error::LlmError;
use llm_router::providers::{
    LlmHandler, OllamaHandler, OpenAICompatibleAzureHandler, OpenAICompatibleClaudeHandler,
    OpenAINativeHandler,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{config_map, empty_env, hello, openai_response};

#[tokio::test]
async fn test_native_handler_uses_bearer_auth() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-native"))
        .and(body_partial_json(json!({"model": "gpt-4o-mini"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(openai_response("native")))
        .expect(1)
        .mount(&server)
        .await;
    let env = MapEnv::new()
        .with_var(EnvVar::OpenAiApiKey, "sk-native")
        .with_var(EnvVar::OpenAiApiBase, format!("{}/v1", server.uri()));
    let raw = config_map(&[("model_id", json!("gpt-4o-mini"))]);

    // Act
    let handler = OpenAINativeHandler::new(&raw, &env).unwrap();
    let reply = handler.invoke(&hello(), None).await.unwrap();

    // Assert
    assert_eq!(reply, "native");
    assert_eq!(handler.provider_name(), "openai-native");
}

#[tokio::test]
async fn test_azure_handler_targets_deployment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/openai/deployments/gpt-4o/chat/completions"))
        .and(query_param("api-version", "2024-08-01-preview"))
        .and(header("api-key", "azure-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(openai_response("azure")))
        .expect(1)
        .mount(&server)
        .await;
    let raw = config_map(&[
        ("model_id", json!("gpt-4o")),
        ("api_key", json!("azure-key")),
        ("api_base", json!(server.uri())),
        ("api_version", json!("2024-08-01-preview")),
    ]);

    let handler = OpenAICompatibleAzureHandler::new(&raw, &empty_env()).unwrap();
    let reply = handler.invoke(&hello(), None).await.unwrap();

    assert_eq!(reply, "azure");
    assert_eq!(handler.provider_name(), "openai-compatible-azure");
}

#[tokio::test]
async fn test_claude_handler_uses_gateway_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/gateway/chat/completions"))
        .and(header("authorization", "Bearer claude-key"))
        .and(body_partial_json(json!({"model": "anthropic.claude-3-5-sonnet-20240620-v1:0"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(openai_response("claude")))
        .expect(1)
        .mount(&server)
        .await;
    let env = MapEnv::new()
        .with_var(EnvVar::ClaudeApiKey, "claude-key")
        .with_var(EnvVar::ClaudeEndpoint, format!("{}/gateway", server.uri()));
    let raw = config_map(&[("model_id", json!("anthropic.claude-3-5-sonnet-20240620-v1:0"))]);

    let handler = OpenAICompatibleClaudeHandler::new(&raw, &env).unwrap();

    assert_eq!(handler.invoke(&hello(), None).await.unwrap(), "claude");
    assert_eq!(handler.provider_name(), "openai-compatible-claude");
}

#[tokio::test]
async fn test_ollama_handler_calls_v1_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({"model": "llama3.1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(openai_response("local")))
        .expect(1)
        .mount(&server)
        .await;
    let raw = config_map(&[("model_id", json!("llama3.1")), ("base_url", json!(server.uri()))]);

    let handler = OllamaHandler::new(&raw, &empty_env()).unwrap();

    assert_eq!(handler.invoke(&hello(), None).await.unwrap(), "local");
    assert_eq!(handler.provider_name(), "ollama");
}

#[test]
fn test_azure_handler_requires_api_version() {
    let raw = config_map(&[
        ("model_id", json!("gpt-4o")),
        ("api_key", json!("azure-key")),
        ("api_base", json!("https://example.openai.azure.com")),
    ]);

    let err = OpenAICompatibleAzureHandler::new(&raw, &empty_env()).unwrap_err();

    assert!(err.is_configuration_error());
    assert!(err.to_string().contains("api_version"));
}

#[test]
fn test_claude_handler_requires_endpoint() {
    let env = MapEnv::new().with_var(EnvVar::ClaudeApiKey, "claude-key");
    let raw = config_map(&[("model_id", json!("anthropic.claude-3-5-sonnet-20240620-v1:0"))]);

    let err = OpenAICompatibleClaudeHandler::new(&raw, &env).unwrap_err();

    assert!(matches!(err, LlmError::InvalidEndpoint { ref field, .. } if field == "endpoint"));
}
