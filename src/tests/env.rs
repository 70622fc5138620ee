// Unit Tests for Environment Resolution
//
// UNIT UNDER TEST: EnvVar::resolve over EnvSource
//
// BUSINESS RESPONSIBILITY:
//   - Read configuration keys through an injectable source
//   - Treat blank values as absent and trim set values
//   - Apply static defaults only when a key is unset
//   - Consult standard AWS variables for Bedrock credentials
//
// TEST COVERAGE:
//   - Set, blank and unset lookups (mocked source)
//   - Fallback key ordering
//   - MapEnv builder behaviour

use crate::env::{EnvVar, MapEnv, MockEnvSource};
use mockall::predicate::eq;

#[test]
fn test_set_value_is_trimmed() {
    // Arrange
    let mut env = MockEnvSource::new();
    env.expect_var()
        .with(eq("OPENAI_API_KEY"))
        .times(1)
        .returning(|_| Some("  sk-test \n".to_string()));

    // Act
    let value = EnvVar::OpenAiApiKey.resolve(&env);

    // Assert
    assert_eq!(value.as_deref(), Some("sk-test"));
}

#[test]
fn test_blank_value_is_absent_even_with_default() {
    let mut env = MockEnvSource::new();
    env.expect_var()
        .with(eq("OPENAI_BASE_URL"))
        .returning(|_| Some("   ".to_string()));

    assert_eq!(EnvVar::OpenAiBaseUrl.resolve(&env), None);
}

#[test]
fn test_unset_value_uses_static_default() {
    let mut env = MockEnvSource::new();
    env.expect_var().returning(|_| None);

    assert_eq!(EnvVar::DefaultApiProvider.resolve(&env).as_deref(), Some("openai"));
    assert_eq!(EnvVar::DefaultModel.resolve(&env).as_deref(), Some("gpt-4o"));
    assert_eq!(EnvVar::AwsBedrockRegion.resolve(&env).as_deref(), Some("us-west-1"));
    assert_eq!(EnvVar::AnthropicApiKey.resolve(&env), None);
}

#[test]
fn test_bedrock_specific_key_wins_over_aws_standard_key() {
    let mut env = MockEnvSource::new();
    env.expect_var()
        .with(eq("AWS_BEDROCK_ACCESS_KEY"))
        .returning(|_| Some("AKIDBEDROCK".to_string()));
    env.expect_var()
        .with(eq("AWS_ACCESS_KEY_ID"))
        .never();

    assert_eq!(EnvVar::AwsBedrockAccessKey.resolve(&env).as_deref(), Some("AKIDBEDROCK"));
}

#[test]
fn test_aws_standard_key_used_when_bedrock_key_unset() {
    let env = MapEnv::new().with("AWS_SESSION_TOKEN", "token-123");

    assert_eq!(EnvVar::AwsBedrockSessionToken.resolve(&env).as_deref(), Some("token-123"));
}

#[test]
fn test_map_env_set_and_remove() {
    let mut env = MapEnv::new().with_var(EnvVar::GeminiApiKey, "g-key");
    assert_eq!(EnvVar::GeminiApiKey.resolve(&env).as_deref(), Some("g-key"));

    env.remove("GEMINI_API_KEY");
    assert_eq!(EnvVar::GeminiApiKey.resolve(&env), None);

    env.set("GEMINI_API_KEY", "other");
    assert_eq!(EnvVar::GeminiApiKey.resolve(&env).as_deref(), Some("other"));
    assert_eq!(EnvVar::GeminiApiKey.to_string(), "GEMINI_API_KEY");
}
