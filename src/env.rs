//! Environment lookup for provider configuration.
//!
//! Handlers and the router never read the process environment directly. They
//! resolve an [`EnvVar`] through an [`EnvSource`], which is [`ProcessEnv`] in
//! production and [`MapEnv`] in embedding code and tests.
//!
//! Lookup semantics are the same for every key:
//! - set and non-blank: the trimmed value
//! - set but blank: absent (the static default does not apply)
//! - unset: the key's static default, or absent when it has none

use std::collections::HashMap;
use std::fmt;

/// Source of raw environment values.
#[cfg_attr(test, mockall::automock)]
pub trait EnvSource: Send + Sync {
    /// Raw value of `key`, or `None` when it is unset.
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads the real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Fixed in-memory environment.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Builder-style setter keyed by [`EnvVar`].
    pub fn with_var(self, var: EnvVar, value: impl Into<String>) -> Self {
        self.with(var.key(), value)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) {
        self.vars.remove(key);
    }
}

impl EnvSource for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Every environment key the router understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvVar {
    DefaultApiProvider,
    DefaultModel,
    OpenAiApiKey,
    AzureOpenAiApiKey,
    OpenAiBaseUrl,
    OpenAiApiVersion,
    OpenAiApiBase,
    AzureAiApiKey,
    AzureAiApiBase,
    AzureAiApiVersion,
    ClaudeApiKey,
    ClaudeEndpoint,
    AnthropicApiKey,
    AnthropicBaseUrl,
    AnthropicBedrockBaseUrl,
    AwsBedrockAccessKey,
    AwsBedrockSecretKey,
    AwsBedrockSessionToken,
    AwsBedrockRegion,
    GeminiApiKey,
    GeminiBaseUrl,
    OllamaBaseUrl,
}

impl EnvVar {
    /// Name of the variable in the environment.
    pub fn key(self) -> &'static str {
        match self {
            Self::DefaultApiProvider => "DEFAULT_API_PROVIDER",
            Self::DefaultModel => "DEFAULT_MODEL",
            Self::OpenAiApiKey => "OPENAI_API_KEY",
            Self::AzureOpenAiApiKey => "AZURE_OPENAI_API_KEY",
            Self::OpenAiBaseUrl => "OPENAI_BASE_URL",
            Self::OpenAiApiVersion => "OPENAI_API_VERSION",
            Self::OpenAiApiBase => "OPENAI_API_BASE",
            Self::AzureAiApiKey => "AZUREAI_API_KEY",
            Self::AzureAiApiBase => "AZUREAI_API_BASE",
            Self::AzureAiApiVersion => "AZUREAI_API_VERSION",
            Self::ClaudeApiKey => "CLAUDE_API_KEY",
            Self::ClaudeEndpoint => "CLAUDE_ENDPOINT",
            Self::AnthropicApiKey => "ANTHROPIC_API_KEY",
            Self::AnthropicBaseUrl => "ANTHROPIC_BASE_URL",
            Self::AnthropicBedrockBaseUrl => "ANTHROPIC_BEDROCK_BASE_URL",
            Self::AwsBedrockAccessKey => "AWS_BEDROCK_ACCESS_KEY",
            Self::AwsBedrockSecretKey => "AWS_BEDROCK_SECRET_KEY",
            Self::AwsBedrockSessionToken => "AWS_BEDROCK_SESSION_TOKEN",
            Self::AwsBedrockRegion => "AWS_BEDROCK_REGION",
            Self::GeminiApiKey => "GEMINI_API_KEY",
            Self::GeminiBaseUrl => "GEMINI_BASE_URL",
            Self::OllamaBaseUrl => "OLLAMA_BASE_URL",
        }
    }

    /// Static default used when the variable is unset.
    pub fn default_value(self) -> Option<&'static str> {
        match self {
            Self::DefaultApiProvider => Some("openai"),
            Self::DefaultModel => Some("gpt-4o"),
            Self::OpenAiApiVersion => Some("2024-08-01-preview"),
            Self::AwsBedrockRegion => Some("us-west-1"),
            Self::OpenAiBaseUrl | Self::OpenAiApiBase => Some("https://api.openai.com/v1"),
            Self::AnthropicBaseUrl => Some("https://api.anthropic.com"),
            Self::GeminiBaseUrl => Some("https://generativelanguage.googleapis.com"),
            Self::OllamaBaseUrl => Some("http://localhost:11434"),
            _ => None,
        }
    }

    /// Standard AWS variable consulted when the Bedrock-specific one is unset.
    pub fn fallback_key(self) -> Option<&'static str> {
        match self {
            Self::AwsBedrockAccessKey => Some("AWS_ACCESS_KEY_ID"),
            Self::AwsBedrockSecretKey => Some("AWS_SECRET_ACCESS_KEY"),
            Self::AwsBedrockSessionToken => Some("AWS_SESSION_TOKEN"),
            Self::AwsBedrockRegion => Some("AWS_REGION"),
            _ => None,
        }
    }

    /// Keys that satisfy a requirement on this one when it is unset.
    pub fn alternatives(self) -> &'static [EnvVar] {
        match self {
            Self::OpenAiApiKey => &[Self::AzureOpenAiApiKey],
            _ => &[],
        }
    }

    /// Resolve the variable against `env`.
    pub fn resolve(self, env: &dyn EnvSource) -> Option<String> {
        let keys = std::iter::once(self.key()).chain(self.fallback_key());
        for key in keys {
            if let Some(raw) = env.var(key) {
                let trimmed = raw.trim();
                return (!trimmed.is_empty()).then(|| trimmed.to_string());
            }
        }
        self.default_value().map(str::to_string)
    }
}

impl fmt::Display for EnvVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
