//! Provider/model capability table
//!
//! The table is the single source of truth for what the router accepts:
//! which providers exist, which models each one serves, which environment
//! keys must be configured for a model, and which handler builds it.
//!
//! ```text
//! Provider -> model id -> ModelEntry { required_config, binding }
//! ```
//!
//! Handlers are bound statically through [`HandlerBinding`]; a binding is a
//! named constructor, so custom tables can admit handlers defined outside
//! this crate.

use crate::config::ConfigMap;
use crate::env::{EnvSource, EnvVar};
use crate::error::{LlmError, LlmResult};
use crate::logging::log_debug;
use crate::providers::{
    AnthropicHandler, BedrockHandler, GeminiHandler, LlmHandler, OllamaHandler,
    OpenAICompatibleAzureHandler, OpenAICompatibleClaudeHandler, OpenAIHandler,
    OpenAINativeHandler,
};
use crate::providers::{anthropic::ANTHROPIC_MODELS, bedrock::BEDROCK_MODELS, gemini::GEMINI_MODELS};

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

// ============================================================================
// Provider
// ============================================================================

/// Canonical provider identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Provider {
    OpenAI,
    OpenAINative,
    Anthropic,
    Bedrock,
    Gemini,
    Ollama,
    OpenAICompatibleAzure,
    OpenAICompatibleClaude,
}

impl Provider {
    pub const ALL: [Provider; 8] = [
        Self::OpenAI,
        Self::OpenAINative,
        Self::Anthropic,
        Self::Bedrock,
        Self::Gemini,
        Self::Ollama,
        Self::OpenAICompatibleAzure,
        Self::OpenAICompatibleClaude,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::OpenAINative => "openai-native",
            Self::Anthropic => "anthropic",
            Self::Bedrock => "bedrock",
            Self::Gemini => "gemini",
            Self::Ollama => "ollama",
            Self::OpenAICompatibleAzure => "openai-compatible-azure",
            Self::OpenAICompatibleClaude => "openai-compatible-claude",
        }
    }

    /// Comma separated list of canonical ids, for error messages.
    pub fn allowed_values() -> String {
        Self::ALL.iter().map(|p| p.as_str()).collect::<Vec<_>>().join(", ")
    }

    /// Environment keys every model of this provider needs.
    pub fn required_config(self) -> Vec<EnvVar> {
        match self {
            Self::OpenAI => vec![EnvVar::OpenAiApiKey, EnvVar::OpenAiBaseUrl],
            Self::OpenAINative => vec![EnvVar::OpenAiApiKey, EnvVar::OpenAiApiBase],
            Self::Anthropic => vec![EnvVar::AnthropicApiKey],
            Self::Bedrock => vec![
                EnvVar::AwsBedrockAccessKey,
                EnvVar::AwsBedrockSecretKey,
                EnvVar::AwsBedrockRegion,
            ],
            Self::Gemini => vec![EnvVar::GeminiApiKey],
            Self::Ollama => vec![EnvVar::OllamaBaseUrl],
            Self::OpenAICompatibleAzure => vec![
                EnvVar::AzureAiApiKey,
                EnvVar::AzureAiApiBase,
                EnvVar::AzureAiApiVersion,
            ],
            Self::OpenAICompatibleClaude => vec![EnvVar::ClaudeApiKey, EnvVar::ClaudeEndpoint],
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = LlmError;

    /// Case-insensitive; `_` and `-` are interchangeable.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "openai" => Ok(Self::OpenAI),
            "openai-native" => Ok(Self::OpenAINative),
            "anthropic" => Ok(Self::Anthropic),
            "bedrock" | "aws-bedrock" | "aws-bedrock-claude" => Ok(Self::Bedrock),
            "gemini" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            "openai-compatible-azure" => Ok(Self::OpenAICompatibleAzure),
            "openai-compatible-claude" => Ok(Self::OpenAICompatibleClaude),
            _ => Err(LlmError::provider_not_found(s.trim())),
        }
    }
}

// ============================================================================
// Handler bindings
// ============================================================================

/// Constructor of a handler from a config map.
pub type HandlerFactory = fn(&ConfigMap, &dyn EnvSource) -> LlmResult<Arc<dyn LlmHandler>>;

/// Named handler constructor.
#[derive(Clone, Copy)]
pub struct HandlerBinding {
    name: &'static str,
    factory: HandlerFactory,
}

impl fmt::Debug for HandlerBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HandlerBinding").field(&self.name).finish()
    }
}

impl PartialEq for HandlerBinding {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

fn bind<H: LlmHandler + 'static>(
    build: fn(&ConfigMap, &dyn EnvSource) -> LlmResult<H>,
    raw: &ConfigMap,
    env: &dyn EnvSource,
) -> LlmResult<Arc<dyn LlmHandler>> {
    Ok(Arc::new(build(raw, env)?))
}

impl HandlerBinding {
    pub const fn new(name: &'static str, factory: HandlerFactory) -> Self {
        Self { name, factory }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Built-in handler for a provider.
    pub fn for_provider(provider: Provider) -> Self {
        match provider {
            Provider::OpenAI => Self::new("OpenAIHandler", |raw, env| bind(OpenAIHandler::new, raw, env)),
            Provider::OpenAINative => {
                Self::new("OpenAINativeHandler", |raw, env| bind(OpenAINativeHandler::new, raw, env))
            }
            Provider::Anthropic => {
                Self::new("AnthropicHandler", |raw, env| bind(AnthropicHandler::new, raw, env))
            }
            Provider::Bedrock => Self::new("BedrockHandler", |raw, env| bind(BedrockHandler::new, raw, env)),
            Provider::Gemini => Self::new("GeminiHandler", |raw, env| bind(GeminiHandler::new, raw, env)),
            Provider::Ollama => Self::new("OllamaHandler", |raw, env| bind(OllamaHandler::new, raw, env)),
            Provider::OpenAICompatibleAzure => Self::new("OpenAICompatibleAzureHandler", |raw, env| {
                bind(OpenAICompatibleAzureHandler::new, raw, env)
            }),
            Provider::OpenAICompatibleClaude => Self::new("OpenAICompatibleClaudeHandler", |raw, env| {
                bind(OpenAICompatibleClaudeHandler::new, raw, env)
            }),
        }
    }

    /// Construct a fresh handler. Nothing is cached.
    pub fn build(&self, raw: &ConfigMap, env: &dyn EnvSource) -> LlmResult<Arc<dyn LlmHandler>> {
        log_debug!(handler = self.name, "Building handler");
        (self.factory)(raw, env)
    }
}

/// Build an uncached handler for `provider` from a caller-supplied config.
///
/// # Errors
///
/// - [`LlmError::ConfigurationError`] when `provider` is blank
/// - [`LlmError::ProviderNotFound`] for unknown providers
/// - any error of the handler's own construction
pub fn build_handler(
    provider: &str,
    raw: &ConfigMap,
    env: &dyn EnvSource,
) -> LlmResult<Arc<dyn LlmHandler>> {
    if provider.trim().is_empty() {
        return Err(LlmError::configuration_error(format!(
            "Provider is required. Allowed values: {}",
            Provider::allowed_values()
        )));
    }
    let provider: Provider = provider.parse()?;
    HandlerBinding::for_provider(provider).build(raw, env)
}

// ============================================================================
// Capability table
// ============================================================================

/// What the table knows about one `(provider, model)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelEntry {
    pub provider: Provider,
    pub model_id: String,
    pub required_config: Vec<EnvVar>,
    /// `None` leaves the model listed but not dispatchable.
    pub binding: Option<HandlerBinding>,
}

impl ModelEntry {
    /// Fail with the first required key that neither it nor one of its
    /// alternatives resolves to a value.
    pub fn check_required_config(&self, env: &dyn EnvSource) -> LlmResult<()> {
        let unresolved = |var: &EnvVar| var.resolve(env).is_none();
        match self
            .required_config
            .iter()
            .find(|var| unresolved(*var) && var.alternatives().iter().all(|alt| unresolved(alt)))
        {
            Some(var) => Err(LlmError::missing_configuration(var.key())),
            None => Ok(()),
        }
    }

    pub fn binding(&self) -> LlmResult<HandlerBinding> {
        self.binding.ok_or_else(|| {
            LlmError::handler_not_found(self.provider.as_str(), self.model_id.as_str())
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct CapabilityTable {
    providers: BTreeMap<Provider, BTreeMap<String, ModelEntry>>,
}

impl CapabilityTable {
    /// Table with no providers.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every built-in provider with its supported models.
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for provider in Provider::ALL {
            let binding = Some(HandlerBinding::for_provider(provider));
            for model in builtin_models(provider) {
                table.register(provider, model, provider.required_config(), binding);
            }
        }
        table
    }

    /// Add or replace a model entry.
    pub fn register(
        &mut self,
        provider: Provider,
        model_id: impl Into<String>,
        required_config: Vec<EnvVar>,
        binding: Option<HandlerBinding>,
    ) -> &mut Self {
        let model_id = model_id.into().trim().to_string();
        self.providers.entry(provider).or_default().insert(
            model_id.clone(),
            ModelEntry {
                provider,
                model_id,
                required_config,
                binding,
            },
        );
        self
    }

    /// Look up a `(provider, model)` pair.
    ///
    /// Model ids match exactly after trimming, or case-insensitively.
    pub fn resolve(&self, provider: &str, model: &str) -> LlmResult<&ModelEntry> {
        let parsed: Provider = provider.parse()?;
        let models = self
            .providers
            .get(&parsed)
            .ok_or_else(|| LlmError::provider_not_found(parsed.as_str()))?;

        let model = model.trim();
        models
            .get(model)
            .or_else(|| {
                models
                    .values()
                    .find(|entry| entry.model_id.eq_ignore_ascii_case(model))
            })
            .ok_or_else(|| LlmError::model_not_found(parsed.as_str(), model))
    }

    pub fn providers(&self) -> impl Iterator<Item = Provider> + '_ {
        self.providers.keys().copied()
    }

    /// Model ids registered for a provider, sorted.
    pub fn supported_models(&self, provider: Provider) -> Vec<&str> {
        self.providers
            .get(&provider)
            .map(|models| models.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

fn builtin_models(provider: Provider) -> Vec<&'static str> {
    match provider {
        Provider::OpenAI => vec!["gpt-4o", "gpt-4o-mini", "gpt-4-turbo", "gpt-4"],
        Provider::OpenAINative | Provider::OpenAICompatibleAzure => vec!["gpt-4o", "gpt-4o-mini"],
        Provider::OpenAICompatibleClaude => vec!["anthropic.claude-3-5-sonnet-20240620-v1:0"],
        Provider::Anthropic => ANTHROPIC_MODELS.iter().map(|m| m.id).collect(),
        Provider::Bedrock => BEDROCK_MODELS.iter().map(|m| m.id).collect(),
        Provider::Gemini => GEMINI_MODELS.to_vec(),
        Provider::Ollama => vec!["llama3.1", "llama3.2", "mistral", "gemma2", "qwen2.5"],
    }
}
