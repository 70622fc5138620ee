//! Provider configuration models.
//!
//! Every handler is configured from an untyped key-value map
//! ([`ConfigMap`]). Each provider has a typed config struct that extracts,
//! normalises and validates the fields it needs:
//!
//! - string fields are trimmed; blank values are rejected
//! - `model_id` is required and lower-cased (except for Ollama tags)
//! - fields absent from the map are resolved from the environment through
//!   [`EnvVar`]; an explicit `null` means "absent" with no fallback
//! - `max_retries` defaults to [`DEFAULT_MAX_RETRIES`]
//!
//! Fields are validated in declaration order and the first failure is
//! reported, naming the field.

mod anthropic;
mod bedrock;
mod compatible;
mod gemini;
mod ollama;
mod openai;
pub mod validators;

pub use anthropic::AnthropicConfig;
pub use bedrock::BedrockConfig;
pub use compatible::{AzureCompatibleConfig, ClaudeCompatibleConfig, OpenAINativeConfig};
pub use gemini::GeminiConfig;
pub use ollama::OllamaConfig;
pub use openai::OpenAIConfig;

use crate::env::{EnvSource, EnvVar};
use crate::error::{LlmError, LlmResult};
use crate::retry::RetryPolicy;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Debug;

/// Untyped configuration input for a handler.
pub type ConfigMap = serde_json::Map<String, Value>;

/// Retries applied by provider clients when the map does not say otherwise.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Trait for provider-specific configuration
pub trait ProviderConfig: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + Sized {
    /// Canonical name of the provider this config belongs to.
    fn provider_name(&self) -> &'static str;

    /// Extract and validate the config from an untyped map.
    fn from_map(raw: &ConfigMap, env: &dyn EnvSource) -> LlmResult<Self>;

    /// Normalised model id.
    fn model_id(&self) -> &str;

    fn max_retries(&self) -> u32;

    /// Retry policy the provider client applies.
    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::from_max_retries(self.max_retries())
    }

    /// Render the normalised config back into a map.
    ///
    /// Absent optional fields are written as `null`, so feeding the result
    /// back through [`from_map`](Self::from_map) yields an equal config.
    fn to_map(&self) -> ConfigMap {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => ConfigMap::new(),
        }
    }
}

/// How a failing field is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// API keys and secrets, reported as [`LlmError::InvalidApiKey`].
    Credential,
    /// URLs and endpoints, reported as [`LlmError::InvalidEndpoint`].
    Endpoint,
    /// Everything else, reported as [`LlmError::ConfigurationError`].
    Setting,
}

impl FieldKind {
    pub(crate) fn error(self, field: &str, message: &str) -> LlmError {
        match self {
            Self::Credential => LlmError::invalid_api_key(field, message),
            Self::Endpoint => LlmError::invalid_endpoint(field, message),
            Self::Setting => LlmError::configuration_error(format!("{field}: {message}")),
        }
    }
}

enum Supplied {
    Missing,
    Null,
    Value(String),
}

/// Reads fields out of a [`ConfigMap`] with environment fallback.
pub(crate) struct FieldReader<'a> {
    raw: &'a ConfigMap,
    env: &'a dyn EnvSource,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(raw: &'a ConfigMap, env: &'a dyn EnvSource) -> Self {
        Self { raw, env }
    }

    fn supplied(&self, field: &str, kind: FieldKind) -> LlmResult<Supplied> {
        match self.raw.get(field) {
            None => Ok(Supplied::Missing),
            Some(Value::Null) => Ok(Supplied::Null),
            Some(Value::String(value)) => validators::empty_string(value)
                .map(Supplied::Value)
                .map_err(|message| kind.error(field, message)),
            Some(_) => Err(kind.error(field, "Input should be a valid string")),
        }
    }

    /// Optional string field with environment fallback.
    pub(crate) fn optional(
        &self,
        field: &str,
        kind: FieldKind,
        fallback: EnvVar,
    ) -> LlmResult<Option<String>> {
        match self.supplied(field, kind)? {
            Supplied::Missing => Ok(fallback.resolve(self.env)),
            Supplied::Null => Ok(None),
            Supplied::Value(value) => Ok(Some(value)),
        }
    }

    /// String field that must resolve to a value.
    pub(crate) fn required(
        &self,
        field: &str,
        kind: FieldKind,
        fallback: Option<EnvVar>,
    ) -> LlmResult<String> {
        let value = match fallback {
            Some(var) => self.optional(field, kind, var)?,
            None => match self.supplied(field, kind)? {
                Supplied::Value(value) => Some(value),
                Supplied::Missing | Supplied::Null => None,
            },
        };
        value.ok_or_else(|| kind.error(field, "Field required"))
    }

    pub(crate) fn model_id(&self, lowercase: bool) -> LlmResult<String> {
        let model_id = self.required("model_id", FieldKind::Setting, None)?;
        Ok(if lowercase {
            validators::to_lowercase(model_id)
        } else {
            model_id
        })
    }

    pub(crate) fn max_retries(&self) -> LlmResult<u32> {
        let invalid = || FieldKind::Setting.error("max_retries", "Input should be a valid integer");
        match self.raw.get("max_retries") {
            None | Some(Value::Null) => Ok(DEFAULT_MAX_RETRIES),
            Some(Value::Number(number)) => number
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(invalid),
            Some(Value::String(text)) => text.trim().parse::<u32>().map_err(|_| invalid()),
            Some(_) => Err(invalid()),
        }
    }
}

/// Build a [`ConfigMap`] holding only a model id.
pub fn model_only(model_id: &str) -> ConfigMap {
    let mut map = ConfigMap::new();
    map.insert("model_id".to_string(), Value::String(model_id.to_string()));
    map
}
