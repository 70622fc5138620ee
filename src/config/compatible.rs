//! Configs for the OpenAI-compatible handler family.
//!
//! These providers speak the OpenAI chat-completions protocol and every
//! field they need is required.

use super::{ConfigMap, FieldKind, FieldReader, ProviderConfig};
use crate::env::{EnvSource, EnvVar};
use crate::error::LlmResult;
use serde::{Deserialize, Serialize};

/// Native OpenAI through the compatible handler family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAINativeConfig {
    pub api_key: String,
    pub api_base: String,
    pub model_id: String,
    pub max_retries: u32,
}

impl ProviderConfig for OpenAINativeConfig {
    fn provider_name(&self) -> &'static str {
        "openai-native"
    }

    fn from_map(raw: &ConfigMap, env: &dyn EnvSource) -> LlmResult<Self> {
        let fields = FieldReader::new(raw, env);
        Ok(Self {
            api_key: fields.required(
                "api_key",
                FieldKind::Credential,
                Some(EnvVar::OpenAiApiKey),
            )?,
            api_base: fields.required(
                "api_base",
                FieldKind::Endpoint,
                Some(EnvVar::OpenAiApiBase),
            )?,
            model_id: fields.model_id(true)?,
            max_retries: fields.max_retries()?,
        })
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

/// Azure OpenAI deployment reached through the compatible handler family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AzureCompatibleConfig {
    pub api_key: String,
    pub api_base: String,
    pub api_version: String,
    pub model_id: String,
    pub max_retries: u32,
}

impl ProviderConfig for AzureCompatibleConfig {
    fn provider_name(&self) -> &'static str {
        "openai-compatible-azure"
    }

    fn from_map(raw: &ConfigMap, env: &dyn EnvSource) -> LlmResult<Self> {
        let fields = FieldReader::new(raw, env);
        Ok(Self {
            api_key: fields.required(
                "api_key",
                FieldKind::Credential,
                Some(EnvVar::AzureAiApiKey),
            )?,
            api_base: fields.required(
                "api_base",
                FieldKind::Endpoint,
                Some(EnvVar::AzureAiApiBase),
            )?,
            api_version: fields.required(
                "api_version",
                FieldKind::Setting,
                Some(EnvVar::AzureAiApiVersion),
            )?,
            model_id: fields.model_id(true)?,
            max_retries: fields.max_retries()?,
        })
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

/// Claude served behind an OpenAI-compatible gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaudeCompatibleConfig {
    pub api_key: String,
    pub endpoint: String,
    pub model_id: String,
    pub max_retries: u32,
}

impl ProviderConfig for ClaudeCompatibleConfig {
    fn provider_name(&self) -> &'static str {
        "openai-compatible-claude"
    }

    fn from_map(raw: &ConfigMap, env: &dyn EnvSource) -> LlmResult<Self> {
        let fields = FieldReader::new(raw, env);
        Ok(Self {
            api_key: fields.required(
                "api_key",
                FieldKind::Credential,
                Some(EnvVar::ClaudeApiKey),
            )?,
            endpoint: fields.required(
                "endpoint",
                FieldKind::Endpoint,
                Some(EnvVar::ClaudeEndpoint),
            )?,
            model_id: fields.model_id(true)?,
            max_retries: fields.max_retries()?,
        })
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn max_retries(&self) -> u32 {
        self.max_retries
    }
}
