use super::{ConfigMap, FieldKind, FieldReader, ProviderConfig};
use crate::env::{EnvSource, EnvVar};
use crate::error::LlmResult;
use serde::{Deserialize, Serialize};

/// Marker in the base URL that selects the Azure client.
pub const AZURE_DOMAIN_MARKER: &str = "azure.com";

/// OpenAI configuration, covering both api.openai.com and Azure OpenAI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAIConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub azure_api_key: Option<String>,
    pub api_version: Option<String>,
    pub model_id: String,
    pub max_retries: u32,
}

impl OpenAIConfig {
    /// Whether the base URL points at an Azure OpenAI resource.
    pub fn is_azure(&self) -> bool {
        self.base_url
            .as_deref()
            .is_some_and(|url| url.to_lowercase().contains(AZURE_DOMAIN_MARKER))
    }
}

impl ProviderConfig for OpenAIConfig {
    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn from_map(raw: &ConfigMap, env: &dyn EnvSource) -> LlmResult<Self> {
        let fields = FieldReader::new(raw, env);
        Ok(Self {
            base_url: fields.optional("base_url", FieldKind::Endpoint, EnvVar::OpenAiBaseUrl)?,
            api_key: fields.optional("api_key", FieldKind::Credential, EnvVar::OpenAiApiKey)?,
            azure_api_key: fields.optional(
                "azure_api_key",
                FieldKind::Credential,
                EnvVar::AzureOpenAiApiKey,
            )?,
            api_version: fields.optional(
                "api_version",
                FieldKind::Setting,
                EnvVar::OpenAiApiVersion,
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
