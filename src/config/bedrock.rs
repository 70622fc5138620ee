use super::{ConfigMap, FieldKind, FieldReader, ProviderConfig};
use crate::env::{EnvSource, EnvVar};
use crate::error::LlmResult;
use serde::{Deserialize, Serialize};

/// AWS Bedrock configuration for Anthropic models.
///
/// Access key, secret key and region must resolve; the session token is
/// only needed for temporary credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BedrockConfig {
    pub base_url: Option<String>,
    pub aws_access_key: String,
    pub aws_secret_key: String,
    pub aws_session_token: Option<String>,
    pub aws_region: String,
    pub model_id: String,
    pub max_retries: u32,
}

impl BedrockConfig {
    /// Runtime endpoint, derived from the region unless overridden.
    pub fn endpoint(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://bedrock-runtime.{}.amazonaws.com", self.aws_region),
        }
    }
}

impl ProviderConfig for BedrockConfig {
    fn provider_name(&self) -> &'static str {
        "bedrock"
    }

    fn from_map(raw: &ConfigMap, env: &dyn EnvSource) -> LlmResult<Self> {
        let fields = FieldReader::new(raw, env);
        Ok(Self {
            base_url: fields.optional(
                "base_url",
                FieldKind::Endpoint,
                EnvVar::AnthropicBedrockBaseUrl,
            )?,
            aws_access_key: fields.required(
                "aws_access_key",
                FieldKind::Credential,
                Some(EnvVar::AwsBedrockAccessKey),
            )?,
            aws_secret_key: fields.required(
                "aws_secret_key",
                FieldKind::Credential,
                Some(EnvVar::AwsBedrockSecretKey),
            )?,
            aws_session_token: fields.optional(
                "aws_session_token",
                FieldKind::Credential,
                EnvVar::AwsBedrockSessionToken,
            )?,
            aws_region: fields.required(
                "aws_region",
                FieldKind::Setting,
                Some(EnvVar::AwsBedrockRegion),
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
