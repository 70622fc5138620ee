//! Process-wide gateway defaults

use crate::env::{EnvSource, EnvVar};
use crate::logging::log_debug;

use serde::Serialize;

const FALLBACK_PROVIDER: &str = "openai";
const FALLBACK_MODEL: &str = "gpt-4o";

/// Provider and model used when a request does not choose one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewaySettings {
    #[serde(rename = "provider")]
    pub default_provider: String,
    #[serde(rename = "model")]
    pub default_model: String,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            default_provider: FALLBACK_PROVIDER.to_string(),
            default_model: FALLBACK_MODEL.to_string(),
        }
    }
}

impl GatewaySettings {
    /// Read `DEFAULT_API_PROVIDER` and `DEFAULT_MODEL`; blank values fall back
    /// to the built-in defaults.
    pub fn from_env(env: &dyn EnvSource) -> Self {
        let settings = Self {
            default_provider: EnvVar::DefaultApiProvider
                .resolve(env)
                .unwrap_or_else(|| FALLBACK_PROVIDER.to_string()),
            default_model: EnvVar::DefaultModel
                .resolve(env)
                .unwrap_or_else(|| FALLBACK_MODEL.to_string()),
        };
        log_debug!(
            provider = %settings.default_provider,
            model = %settings.default_model,
            "Loaded gateway defaults"
        );
        settings
    }

    /// Human readable description of the provider and model in effect.
    pub fn describe_current(&self, provider: Option<&str>, model: Option<&str>) -> String {
        format!(
            "Default API Provider:{} - Default Model: {}",
            provider.unwrap_or(&self.default_provider),
            model.unwrap_or(&self.default_model)
        )
    }
}
