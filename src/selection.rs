//! Per-request provider and model selection
//!
//! Callers pick a provider and model with the `X-Provider` and `X-Model`
//! request headers. Both must be present and non-blank; otherwise the
//! gateway defaults apply. The choice is echoed back in `X-Provider-Used`
//! and `X-Model-Used`.

use crate::error::{LlmError, LlmResult};
use crate::logging::log_info;
use crate::settings::GatewaySettings;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

pub const PROVIDER_HEADER: &str = "x-provider";
pub const MODEL_HEADER: &str = "x-model";
pub const PROVIDER_USED_HEADER: &str = "x-provider-used";
pub const MODEL_USED_HEADER: &str = "x-model-used";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelection {
    pub provider: String,
    pub model: String,
    /// Whether the request headers chose the pair
    pub from_request: bool,
}

impl ModelSelection {
    pub fn from_headers(headers: &HeaderMap, defaults: &GatewaySettings) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
        };

        match (header(PROVIDER_HEADER), header(MODEL_HEADER)) {
            (Some(provider), Some(model)) => {
                log_info!(provider = provider, model = model, "Using provider and model from request");
                Self {
                    provider: provider.to_string(),
                    model: model.to_string(),
                    from_request: true,
                }
            }
            _ => {
                log_info!(
                    provider = %defaults.default_provider,
                    model = %defaults.default_model,
                    "Using default provider and model"
                );
                Self {
                    provider: defaults.default_provider.clone(),
                    model: defaults.default_model.clone(),
                    from_request: false,
                }
            }
        }
    }

    /// Write the `*-Used` headers onto a response.
    pub fn apply_response_headers(&self, headers: &mut HeaderMap) -> LlmResult<()> {
        for (name, value) in [(PROVIDER_USED_HEADER, &self.provider), (MODEL_USED_HEADER, &self.model)] {
            let value = HeaderValue::from_str(value).map_err(|e| {
                LlmError::invalid_request(format!("Cannot write {name} header: {e}"))
            })?;
            headers.insert(HeaderName::from_static(name), value);
        }
        Ok(())
    }
}
