//! Error types for routed LLM operations.
//!
//! Every failure surfaced by the crate is an [`LlmError`]. Lookup and
//! configuration failures are reported before any provider call is made and
//! are never retried; invocation failures carry the upstream status where one
//! exists so callers can decide how to react.
//!
//! # Error Handling Example
//!
//! ```rust,no_run
//! use llm_router::{LlmError, error::ErrorCategory};
//!
//! fn handle_error(err: LlmError) {
//!     if err.is_configuration_error() {
//!         println!("Fix the deployment: {}", err);
//!         return;
//!     }
//!
//!     match err.category() {
//!         ErrorCategory::Transient => println!("Temporary issue, try again later"),
//!         ErrorCategory::Client => println!("Fix the request and try again"),
//!         _ => println!("Provider issue: {}", err.user_message()),
//!     }
//! }
//! ```

use crate::logging::{log_error, log_info, log_warn};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Error categorization types
// ============================================================================

/// High-level categorization of errors for routing and handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// External service failures (LLM providers, network issues).
    External,

    /// Internal system errors (missing handler bindings, invariant violations).
    Internal,

    /// Client errors (invalid input, unknown provider/model, configuration).
    Client,

    /// Temporary failures that may succeed on a later attempt.
    Transient,
}

/// Severity level for logging and alerting decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// System is unusable. Requires immediate attention.
    Critical,

    /// Action failed but system is stable.
    Error,

    /// Unexpected but recoverable situation.
    Warning,

    /// Expected failure (unknown model, invalid prompt).
    Info,
}

/// One failed unit of a concurrent batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    /// Position of the unit in the submitted batch.
    pub index: usize,
    /// Caller supplied label for the unit.
    pub label: String,
    /// Rendered error of the unit.
    pub message: String,
}

// ============================================================================
// LLM Error types
// ============================================================================

/// Convenient result type for router operations.
pub type LlmResult<T> = std::result::Result<T, LlmError>;

/// Errors that can occur while resolving, building or invoking a handler.
///
/// | Variant | Category | Retryable |
/// |---------|----------|-----------|
/// | `ConfigurationError` | Client | No |
/// | `InvalidApiKey` | Client | No |
/// | `InvalidEndpoint` | Client | No |
/// | `MissingConfiguration` | Client | No |
/// | `ProviderNotFound` | Client | No |
/// | `ModelNotFound` | Client | No |
/// | `HandlerNotFound` | Internal | No |
/// | `InvalidRequest` | Client | No |
/// | `RequestFailed` | External | status dependent |
/// | `AuthenticationFailed` | Client | No |
/// | `RateLimitExceeded` | Transient | Yes |
/// | `Timeout` | Transient | Yes |
/// | `ResponseParsingError` | External | No |
/// | `BatchFailed` | External | No |
#[derive(Error, Debug)]
pub enum LlmError {
    /// Provider configuration is invalid or incomplete.
    #[error("Provider configuration error: {message}")]
    ConfigurationError {
        /// Description of the configuration problem.
        message: String,
    },

    /// A credential field is missing or malformed.
    #[error("Invalid API key ({field}): {message}")]
    InvalidApiKey {
        /// Name of the offending configuration field.
        field: String,
        /// Description of the problem.
        message: String,
    },

    /// An endpoint field is missing or malformed.
    #[error("Invalid endpoint ({field}): {message}")]
    InvalidEndpoint {
        /// Name of the offending configuration field.
        field: String,
        /// Description of the problem.
        message: String,
    },

    /// A required environment key is unset or blank.
    #[error("{key} is missing the given model config")]
    MissingConfiguration {
        /// The environment key that failed the check.
        key: String,
    },

    /// The provider is not present in the capability table.
    #[error("Provider Not Found: {provider}")]
    ProviderNotFound {
        /// The provider name that was requested.
        provider: String,
    },

    /// The provider is known but does not list the model.
    #[error("Model under given Provider Not Found: {model} ({provider})")]
    ModelNotFound {
        /// Canonical provider name.
        provider: String,
        /// The model id that was requested.
        model: String,
    },

    /// The capability entry has no handler binding.
    #[error("Handler Not Found for {provider}/{model}")]
    HandlerNotFound {
        /// Canonical provider name.
        provider: String,
        /// The model id that was requested.
        model: String,
    },

    /// The caller supplied an unusable conversation or prompt.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Description of the problem.
        message: String,
    },

    /// The call to the provider failed.
    #[error("Request failed: {message}")]
    RequestFailed {
        /// Description of the failure.
        message: String,
        /// HTTP status returned by the provider, if any.
        status: Option<u16>,
        /// The underlying error, if available.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Authentication with the provider failed.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed {
        /// Details about the authentication failure.
        message: String,
    },

    /// Provider rate limit exceeded.
    #[error("Rate limit exceeded, retry after {retry_after_seconds}s")]
    RateLimitExceeded {
        /// Recommended wait time before retrying.
        retry_after_seconds: u64,
    },

    /// Request timed out.
    #[error("Request timed out after {timeout_seconds}s")]
    Timeout {
        /// The timeout duration that was exceeded.
        timeout_seconds: u64,
    },

    /// The provider (or the model) returned something that could not be interpreted.
    #[error("Response parsing failed: {message}")]
    ResponseParsingError {
        /// Details about the parsing failure.
        message: String,
    },

    /// At least one unit of a concurrent batch failed.
    #[error("Error in one or more LLM responses ({} of {total} failed)", .failures.len())]
    BatchFailed {
        /// Number of units submitted.
        total: usize,
        /// Every failure collected from the batch, ordered by index.
        failures: Vec<BatchFailure>,
    },
}

impl LlmError {
    /// Get the error category for routing and handling decisions.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigurationError { .. }
            | Self::InvalidApiKey { .. }
            | Self::InvalidEndpoint { .. }
            | Self::MissingConfiguration { .. }
            | Self::ProviderNotFound { .. }
            | Self::ModelNotFound { .. }
            | Self::InvalidRequest { .. }
            | Self::AuthenticationFailed { .. } => ErrorCategory::Client,
            Self::HandlerNotFound { .. } => ErrorCategory::Internal,
            Self::RequestFailed { .. }
            | Self::ResponseParsingError { .. }
            | Self::BatchFailed { .. } => ErrorCategory::External,
            Self::RateLimitExceeded { .. } | Self::Timeout { .. } => ErrorCategory::Transient,
        }
    }

    /// Get the error severity for logging and alerting.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::HandlerNotFound { .. } => ErrorSeverity::Critical,
            Self::ConfigurationError { .. }
            | Self::InvalidApiKey { .. }
            | Self::InvalidEndpoint { .. }
            | Self::MissingConfiguration { .. }
            | Self::RequestFailed { .. }
            | Self::AuthenticationFailed { .. }
            | Self::BatchFailed { .. } => ErrorSeverity::Error,
            Self::ResponseParsingError { .. }
            | Self::RateLimitExceeded { .. }
            | Self::Timeout { .. } => ErrorSeverity::Warning,
            Self::ProviderNotFound { .. }
            | Self::ModelNotFound { .. }
            | Self::InvalidRequest { .. } => ErrorSeverity::Info,
        }
    }

    /// Whether a later attempt of the same call could succeed.
    ///
    /// Request failures are retryable when they never reached the provider
    /// (no status) or the provider reported a conflict or a server fault.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimitExceeded { .. } | Self::Timeout { .. } => true,
            Self::RequestFailed { status, .. } => match status {
                None => true,
                Some(code) => matches!(code, 408 | 409) || *code >= 500,
            },
            _ => false,
        }
    }

    /// Whether this is a configuration failure, detected before any provider call.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigurationError { .. }
                | Self::InvalidApiKey { .. }
                | Self::InvalidEndpoint { .. }
                | Self::MissingConfiguration { .. }
        )
    }

    /// HTTP status a gateway should answer with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ProviderNotFound { .. }
            | Self::ModelNotFound { .. }
            | Self::InvalidRequest { .. } => 400,
            Self::ConfigurationError { .. }
            | Self::InvalidApiKey { .. }
            | Self::InvalidEndpoint { .. }
            | Self::MissingConfiguration { .. }
            | Self::HandlerNotFound { .. }
            | Self::BatchFailed { .. } => 500,
            Self::RateLimitExceeded { .. } => 429,
            Self::Timeout { .. } => 504,
            Self::RequestFailed { .. }
            | Self::AuthenticationFailed { .. }
            | Self::ResponseParsingError { .. } => 502,
        }
    }

    /// Convert to a message that is safe to show to end users.
    pub fn user_message(&self) -> String {
        match self {
            Self::ConfigurationError { .. }
            | Self::InvalidApiKey { .. }
            | Self::InvalidEndpoint { .. }
            | Self::MissingConfiguration { .. } => {
                "AI service configuration issue. Please check your settings".to_string()
            }
            Self::ProviderNotFound { .. } => "The requested AI provider is not supported".to_string(),
            Self::ModelNotFound { .. } => {
                "The requested model is not available for this provider".to_string()
            }
            Self::HandlerNotFound { .. } => {
                "The requested model is not wired to a handler".to_string()
            }
            Self::InvalidRequest { message } => message.clone(),
            Self::RequestFailed { .. } => "Failed to get a response from LLM".to_string(),
            Self::AuthenticationFailed { .. } => {
                "Model connection failed. Please validate the credentials.".to_string()
            }
            Self::RateLimitExceeded {
                retry_after_seconds,
            } => {
                format!("Service is busy. Please wait {retry_after_seconds} seconds and try again")
            }
            Self::Timeout { .. } => "Request timed out. Please try again".to_string(),
            Self::ResponseParsingError { .. } => {
                "Received an invalid response from AI service".to_string()
            }
            Self::BatchFailed { .. } => "Error in one or more LLM responses".to_string(),
        }
    }

    // =========================================================================
    // Constructor methods with automatic logging
    // =========================================================================

    pub fn configuration_error(message: impl Into<String>) -> Self {
        let message = message.into();
        log_error!(
            error_type = "configuration_error",
            message = %message,
            "LLM configuration validation failed"
        );
        Self::ConfigurationError { message }
    }

    pub fn invalid_api_key(field: impl Into<String>, message: impl Into<String>) -> Self {
        let field = field.into();
        let message = message.into();
        log_error!(
            error_type = "invalid_api_key",
            field = %field,
            message = %message,
            "LLM credential validation failed"
        );
        Self::InvalidApiKey { field, message }
    }

    pub fn invalid_endpoint(field: impl Into<String>, message: impl Into<String>) -> Self {
        let field = field.into();
        let message = message.into();
        log_error!(
            error_type = "invalid_endpoint",
            field = %field,
            message = %message,
            "LLM endpoint validation failed"
        );
        Self::InvalidEndpoint { field, message }
    }

    pub fn missing_configuration(key: impl Into<String>) -> Self {
        let key = key.into();
        log_error!(
            error_type = "missing_configuration",
            key = %key,
            "Required environment configuration is missing"
        );
        Self::MissingConfiguration { key }
    }

    pub fn provider_not_found(provider: impl Into<String>) -> Self {
        let provider = provider.into();
        log_info!(
            error_type = "provider_not_found",
            provider = %provider,
            "Unknown LLM provider requested"
        );
        Self::ProviderNotFound { provider }
    }

    pub fn model_not_found(provider: impl Into<String>, model: impl Into<String>) -> Self {
        let provider = provider.into();
        let model = model.into();
        log_info!(
            error_type = "model_not_found",
            provider = %provider,
            model = %model,
            "Unknown model requested for provider"
        );
        Self::ModelNotFound { provider, model }
    }

    pub fn handler_not_found(provider: impl Into<String>, model: impl Into<String>) -> Self {
        let provider = provider.into();
        let model = model.into();
        log_error!(
            error_type = "handler_not_found",
            provider = %provider,
            model = %model,
            "Capability entry has no handler binding"
        );
        Self::HandlerNotFound { provider, model }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        let message = message.into();
        log_info!(
            error_type = "invalid_request",
            message = %message,
            "Rejected LLM request"
        );
        Self::InvalidRequest { message }
    }

    pub fn request_failed(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        let message = message.into();
        log_error!(
            error_type = "request_failed",
            message = %message,
            has_source = source.is_some(),
            "LLM request execution failed"
        );
        Self::RequestFailed {
            message,
            status: None,
            source,
        }
    }

    /// Request failure for a non-success HTTP status.
    pub fn provider_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        log_error!(
            error_type = "request_failed",
            status = status,
            message = %message,
            "LLM provider returned an error status"
        );
        Self::RequestFailed {
            message,
            status: Some(status),
            source: None,
        }
    }

    pub fn authentication_failed(message: impl Into<String>) -> Self {
        let message = message.into();
        log_error!(
            error_type = "authentication_failed",
            message = %message,
            "LLM provider authentication failed"
        );
        Self::AuthenticationFailed { message }
    }

    pub fn rate_limit_exceeded(retry_after_seconds: u64) -> Self {
        log_warn!(
            error_type = "rate_limit_exceeded",
            retry_after_seconds = retry_after_seconds,
            "LLM provider rate limit exceeded"
        );
        Self::RateLimitExceeded {
            retry_after_seconds,
        }
    }

    pub fn timeout(timeout_seconds: u64) -> Self {
        log_warn!(
            error_type = "timeout",
            timeout_seconds = timeout_seconds,
            "LLM request timed out"
        );
        Self::Timeout { timeout_seconds }
    }

    /// Timeout for an elapsed limit, rounding partial seconds up.
    pub fn timeout_after(limit: Duration) -> Self {
        let seconds = limit.as_secs() + u64::from(limit.subsec_nanos() > 0);
        Self::timeout(seconds)
    }

    pub fn response_parsing_error(message: impl Into<String>) -> Self {
        let message = message.into();
        log_warn!(
            error_type = "response_parsing_error",
            message = %message,
            "LLM response format invalid"
        );
        Self::ResponseParsingError { message }
    }

    pub fn batch_failed(total: usize, failures: Vec<BatchFailure>) -> Self {
        log_error!(
            error_type = "batch_failed",
            total = total,
            failed = failures.len(),
            "One or more batch units failed"
        );
        Self::BatchFailed { total, failures }
    }
}
