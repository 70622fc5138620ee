//! Handler registry and dispatch
//!
//! [`Router`] maps `(provider, model)` to a cached handler and runs chat
//! completions through it:
//!
//! 1. resolve the pair in the [`CapabilityTable`]
//! 2. check the model's required environment keys
//! 3. validate the conversation shape
//! 4. reuse or build the handler
//! 5. invoke
//!
//! Each cache key owns a `OnceCell`, so concurrent misses on the same key
//! build exactly one handler while misses on other keys proceed in
//! parallel. The map lock is held only to fetch the cell. A failed build
//! leaves the cell empty and the next call retries.

use crate::capabilities::{build_handler, CapabilityTable, ModelEntry, Provider};
use crate::config::model_only;
use crate::env::{EnvSource, ProcessEnv};
use crate::error::{LlmError, LlmResult};
use crate::logging::{log_error, log_info, log_span, log_warn};
use crate::messages::{validate_conversation, Message};
use crate::providers::LlmHandler;

use once_cell::sync::OnceCell;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::Instrument;
use uuid::Uuid;

/// Prompt sent by [`Router::verify`].
pub const VERIFICATION_PROMPT: &str = "This is a test prompt to verify the provider configuration.";

const VERIFIED_MESSAGE: &str = "Provider configuration verified successfully";
const VERIFICATION_FAILED_MESSAGE: &str = "Model connection failed. Please validate the credentials.";

type CacheKey = (Provider, String);
type HandlerSlot = Arc<OnceCell<Arc<dyn LlmHandler>>>;

static GLOBAL_ROUTER: OnceCell<Router> = OnceCell::new();

pub struct Router {
    table: CapabilityTable,
    env: Arc<dyn EnvSource>,
    cache: Mutex<HashMap<CacheKey, HandlerSlot>>,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("table", &self.table)
            .field("cached_handlers", &self.cached_handler_count())
            .finish_non_exhaustive()
    }
}

impl Router {
    pub fn new(table: CapabilityTable, env: Arc<dyn EnvSource>) -> Self {
        Self {
            table,
            env,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Built-in table over the process environment.
    pub fn from_env() -> Self {
        Self::new(CapabilityTable::builtin(), Arc::new(ProcessEnv))
    }

    /// Install the process-wide router.
    ///
    /// # Errors
    ///
    /// [`LlmError::ConfigurationError`] if a global router already exists,
    /// including one created lazily by [`Router::global`].
    pub fn init_global(router: Router) -> LlmResult<&'static Router> {
        GLOBAL_ROUTER
            .set(router)
            .map_err(|_| LlmError::configuration_error("Global router is already initialized"))?;
        Self::global_if_initialized()
            .ok_or_else(|| LlmError::configuration_error("Global router is not initialized"))
    }

    /// Process-wide router, created from the environment on first use.
    pub fn global() -> &'static Router {
        GLOBAL_ROUTER.get_or_init(Router::from_env)
    }

    pub fn global_if_initialized() -> Option<&'static Router> {
        GLOBAL_ROUTER.get()
    }

    pub fn table(&self) -> &CapabilityTable {
        &self.table
    }

    pub fn env(&self) -> &dyn EnvSource {
        self.env.as_ref()
    }

    /// Run a chat completion and return the reply text.
    pub async fn execute(&self, messages: &[Message], provider: &str, model: &str) -> LlmResult<String> {
        self.execute_with_system_prompt(messages, None, provider, model).await
    }

    pub async fn execute_with_system_prompt(
        &self,
        messages: &[Message],
        system_prompt: Option<&str>,
        provider: &str,
        model: &str,
    ) -> LlmResult<String> {
        let span = log_span!(
            "llm_request",
            request_id = %Uuid::new_v4(),
            provider = %provider,
            model = %model
        );

        async move {
            let entry = self.table.resolve(provider, model)?;
            entry.check_required_config(self.env())?;
            validate_conversation(messages)?;

            let handler = self.get_or_build(entry)?;
            log_info!(message_count = messages.len(), "Dispatching LLM request");

            let reply = handler.invoke(messages, system_prompt).await?;
            log_info!(response_length = reply.len(), "LLM response received");
            Ok::<_, LlmError>(reply)
        }
        .instrument(span)
        .await
    }

    /// Cached handler for a pair, built on first use.
    pub fn handler(&self, provider: &str, model: &str) -> LlmResult<Arc<dyn LlmHandler>> {
        let entry = self.table.resolve(provider, model)?;
        entry.check_required_config(self.env())?;
        self.get_or_build(entry)
    }

    /// Credential probe through the cached handler. Never fails.
    pub async fn is_valid(&self, provider: &str, model: &str) -> bool {
        match self.handler(provider, model) {
            Ok(handler) => handler.is_valid().await,
            Err(e) => {
                log_warn!(provider = %provider, model = %model, error = %e, "Handler unavailable for validation");
                false
            }
        }
    }

    /// Send the verification prompt through a freshly built handler.
    ///
    /// Construction and invocation failures produce a `failed` report; only
    /// a blank provider or model is an error.
    pub async fn verify(&self, provider: &str, model: &str) -> LlmResult<VerificationReport> {
        if provider.trim().is_empty() || model.trim().is_empty() {
            return Err(LlmError::invalid_request("Provider and model are required"));
        }

        let outcome = match build_handler(provider, &model_only(model), self.env()) {
            Ok(handler) => handler.invoke(&[Message::user(VERIFICATION_PROMPT)], None).await,
            Err(e) => Err(e),
        };

        Ok(match outcome {
            Ok(reply) => {
                log_info!(provider = %provider, model = %model, "Provider configuration verified");
                VerificationReport::success(provider, model, reply)
            }
            Err(e) => {
                log_error!(
                    provider = %provider,
                    model = %model,
                    error = %e,
                    "Provider configuration verification failed"
                );
                VerificationReport::failed(provider, model)
            }
        })
    }

    /// Drop the cached handler for a pair. Returns whether one was cached.
    pub fn evict(&self, provider: &str, model: &str) -> LlmResult<bool> {
        let entry = self.table.resolve(provider, model)?;
        let removed = self.lock_cache().remove(&Self::cache_key(entry));
        Ok(removed.is_some_and(|slot| slot.get().is_some()))
    }

    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    /// Number of built handlers currently cached.
    pub fn cached_handler_count(&self) -> usize {
        self.lock_cache()
            .values()
            .filter(|slot| slot.get().is_some())
            .count()
    }

    fn cache_key(entry: &ModelEntry) -> CacheKey {
        (entry.provider, entry.model_id.clone())
    }

    fn lock_cache(&self) -> MutexGuard<'_, HashMap<CacheKey, HandlerSlot>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn get_or_build(&self, entry: &ModelEntry) -> LlmResult<Arc<dyn LlmHandler>> {
        let slot = Arc::clone(self.lock_cache().entry(Self::cache_key(entry)).or_default());

        let handler = slot.get_or_try_init(|| {
            let binding = entry.binding()?;
            log_info!(
                provider = entry.provider.as_str(),
                model = %entry.model_id,
                handler = binding.name(),
                "Creating handler"
            );
            binding.build(&model_only(&entry.model_id), self.env())
        })?;
        Ok(Arc::clone(handler))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Success,
    Failed,
}

/// Result of [`Router::verify`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    pub status: VerificationStatus,
    pub message: String,
    pub provider: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_response: Option<String>,
}

impl VerificationReport {
    fn success(provider: &str, model: &str, reply: String) -> Self {
        Self {
            status: VerificationStatus::Success,
            message: VERIFIED_MESSAGE.to_string(),
            provider: provider.to_string(),
            model: model.to_string(),
            test_response: Some(reply),
        }
    }

    fn failed(provider: &str, model: &str) -> Self {
        Self {
            status: VerificationStatus::Failed,
            message: VERIFICATION_FAILED_MESSAGE.to_string(),
            provider: provider.to_string(),
            model: model.to_string(),
            test_response: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == VerificationStatus::Success
    }
}
