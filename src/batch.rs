//! Concurrent batch execution
//!
//! Runs several units (typically one prompt per document) with a bounded
//! number in flight. A failing unit never cancels its siblings: every
//! outcome is collected, and the aggregate fails with
//! [`LlmError::BatchFailed`] only after all units have finished, carrying
//! each failure.

use crate::error::{BatchFailure, LlmError, LlmResult};
use crate::logging::{log_debug, log_error, log_info};
use crate::messages::Message;
use crate::response_parser::ResponseParser;
use crate::router::Router;

use futures_util::stream::{self, StreamExt};
use serde_json::{Map, Value};
use std::future::Future;
use std::time::{Duration, Instant};

/// Units in flight at once unless configured otherwise.
pub const DEFAULT_BATCH_CONCURRENCY: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Maximum units running at once (at least 1)
    pub concurrency: usize,
    /// Time limit per unit; `None` leaves it to the provider clients
    pub unit_timeout: Option<Duration>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_BATCH_CONCURRENCY,
            unit_timeout: None,
        }
    }
}

impl BatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_unit_timeout(mut self, timeout: Duration) -> Self {
        self.unit_timeout = Some(timeout);
        self
    }
}

/// Outcome of one unit.
#[derive(Debug)]
pub struct BatchItemResult<T> {
    /// Position of the unit in the submitted batch
    pub index: usize,
    pub label: String,
    pub result: LlmResult<T>,
    pub duration: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct BatchExecutor {
    config: BatchConfig,
}

impl BatchExecutor {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Run every unit and return all outcomes in submission order.
    pub async fn run_all<I, T, F, Fut>(&self, units: Vec<(String, I)>, operation: F) -> Vec<BatchItemResult<T>>
    where
        F: Fn(I) -> Fut,
        Fut: Future<Output = LlmResult<T>>,
    {
        let concurrency = self.config.concurrency.max(1);
        let unit_timeout = self.config.unit_timeout;
        let operation = &operation;

        log_debug!(units = units.len(), concurrency = concurrency, "Starting batch");

        let mut results: Vec<BatchItemResult<T>> = stream::iter(units.into_iter().enumerate())
            .map(|(index, (label, input))| async move {
                let start = Instant::now();
                let result = match unit_timeout {
                    Some(limit) => match tokio::time::timeout(limit, operation(input)).await {
                        Ok(result) => result,
                        Err(_elapsed) => Err(LlmError::timeout_after(limit)),
                    },
                    None => operation(input).await,
                };
                BatchItemResult {
                    index,
                    label,
                    result,
                    duration: start.elapsed(),
                }
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;

        results.sort_by_key(|r| r.index);
        results
    }

    /// Run every unit; fail if any unit failed.
    ///
    /// # Errors
    ///
    /// [`LlmError::BatchFailed`] listing every failed unit.
    pub async fn run<I, T, F, Fut>(&self, units: Vec<(String, I)>, operation: F) -> LlmResult<Vec<T>>
    where
        F: Fn(I) -> Fut,
        Fut: Future<Output = LlmResult<T>>,
    {
        let results = self.run_all(units, operation).await;
        let total = results.len();

        let mut values = Vec::with_capacity(total);
        let mut failures = Vec::new();
        for item in results {
            match item.result {
                Ok(value) => values.push(value),
                Err(e) => {
                    log_error!(
                        index = item.index,
                        label = %item.label,
                        error = %e,
                        "Error in one or more LLM responses"
                    );
                    failures.push(BatchFailure {
                        index: item.index,
                        label: item.label,
                        message: e.to_string(),
                    });
                }
            }
        }

        if failures.is_empty() {
            log_info!(units = total, "Batch completed");
            Ok(values)
        } else {
            Err(LlmError::batch_failed(total, failures))
        }
    }
}

/// One document prompt of a generation batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRequest {
    pub label: String,
    pub messages: Vec<Message>,
    pub system_prompt: Option<String>,
}

impl DocumentRequest {
    /// Single user prompt.
    pub fn new(label: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            messages: vec![Message::user(prompt)],
            system_prompt: None,
        }
    }

    pub fn with_messages(label: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            label: label.into(),
            messages,
            system_prompt: None,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }
}

/// Generate several JSON documents concurrently and merge them.
///
/// Each reply must parse as a JSON object. Objects are merged in
/// submission order, so later documents win on duplicate keys.
///
/// # Errors
///
/// [`LlmError::BatchFailed`] when any request or parse failed.
pub async fn generate_documents(
    router: &Router,
    provider: &str,
    model: &str,
    requests: Vec<DocumentRequest>,
    config: &BatchConfig,
) -> LlmResult<Map<String, Value>> {
    let units = requests
        .into_iter()
        .map(|request| (request.label.clone(), request))
        .collect();

    let documents = BatchExecutor::new(config.clone())
        .run(units, |request: DocumentRequest| async move {
            let reply = router
                .execute_with_system_prompt(
                    &request.messages,
                    request.system_prompt.as_deref(),
                    provider,
                    model,
                )
                .await?;
            ResponseParser::parse_object(&reply)
        })
        .await?;

    let mut merged = Map::new();
    for document in documents {
        merged.extend(document);
    }
    Ok(merged)
}
