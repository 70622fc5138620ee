//! Parsing of model replies that are expected to carry JSON
//!
//! Document generation asks the model for a JSON object but models wrap it
//! in prose, code fences or chat-template tokens. [`ResponseParser`] tries
//! progressively looser strategies:
//!
//! 1. the reply as-is
//! 2. the reply with fences and template tokens removed
//! 3. the first balanced `{...}` found in the reply
//!
//! The result must be a non-empty JSON object.

use crate::error::{LlmError, LlmResult};
use crate::logging::{log_debug, log_warn};

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

/// Characters of the raw reply quoted in parse errors.
const PREVIEW_CHARS: usize = 200;

static JSON_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```json\n(.*?)\n```").expect("JSON fence pattern is valid"));

const TEMPLATE_TOKENS: &[&str] = &["<|channel|>", "<|end|>", "<|start|>", "```json", "```JSON", "```"];

/// Inner text of the first ```` ```json ```` fenced block, or the input unchanged.
pub fn strip_json_code_fence(output: &str) -> String {
    let inner = JSON_FENCE.captures(output).and_then(|captures| captures.get(1));
    match inner {
        Some(inner) => inner.as_str().to_string(),
        None => output.to_string(),
    }
}

/// JSON reply parser.
pub struct ResponseParser;

impl ResponseParser {
    /// Parse a reply into a non-empty JSON object.
    ///
    /// # Errors
    ///
    /// [`LlmError::ResponseParsingError`] when no strategy yields an object.
    pub fn parse_object(raw: &str) -> LlmResult<Map<String, Value>> {
        log_debug!(content_length = raw.len(), "Parsing LLM reply as a JSON object");

        if let Ok(value) = serde_json::from_str::<Value>(raw) {
            return Self::require_object(value);
        }

        let cleaned = Self::strip_artifacts(raw);
        if cleaned != raw {
            if let Ok(value) = serde_json::from_str::<Value>(&cleaned) {
                log_debug!("Parsed JSON after removing reply artifacts");
                return Self::require_object(value);
            }
        }

        if let Some(candidate) = Self::first_balanced_object(&cleaned) {
            if let Ok(value) = serde_json::from_str::<Value>(candidate) {
                log_debug!(extracted_length = candidate.len(), "Parsed JSON object embedded in prose");
                return Self::require_object(value);
            }
        }

        let preview: String = raw.chars().take(PREVIEW_CHARS).collect();
        log_warn!(content_preview = %preview, "LLM reply holds no JSON object");
        Err(LlmError::response_parsing_error(format!(
            "Invalid JSON format in LLM response: {preview}{}",
            if raw.chars().count() > PREVIEW_CHARS { "..." } else { "" }
        )))
    }

    fn require_object(value: Value) -> LlmResult<Map<String, Value>> {
        match value {
            Value::Object(map) if !map.is_empty() => Ok(map),
            Value::Object(_) => Err(LlmError::response_parsing_error(
                "LLM response is an empty JSON object",
            )),
            _ => Err(LlmError::response_parsing_error(
                "LLM response must be a JSON object",
            )),
        }
    }

    fn strip_artifacts(content: &str) -> String {
        let mut cleaned = strip_json_code_fence(content);
        for token in TEMPLATE_TOKENS {
            cleaned = cleaned.replace(token, "");
        }
        cleaned
            .trim()
            .chars()
            .filter(|c| !c.is_control() || c.is_whitespace())
            .collect()
    }

    /// Slice of the first brace-balanced object, skipping braces inside strings.
    fn first_balanced_object(content: &str) -> Option<&str> {
        let start = content.find('{')?;
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        for (offset, ch) in content[start..].char_indices() {
            if in_string {
                match ch {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match ch {
                '"' => in_string = true,
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(&content[start..start + offset + ch.len_utf8()]);
                    }
                }
                _ => {}
            }
        }
        None
    }
}
