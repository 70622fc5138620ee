//! Concurrent document generation example.
//!
//! Sends several JSON-producing prompts at once and merges the resulting
//! objects. Every prompt runs even if another fails; failures are listed
//! together at the end.
//!
//! # Running
//!
//! ```bash
//! export OPENAI_API_KEY="sk-..."
//! cargo run --example batch_generation
//! ```

use llm_router::{generate_documents, BatchConfig, DocumentRequest, LlmError, Router};
use std::time::Duration;

const REPORT: &str = "Revenue grew 12% quarter over quarter, driven by the new \
enterprise tier. Churn fell to 2.1%. Hiring is paused until Q3.";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let router = Router::from_env();
    let system = "Reply with a single JSON object and nothing else.";

    let requests = vec![
        DocumentRequest::new(
            "summary",
            format!("Summarise this report as {{\"summary\": \"...\"}}:\n{REPORT}"),
        )
        .with_system_prompt(system),
        DocumentRequest::new(
            "metrics",
            format!("Extract the metrics as {{\"metrics\": {{\"name\": value}}}}:\n{REPORT}"),
        )
        .with_system_prompt(system),
        DocumentRequest::new(
            "risks",
            format!("List the risks as {{\"risks\": [\"...\"]}}:\n{REPORT}"),
        )
        .with_system_prompt(system),
    ];

    let config = BatchConfig::default()
        .with_concurrency(3)
        .with_unit_timeout(Duration::from_secs(60));

    println!("Generating {} documents...", requests.len());
    match generate_documents(&router, "openai", "gpt-4o-mini", requests, &config).await {
        Ok(document) => println!("{}", serde_json::to_string_pretty(&document)?),
        Err(LlmError::BatchFailed { total, failures }) => {
            eprintln!("{} of {total} documents failed:", failures.len());
            for failure in failures {
                eprintln!("  [{}] {}: {}", failure.index, failure.label, failure.message);
            }
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
