//! Basic routing example: one conversation, any configured provider.
//!
//! This example shows how to:
//! - Build a router from the process environment
//! - Check which models a provider supports
//! - Verify credentials, then send a conversation
//!
//! # Running
//!
//! ```bash
//! export ANTHROPIC_API_KEY="sk-ant-..."
//! cargo run --example basic_router -- anthropic claude-3-5-sonnet-20241022
//! ```
//!
//! Without arguments the defaults from `DEFAULT_API_PROVIDER` and
//! `DEFAULT_MODEL` are used.

use llm_router::{ChatAgent, GatewaySettings, Message, ProcessEnv, Provider, Router};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = GatewaySettings::from_env(&ProcessEnv);
    let mut args = std::env::args().skip(1);
    let provider = args.next().unwrap_or_else(|| settings.default_provider.clone());
    let model = args.next().unwrap_or_else(|| settings.default_model.clone());
    println!("{}", settings.describe_current(Some(&provider), Some(&model)));

    let router = Router::from_env();

    let parsed: Provider = provider.parse()?;
    println!("Supported {parsed} models: {:?}", router.table().supported_models(parsed));

    let report = router.verify(&provider, &model).await?;
    println!("Verification: {} ({:?})", report.message, report.status);
    if !report.is_success() {
        return Ok(());
    }

    // Single turn with an explicit system prompt
    let messages = vec![Message::user("What is the capital of France? Answer in one sentence.")];
    let reply = router
        .execute_with_system_prompt(&messages, Some("Be concise."), &provider, &model)
        .await?;
    println!("\nResponse: {reply}");

    // Multi-turn through the chat agent
    let history = vec![
        Message::user("What is the capital of France?"),
        Message::assistant("Paris."),
    ];
    let reply = ChatAgent::default()
        .chat(&router, &provider, &model, "And its population?", &history)
        .await?;
    println!("\nFollow-up: {reply}");

    Ok(())
}
