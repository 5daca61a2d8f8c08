//! AI CLI Assistant
//!
//! Interactive terminal chat assistant with LLM function calling and a
//! small set of built-in tools.

mod config;
mod output;
mod repl;

use std::sync::Arc;

use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use assistant_core::{AgentBuilder, AgentError, LlmProvider, ToolRegistry};
use assistant_runtime::openai::{OpenAiConfig, OpenAiProvider};
use assistant_toolkit::{CalculatorTool, WeatherTool, WebSearchTool};

use crate::config::Config;
use crate::repl::Repl;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    if let Err(e) = run().await {
        match e.downcast_ref::<AgentError>() {
            Some(AgentError::Config(_)) => {
                eprintln!("{}", format!("Configuration error: {}", e).red());
            }
            _ => {
                eprintln!("{}", format!("Unexpected error: {}", e).red());
            }
        }
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Register tools
    let mut tools = ToolRegistry::new();
    tools.register(CalculatorTool)?;
    tools.register(WeatherTool)?;
    tools.register(WebSearchTool)?;

    tracing::info!("Registered {} tools:", tools.len());
    for name in tools.names() {
        tracing::info!("  • {}", name);
    }

    // Initialize LLM provider
    let mut provider_config = OpenAiConfig::new(config.api_key.clone());
    if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
        provider_config = provider_config.with_base_url(base_url);
    }
    let provider = Arc::new(OpenAiProvider::from_config(provider_config)?);

    tracing::info!(provider = provider.name(), model = %config.model, "Provider ready");

    // Build the agent
    let agent = AgentBuilder::new()
        .provider(provider)
        .tools(tools)
        .model(config.model.clone())
        .temperature(config.temperature)
        .build()?;

    // Run chat loop
    Repl::new(agent, config.model).run().await
}
