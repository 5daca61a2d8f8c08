//! Configuration Management
//!
//! Everything comes from the environment (optionally via a `.env` file).
//! The API key is the only setting without a usable default.

use assistant_core::{AgentError, Result};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Assistant configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
}

impl Config {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            AgentError::Config(
                "OPENAI_API_KEY environment variable is required. \
                 Set it in your .env file or environment."
                    .into(),
            )
        })?;

        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

        let temperature = match std::env::var("OPENAI_TEMPERATURE") {
            Ok(raw) => raw.parse::<f32>().map_err(|_| {
                AgentError::Config(format!(
                    "OPENAI_TEMPERATURE must be a number, got '{}'",
                    raw
                ))
            })?,
            Err(_) => DEFAULT_TEMPERATURE,
        };

        let config = Self {
            api_key,
            model,
            temperature,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(AgentError::Config("API key is required".into()));
        }

        if self.model.is_empty() {
            return Err(AgentError::Config("Model is required".into()));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(AgentError::Config(
                "Temperature must be between 0.0 and 2.0".into(),
            ));
        }

        Ok(())
    }
}
