//! LLM Provider Strategy Pattern
//!
//! Defines a common interface for chat-completion backends so the assistant
//! can work with any provider that speaks messages-in, completion-out.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::message::Message;
use crate::tool::FunctionSchema;

/// Configuration for LLM generation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Model identifier (e.g., "gpt-4o-mini", "claude-3-sonnet")
    pub model: String,

    /// Temperature for sampling (0.0 = deterministic, 2.0 = maximum)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Top-p nucleus sampling
    #[serde(default = "default_top_p")]
    pub top_p: f32,
}

fn default_temperature() -> f32 { 0.7 }
fn default_max_tokens() -> u32 { 2048 }
fn default_top_p() -> f32 { 0.9 }

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".into(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_p: default_top_p(),
        }
    }
}

/// A tool invocation requested by the model, arguments still in their wire
/// encoding (a textual JSON payload)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Wire call id, when the provider supplies one
    pub id: Option<String>,

    /// Requested tool name
    pub name: String,

    /// Raw argument payload, typically a JSON object
    pub arguments: String,
}

/// Response from an LLM completion
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Completion {
    /// The generated text, absent when the model only requested tools
    pub content: Option<String>,

    /// Tool invocations requested by the model, in the model's order
    #[serde(default)]
    pub tool_calls: Vec<ToolCallRequest>,

    /// Model that generated this response
    pub model: String,

    /// Token usage statistics (if available)
    pub usage: Option<TokenUsage>,

    /// Finish reason
    pub finish_reason: Option<FinishReason>,
}

impl Completion {
    /// Whether the model asked for at least one tool invocation
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Token usage statistics
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Reason for completion finishing
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ToolUse,
    ContentFilter,
    Error,
}

/// Strategy trait for LLM providers
///
/// Implement this trait to add support for new chat-completion backends.
/// The assistant works exclusively through this interface.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &str;

    /// Generate a completion from messages.
    ///
    /// When `tools` is non-empty the provider advertises them to the model
    /// and leaves the choice of calling one to the model ("auto"); when
    /// empty, no tool fields are sent at all.
    async fn complete(
        &self,
        messages: &[Message],
        tools: &[FunctionSchema],
        options: &GenerationOptions,
    ) -> Result<Completion>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_options_defaults() {
        let opts = GenerationOptions::default();
        assert_eq!(opts.temperature, 0.7);
        assert_eq!(opts.max_tokens, 2048);
        assert_eq!(opts.model, "gpt-4o-mini");
    }

    #[test]
    fn test_completion_tool_call_detection() {
        let completion = Completion {
            content: None,
            tool_calls: vec![ToolCallRequest {
                id: Some("call_0".into()),
                name: "calculator".into(),
                arguments: r#"{"expression":"1+1"}"#.into(),
            }],
            model: "gpt-4o-mini".into(),
            usage: None,
            finish_reason: Some(FinishReason::ToolUse),
        };
        assert!(completion.has_tool_calls());
    }
}
