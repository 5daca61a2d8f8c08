//! OpenAI-Compatible LLM Provider
//!
//! Implementation of `LlmProvider` for the chat-completions wire protocol.
//! Works against the public OpenAI endpoint or any server speaking the same
//! API (set `OPENAI_BASE_URL`).

use std::time::Duration;

use assistant_core::{
    error::{AgentError, Result},
    message::{Message, Role},
    provider::{
        Completion, FinishReason, GenerationOptions, LlmProvider, TokenUsage, ToolCallRequest,
    },
    tool::FunctionSchema,
};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// OpenAI provider configuration
#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    /// API key sent as a bearer token
    pub api_key: String,

    /// Base URL of the chat-completions API
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".into(),
            timeout_secs: 120,
        }
    }

    /// Read configuration from the environment. The API key is the one
    /// setting with no usable default.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            AgentError::Config(
                "OPENAI_API_KEY environment variable is required. \
                 Set it in your .env file or environment."
                    .into(),
            )
        })?;

        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            config.base_url = base_url;
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// OpenAI-compatible chat-completions provider
pub struct OpenAiProvider {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiProvider {
    /// Create from configuration
    pub fn from_config(config: OpenAiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::Config(format!("HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(OpenAiConfig::from_env()?)
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Convert conversation turns to wire messages
    fn convert_messages(messages: &[Message]) -> Vec<WireMessage> {
        messages
            .iter()
            .map(|m| match (&m.role, &m.tool_call) {
                (Role::Assistant, Some(invocation)) => WireMessage {
                    role: "assistant".into(),
                    content: None,
                    tool_calls: Some(vec![WireToolCall {
                        id: invocation.id.clone(),
                        call_type: "function".into(),
                        function: WireFunctionCall {
                            name: invocation.name.clone(),
                            arguments: invocation.arguments.clone(),
                        },
                    }]),
                    tool_call_id: None,
                    name: None,
                },
                (Role::Tool, _) => WireMessage {
                    role: "tool".into(),
                    content: m.content.clone(),
                    tool_calls: None,
                    tool_call_id: m.tool_call_id.clone(),
                    name: m.tool_name.clone(),
                },
                (_, _) => WireMessage {
                    role: m.role.to_string(),
                    content: m.content.clone(),
                    tool_calls: None,
                    tool_call_id: None,
                    name: None,
                },
            })
            .collect()
    }

    /// Build the request body. Tool fields are present only when the
    /// registry offered schemas; tool choice is then left to the model.
    fn build_request<'a>(
        messages: &[Message],
        tools: &'a [FunctionSchema],
        options: &'a GenerationOptions,
    ) -> ChatRequest<'a> {
        ChatRequest {
            model: &options.model,
            messages: Self::convert_messages(messages),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            top_p: options.top_p,
            tools: if tools.is_empty() {
                None
            } else {
                Some(
                    tools
                        .iter()
                        .map(|f| WireTool {
                            tool_type: "function",
                            function: f,
                        })
                        .collect(),
                )
            },
            tool_choice: if tools.is_empty() { None } else { Some("auto") },
        }
    }

    /// Convert a wire response to the core completion type
    fn convert_completion(response: ChatResponse, requested_model: &str) -> Result<Completion> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::Provider("response contained no choices".into()))?;

        let tool_calls = choice
            .message
            .tool_calls
            .into_iter()
            .map(|c| ToolCallRequest {
                id: c.id,
                name: c.function.name,
                arguments: c.function.arguments,
            })
            .collect();

        Ok(Completion {
            content: choice.message.content,
            tool_calls,
            model: response.model.unwrap_or_else(|| requested_model.into()),
            usage: response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            finish_reason: choice.finish_reason.as_deref().map(parse_finish_reason),
        })
    }
}

fn parse_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "stop" => FinishReason::Stop,
        "length" => FinishReason::Length,
        "tool_calls" | "function_call" => FinishReason::ToolUse,
        "content_filter" => FinishReason::ContentFilter,
        _ => FinishReason::Error,
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "OpenAI"
    }

    async fn complete(
        &self,
        messages: &[Message],
        tools: &[FunctionSchema],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let request = Self::build_request(messages, tools, options);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    AgentError::ProviderUnavailable(e.to_string())
                } else {
                    AgentError::Provider(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AgentError::Auth(body),
                StatusCode::TOO_MANY_REQUESTS => AgentError::RateLimited(body),
                s if s.is_server_error() => {
                    AgentError::ProviderUnavailable(format!("{}: {}", s, body))
                }
                s => AgentError::Provider(format!("{}: {}", s, body)),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Provider(format!("malformed response: {}", e)))?;

        Self::convert_completion(parsed, &options.model)
    }
}

// Wire types for the chat-completions protocol

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<WireTool<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: String,
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
struct WireTool<'a> {
    #[serde(rename = "type")]
    tool_type: &'static str,
    function: &'a FunctionSchema,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct WireToolCall {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "type", default = "function_call_type")]
    call_type: String,
    function: WireFunctionCall,
}

fn function_call_type() -> String {
    "function".into()
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<WireChoice>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<WireToolCall>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assistant_core::message::ToolInvocation;
    use assistant_core::tool::{ParameterSchema, ToolSchema};

    fn echo_schema() -> FunctionSchema {
        ToolSchema {
            name: "echo".into(),
            description: "Echo text".into(),
            parameters: vec![ParameterSchema::required_string("text", "Text to echo")],
        }
        .function_schema()
    }

    #[test]
    fn test_message_conversion() {
        let mut messages = vec![
            Message::system("You are helpful."),
            Message::user("Hello"),
        ];
        messages.push(Message::tool_call(ToolInvocation {
            name: "echo".into(),
            arguments: r#"{"text":"hi"}"#.into(),
            id: Some("call_1".into()),
        }));
        messages.push(Message::tool_result("echo", Some("call_1".into()), "hi"));

        let wire = OpenAiProvider::convert_messages(&messages);
        assert_eq!(wire.len(), 4);
        assert_eq!(wire[0].role, "system");
        assert_eq!(wire[1].role, "user");

        assert_eq!(wire[2].role, "assistant");
        assert!(wire[2].content.is_none());
        let calls = wire[2].tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].function.name, "echo");

        assert_eq!(wire[3].role, "tool");
        assert_eq!(wire[3].tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(wire[3].name.as_deref(), Some("echo"));
    }

    #[test]
    fn test_request_offers_tools_with_auto_choice() {
        let messages = vec![Message::user("hi")];
        let tools = vec![echo_schema()];
        let options = GenerationOptions::default();

        let with_tools = OpenAiProvider::build_request(&messages, &tools, &options);
        let body = serde_json::to_value(&with_tools).unwrap();
        assert_eq!(body["tool_choice"], "auto");
        assert_eq!(body["tools"][0]["type"], "function");
        assert_eq!(body["tools"][0]["function"]["name"], "echo");
        assert_eq!(
            body["tools"][0]["function"]["parameters"]["type"],
            "object"
        );

        let without_tools = OpenAiProvider::build_request(&messages, &[], &options);
        let body = serde_json::to_value(&without_tools).unwrap();
        assert!(body.get("tools").is_none());
        assert!(body.get("tool_choice").is_none());
    }

    #[test]
    fn test_response_with_tool_calls_parses() {
        let raw = r#"{
            "model": "gpt-4o-mini",
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {"name": "weather", "arguments": "{\"location\":\"Tokyo\"}"}
                    }]
                },
                "finish_reason": "tool_calls"
            }],
            "usage": {"prompt_tokens": 12, "completion_tokens": 7, "total_tokens": 19}
        }"#;

        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        let completion = OpenAiProvider::convert_completion(parsed, "gpt-4o-mini").unwrap();

        assert!(completion.has_tool_calls());
        assert_eq!(completion.tool_calls[0].name, "weather");
        assert_eq!(
            completion.tool_calls[0].arguments,
            r#"{"location":"Tokyo"}"#
        );
        assert_eq!(completion.finish_reason, Some(FinishReason::ToolUse));
        assert_eq!(completion.usage.unwrap().total_tokens, 19);
    }

    #[test]
    fn test_empty_choices_is_provider_error() {
        let parsed: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        let err = OpenAiProvider::convert_completion(parsed, "gpt-4o-mini").unwrap_err();
        assert!(matches!(err, AgentError::Provider(_)));
    }

    #[test]
    fn test_config_from_parts() {
        let config = OpenAiConfig::new("sk-test").with_base_url("http://localhost:8080/v1/");
        let provider = OpenAiProvider::from_config(config).unwrap();
        assert_eq!(
            provider.endpoint(),
            "http://localhost:8080/v1/chat/completions"
        );
    }
}
