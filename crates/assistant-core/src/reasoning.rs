//! Tool-Calling Loop
//!
//! Drives one user turn to completion: send the conversation and tool
//! schemas to the model, execute any requested tool calls, feed the results
//! back, and repeat until the model answers in plain text.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AgentError, Result};
use crate::message::{Conversation, Message, ToolInvocation};
use crate::provider::{GenerationOptions, LlmProvider, ToolCallRequest};
use crate::tool::{ToolCall, ToolRegistry};

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// System prompt, prepended to fresh conversations
    pub system_prompt: Option<String>,

    /// Maximum completion rounds per user turn before giving up
    pub max_rounds: usize,

    /// Generation options
    pub generation: GenerationOptions,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: Some(DEFAULT_SYSTEM_PROMPT.into()),
            max_rounds: 10,
            generation: GenerationOptions::default(),
        }
    }
}

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant. \
Use the available tools when they help answer the user's question; \
otherwise answer directly. Be concise and accurate.";

/// The main Agent struct
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("provider", &self.provider.name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Agent {
    /// Create a new agent
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        config: AgentConfig,
    ) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }

    /// Create with default configuration
    pub fn with_defaults(provider: Arc<dyn LlmProvider>, tools: Arc<ToolRegistry>) -> Self {
        Self::new(provider, tools, AgentConfig::default())
    }

    /// Run one user turn through the tool-calling loop.
    ///
    /// Appends the user message and every resolved tool exchange to the
    /// conversation, finishing with the assistant's text answer.
    pub async fn chat(&self, conversation: &mut Conversation, input: &str) -> Result<String> {
        if conversation.is_empty() {
            if let Some(prompt) = &self.config.system_prompt {
                conversation.push(Message::system(prompt));
            }
        }
        conversation.push(Message::user(input));

        self.drive(conversation).await
    }

    /// Run with a simple string input (creates a temporary conversation)
    pub async fn ask(&self, question: &str) -> Result<String> {
        let mut conversation = Conversation::new();
        self.chat(&mut conversation, question).await
    }

    /// The request/execute loop. Bounded by `max_rounds` so a model that
    /// never stops requesting tools cannot spin forever.
    async fn drive(&self, conversation: &mut Conversation) -> Result<String> {
        for round in 0..self.config.max_rounds {
            let completion = self
                .provider
                .complete(
                    conversation.messages(),
                    &self.tools.function_schemas(),
                    &self.config.generation,
                )
                .await?;

            if !completion.has_tool_calls() {
                let answer = completion.content.unwrap_or_default();
                conversation.push(Message::assistant(&answer));
                return Ok(answer);
            }

            tracing::debug!(
                round,
                calls = completion.tool_calls.len(),
                "Model requested tool calls"
            );

            let mut summaries = Vec::with_capacity(completion.tool_calls.len());
            for request in &completion.tool_calls {
                summaries.push(self.resolve_call(conversation, request).await);
            }

            conversation.push(Message::user(format!(
                "Tool calls completed: {}",
                summaries.join(", ")
            )));
        }

        Err(AgentError::RoundLimitExceeded(self.config.max_rounds))
    }

    /// Execute one requested call and return its summary fragment.
    ///
    /// Successful calls (including tools reporting domain failures as data)
    /// are persisted as a call/result turn pair. Dispatch failures reach the
    /// model only through the summary.
    async fn resolve_call(
        &self,
        conversation: &mut Conversation,
        request: &ToolCallRequest,
    ) -> String {
        let call = ToolCall {
            name: request.name.clone(),
            arguments: parse_arguments(&request.arguments),
            id: request.id.clone(),
        };

        tracing::debug!(tool = %call.name, "Executing tool");

        match self.tools.execute(&call).await {
            Ok(outcome) => {
                let invocation = ToolInvocation {
                    name: request.name.clone(),
                    arguments: request.arguments.clone(),
                    id: request.id.clone(),
                };
                conversation.record_tool_exchange(invocation, outcome.output.clone());
                format!("{}: {}", request.name, outcome.output)
            }
            Err(e) => {
                tracing::warn!(tool = %request.name, error = %e, "Tool call failed");
                format!("{}: Error - {}", request.name, e)
            }
        }
    }

    /// Get the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }
}

/// Decode a raw argument payload into a key-value map.
///
/// Malformed payloads from the model must not sink the round, so anything
/// unparseable becomes an empty map and the tool decides what to do with it.
fn parse_arguments(raw: &str) -> HashMap<String, serde_json::Value> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Unparseable tool arguments, substituting empty map");
        HashMap::new()
    })
}

/// Builder for Agent configuration
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: ToolRegistry,
    config: AgentConfig,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            tools: ToolRegistry::new(),
            config: AgentConfig::default(),
        }
    }

    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Register a tool; duplicate names fail here, before any chat begins
    pub fn tool<T: crate::tool::Tool + 'static>(mut self, tool: T) -> Result<Self> {
        self.tools.register(tool)?;
        Ok(self)
    }

    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.generation.temperature = temp;
        self
    }

    pub fn max_rounds(mut self, max: usize) -> Self {
        self.config.max_rounds = max;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self
            .provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        Ok(Agent::new(provider, Arc::new(self.tools), self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;
    use crate::provider::{Completion, FinishReason};
    use crate::tool::{FunctionSchema, ParameterSchema, Tool, ToolOutcome, ToolSchema};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Provider that replays a fixed script of completions
    struct ScriptedProvider {
        script: Mutex<VecDeque<Completion>>,
    }

    impl ScriptedProvider {
        fn new(script: Vec<Completion>) -> Self {
            Self {
                script: Mutex::new(script.into()),
            }
        }

        fn remaining(&self) -> usize {
            self.script.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            _messages: &[Message],
            _tools: &[FunctionSchema],
            _options: &GenerationOptions,
        ) -> Result<Completion> {
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| AgentError::Provider("script exhausted".into()))
        }
    }

    /// Provider that requests the same tool on every round
    struct RelentlessProvider;

    #[async_trait]
    impl LlmProvider for RelentlessProvider {
        fn name(&self) -> &str {
            "relentless"
        }

        async fn complete(
            &self,
            _messages: &[Message],
            _tools: &[FunctionSchema],
            _options: &GenerationOptions,
        ) -> Result<Completion> {
            Ok(tool_call_completion("echo", r#"{"text":"again"}"#))
        }
    }

    /// Echo tool that records every call it receives
    struct EchoTool {
        calls: Arc<Mutex<Vec<ToolCall>>>,
    }

    impl EchoTool {
        fn new() -> (Self, Arc<Mutex<Vec<ToolCall>>>) {
            let calls = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    calls: calls.clone(),
                },
                calls,
            )
        }
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "echo".into(),
                description: "Echo the given text back".into(),
                parameters: vec![ParameterSchema::required_string("text", "Text to echo")],
            }
        }

        async fn execute(&self, call: &ToolCall) -> Result<ToolOutcome> {
            self.calls.lock().unwrap().push(call.clone());
            let text = call.str_arg("text").unwrap_or_default();
            Ok(ToolOutcome::success(
                "echo",
                json!({"result": text}).to_string(),
            ))
        }
    }

    fn tool_call_completion(name: &str, arguments: &str) -> Completion {
        Completion {
            content: None,
            tool_calls: vec![crate::provider::ToolCallRequest {
                id: Some("call_0".into()),
                name: name.into(),
                arguments: arguments.into(),
            }],
            model: "test".into(),
            usage: None,
            finish_reason: Some(FinishReason::ToolUse),
        }
    }

    fn text_completion(text: &str) -> Completion {
        Completion {
            content: Some(text.into()),
            tool_calls: Vec::new(),
            model: "test".into(),
            usage: None,
            finish_reason: Some(FinishReason::Stop),
        }
    }

    fn agent_with_echo(provider: Arc<dyn LlmProvider>) -> (Agent, Arc<Mutex<Vec<ToolCall>>>) {
        let (echo, calls) = EchoTool::new();
        let agent = AgentBuilder::new()
            .provider(provider)
            .tool(echo)
            .unwrap()
            .build()
            .unwrap();
        (agent, calls)
    }

    #[tokio::test]
    async fn test_plain_answer_without_tools() {
        let provider = Arc::new(ScriptedProvider::new(vec![text_completion("Hi there")]));
        let (agent, calls) = agent_with_echo(provider);

        let mut conversation = Conversation::new();
        let answer = agent.chat(&mut conversation, "hello").await.unwrap();

        assert_eq!(answer, "Hi there");
        assert!(calls.lock().unwrap().is_empty());
        // system prompt, user turn, assistant answer
        assert_eq!(conversation.len(), 3);
        assert_eq!(conversation.last().unwrap().role, Role::Assistant);
    }

    #[tokio::test]
    async fn test_echo_round_trip() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            tool_call_completion("echo", r#"{"text":"hi"}"#),
            text_completion("The echo came back: hi"),
        ]));
        let (agent, calls) = agent_with_echo(provider.clone());

        let mut conversation = Conversation::new();
        let answer = agent.chat(&mut conversation, "echo hi please").await.unwrap();

        assert_eq!(answer, "The echo came back: hi");
        assert_eq!(provider.remaining(), 0);
        assert_eq!(calls.lock().unwrap().len(), 1);

        // The call/result pair was persisted, then the synthetic follow-up
        let turns = conversation.snapshot();
        let call_idx = turns.iter().position(|m| m.is_tool_call()).unwrap();
        assert_eq!(turns[call_idx + 1].role, Role::Tool);
        assert_eq!(turns[call_idx + 1].tool_name.as_deref(), Some("echo"));

        let follow_up = &turns[call_idx + 2];
        assert_eq!(follow_up.role, Role::User);
        let follow_up_text = follow_up.content.as_deref().unwrap();
        assert!(follow_up_text.starts_with("Tool calls completed: echo:"));
        assert!(follow_up_text.contains("hi"));
    }

    #[tokio::test]
    async fn test_missing_tool_is_summarized_not_fatal() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            tool_call_completion("missing", r#"{}"#),
            text_completion("That tool does not exist."),
        ]));
        let (agent, _calls) = agent_with_echo(provider);

        let mut conversation = Conversation::new();
        let answer = agent.chat(&mut conversation, "use the missing tool").await.unwrap();

        assert_eq!(answer, "That tool does not exist.");

        // No tool-call pair persisted for the failed dispatch
        assert!(conversation.messages().iter().all(|m| !m.is_tool_call()));

        let follow_up = conversation
            .messages()
            .iter()
            .find(|m| {
                m.content
                    .as_deref()
                    .is_some_and(|c| c.starts_with("Tool calls completed:"))
            })
            .unwrap();
        let text = follow_up.content.as_deref().unwrap();
        assert!(text.contains("missing: Error"));
    }

    #[tokio::test]
    async fn test_round_limit_exceeded() {
        let (agent, calls) = agent_with_echo(Arc::new(RelentlessProvider));

        let mut conversation = Conversation::new();
        let err = agent.chat(&mut conversation, "loop forever").await.unwrap_err();

        assert!(matches!(err, AgentError::RoundLimitExceeded(10)));
        assert_eq!(calls.lock().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_malformed_arguments_become_empty_map() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            tool_call_completion("echo", "definitely {not json"),
            text_completion("done"),
        ]));
        let (agent, calls) = agent_with_echo(provider);

        let mut conversation = Conversation::new();
        let answer = agent.chat(&mut conversation, "echo something").await.unwrap();

        assert_eq!(answer, "done");
        let recorded = calls.lock().unwrap();
        assert_eq!(recorded.len(), 1);
        assert!(recorded[0].arguments.is_empty());
    }

    #[tokio::test]
    async fn test_sibling_calls_resolve_in_request_order() {
        let mut first = tool_call_completion("echo", r#"{"text":"one"}"#);
        first.tool_calls.push(crate::provider::ToolCallRequest {
            id: Some("call_1".into()),
            name: "echo".into(),
            arguments: r#"{"text":"two"}"#.into(),
        });

        let provider = Arc::new(ScriptedProvider::new(vec![first, text_completion("ok")]));
        let (agent, calls) = agent_with_echo(provider);

        let mut conversation = Conversation::new();
        agent.chat(&mut conversation, "echo twice").await.unwrap();

        let recorded = calls.lock().unwrap();
        assert_eq!(recorded[0].str_arg("text"), Some("one"));
        assert_eq!(recorded[1].str_arg("text"), Some("two"));

        // Final answer is last; the follow-up before it keeps request order
        let turns = conversation.snapshot();
        let summary = turns[turns.len() - 2].content.as_deref().unwrap();
        assert!(summary.find("one").unwrap() < summary.find("two").unwrap());
    }

    #[tokio::test]
    async fn test_builder_requires_provider() {
        let err = AgentBuilder::new().build().unwrap_err();
        assert!(matches!(err, AgentError::Config(_)));
    }
}
