//! Conversation Turns
//!
//! The ordered, append-only message log that forms the context window sent to
//! the model on every request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a message sender
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System prompt/instructions
    System,
    /// User input
    User,
    /// Assistant (LLM) response
    Assistant,
    /// Tool result (injected as context)
    Tool,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::Tool => write!(f, "tool"),
        }
    }
}

/// A tool invocation as the model requested it, arguments still in their
/// wire encoding
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Tool name
    pub name: String,

    /// Raw JSON argument payload
    pub arguments: String,

    /// Wire call id, when the provider supplied one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// A single turn in a conversation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    /// Message role
    pub role: Role,

    /// Text content; absent on assistant tool-call turns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// The requested invocation, on assistant tool-call turns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<ToolInvocation>,

    /// Name of the tool that produced this turn, on tool-result turns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,

    /// Call id this result answers, on tool-result turns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    /// Timestamp
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn base(role: Role) -> Self {
        Self {
            role,
            content: None,
            tool_call: None,
            tool_name: None,
            tool_call_id: None,
            timestamp: Utc::now(),
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::base(Role::System)
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::base(Role::User)
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::base(Role::Assistant)
        }
    }

    /// Create an assistant turn requesting a tool invocation
    pub fn tool_call(invocation: ToolInvocation) -> Self {
        Self {
            tool_call: Some(invocation),
            ..Self::base(Role::Assistant)
        }
    }

    /// Create a tool result turn
    pub fn tool_result(
        name: impl Into<String>,
        call_id: Option<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            content: Some(content.into()),
            tool_name: Some(name.into()),
            tool_call_id: call_id,
            ..Self::base(Role::Tool)
        }
    }

    /// Whether this turn is an assistant tool-call request
    pub fn is_tool_call(&self) -> bool {
        self.tool_call.is_some()
    }
}

/// Conversation history with utility methods
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system_prompt(prompt: impl Into<String>) -> Self {
        let mut conv = Self::new();
        conv.push(Message::system(prompt));
        conv
    }

    /// Append a message
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Append a resolved tool invocation as its call/result turn pair.
    ///
    /// The pair goes in together so an interrupt can never leave a call turn
    /// without its matching result.
    pub fn record_tool_exchange(&mut self, invocation: ToolInvocation, output: impl Into<String>) {
        let name = invocation.name.clone();
        let call_id = invocation.id.clone();
        self.messages.push(Message::tool_call(invocation));
        self.messages.push(Message::tool_result(name, call_id, output));
    }

    /// Get all messages
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Owned copy of the turn sequence, detached from internal storage
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    /// Get the last message
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Remove all messages. Idempotent.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
