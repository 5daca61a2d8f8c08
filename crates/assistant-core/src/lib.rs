//! # assistant-core
//!
//! Core assistant logic: an extensible tool system, an append-only
//! conversation log, a provider-agnostic LLM abstraction, and the
//! tool-calling loop that ties them together.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Agent                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │ Tool-Calling│  │    Tool     │  │   LlmProvider       │  │
//! │  │    Loop     │──│   Registry  │──│   (Strategy)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! │          │                                                   │
//! │  ┌─────────────┐                                            │
//! │  │ Conversation│   ordered turn log sent on every request   │
//! │  └─────────────┘                                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait enables swapping between OpenAI-compatible
//! backends (or test doubles) without changing assistant logic. The registry
//! is an explicit, injected instance — one per session, no globals.

pub mod error;
pub mod message;
pub mod provider;
pub mod reasoning;
pub mod tool;

pub use error::{AgentError, Result};
pub use message::{Conversation, Message, Role, ToolInvocation};
pub use provider::{Completion, FinishReason, GenerationOptions, LlmProvider, ToolCallRequest};
pub use reasoning::{Agent, AgentBuilder, AgentConfig};
pub use tool::{FunctionSchema, ParameterSchema, Tool, ToolCall, ToolOutcome, ToolRegistry, ToolSchema};
