//! # assistant-runtime
//!
//! Runtime providers for the terminal assistant.
//!
//! ## Providers
//!
//! - **OpenAI** (default): any OpenAI-compatible chat-completions endpoint,
//!   selected via `OPENAI_BASE_URL`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use assistant_runtime::OpenAiProvider;
//!
//! let provider = OpenAiProvider::from_env()?;
//! let agent = AgentBuilder::new()
//!     .provider(Arc::new(provider))
//!     .build()?;
//! ```

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "openai")]
pub use openai::{OpenAiConfig, OpenAiProvider};

// Re-export core types for convenience
pub use assistant_core::{
    Agent, AgentError, Conversation, LlmProvider, Message, Result, Role, Tool, ToolRegistry,
};
