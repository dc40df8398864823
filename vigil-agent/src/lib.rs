//! Vigil Agent - the reasoning side of a cycle.
//!
//! Provides:
//! - `Provider`, the boundary to a chat-completions LLM, and `OpenAiProvider`
//! - `CycleContext`, the per-cycle view (balances, memory, time) given to the model
//! - `DecisionDelegate` and `ReactDelegate`, a bounded reason/act loop that
//!   dispatches tool calls through the registry
//! - `ContentComposer` and `LlmComposer`, the tool-less writer used for publications
//!
//! ## Example
//!
//! ```ignore
//! use vigil_agent::{CycleContext, DecisionDelegate, ReactDelegate};
//!
//! let delegate = ReactDelegate::new(provider, system_prompt, 10);
//! let decision = delegate.decide(&context, &registry).await?;
//! println!("{}", decision.narrative);
//! ```

pub mod composer;
pub mod context;
pub mod delegate;
pub mod openai;
pub mod provider;

pub use composer::{ContentComposer, LlmComposer};
pub use context::CycleContext;
pub use delegate::{Decision, DecisionDelegate, ReactDelegate};
pub use openai::OpenAiProvider;
pub use provider::{ChatMessage, ChatResponse, Provider, Role, ToolCall};
