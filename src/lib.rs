//! llm-recipes is a unified interface for the LLM inference APIs its demo
//! programs exercise: a local llama.cpp server and the remote OpenAI API.
//!
//! # Overview
//! The crate provides a consistent API over OpenAI-compatible chat-completion
//! endpoints and the small amount of machinery the demos share:
//!
//! - Chat-based interactions, with or without streaming
//! - Function/tool calling and host-side tool dispatch
//! - Persistent agent memory backed by a JSON file
//! - A bounded ReAct reasoning loop
//! - Prompt/response capture for debugging
//!
//! # Architecture
//! The crate is organized into modules that handle different aspects of LLM
//! interactions; `demos/` contains one runnable program per usage pattern.

// Re-export for convenience
pub use async_trait::async_trait;

use chat::Tool;
use serde::{Deserialize, Serialize};

/// Backend implementations for the supported inference endpoints
pub mod backends;

/// Builder pattern for configuring and instantiating LLM providers
pub mod builder;

/// Chat-based interactions with language models
pub mod chat;

/// Error types and handling
pub mod error;

/// Shared base for OpenAI-compatible HTTP providers
pub mod providers;

/// Memory: in-process conversation windows and the persistent JSON store
pub mod memory;

/// ReAct agent loop and tool dispatch
pub mod agent;

/// Prompt/response capture and file logging
pub mod debug;

/// Secret store for API keys and other sensitive information
pub mod secret_store;

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
/// This is a no-op if the feature is not enabled.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}

/// Core trait implemented by every provider the builder can produce.
pub trait LLMProvider: chat::ChatProvider {
    /// Tools configured on the provider itself, if any.
    fn tools(&self) -> Option<&[Tool]> {
        None
    }
}

/// Tool call represents a function call that an LLM wants to make.
/// This is a standardized structure used across all providers.
#[derive(Debug, Deserialize, Serialize, Clone, Eq, PartialEq)]
pub struct ToolCall {
    /// The ID of the tool call.
    pub id: String,
    /// The type of the tool call (usually "function").
    #[serde(rename = "type")]
    pub call_type: String,
    /// The function to call.
    pub function: FunctionCall,
}

/// FunctionCall contains details about which function to call and with what arguments.
#[derive(Debug, Deserialize, Serialize, Clone, Eq, PartialEq)]
pub struct FunctionCall {
    /// The name of the function to call.
    pub name: String,
    /// The arguments to pass to the function, typically serialized as a JSON string.
    pub arguments: String,
}

impl std::fmt::Display for ToolCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({})",
            self.function.name,
            self.function.arguments.trim()
        )
    }
}
