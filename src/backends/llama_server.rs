//! Local llama.cpp server client implementation using the OpenAI-compatible base
//!
//! `llama-server` exposes the OpenAI chat-completions wire format over HTTP,
//! so this backend is a configuration of the generic provider pointed at
//! localhost. The model is whatever GGUF file the server was started with;
//! the identifier sent in requests is ignored by single-model servers.

use crate::providers::openai_compatible::{OpenAICompatibleConfig, OpenAICompatibleProvider};

/// llama-server configuration for the generic provider
#[derive(Debug)]
pub struct LlamaServerConfig;

impl OpenAICompatibleConfig for LlamaServerConfig {
    const PROVIDER_NAME: &'static str = "LlamaServer";
    const DEFAULT_BASE_URL: &'static str = "http://localhost:8080/v1/";
    const DEFAULT_MODEL: &'static str = "default";
    const REQUIRES_API_KEY: bool = false;
    const SUPPORTS_STREAM_OPTIONS: bool = false;
}

/// Client for a local llama.cpp `llama-server` instance
pub type LlamaServer = OpenAICompatibleProvider<LlamaServerConfig>;
