//! OpenAI API client implementation using the OpenAI-compatible base
//!
//! This module provides integration with OpenAI's GPT models through their API.

use crate::providers::openai_compatible::{OpenAICompatibleConfig, OpenAICompatibleProvider};

/// OpenAI configuration for the generic provider
#[derive(Debug)]
pub struct OpenAIConfig;

impl OpenAICompatibleConfig for OpenAIConfig {
    const PROVIDER_NAME: &'static str = "OpenAI";
    const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1/";
    const DEFAULT_MODEL: &'static str = "gpt-4o-mini";
    const REQUIRES_API_KEY: bool = true;
    const SUPPORTS_STREAM_OPTIONS: bool = true;
}

/// Client for the OpenAI API
pub type OpenAI = OpenAICompatibleProvider<OpenAIConfig>;
