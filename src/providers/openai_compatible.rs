//! OpenAI-compatible API client base implementation
//!
//! This module provides a generic base for OpenAI-compatible chat-completion
//! APIs that is reused by both backends: the remote OpenAI API and a local
//! llama.cpp `llama-server` instance.

use std::marker::PhantomData;
use std::pin::Pin;

use async_trait::async_trait;
use futures::stream::{Stream, StreamExt};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::chat::{
    ChatMessage, ChatProvider, ChatResponse, ChatRole, MessageType, StreamChoice, StreamDelta,
    StreamResponse, Tool, ToolChoice, Usage,
};
use crate::error::LLMError;
use crate::ToolCall;

/// Configuration trait for OpenAI-compatible providers
///
/// This trait allows the two backends to customize behavior while reusing
/// the common OpenAI-compatible implementation.
pub trait OpenAICompatibleConfig: Send + Sync {
    /// The name of the provider (e.g. "OpenAI", "LlamaServer")
    const PROVIDER_NAME: &'static str;

    /// Default base URL for the provider
    const DEFAULT_BASE_URL: &'static str;

    /// Default model for the provider
    const DEFAULT_MODEL: &'static str;

    /// Chat completions endpoint path (usually "chat/completions")
    const CHAT_ENDPOINT: &'static str = "chat/completions";

    /// Whether requests must carry a bearer token
    const REQUIRES_API_KEY: bool = true;

    /// Whether this provider supports stream options (like include_usage)
    const SUPPORTS_STREAM_OPTIONS: bool = false;
}

/// Generic OpenAI-compatible provider
///
/// Holds the request configuration shared by every call made through it.
#[derive(Debug)]
pub struct OpenAICompatibleProvider<T: OpenAICompatibleConfig> {
    pub api_key: String,
    pub base_url: Url,
    pub model: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub system: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub top_p: Option<f32>,
    pub top_k: Option<u32>,
    pub tools: Option<Vec<Tool>>,
    pub tool_choice: Option<ToolChoice>,
    pub client: Client,
    _phantom: PhantomData<T>,
}

/// Chat message in the OpenAI wire format
#[derive(Serialize, Debug)]
pub struct ApiChatMessage {
    pub role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

/// Chat request in the OpenAI wire format
#[derive(Serialize, Debug)]
pub struct ApiChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ApiChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_options: Option<StreamOptions>,
}

/// Chat response in the OpenAI wire format
#[derive(Deserialize, Debug)]
pub struct ApiChatResponse {
    pub choices: Vec<ApiChatChoice>,
    pub usage: Option<Usage>,
}

#[derive(Deserialize, Debug)]
pub struct ApiChatChoice {
    pub message: ApiChatMsg,
}

#[derive(Deserialize, Debug)]
pub struct ApiChatMsg {
    pub content: Option<String>,
    pub tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Deserialize, Debug, Serialize)]
pub struct StreamOptions {
    pub include_usage: bool,
}

/// One parsed SSE chunk of a streamed chat response
#[derive(Deserialize, Debug)]
struct ApiStreamChunk {
    #[serde(default)]
    choices: Vec<ApiStreamChoice>,
    usage: Option<Usage>,
}

#[derive(Deserialize, Debug)]
struct ApiStreamChoice {
    delta: ApiStreamDelta,
}

#[derive(Deserialize, Debug)]
struct ApiStreamDelta {
    content: Option<String>,
}

impl ChatResponse for ApiChatResponse {
    fn text(&self) -> Option<String> {
        self.choices.first().and_then(|c| c.message.content.clone())
    }

    fn tool_calls(&self) -> Option<Vec<ToolCall>> {
        self.choices
            .first()
            .and_then(|c| c.message.tool_calls.clone())
    }

    fn usage(&self) -> Option<Usage> {
        self.usage.clone()
    }
}

impl std::fmt::Display for ApiChatResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(choice) = self.choices.first() else {
            return write!(f, "");
        };
        if let Some(tool_calls) = &choice.message.tool_calls {
            for tool_call in tool_calls {
                writeln!(f, "{tool_call}")?;
            }
        }
        if let Some(content) = &choice.message.content {
            write!(f, "{content}")?;
        }
        Ok(())
    }
}

impl<T: OpenAICompatibleConfig> OpenAICompatibleProvider<T> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        api_key: impl Into<String>,
        base_url: Option<String>,
        model: Option<String>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
        timeout_seconds: Option<u64>,
        system: Option<String>,
        top_p: Option<f32>,
        top_k: Option<u32>,
        tools: Option<Vec<Tool>>,
        tool_choice: Option<ToolChoice>,
    ) -> Result<Self, LLMError> {
        let api_key = api_key.into();
        if T::REQUIRES_API_KEY && api_key.is_empty() {
            return Err(LLMError::AuthError(format!(
                "Missing {} API key",
                T::PROVIDER_NAME
            )));
        }

        let base_url = Url::parse(&base_url.unwrap_or_else(|| T::DEFAULT_BASE_URL.to_owned()))
            .map_err(|e| LLMError::InvalidRequest(format!("Invalid base URL: {e}")))?;

        let mut builder = Client::builder();
        if let Some(sec) = timeout_seconds {
            builder = builder.timeout(std::time::Duration::from_secs(sec));
        }
        let client = builder
            .build()
            .map_err(|e| LLMError::HttpError(e.to_string()))?;

        Ok(Self {
            api_key,
            base_url,
            model: model.unwrap_or_else(|| T::DEFAULT_MODEL.to_string()),
            max_tokens,
            temperature,
            system,
            timeout_seconds,
            top_p,
            top_k,
            tools,
            tool_choice,
            client,
            _phantom: PhantomData,
        })
    }

    /// Flatten chat history into wire messages, expanding tool results into
    /// one `role: "tool"` message per call and prepending the system prompt.
    fn build_wire_messages(&self, messages: &[ChatMessage]) -> Vec<ApiChatMessage> {
        let mut api_msgs: Vec<ApiChatMessage> = Vec::with_capacity(messages.len() + 1);

        if let Some(system) = &self.system {
            api_msgs.push(ApiChatMessage {
                role: "system",
                content: Some(system.clone()),
                tool_calls: None,
                tool_call_id: None,
            });
        }

        for msg in messages {
            match &msg.message_type {
                MessageType::ToolResult(results) => {
                    for result in results {
                        api_msgs.push(ApiChatMessage {
                            role: "tool",
                            content: Some(result.function.arguments.clone()),
                            tool_calls: None,
                            tool_call_id: Some(result.id.clone()),
                        });
                    }
                }
                MessageType::ToolUse(calls) => {
                    api_msgs.push(ApiChatMessage {
                        role: "assistant",
                        content: if msg.content.is_empty() {
                            None
                        } else {
                            Some(msg.content.clone())
                        },
                        tool_calls: Some(calls.clone()),
                        tool_call_id: None,
                    });
                }
                MessageType::Text => {
                    api_msgs.push(ApiChatMessage {
                        role: match msg.role {
                            ChatRole::User => "user",
                            ChatRole::Assistant => "assistant",
                        },
                        content: Some(msg.content.clone()),
                        tool_calls: None,
                        tool_call_id: None,
                    });
                }
            }
        }

        api_msgs
    }

    fn build_request<'a>(
        &'a self,
        messages: &[ChatMessage],
        tools: Option<&[Tool]>,
        stream: bool,
    ) -> ApiChatRequest<'a> {
        let request_tools = tools.map(|t| t.to_vec()).or_else(|| self.tools.clone());
        let request_tool_choice = if request_tools.is_some() {
            self.tool_choice.clone()
        } else {
            None
        };

        ApiChatRequest {
            model: &self.model,
            messages: self.build_wire_messages(messages),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            stream,
            top_p: self.top_p,
            top_k: self.top_k,
            tools: request_tools,
            tool_choice: request_tool_choice,
            stream_options: if stream && T::SUPPORTS_STREAM_OPTIONS {
                Some(StreamOptions {
                    include_usage: true,
                })
            } else {
                None
            },
        }
    }

    async fn send_request(&self, body: &ApiChatRequest<'_>) -> Result<reqwest::Response, LLMError> {
        let url = self
            .base_url
            .join(T::CHAT_ENDPOINT)
            .map_err(|e| LLMError::HttpError(e.to_string()))?;

        let mut request = self.client.post(url).json(body);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }
        if let Some(timeout) = self.timeout_seconds {
            request = request.timeout(std::time::Duration::from_secs(timeout));
        }

        if log::log_enabled!(log::Level::Trace) {
            if let Ok(json) = serde_json::to_string(body) {
                log::trace!("{} request payload: {}", T::PROVIDER_NAME, json);
            }
        }

        let response = request.send().await?;
        log::debug!("{} HTTP status: {}", T::PROVIDER_NAME, response.status());

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(LLMError::ResponseFormatError {
                message: format!("{} API returned error status: {status}", T::PROVIDER_NAME),
                raw_response: error_text,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl<T: OpenAICompatibleConfig> ChatProvider for OpenAICompatibleProvider<T> {
    async fn chat_with_tools(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[Tool]>,
    ) -> Result<Box<dyn ChatResponse>, LLMError> {
        let body = self.build_request(messages, tools, false);
        let response = self.send_request(&body).await?;

        let resp_text = response.text().await?;
        match serde_json::from_str::<ApiChatResponse>(&resp_text) {
            Ok(response) => Ok(Box::new(response)),
            Err(e) => Err(LLMError::ResponseFormatError {
                message: format!("Failed to decode {} API response: {e}", T::PROVIDER_NAME),
                raw_response: resp_text,
            }),
        }
    }

    /// Stream chat responses as a stream of text deltas
    async fn chat_stream(
        &self,
        messages: &[ChatMessage],
    ) -> Result<Pin<Box<dyn Stream<Item = Result<String, LLMError>> + Send>>, LLMError> {
        let struct_stream = self.chat_stream_struct(messages).await?;
        let content_stream = struct_stream.filter_map(|result| async move {
            match result {
                Ok(stream_response) => stream_response
                    .choices
                    .first()
                    .and_then(|choice| choice.delta.content.clone())
                    .filter(|content| !content.is_empty())
                    .map(Ok),
                Err(e) => Some(Err(e)),
            }
        });
        Ok(Box::pin(content_stream))
    }

    /// Stream chat responses as structured objects, including usage
    /// information when the provider reports it
    async fn chat_stream_struct(
        &self,
        messages: &[ChatMessage],
    ) -> Result<Pin<Box<dyn Stream<Item = Result<StreamResponse, LLMError>> + Send>>, LLMError>
    {
        let body = self.build_request(messages, None, true);
        let response = self.send_request(&body).await?;
        Ok(crate::chat::create_sse_stream(response, parse_stream_event))
    }
}

impl<T: OpenAICompatibleConfig> crate::LLMProvider for OpenAICompatibleProvider<T> {
    fn tools(&self) -> Option<&[Tool]> {
        self.tools.as_deref()
    }
}

/// Parse a single SSE event from a streamed chat completion.
///
/// Returns `Ok(None)` for events that carry nothing to surface: comments,
/// the `[DONE]` sentinel, and deltas without content or usage.
fn parse_stream_event(event: &str) -> Result<Option<StreamResponse>, LLMError> {
    for line in event.lines() {
        let line = line.trim();
        let Some(data) = line.strip_prefix("data: ") else {
            continue;
        };
        if data == "[DONE]" {
            return Ok(None);
        }

        let Ok(chunk) = serde_json::from_str::<ApiStreamChunk>(data) else {
            // Skip malformed keep-alives rather than killing the stream
            continue;
        };

        if let Some(usage) = chunk.usage {
            return Ok(Some(StreamResponse {
                choices: vec![StreamChoice {
                    delta: StreamDelta { content: None },
                }],
                usage: Some(usage),
            }));
        }

        if let Some(content) = chunk
            .choices
            .first()
            .and_then(|choice| choice.delta.content.clone())
        {
            return Ok(Some(StreamResponse {
                choices: vec![StreamChoice {
                    delta: StreamDelta {
                        content: Some(content),
                    },
                }],
                usage: None,
            }));
        }
    }
    Ok(None)
}
