//! Chat wrapper that adds memory capabilities to any ChatProvider.

use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::Stream;
use tokio::sync::RwLock;

use crate::{
    chat::{ChatMessage, ChatProvider, ChatResponse, StreamResponse, Tool},
    error::LLMError,
    memory::MemoryProvider,
    LLMProvider,
};

/// Adds transparent conversation memory to any `LLMProvider`.
///
/// Remembered messages are prepended to every chat call, and the exchange
/// itself is stored afterwards, so callers can hold a conversation one
/// message at a time.
pub struct ChatWithMemory {
    provider: Arc<dyn LLMProvider>,
    memory: Arc<RwLock<Box<dyn MemoryProvider>>>,
}

impl ChatWithMemory {
    /// Build a new wrapper around `provider`, storing context in `memory`.
    pub fn new(provider: Arc<dyn LLMProvider>, memory: Box<dyn MemoryProvider>) -> Self {
        Self {
            provider,
            memory: Arc::new(RwLock::new(memory)),
        }
    }

    /// Access the wrapped provider.
    pub fn inner(&self) -> &dyn LLMProvider {
        self.provider.as_ref()
    }

    async fn context_with(&self, messages: &[ChatMessage]) -> Result<Vec<ChatMessage>, LLMError> {
        let mut context = {
            let guard = self.memory.read().await;
            guard.recall("", None).await?
        };
        context.extend_from_slice(messages);
        Ok(context)
    }

    async fn store_exchange(
        &self,
        messages: &[ChatMessage],
        response_text: Option<String>,
    ) -> Result<(), LLMError> {
        let mut guard = self.memory.write().await;
        for message in messages {
            guard.remember(message).await?;
        }
        if let Some(text) = response_text {
            guard
                .remember(&ChatMessage::assistant().content(text).build())
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl ChatProvider for ChatWithMemory {
    async fn chat_with_tools(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[Tool]>,
    ) -> Result<Box<dyn ChatResponse>, LLMError> {
        let context = self.context_with(messages).await?;
        let response = self.provider.chat_with_tools(&context, tools).await?;
        self.store_exchange(messages, response.text()).await?;
        Ok(response)
    }

    /// Streaming goes through with remembered context, but the streamed
    /// output is not written back: the wrapper never sees the assembled text.
    async fn chat_stream(
        &self,
        messages: &[ChatMessage],
    ) -> Result<Pin<Box<dyn Stream<Item = Result<String, LLMError>> + Send>>, LLMError> {
        let context = self.context_with(messages).await?;
        self.store_exchange(messages, None).await?;
        self.provider.chat_stream(&context).await
    }

    async fn chat_stream_struct(
        &self,
        messages: &[ChatMessage],
    ) -> Result<Pin<Box<dyn Stream<Item = Result<StreamResponse, LLMError>> + Send>>, LLMError>
    {
        let context = self.context_with(messages).await?;
        self.store_exchange(messages, None).await?;
        self.provider.chat_stream_struct(&context).await
    }

    async fn memory_contents(&self) -> Option<Vec<ChatMessage>> {
        let guard = self.memory.read().await;
        guard.recall("", None).await.ok()
    }
}

impl LLMProvider for ChatWithMemory {
    fn tools(&self) -> Option<&[Tool]> {
        self.provider.tools()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatRole;
    use crate::memory::SlidingWindowMemory;
    use crate::ToolCall;

    #[derive(Debug)]
    struct EchoResponse(String);

    impl std::fmt::Display for EchoResponse {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl ChatResponse for EchoResponse {
        fn text(&self) -> Option<String> {
            Some(self.0.clone())
        }

        fn tool_calls(&self) -> Option<Vec<ToolCall>> {
            None
        }
    }

    /// Replies with the number of messages it was given.
    #[derive(Debug)]
    struct CountingProvider;

    #[async_trait]
    impl ChatProvider for CountingProvider {
        async fn chat_with_tools(
            &self,
            messages: &[ChatMessage],
            _tools: Option<&[Tool]>,
        ) -> Result<Box<dyn ChatResponse>, LLMError> {
            Ok(Box::new(EchoResponse(format!("saw {}", messages.len()))))
        }
    }

    impl LLMProvider for CountingProvider {}

    #[tokio::test]
    async fn context_grows_across_calls() {
        let wrapper = ChatWithMemory::new(
            Arc::new(CountingProvider),
            Box::new(SlidingWindowMemory::new(10)),
        );

        let first = wrapper
            .chat(&[ChatMessage::user().content("My name is Alice").build()])
            .await
            .unwrap();
        assert_eq!(first.text().unwrap(), "saw 1");

        // Second call sees the first user message plus the stored reply
        let second = wrapper
            .chat(&[ChatMessage::user().content("What's my name?").build()])
            .await
            .unwrap();
        assert_eq!(second.text().unwrap(), "saw 3");
    }

    #[tokio::test]
    async fn memory_contents_reflects_stored_exchange() {
        let wrapper = ChatWithMemory::new(
            Arc::new(CountingProvider),
            Box::new(SlidingWindowMemory::new(10)),
        );

        wrapper
            .chat(&[ChatMessage::user().content("hello").build()])
            .await
            .unwrap();

        let contents = wrapper.memory_contents().await.unwrap();
        assert_eq!(contents.len(), 2);
        assert_eq!(contents[0].role, ChatRole::User);
        assert_eq!(contents[1].role, ChatRole::Assistant);
    }
}
