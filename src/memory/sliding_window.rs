//! Simple sliding window memory implementation.
//!
//! This module provides a basic FIFO (First In, First Out) memory that maintains
//! a fixed-size window of the most recent conversation messages.

use std::collections::VecDeque;

use async_trait::async_trait;

use crate::{chat::ChatMessage, error::LLMError};

use super::{MemoryProvider, MemoryType};

/// Simple sliding window memory that keeps the N most recent messages.
///
/// Old messages are automatically removed when the window size limit is
/// reached. Suitable when only recent context matters.
#[derive(Debug, Clone)]
pub struct SlidingWindowMemory {
    messages: VecDeque<ChatMessage>,
    window_size: usize,
}

impl SlidingWindowMemory {
    /// Create a new sliding window memory with the specified window size.
    ///
    /// # Panics
    ///
    /// Panics if `window_size` is 0
    pub fn new(window_size: usize) -> Self {
        if window_size == 0 {
            panic!("Window size must be greater than 0");
        }

        Self {
            messages: VecDeque::with_capacity(window_size),
            window_size,
        }
    }

    /// Get the configured window size.
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Get all stored messages in chronological order.
    pub fn messages(&self) -> Vec<ChatMessage> {
        Vec::from(self.messages.clone())
    }

    /// Get the most recent N messages.
    pub fn recent_messages(&self, limit: usize) -> Vec<ChatMessage> {
        let len = self.messages.len();
        let start = len.saturating_sub(limit);
        self.messages.range(start..).cloned().collect()
    }
}

#[async_trait]
impl MemoryProvider for SlidingWindowMemory {
    async fn remember(&mut self, message: &ChatMessage) -> Result<(), LLMError> {
        if self.messages.len() >= self.window_size {
            self.messages.pop_front();
        }
        self.messages.push_back(message.clone());
        Ok(())
    }

    async fn recall(
        &self,
        _query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<ChatMessage>, LLMError> {
        let limit = limit.unwrap_or(self.messages.len());
        Ok(self.recent_messages(limit))
    }

    async fn clear(&mut self) -> Result<(), LLMError> {
        self.messages.clear();
        Ok(())
    }

    fn memory_type(&self) -> MemoryType {
        MemoryType::SlidingWindow
    }

    fn size(&self) -> usize {
        self.messages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn window_evicts_oldest_message() {
        let mut memory = SlidingWindowMemory::new(3);
        for text in ["one", "two", "three", "four"] {
            memory
                .remember(&ChatMessage::user().content(text).build())
                .await
                .unwrap();
        }

        assert_eq!(memory.size(), 3);
        let messages = memory.messages();
        assert_eq!(messages[0].content, "two");
        assert_eq!(messages[2].content, "four");
    }

    #[tokio::test]
    async fn recall_respects_limit() {
        let mut memory = SlidingWindowMemory::new(5);
        for text in ["a", "b", "c"] {
            memory
                .remember(&ChatMessage::user().content(text).build())
                .await
                .unwrap();
        }

        let recalled = memory.recall("", Some(2)).await.unwrap();
        assert_eq!(recalled.len(), 2);
        assert_eq!(recalled[0].content, "b");
        assert_eq!(recalled[1].content, "c");
    }

    #[tokio::test]
    async fn clear_empties_the_window() {
        let mut memory = SlidingWindowMemory::new(2);
        memory
            .remember(&ChatMessage::user().content("hello").build())
            .await
            .unwrap();
        memory.clear().await.unwrap();
        assert!(memory.is_empty());
    }
}
