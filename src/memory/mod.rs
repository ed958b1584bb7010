//! Memory module for storing and retrieving conversation history.
//!
//! Two kinds of memory are provided:
//! - In-process conversation memory behind the [`MemoryProvider`] trait
//!   (currently a sliding window), usable transparently via [`ChatWithMemory`]
//! - A persistent, file-backed [`MemoryStore`] holding facts and preferences
//!   an agent should keep across runs

pub mod chat_wrapper;
pub mod sliding_window;
pub mod store;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{chat::ChatMessage, error::LLMError};

pub use chat_wrapper::ChatWithMemory;
pub use sliding_window::SlidingWindowMemory;
pub use store::{Memories, MemoryFact, MemoryStore};

/// Types of memory implementations available
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryType {
    /// Simple sliding window that keeps the N most recent messages
    SlidingWindow,
}

/// Trait for memory providers that can store and retrieve conversation history.
///
/// Memory providers enable LLMs to maintain context across conversations by:
/// - Storing messages as they are exchanged
/// - Retrieving relevant past messages based on queries
/// - Managing memory size and cleanup
#[async_trait]
pub trait MemoryProvider: Send + Sync {
    /// Store a message in memory.
    async fn remember(&mut self, message: &ChatMessage) -> Result<(), LLMError>;

    /// Retrieve relevant messages from memory based on a query.
    ///
    /// `limit` caps the number of returned messages; `None` returns all.
    async fn recall(&self, query: &str, limit: Option<usize>)
        -> Result<Vec<ChatMessage>, LLMError>;

    /// Clear all stored messages from memory.
    async fn clear(&mut self) -> Result<(), LLMError>;

    /// Get the type of this memory provider.
    fn memory_type(&self) -> MemoryType;

    /// Get the current number of stored messages.
    fn size(&self) -> usize;

    /// Check if the memory is empty.
    fn is_empty(&self) -> bool {
        self.size() == 0
    }
}
