//! Persistent memory store for AI agents.
//!
//! Facts, preferences, and conversation notes are kept in a single JSON file
//! that survives across runs. Every mutation is a full read-modify-write of
//! the file; there is no locking, indexing, or eviction. A missing or
//! unparseable file loads as empty memory rather than an error.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LLMError;

/// A single remembered fact with the moment it was stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryFact {
    /// The fact itself
    pub content: String,
    /// When the fact was stored
    pub timestamp: DateTime<Utc>,
}

/// Everything the store persists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Memories {
    /// Free-form facts, in insertion order
    pub facts: Vec<MemoryFact>,
    /// Keyed user preferences
    pub preferences: BTreeMap<String, String>,
    /// Notes about past conversations
    pub conversations: Vec<MemoryFact>,
}

/// File-backed long-term memory for agents.
pub struct MemoryStore {
    file_path: PathBuf,
}

impl MemoryStore {
    /// Create a store backed by the given JSON file. The file is not touched
    /// until the first write.
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    /// Path of the backing file.
    pub fn file_path(&self) -> &std::path::Path {
        &self.file_path
    }

    /// Load memories from the JSON file.
    ///
    /// A missing file or invalid JSON yields empty memories.
    pub fn load(&self) -> Memories {
        match fs::read_to_string(&self.file_path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
                log::warn!(
                    "memory file {} is not valid JSON ({err}), starting empty",
                    self.file_path.display()
                );
                Memories::default()
            }),
            Err(_) => Memories::default(),
        }
    }

    /// Save memories to the JSON file, pretty-printed.
    pub fn save(&self, memories: &Memories) -> Result<(), LLMError> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let contents = serde_json::to_string_pretty(memories)?;
        fs::write(&self.file_path, contents)?;
        Ok(())
    }

    /// Add a specific fact.
    pub fn add_fact(&self, fact: impl Into<String>) -> Result<(), LLMError> {
        let mut memories = self.load();
        memories.facts.push(MemoryFact {
            content: fact.into(),
            timestamp: Utc::now(),
        });
        self.save(&memories)
    }

    /// Add a user preference.
    pub fn add_preference(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), LLMError> {
        let mut memories = self.load();
        memories.preferences.insert(key.into(), value.into());
        self.save(&memories)
    }

    /// Record a note about a conversation.
    pub fn record_conversation(&self, note: impl Into<String>) -> Result<(), LLMError> {
        let mut memories = self.load();
        memories.conversations.push(MemoryFact {
            content: note.into(),
            timestamp: Utc::now(),
        });
        self.save(&memories)
    }

    /// Apply a `save_memory` tool call.
    ///
    /// `memory_type` is `"fact"` or `"preference"`. Preferences saved without
    /// an explicit key use the first word of the content as the key. The
    /// returned string is the tool result handed back to the model; unknown
    /// memory types report themselves there instead of failing the call.
    pub fn save_entry(
        &self,
        memory_type: &str,
        content: &str,
        key: Option<&str>,
    ) -> Result<String, LLMError> {
        match memory_type {
            "fact" => {
                self.add_fact(content)?;
                Ok("Fact saved to memory".to_string())
            }
            "preference" => {
                let key = key
                    .map(str::to_owned)
                    .or_else(|| content.split_whitespace().next().map(str::to_owned))
                    .unwrap_or_else(|| "preference".to_string());
                self.add_preference(key, content)?;
                Ok("Preference saved to memory".to_string())
            }
            other => Ok(format!("Unknown memory type: {other}")),
        }
    }

    /// Get a summary of all memories for injection into a system prompt.
    pub fn summary(&self) -> String {
        let memories = self.load();
        let mut summary = String::from("\n=== LONG-TERM MEMORY ===\n");

        if !memories.facts.is_empty() {
            summary.push_str("\nKnown Facts:\n");
            for fact in &memories.facts {
                summary.push_str(&format!("- {}\n", fact.content));
            }
        }

        if !memories.preferences.is_empty() {
            summary.push_str("\nUser Preferences:\n");
            for (key, value) in &memories.preferences {
                summary.push_str(&format!("- {key}: {value}\n"));
            }
        }

        summary
    }
}
