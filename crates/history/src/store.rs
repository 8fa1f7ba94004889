//! Conversation stores.
//!
//! `JsonDirStore` reads a directory of `*.json` chat logs, each an array of
//! `{role, content, timestamp}` objects. The file stem is the conversation id.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use contextor_core::error::IndexError;
use contextor_core::{Conversation, ConversationStore, Message};
use tracing::{debug, info, warn};

pub struct JsonDirStore {
    dir: PathBuf,
}

impl JsonDirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read_conversation(path: &Path) -> Result<Conversation, String> {
        let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
        let messages: Vec<Message> = serde_json::from_str(&content).map_err(|e| e.to_string())?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_name.clone());

        Ok(Conversation {
            id,
            source_file: file_name,
            messages,
        })
    }
}

#[async_trait]
impl ConversationStore for JsonDirStore {
    fn name(&self) -> &str {
        "json_dir"
    }

    async fn conversations(&self) -> Result<Vec<Conversation>, IndexError> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(dir = %self.dir.display(), "Chat directory does not exist yet");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(IndexError::StoreUnavailable(format!(
                    "{}: {e}",
                    self.dir.display()
                )));
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut conversations = Vec::with_capacity(paths.len());
        for path in paths {
            match Self::read_conversation(&path) {
                Ok(conversation) => conversations.push(conversation),
                Err(reason) => {
                    warn!(file = %path.display(), error = %reason, "Skipping unreadable chat log");
                }
            }
        }

        debug!(dir = %self.dir.display(), count = conversations.len(), "Loaded conversations");
        Ok(conversations)
    }
}

/// A fixed set of conversations held in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    conversations: Vec<Conversation>,
}

impl MemoryStore {
    pub fn new(conversations: Vec<Conversation>) -> Self {
        Self { conversations }
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn conversations(&self) -> Result<Vec<Conversation>, IndexError> {
        Ok(self.conversations.clone())
    }
}
