//! Turn stored conversations into index documents.

use contextor_chunker::{ChunkStrategy, Chunker};
use contextor_core::message::latest_timestamp;
use contextor_core::{Chunk, Conversation, DocumentMetadata, Role};
use tracing::warn;

/// Text and metadata for one document, before embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDocument {
    pub content: String,
    pub metadata: DocumentMetadata,
}

/// The conversation with system messages removed.
fn without_system(conversation: &Conversation) -> Conversation {
    Conversation {
        id: conversation.id.clone(),
        source_file: conversation.source_file.clone(),
        messages: conversation
            .messages
            .iter()
            .filter(|m| m.role != Role::System)
            .cloned()
            .collect(),
    }
}

fn to_pending(chunk: Chunk, conversation: &Conversation) -> PendingDocument {
    // Sliding windows carry no messages; describe them by their conversation.
    let source = if chunk.messages.is_empty() {
        &conversation.messages
    } else {
        &chunk.messages
    };
    PendingDocument {
        metadata: DocumentMetadata {
            conversation_id: conversation.id.clone(),
            message_count: source.len(),
            last_updated: latest_timestamp(source),
            source_file: conversation.source_file.clone(),
            chunk_kind: Some(chunk.kind),
        },
        content: chunk.content,
    }
}

/// Chunk every conversation with `strategy`. Conversations the strategy
/// cannot handle are skipped with a warning.
pub fn build_documents(
    chunker: &Chunker,
    strategy: ChunkStrategy,
    conversations: &[Conversation],
) -> Vec<PendingDocument> {
    let mut documents = Vec::new();
    for conversation in conversations {
        let filtered = without_system(conversation);
        if filtered.messages.iter().all(|m| m.content.trim().is_empty()) {
            continue;
        }
        match chunker.chunk_conversation(strategy, &filtered) {
            Ok(chunks) => documents.extend(
                chunks
                    .into_iter()
                    .filter(|c| !c.content.trim().is_empty())
                    .map(|c| to_pending(c, &filtered)),
            ),
            Err(e) => {
                warn!(conversation = %conversation.id, strategy = %strategy, error = %e, "Skipping conversation");
            }
        }
    }
    documents
}
