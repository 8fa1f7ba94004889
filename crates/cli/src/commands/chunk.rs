//! `contextor chunk`: Preview how the chat corpus is segmented.

use contextor_chunker::ChunkStrategy;
use contextor_config::AppConfig;
use contextor_core::text::truncate_with;
use contextor_core::{Chunk, ConversationStore};

const PREVIEW_CHARS: usize = 160;

pub async fn run(
    config: &AppConfig,
    strategy: Option<ChunkStrategy>,
    limit: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let (store, chunker, configured) = contextor_pipeline::corpus_tools(config)?;
    let strategy = strategy.unwrap_or(configured);
    let conversations = store.conversations().await?;

    let mut chunks = Vec::new();
    let mut skipped = 0;
    for conversation in &conversations {
        match chunker.chunk_conversation(strategy, conversation) {
            Ok(c) => chunks.extend(c),
            Err(e) => {
                tracing::warn!(conversation = %conversation.id, error = %e, "Skipping conversation");
                skipped += 1;
            }
        }
    }

    println!(
        "{} chunks from {} conversations ({strategy}, {skipped} skipped)",
        chunks.len(),
        conversations.len()
    );
    for (i, chunk) in chunks.iter().take(limit).enumerate() {
        print_chunk(i, chunk)?;
    }
    if chunks.len() > limit {
        println!("\n… {} more", chunks.len() - limit);
    }
    Ok(())
}

fn print_chunk(i: usize, chunk: &Chunk) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n#{i} [{}] {}", chunk.source_ref, serde_json::to_string(&chunk.metadata)?);
    println!("{}", preview(&chunk.content));
    Ok(())
}

fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_with(&flat, PREVIEW_CHARS, "…")
}
