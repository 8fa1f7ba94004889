//! Fixed-width time windows aligned to the Unix epoch.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat};
use contextor_core::error::ChunkError;
use contextor_core::{Chunk, ChunkKind, Conversation, Message};

use crate::keywords::top_keywords;
use crate::text::render_messages;

pub(crate) fn chunk(
    conversation: &Conversation,
    window_hours: u32,
) -> Result<Vec<Chunk>, ChunkError> {
    let width = i64::from(window_hours) * 3600;
    let mut windows: BTreeMap<i64, Vec<Message>> = BTreeMap::new();

    for (index, message) in conversation.messages.iter().enumerate() {
        let timestamp = message
            .timestamp
            .ok_or_else(|| ChunkError::MissingTimestamp {
                conversation: conversation.id.clone(),
                index,
            })?;
        let start = timestamp.timestamp().div_euclid(width) * width;
        windows.entry(start).or_default().push(message.clone());
    }

    Ok(windows
        .into_iter()
        .map(|(start, messages)| {
            let window_start = DateTime::from_timestamp(start, 0)
                .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
                .unwrap_or_default();
            Chunk::new(
                ChunkKind::Temporal,
                &conversation.id,
                render_messages(&messages),
            )
            .with_meta("window_start", window_start)
            .with_meta("message_count", messages.len())
            .with_meta("topics", top_keywords(&messages, 3))
            .with_messages(messages)
        })
        .collect())
}
