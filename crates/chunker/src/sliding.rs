//! Overlapping character windows over the rendered conversation.

use contextor_core::{Chunk, ChunkKind, Conversation};

use crate::text::render_messages;

/// `size > overlap` is guaranteed by `ChunkerConfig::validate`.
pub(crate) fn chunk(conversation: &Conversation, size: usize, overlap: usize) -> Vec<Chunk> {
    let text = render_messages(&conversation.messages);

    // Byte offset of every char boundary, including the end.
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(byte, _)| byte)
        .chain(std::iter::once(text.len()))
        .collect();
    let total = bounds.len() - 1;
    if total == 0 {
        return Vec::new();
    }

    let step = size.saturating_sub(overlap).max(1);
    let mut chunks = Vec::new();
    let mut start = 0;

    loop {
        let end = (start + size).min(total);
        let overlap_with_next = if end < total { overlap } else { 0 };
        let content = &text[bounds[start]..bounds[end]];

        chunks.push(
            Chunk::new(ChunkKind::SlidingWindow, &conversation.id, content)
                .with_meta("chunk_index", chunks.len())
                .with_meta("char_start", start)
                .with_meta("char_end", end)
                .with_meta("overlap_with_next", overlap_with_next)
                .with_meta("message_count", conversation.messages.len()),
        );

        if end >= total {
            break;
        }
        start += step;
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use contextor_core::Message;

    fn conversation(len: usize) -> Conversation {
        // "[USER]: " is 8 chars
        Conversation::new("c", vec![Message::user("x".repeat(len - 8))])
    }

    fn reconstruct(chunks: &[Chunk], overlap: usize) -> String {
        let mut out = String::new();
        for (i, c) in chunks.iter().enumerate() {
            if i == 0 {
                out.push_str(&c.content);
            } else {
                out.extend(c.content.chars().skip(overlap));
            }
        }
        out
    }

    #[test]
    fn windows_advance_by_size_minus_overlap() {
        let chunks = chunk(&conversation(250), 100, 20);
        let starts: Vec<_> = chunks
            .iter()
            .map(|c| c.metadata["char_start"].as_u64().unwrap())
            .collect();
        assert_eq!(starts, vec![0, 80, 160]);
        assert_eq!(chunks[2].metadata["char_end"], 250);
        assert_eq!(chunks[2].metadata["overlap_with_next"], 0);
        assert_eq!(chunks[0].metadata["overlap_with_next"], 20);
    }

    #[test]
    fn short_text_is_single_window() {
        let chunks = chunk(&conversation(50), 100, 20);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content.chars().count(), 50);
    }

    #[test]
    fn overlaps_reconstruct_original() {
        let conv = Conversation::new(
            "c",
            vec![
                Message::user("Ünïcödé text with multibyte chars ".repeat(20)),
                Message::assistant("and a long reply ".repeat(30)),
            ],
        );
        let original = render_messages(&conv.messages);
        for (size, overlap) in [(100, 20), (64, 0), (37, 36), (2000, 200)] {
            let chunks = chunk(&conv, size, overlap);
            assert_eq!(reconstruct(&chunks, overlap), original, "size={size} overlap={overlap}");
        }
    }

    #[test]
    fn chunks_carry_no_messages() {
        let chunks = chunk(&conversation(300), 100, 10);
        assert!(chunks.iter().all(|c| c.messages.is_empty()));
    }
}
