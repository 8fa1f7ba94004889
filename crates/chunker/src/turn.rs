//! Batches of user → assistant exchanges.

use contextor_core::text::truncate_chars;
use contextor_core::{Chunk, ChunkKind, Conversation, Message, Role};

use crate::text::render_messages;

const QUESTION_PREVIEW_CHARS: usize = 100;

/// Split into user → assistant pairs and the messages that belong to no
/// pair (a leading assistant, repeated user messages, other roles, a final
/// unanswered question), both in conversation order.
fn split_turns(messages: &[Message]) -> (Vec<Vec<Message>>, Vec<Message>) {
    let mut turns = Vec::new();
    let mut unpaired = Vec::new();
    let mut i = 0;
    loop {
        match &messages[i..] {
            [user, reply, ..] if user.role == Role::User && reply.role == Role::Assistant => {
                turns.push(vec![user.clone(), reply.clone()]);
                i += 2;
            }
            [stray, ..] => {
                unpaired.push(stray.clone());
                i += 1;
            }
            [] => break,
        }
    }
    (turns, unpaired)
}

fn user_questions(messages: &[Message]) -> Vec<String> {
    messages
        .iter()
        .filter(|m| m.role == Role::User && m.content.contains('?'))
        .map(|m| truncate_chars(&m.content, QUESTION_PREVIEW_CHARS))
        .collect()
}

fn turn_chunk(
    conversation: &Conversation,
    first_turn: usize,
    turns: Vec<Vec<Message>>,
) -> Chunk {
    let turn_count = turns.len();
    let messages: Vec<Message> = turns.into_iter().flatten().collect();
    Chunk::new(ChunkKind::Turn, &conversation.id, render_messages(&messages))
        .with_meta(
            "turn_range",
            format!("{}-{}", first_turn, first_turn + turn_count - 1),
        )
        .with_meta("turn_count", turn_count)
        .with_meta("user_questions", user_questions(&messages))
        .with_messages(messages)
}

pub(crate) fn chunk(conversation: &Conversation, turns_per_chunk: usize) -> Vec<Chunk> {
    let (turns, unpaired) = split_turns(&conversation.messages);
    let complete = turns.len();

    let mut chunks: Vec<Chunk> = turns
        .chunks(turns_per_chunk)
        .enumerate()
        .map(|(i, batch)| turn_chunk(conversation, i * turns_per_chunk, batch.to_vec()))
        .collect();

    // Only the final chunk may hold an odd number of messages
    if !unpaired.is_empty() {
        let count = unpaired.len();
        chunks.push(
            turn_chunk(conversation, complete, vec![unpaired]).with_meta("unpaired_messages", count),
        );
    }
    chunks
}
