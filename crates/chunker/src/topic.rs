//! Split where the following message announces a change of subject.

use contextor_core::{Chunk, ChunkKind, Conversation, Message};

use crate::keywords::{top_keywords, topic_label};
use crate::text::render_messages;

const SHIFT_MARKERS: &[&str] = &[
    "by the way",
    "also",
    "different question",
    "new topic",
    "changing subject",
];

fn opens_new_topic(message: &Message) -> bool {
    let content = message.content.to_lowercase();
    SHIFT_MARKERS.iter().any(|marker| content.contains(marker))
}

pub(crate) fn chunk(conversation: &Conversation) -> Vec<Chunk> {
    let messages = &conversation.messages;
    let mut groups: Vec<Vec<Message>> = Vec::new();
    let mut current: Vec<Message> = Vec::new();

    for (i, message) in messages.iter().enumerate() {
        current.push(message.clone());
        if messages.get(i + 1).is_some_and(opens_new_topic) {
            groups.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }

    groups
        .into_iter()
        .enumerate()
        .map(|(group_index, group)| {
            Chunk::new(ChunkKind::Topic, &conversation.id, render_messages(&group))
                .with_meta("topic", topic_label(&group))
                .with_meta("keywords", top_keywords(&group, 5))
                .with_meta("message_count", group.len())
                .with_meta("group_index", group_index)
                .with_messages(group)
        })
        .collect()
}
