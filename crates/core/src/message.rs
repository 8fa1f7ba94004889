//! Message and Conversation domain types.
//!
//! These are the read-only records handed to the pipeline by the chat-log
//! store: Store enumerates conversations → Chunker segments them → Index
//! embeds the chunks → Retriever scores them against a query.
//!
//! Deserialization is tolerant. A message with a missing, null, or
//! unrecognized role becomes [`Role::Unknown`], missing or non-string
//! content becomes an empty string, and a missing or unparseable timestamp
//! becomes `None`.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The AI assistant
    Assistant,
    /// System instructions
    System,
    /// Anything the store recorded that we do not recognize
    #[default]
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Case-insensitive; anything unrecognized is [`Role::Unknown`].
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Role::User,
            "assistant" => Role::Assistant,
            "system" => Role::System,
            _ => Role::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
            Role::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Who sent this message
    #[serde(default, deserialize_with = "lenient_role")]
    pub role: Role,

    /// The text content
    #[serde(default, deserialize_with = "lenient_content")]
    pub content: String,

    /// When the message was written, if the store recorded it
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: None,
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Attach a timestamp.
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

fn lenient_role<'de, D>(deserializer: D) -> Result<Role, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Role::parse_lenient(&s),
        _ => Role::Unknown,
    })
}

fn lenient_content<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => s,
        _ => String::new(),
    })
}

/// Accepts RFC 3339 strings, naive ISO-8601 strings (read as UTC), and
/// epoch milliseconds. Everything else maps to `None`.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_timestamp_value))
}

fn parse_timestamp_value(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    match value {
        serde_json::Value::String(s) => parse_timestamp(s),
        serde_json::Value::Number(n) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    }
}

/// Parse a timestamp string as written by the chat store.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// One conversation record from the chat-log store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Stable identifier (the source file stem for file-backed stores)
    pub id: String,

    /// Where the record came from
    pub source_file: String,

    /// Ordered messages
    pub messages: Vec<Message>,
}

impl Conversation {
    pub fn new(id: impl Into<String>, messages: Vec<Message>) -> Self {
        let id = id.into();
        Self {
            source_file: format!("{id}.json"),
            id,
            messages,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The newest message timestamp, if any message carries one.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        latest_timestamp(&self.messages)
    }
}

/// The newest timestamp among `messages`.
pub fn latest_timestamp(messages: &[Message]) -> Option<DateTime<Utc>> {
    messages.iter().filter_map(|m| m.timestamp).max()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_role_and_missing_content_default() {
        let msg: Message = serde_json::from_str(r#"{"role": "tool"}"#).unwrap();
        assert_eq!(msg.role, Role::Unknown);
        assert_eq!(msg.content, "");
        assert!(msg.timestamp.is_none());

        let msg: Message = serde_json::from_str(r#"{"content": "hi"}"#).unwrap();
        assert_eq!(msg.role, Role::Unknown);
        assert_eq!(msg.content, "hi");
    }

    #[test]
    fn null_and_mistyped_fields_default() {
        let msg: Message = serde_json::from_str(r#"{"role": "user", "content": null}"#).unwrap();
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "");

        let msg: Message = serde_json::from_str(r#"{"role": null, "content": "hi"}"#).unwrap();
        assert_eq!(msg.role, Role::Unknown);
        assert_eq!(msg.content, "hi");

        let msg: Message =
            serde_json::from_str(r#"{"role": 3, "content": {"text": "hi"}, "timestamp": null}"#)
                .unwrap();
        assert_eq!(msg.role, Role::Unknown);
        assert_eq!(msg.content, "");
        assert!(msg.timestamp.is_none());
    }

    #[test]
    fn role_names_ignore_case() {
        let msg: Message = serde_json::from_str(r#"{"role": "Assistant", "content": "x"}"#).unwrap();
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(Role::parse_lenient(" USER "), Role::User);
        assert_eq!(Role::parse_lenient("tool"), Role::Unknown);
    }

    #[test]
    fn timestamps_are_parsed_leniently() {
        let rfc: Message =
            serde_json::from_str(r#"{"role":"user","content":"a","timestamp":"2024-03-01T10:15:00Z"}"#)
                .unwrap();
        assert_eq!(
            rfc.timestamp.unwrap().to_rfc3339(),
            "2024-03-01T10:15:00+00:00"
        );

        let naive: Message = serde_json::from_str(
            r#"{"role":"user","content":"a","timestamp":"2024-03-01T10:15:00.123456"}"#,
        )
        .unwrap();
        assert!(naive.timestamp.is_some());

        let millis: Message =
            serde_json::from_str(r#"{"role":"user","content":"a","timestamp":1709288100000}"#)
                .unwrap();
        assert_eq!(millis.timestamp, rfc.timestamp);

        let garbage: Message =
            serde_json::from_str(r#"{"role":"user","content":"a","timestamp":"yesterday"}"#)
                .unwrap();
        assert!(garbage.timestamp.is_none());
    }

    #[test]
    fn last_updated_picks_newest_timestamp() {
        let early = parse_timestamp("2024-01-01T00:00:00Z").unwrap();
        let late = parse_timestamp("2024-02-01T00:00:00Z").unwrap();
        let conv = Conversation::new(
            "c1",
            vec![
                Message::user("a").at(late),
                Message::assistant("b"),
                Message::user("c").at(early),
            ],
        );
        assert_eq!(conv.last_updated(), Some(late));
        assert_eq!(latest_timestamp(&conv.messages[1..]), Some(early));
        assert_eq!(latest_timestamp(&[]), None);
        assert_eq!(conv.source_file, "c1.json");
    }

    #[test]
    fn role_display_is_lowercase() {
        assert_eq!(Role::Assistant.to_string(), "assistant");
        assert_eq!(Role::Unknown.as_str(), "unknown");
    }
}
