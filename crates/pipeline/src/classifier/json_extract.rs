//! Find the first JSON object embedded in free-form model output.

use serde_json::{Map, Value};

/// Byte range of the balanced `{...}` starting at `start`, honoring string
/// literals and escapes. `None` if the braces never balance.
fn balanced_end(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(start + offset + c.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

/// The first substring that parses as a JSON object.
pub fn first_json_object(text: &str) -> Option<Map<String, Value>> {
    text.match_indices('{').find_map(|(start, _)| {
        let end = balanced_end(text, start)?;
        match serde_json::from_str::<Value>(&text[start..end]) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_object_from_prose() {
        let reply = r#"Sure! Here you go: {"needs_web_search": true, "needs_chat_history": false} Hope that helps."#;
        let obj = first_json_object(reply).unwrap();
        assert_eq!(obj["needs_web_search"], true);
        assert_eq!(obj["needs_chat_history"], false);
    }

    #[test]
    fn handles_nested_objects() {
        let obj = first_json_object(r#"x {"a": {"b": 1}, "c": 2} y"#).unwrap();
        assert_eq!(obj["c"], 2);
        assert_eq!(obj["a"]["b"], 1);
    }

    #[test]
    fn braces_inside_strings_are_ignored() {
        let obj = first_json_object(r#"{"note": "use } and { freely \" ok", "v": true}"#).unwrap();
        assert_eq!(obj["v"], true);
    }

    #[test]
    fn skips_malformed_candidates() {
        let obj = first_json_object(r#"{not json} then {"ok": 1}"#).unwrap();
        assert_eq!(obj["ok"], 1);
    }

    #[test]
    fn none_without_object() {
        assert!(first_json_object("no braces here").is_none());
        assert!(first_json_object(r#"{"unterminated": true"#).is_none());
        assert!(first_json_object("").is_none());
    }
}
