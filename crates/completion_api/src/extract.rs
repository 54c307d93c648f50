//! Assistant-text extraction over the response shapes the endpoint may return.
//!
//! Each extractor reads one shape and returns `None` when the shape is absent
//! or blank. [`extract_text`] walks [`EXTRACTORS`] in order and stops at the
//! first hit.

use serde_json::Value;

/// Named extractor for one response shape.
#[derive(Debug, Clone, Copy)]
pub struct Extractor {
    pub name: &'static str,
    pub extract: fn(&Value) -> Option<String>,
}

/// Extractors in priority order.
pub const EXTRACTORS: &[Extractor] = &[
    Extractor {
        name: "choices_message_content",
        extract: choices_message_content,
    },
    Extractor {
        name: "content",
        extract: content,
    },
    Extractor {
        name: "output_text",
        extract: output_text,
    },
    Extractor {
        name: "output_blocks",
        extract: output_blocks,
    },
    Extractor {
        name: "message_content",
        extract: message_content,
    },
];

/// First non-blank assistant text found in `body`, if any.
pub fn extract_text(body: &Value) -> Option<String> {
    EXTRACTORS.iter().find_map(|extractor| {
        let text = (extractor.extract)(body)?;
        tracing::trace!(extractor = extractor.name, "assistant text extracted");
        Some(text)
    })
}

/// `choices[0].message.content`
pub fn choices_message_content(body: &Value) -> Option<String> {
    body.get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
        .filter(|text| !text.trim().is_empty())
        .map(ToString::to_string)
}

/// Top-level `content` string.
pub fn content(body: &Value) -> Option<String> {
    body.get("content")?
        .as_str()
        .filter(|text| !text.trim().is_empty())
        .map(ToString::to_string)
}

/// Top-level `output_text` string, trimmed.
pub fn output_text(body: &Value) -> Option<String> {
    trimmed(body.get("output_text")?.as_str()?)
}

/// Texts from every `output[*]` item, joined with newlines.
///
/// An item contributes its `content` (string or blocks) and its
/// `message.content` (string or blocks).
pub fn output_blocks(body: &Value) -> Option<String> {
    let mut texts = Vec::new();
    for item in body.get("output")?.as_array()? {
        if let Some(content) = item.get("content") {
            collect_content(content, &mut texts);
        }
        if let Some(content) = item.get("message").and_then(|message| message.get("content")) {
            collect_content(content, &mut texts);
        }
    }
    joined(texts)
}

/// Top-level `message.content` (string or blocks).
pub fn message_content(body: &Value) -> Option<String> {
    let mut texts = Vec::new();
    collect_content(body.get("message")?.get("content")?, &mut texts);
    joined(texts)
}

fn collect_content(content: &Value, texts: &mut Vec<String>) {
    match content {
        Value::String(text) => texts.extend(trimmed(text)),
        Value::Array(blocks) => texts.extend(blocks.iter().filter_map(block_text)),
        _ => {}
    }
}

fn block_text(block: &Value) -> Option<String> {
    let block = block.as_object()?;
    ["text", "value", "content"]
        .iter()
        .find_map(|key| block.get(*key).and_then(Value::as_str))
        .and_then(trimmed)
}

fn trimmed(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn joined(texts: Vec<String>) -> Option<String> {
    if texts.is_empty() {
        None
    } else {
        Some(texts.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn extractor_names_are_in_priority_order() {
        let names: Vec<_> = EXTRACTORS.iter().map(|extractor| extractor.name).collect();
        assert_eq!(
            names,
            vec![
                "choices_message_content",
                "content",
                "output_text",
                "output_blocks",
                "message_content",
            ]
        );
    }

    #[test]
    fn choices_shape_wins_over_later_shapes() {
        let body = json!({
            "choices": [{"message": {"content": "hi there"}}],
            "content": "ignored",
        });
        assert_eq!(extract_text(&body).as_deref(), Some("hi there"));
    }

    #[test]
    fn blank_choice_falls_through_to_content() {
        let body = json!({
            "choices": [{"message": {"content": "   "}}],
            "content": "fallback",
        });
        assert_eq!(choices_message_content(&body), None);
        assert_eq!(extract_text(&body).as_deref(), Some("fallback"));
    }

    #[test]
    fn output_text_is_trimmed() {
        assert_eq!(
            output_text(&json!({"output_text": "  answer \n"})).as_deref(),
            Some("answer")
        );
    }

    #[test]
    fn output_blocks_collect_every_text_kind() {
        let body = json!({
            "output": [
                {"content": [
                    {"type": "output_text", "text": "first"},
                    {"value": "second"},
                    {"content": "third"},
                    {"type": "refusal"},
                    "not a block",
                ]},
                {"message": {"content": "fourth"}},
                {"content": "  fifth  "},
            ]
        });
        assert_eq!(
            output_blocks(&body).as_deref(),
            Some("first\nsecond\nthird\nfourth\nfifth")
        );
    }

    #[test]
    fn message_content_accepts_string_or_blocks() {
        assert_eq!(
            message_content(&json!({"message": {"content": "plain"}})).as_deref(),
            Some("plain")
        );
        assert_eq!(
            message_content(&json!({"message": {"content": [{"text": "a"}, {"text": "b"}]}}))
                .as_deref(),
            Some("a\nb")
        );
    }

    #[test]
    fn unknown_shapes_yield_nothing() {
        assert_eq!(extract_text(&json!({"ok": true})), None);
        assert_eq!(extract_text(&json!("bare string")), None);
        assert_eq!(extract_text(&json!({"choices": []})), None);
        assert_eq!(extract_text(&json!({"output": [{"content": []}]})), None);
    }
}
