//! Plain legacy text to Lexical rich-text documents.
//!
//! Payload stores rich-text fields as a serialized Lexical editor state. Each
//! blank-line separated block of the legacy text becomes one paragraph.

use serde_json::{json, Value};

/// Convert plain text into a Lexical document, or `None` for blank text.
pub fn from_plain_text(text: &str) -> Option<Value> {
    let normalized = text.replace("\r\n", "\n");
    let paragraphs: Vec<Value> = normalized
        .split("\n\n")
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(paragraph)
        .collect();

    if paragraphs.is_empty() {
        return None;
    }

    Some(json!({
        "root": {
            "type": "root",
            "format": "",
            "indent": 0,
            "version": 1,
            "direction": "ltr",
            "children": paragraphs,
        }
    }))
}

fn paragraph(block: &str) -> Value {
    // Single newlines inside a block are soft breaks.
    let text = block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    json!({
        "type": "paragraph",
        "format": "",
        "indent": 0,
        "version": 1,
        "direction": "ltr",
        "textFormat": 0,
        "children": [{
            "type": "text",
            "text": text,
            "format": 0,
            "style": "",
            "mode": "normal",
            "detail": 0,
            "version": 1,
        }],
    })
}
