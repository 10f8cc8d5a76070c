//! Message-of-the-day formatting.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static FORMATTING_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)§[0-9a-fk-or]").expect("formatting code pattern is valid"));

/// Remove `§` color and style codes and trim the result.
///
/// A removal can join a stray `§` with a following code character
/// (`"§§aa"`), so the pattern is applied until nothing matches.
pub fn strip_formatting(motd: &str) -> String {
    let mut text = motd.to_string();
    while FORMATTING_CODE.is_match(&text) {
        text = FORMATTING_CODE.replace_all(&text, "").into_owned();
    }
    text.trim().to_string()
}

/// Flatten a chat component (string, object with `text`/`extra`, or array)
/// into plain legacy text
pub fn flatten_chat(component: &Value) -> String {
    let mut out = String::new();
    append_chat(component, &mut out);
    out
}

fn append_chat(component: &Value, out: &mut String) {
    match component {
        Value::String(text) => out.push_str(text),
        Value::Array(parts) => parts.iter().for_each(|part| append_chat(part, out)),
        Value::Object(fields) => {
            if let Some(Value::String(text)) = fields.get("text") {
                out.push_str(text);
            } else if let Some(Value::String(key)) = fields.get("translate") {
                out.push_str(key);
            }
            if let Some(Value::Array(extra)) = fields.get("extra") {
                extra.iter().for_each(|part| append_chat(part, out));
            }
        }
        Value::Number(number) => out.push_str(&number.to_string()),
        Value::Bool(_) | Value::Null => {}
    }
}
