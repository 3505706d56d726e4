//! Lenient JSON unserializer.
//!
//! [`unserialize`] first tries a strict parse. When that fails it repairs the
//! most common hand-edited mistakes (raw newlines, stray backslashes and
//! unescaped double quotes inside string values), parses again, and then
//! restores the protected characters inside every non-empty string value.
//! Repaired strings keep their escape sequences as raw text: `"a\qb"`
//! becomes the four characters `a\qb`.

use crate::error::{CoreError, CoreResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

const DOUBLE_QUOTE_KEY: &str = "#DOUBLE_QUOTE_ESCAPE_KEY#";
const FORWARD_SLASH_KEY: &str = "#FORWARD_SLASH_ESCAPE_KEY#";
const BACKSLASH_KEY: &str = "#BACKWARD_SLASH_ESCAPE_KEY#";
const SINGLE_BACKSLASH_KEY: &str = "#SINGLE_BACKWARD_SLASH_ESCAPE_KEY#";
const NEWLINE_KEY: &str = "#NEWLINE_ESCAPE_KEY#";

/// Applied in order after quotes are protected. Double backslashes must be
/// taken before single ones.
const PROTECTIONS: &[(&str, &str)] = &[
    ("\\\\", BACKSLASH_KEY),
    ("\\", SINGLE_BACKSLASH_KEY),
    ("\n", NEWLINE_KEY),
];

/// Applied in order to string values after the repaired parse.
const RESTORATIONS: &[(&str, &str)] = &[
    (DOUBLE_QUOTE_KEY, "\""),
    (FORWARD_SLASH_KEY, "/"),
    (BACKSLASH_KEY, "\\\\"),
    (SINGLE_BACKSLASH_KEY, "\\"),
    (NEWLINE_KEY, "\n"),
];

/// Parse `text` as JSON, repairing it if a strict parse fails.
pub fn unserialize(text: &str) -> CoreResult<Value> {
    let trimmed = text.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }

    log::debug!("Strict JSON parse failed, attempting repair");
    let repaired = repair(trimmed);
    let mut value: Value =
        serde_json::from_str(&repaired).map_err(|e| CoreError::JsonParse {
            message: e.to_string(),
        })?;
    restore_strings(&mut value);
    Ok(value)
}

/// Like [`unserialize`], for input that may not be valid UTF-8.
///
/// Invalid sequences are replaced with U+FFFD before parsing.
pub fn unserialize_bytes(bytes: &[u8]) -> CoreResult<Value> {
    unserialize(&String::from_utf8_lossy(bytes))
}

/// Lenient parse into a typed value.
pub fn unserialize_as<T: DeserializeOwned>(text: &str) -> CoreResult<T> {
    let value = unserialize(text)?;
    Ok(serde_json::from_value(value)?)
}

/// Serialize to compact JSON.
pub fn serialize<T: Serialize + ?Sized>(value: &T) -> CoreResult<String> {
    Ok(serde_json::to_string(value)?)
}

fn repair(text: &str) -> String {
    let mut repaired = text.replace("\\/", FORWARD_SLASH_KEY);
    repaired = protect_inner_quotes(&repaired);
    for (search, key) in PROTECTIONS {
        repaired = repaired.replace(search, key);
    }
    repaired
}

/// Replace double quotes that sit inside a string value with a placeholder.
///
/// Inside a string, a quote closes it only when the next non-whitespace
/// character is structural (`:`, `,`, `}`, `]`) or the input ends.
fn protect_inner_quotes(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;

    for (i, &c) in chars.iter().enumerate() {
        if c != '"' {
            out.push(c);
            continue;
        }
        if !in_string {
            in_string = true;
            out.push(c);
            continue;
        }
        let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
        match next {
            None | Some(':') | Some(',') | Some('}') | Some(']') => {
                in_string = false;
                out.push(c);
            }
            Some(_) => out.push_str(DOUBLE_QUOTE_KEY),
        }
    }
    out
}

fn restore_strings(value: &mut Value) {
    match value {
        Value::String(s) if !s.is_empty() => {
            let mut restored = std::mem::take(s);
            for (key, replacement) in RESTORATIONS {
                restored = restored.replace(key, replacement);
            }
            *s = restored;
        }
        Value::Array(items) => items.iter_mut().for_each(restore_strings),
        Value::Object(map) => map.values_mut().for_each(restore_strings),
        _ => {}
    }
}

#[cfg(test)]
#[path = "json_test.rs"]
mod tests;
