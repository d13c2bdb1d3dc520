//! Response coercion — repairs model output that is supposed to be a bare
//! JSON array but may arrive wrapped in prose, code fences, or an object.
//!
//! An ordered chain of parser strategies; each step runs only if the prior
//! one failed. `None` means unrecoverable, which callers treat as a fatal
//! parse error for the request, never as something to retry.

use serde_json::Value;

/// Full coercion chain used for planner and generator output:
/// (1) parse as-is, (2) strip code fences and retry, (3) unwrap an object
/// with a `slides` array, (4) extract the first `[...]` substring.
pub fn coerce_array(text: &str) -> Option<Vec<Value>> {
    let trimmed = text.trim();

    if let Some(arr) = parse_array(trimmed) {
        return Some(arr);
    }

    let cleaned = strip_code_fences(trimmed);
    if let Some(arr) = parse_array(&cleaned) {
        return Some(arr);
    }

    if let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(&cleaned) {
        if let Some(Value::Array(slides)) = obj.get("slides") {
            return Some(slides.clone());
        }
    }

    extract_bracketed(&cleaned).and_then(|candidate| parse_array(candidate))
}

/// Strict variant for refinement output: direct parse or bracket extraction
/// only, no fence stripping or object unwrapping.
pub fn coerce_array_strict(text: &str) -> Option<Vec<Value>> {
    let trimmed = text.trim();
    parse_array(trimmed).or_else(|| extract_bracketed(trimmed).and_then(parse_array))
}

fn parse_array(text: &str) -> Option<Vec<Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(arr)) => Some(arr),
        _ => None,
    }
}

/// Removes every triple-backtick fence line, including language tags like
/// ```` ```json ````.
fn strip_code_fences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("```") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 3..];
        // Drop an attached language tag up to the next newline or backtick.
        let tag_end = after
            .find(|c: char| c == '\n' || c == '`')
            .unwrap_or(after.len());
        let tag = &after[..tag_end];
        if tag.chars().all(|c| c.is_ascii_alphanumeric()) {
            rest = &after[tag_end..];
        } else {
            rest = after;
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}

/// Finds the first `[` and the last `]` and returns the enclosed slice.
fn extract_bracketed(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}
