//! Slot classification — maps a text element's name, position among its
//! siblings, and current content to a semantic role.
//!
//! First match wins; all name tests are case-insensitive substring checks.
//! Template authors use natural names ("Title", "Body copy", "Page #"), and
//! the positional fallback handles unnamed boxes.

use crate::catalog::SlotRole;

/// Fraction of digit characters at which a sample counts as "mostly numeric".
const NUMERIC_THRESHOLD: f64 = 0.5;

/// Returns true when at least half of the sample's characters are digits.
pub fn is_mostly_numeric(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    let total = text.chars().count();
    let digits = text.chars().filter(|c| c.is_ascii_digit()).count();
    digits as f64 / total as f64 >= NUMERIC_THRESHOLD
}

/// Infers the role of the slot at `index` (zero-based) among `total` sibling
/// text slots.
///
/// Precedence note: for a single-slot template both the `index == 0` rule and
/// the last-index rule match; the `index == 0` rule is evaluated first, so a
/// lone slot is always `title`.
pub fn infer_slot_role(name: &str, index: usize, total: usize, sample: &str) -> SlotRole {
    let lower = name.to_lowercase();
    let contains_any = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

    if contains_any(&["page", "#", "num", "number"]) || is_mostly_numeric(sample) {
        return SlotRole::Number;
    }
    if contains_any(&["title", "heading"]) {
        return SlotRole::Title;
    }
    if contains_any(&["sub", "caption"]) {
        return SlotRole::Subtitle;
    }
    if contains_any(&["bullet", "list", "item"]) {
        return SlotRole::Bullets;
    }
    if contains_any(&["body", "content", "paragraph"]) {
        return SlotRole::Body;
    }
    if lower.contains("note") {
        return SlotRole::Caption;
    }

    if index == 0 {
        return SlotRole::Title;
    }
    if index == 1 && total > 2 {
        return SlotRole::Subtitle;
    }
    if index + 1 == total {
        return SlotRole::Body;
    }
    SlotRole::Misc
}
