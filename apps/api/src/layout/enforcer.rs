//! Text-fit enforcement — three ordered shortening passes per field.
//!
//! Pass 1 clips to the word budget, pass 2 to the character budget, pass 3
//! re-checks against the originating box's estimated capacity and drops
//! trailing words until the text fits. Every pass only shortens; none may
//! lengthen or rewrite. Both clips undershoot their target by 10%.

use tracing::debug;

use crate::catalog::estimator::box_char_capacity;
use crate::catalog::{Catalog, SlotRole, Template, TextSlot};
use crate::generation::generator::GeneratedSlide;
use crate::generation::planner::PlannedSlide;

/// Both the word and character clips aim at this fraction of their target.
const CLIP_FACTOR: f64 = 0.9;
/// Trailing words dropped by the width-aware pass before hard truncation.
const MAX_TRIM_ITERATIONS: usize = 10;

pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Keeps at most `round(target × 0.9)` whitespace-separated words.
fn clip_words(text: &str, target: u32) -> String {
    if target == 0 {
        return text.to_string();
    }
    let max_words = (((target as f64) * CLIP_FACTOR).round() as usize).max(1);
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        return text.to_string();
    }
    words[..max_words].join(" ")
}

/// Keeps the longest whitespace-aligned prefix within `round(target × 0.9)`
/// characters, hard-cutting mid-word only when not even one word fits.
fn clip_chars(text: &str, target: u32) -> String {
    if target == 0 {
        return text.to_string();
    }
    let limit = (((target as f64) * CLIP_FACTOR).round() as usize).max(1);
    if text.chars().count() <= limit {
        return text.to_string();
    }

    let mut prefix = String::new();
    for word in text.split_whitespace() {
        let candidate_len = if prefix.is_empty() {
            word.chars().count()
        } else {
            prefix.chars().count() + 1 + word.chars().count()
        };
        if candidate_len > limit {
            break;
        }
        if !prefix.is_empty() {
            prefix.push(' ');
        }
        prefix.push_str(word);
    }

    if prefix.is_empty() {
        // Not even the first word fits. Cut on a char boundary.
        return text.chars().take(limit).collect();
    }
    prefix
}

/// Drops trailing words until the text fits the slot's estimated capacity,
/// giving up after a bounded number of iterations.
fn width_trim(text: &str, slot: &TextSlot) -> String {
    let capacity =
        box_char_capacity(slot.font_size, &slot.font_family, slot.width, slot.height) as usize;
    let mut words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return text.to_string();
    }

    for _ in 0..MAX_TRIM_ITERATIONS {
        let current = words.join(" ");
        if current.chars().count() <= capacity {
            return current;
        }
        if words.len() == 1 {
            return current.chars().take(capacity).collect();
        }
        words.pop();
    }
    let last = words.join(" ");
    if last.chars().count() <= capacity {
        last
    } else {
        last.chars().take(capacity).collect()
    }
}

fn enforce_field(
    text: &str,
    word_target: Option<u32>,
    char_target: Option<u32>,
    slot: Option<&TextSlot>,
) -> String {
    let mut out = text.to_string();
    if let Some(target) = word_target {
        out = clip_words(&out, target);
    }
    if let Some(target) = char_target {
        out = clip_chars(&out, target);
    }
    if let Some(slot) = slot {
        out = width_trim(&out, slot);
    }
    out
}

struct FieldTargets<'a> {
    words: Option<u32>,
    chars: Option<u32>,
    slot: Option<&'a TextSlot>,
}

/// Plan targets win; template slot estimates fill the gaps.
fn resolve_targets<'a>(
    field: SlotRole,
    plan: &PlannedSlide,
    template: Option<&'a Template>,
) -> FieldTargets<'a> {
    let slot = template.and_then(|t| match field {
        SlotRole::Subtitle => t
            .slot_with_role(SlotRole::Subtitle)
            .or_else(|| t.slot_with_role(SlotRole::Caption)),
        role => t.slot_with_role(role),
    });
    let (plan_words, plan_chars) = match field {
        SlotRole::Title => (plan.word_targets.title, plan.word_targets.title_chars),
        SlotRole::Subtitle => (plan.word_targets.subtitle, plan.word_targets.subtitle_chars),
        SlotRole::Body => (plan.word_targets.body, plan.word_targets.body_chars),
        SlotRole::Bullets => (plan.word_targets.bullets, plan.word_targets.bullets_chars),
        _ => (None, None),
    };
    FieldTargets {
        words: plan_words.or_else(|| slot.map(|s| s.estimated_words)),
        chars: plan_chars.or_else(|| slot.map(|s| s.estimated_chars)),
        slot,
    }
}

/// Runs the three-pass trim over every slide in place. Returns diagnostic
/// warnings for fields that still nominally overflow; warnings never block
/// slide creation.
pub fn enforce_all(
    slides: &mut [GeneratedSlide],
    plan: &[PlannedSlide],
    catalog: &Catalog,
) -> Vec<String> {
    let mut warnings = Vec::new();

    for (idx, (slide, planned)) in slides.iter_mut().zip(plan).enumerate() {
        let template = slide
            .template_id
            .as_deref()
            .and_then(|id| catalog.by_id(id))
            .or_else(|| catalog.by_id(&planned.template_id));

        for (role, field) in [
            (SlotRole::Title, &mut slide.title),
            (SlotRole::Subtitle, &mut slide.subtitle),
            (SlotRole::Body, &mut slide.body),
        ] {
            let Some(text) = field.as_deref() else {
                continue;
            };
            let targets = resolve_targets(role, planned, template);
            let trimmed = enforce_field(text, targets.words, targets.chars, targets.slot);
            if let Some(chars) = targets.chars {
                if trimmed.chars().count() > chars as usize {
                    warnings.push(format!(
                        "slide {idx}: {} still exceeds {chars} chars after trim",
                        role.as_str()
                    ));
                }
            }
            *field = Some(trimmed);
        }

        if let Some(bullets) = slide.bullets.as_mut() {
            let slot_count = template.map(|t| t.bullet_slot_count()).unwrap_or(0);
            if slot_count > 0 && bullets.len() > slot_count {
                bullets.truncate(slot_count);
            }
            let targets = resolve_targets(SlotRole::Bullets, planned, template);
            for bullet in bullets.iter_mut() {
                *bullet = enforce_field(bullet, targets.words, targets.chars, targets.slot);
            }
        }
    }

    debug!(warnings = warnings.len(), "text-fit enforcement finished");
    warnings
}
