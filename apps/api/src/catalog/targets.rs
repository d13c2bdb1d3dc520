//! Word/character target derivation and merging.
//!
//! Targets flow through three layers with strict precedence:
//! template-derived defaults < model-suggested overrides < hard clamps.
//! `merge_word_targets` is a pure function of its inputs so the precedence
//! rules are testable in isolation.

use serde::{Deserialize, Serialize};

use crate::catalog::{SlotRole, Template};

/// Per-role word targets with optional parallel character targets.
/// An absent role means "field not requested", not zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WordTargets {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bullets: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_chars: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle_chars: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_chars: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bullets_chars: Option<u32>,
}

/// Model-suggested targets as they arrive from decoded JSON. Values are raw
/// floats; zero, negative, and non-finite values are treated as absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawWordTargets {
    pub title: Option<f64>,
    pub subtitle: Option<f64>,
    pub body: Option<f64>,
    pub bullets: Option<f64>,
}

/// Baseline clamp ranges applied to template-derived word targets.
const DERIVE_RANGES: RoleRanges = RoleRanges {
    title: (2, 10),
    subtitle: (4, 20),
    body: (20, 80),
    bullets: (3, 14),
};

/// Widened clamp ranges applied to model overrides at merge time.
const OVERRIDE_RANGES: RoleRanges = RoleRanges {
    title: (2, 12),
    subtitle: (4, 24),
    body: (20, 100),
    bullets: (3, 16),
};

struct RoleRanges {
    title: (u32, u32),
    subtitle: (u32, u32),
    body: (u32, u32),
    bullets: (u32, u32),
}

/// Derives per-role word and character targets for a template by averaging
/// its slots' estimates. `caption` folds into `subtitle`. Roles with no slot
/// are omitted entirely.
pub fn derive_word_targets(template: &Template) -> WordTargets {
    let mut words = RoleAccumulator::default();
    let mut chars = RoleAccumulator::default();

    for slot in &template.slots {
        let role = match slot.role {
            SlotRole::Caption => SlotRole::Subtitle,
            other => other,
        };
        if !matches!(
            role,
            SlotRole::Title | SlotRole::Subtitle | SlotRole::Body | SlotRole::Bullets
        ) {
            continue;
        }
        words.push(role, slot.estimated_words as f64);
        chars.push(role, slot.estimated_chars as f64);
    }

    WordTargets {
        title: clamp_round(words.avg(SlotRole::Title), DERIVE_RANGES.title),
        subtitle: clamp_round(words.avg(SlotRole::Subtitle), DERIVE_RANGES.subtitle),
        body: clamp_round(words.avg(SlotRole::Body), DERIVE_RANGES.body),
        bullets: clamp_round(words.avg(SlotRole::Bullets), DERIVE_RANGES.bullets),
        // Character targets stay template-derived (geometry averages) with no
        // fixed clamp range.
        title_chars: round_positive(chars.avg(SlotRole::Title)),
        subtitle_chars: round_positive(chars.avg(SlotRole::Subtitle)),
        body_chars: round_positive(chars.avg(SlotRole::Body)),
        bullets_chars: round_positive(chars.avg(SlotRole::Bullets)),
    }
}

/// Overlays model-suggested overrides on template-derived defaults.
///
/// Each override is independently clamped to the widened per-role range;
/// invalid overrides (zero, negative, non-finite) leave the base value in
/// place. Character targets are never overridden — box geometry is the
/// ceiling.
pub fn merge_word_targets(base: &WordTargets, overrides: &RawWordTargets) -> WordTargets {
    let mut merged = base.clone();
    if let Some(v) = valid(overrides.title) {
        merged.title = clamp_round(Some(v), OVERRIDE_RANGES.title);
    }
    if let Some(v) = valid(overrides.subtitle) {
        merged.subtitle = clamp_round(Some(v), OVERRIDE_RANGES.subtitle);
    }
    if let Some(v) = valid(overrides.body) {
        merged.body = clamp_round(Some(v), OVERRIDE_RANGES.body);
    }
    if let Some(v) = valid(overrides.bullets) {
        merged.bullets = clamp_round(Some(v), OVERRIDE_RANGES.bullets);
    }
    merged
}

#[derive(Default)]
struct RoleAccumulator {
    title: Vec<f64>,
    subtitle: Vec<f64>,
    body: Vec<f64>,
    bullets: Vec<f64>,
}

impl RoleAccumulator {
    fn push(&mut self, role: SlotRole, value: f64) {
        match role {
            SlotRole::Title => self.title.push(value),
            SlotRole::Subtitle => self.subtitle.push(value),
            SlotRole::Body => self.body.push(value),
            SlotRole::Bullets => self.bullets.push(value),
            _ => {}
        }
    }

    fn avg(&self, role: SlotRole) -> Option<f64> {
        let values = match role {
            SlotRole::Title => &self.title,
            SlotRole::Subtitle => &self.subtitle,
            SlotRole::Body => &self.body,
            SlotRole::Bullets => &self.bullets,
            _ => return None,
        };
        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        }
    }
}

fn valid(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

fn clamp_round(value: Option<f64>, (min, max): (u32, u32)) -> Option<u32> {
    valid(value).map(|v| v.clamp(min as f64, max as f64).round() as u32)
}

fn round_positive(value: Option<f64>) -> Option<u32> {
    valid(value).map(|v| (v.round() as u32).max(1))
}
