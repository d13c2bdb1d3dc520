//! Refinement pass — a best-effort second model round for fields that are
//! still close to overflowing after enforcement.
//!
//! This pass never fails the request: any error returns the input slides
//! unchanged.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::{Catalog, SlotRole, Template};
use crate::generation::coerce::coerce_array_strict;
use crate::generation::generator::GeneratedSlide;
use crate::generation::planner::PlannedSlide;
use crate::generation::{prompts, TEMPERATURE};
use crate::llm::TextProvider;

/// A field is flagged once its length exceeds this fraction of its character
/// target.
const FLAG_THRESHOLD: f64 = 0.95;

/// Text fields eligible for refinement. Bullets are excluded: they are
/// count-capped by the enforcer and rewriting individual items is not worth a
/// second round trip.
const FIELDS: &[&str] = &["title", "subtitle", "body"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Offender {
    slide_index: usize,
    field: &'static str,
    target_chars: u32,
    current_length: usize,
    current_text: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Refinement {
    slide_index: Option<usize>,
    field: Option<String>,
    refined_text: Option<String>,
}

fn field_text<'a>(slide: &'a GeneratedSlide, field: &str) -> Option<&'a str> {
    match field {
        "title" => slide.title.as_deref(),
        "subtitle" => slide.subtitle.as_deref(),
        "body" => slide.body.as_deref(),
        _ => None,
    }
}

fn set_field(slide: &mut GeneratedSlide, field: &str, text: String) {
    match field {
        "title" => slide.title = Some(text),
        "subtitle" => slide.subtitle = Some(text),
        "body" => slide.body = Some(text),
        _ => {}
    }
}

/// Character budget for a field: the plan's merged char target when present,
/// else the template slot's geometry estimate.
fn char_target(field: &str, plan: &PlannedSlide, template: Option<&Template>) -> Option<u32> {
    let from_plan = match field {
        "title" => plan.word_targets.title_chars,
        "subtitle" => plan.word_targets.subtitle_chars,
        "body" => plan.word_targets.body_chars,
        _ => None,
    };
    from_plan.or_else(|| {
        let template = template?;
        let slot = match field {
            "title" => template.slot_with_role(SlotRole::Title),
            "subtitle" => template
                .slot_with_role(SlotRole::Subtitle)
                .or_else(|| template.slot_with_role(SlotRole::Caption)),
            "body" => template.slot_with_role(SlotRole::Body),
            _ => None,
        };
        slot.map(|s| s.estimated_chars)
    })
}

fn collect_offenders(
    slides: &[GeneratedSlide],
    plan: &[PlannedSlide],
    catalog: &Catalog,
) -> Vec<Offender> {
    let mut offenders = Vec::new();
    for (idx, (slide, planned)) in slides.iter().zip(plan).enumerate() {
        let template = catalog.by_id(&planned.template_id);
        for field in FIELDS {
            let Some(text) = field_text(slide, field) else {
                continue;
            };
            let Some(target) = char_target(field, planned, template) else {
                continue;
            };
            let length = text.chars().count();
            if length as f64 > target as f64 * FLAG_THRESHOLD {
                offenders.push(Offender {
                    slide_index: idx,
                    field,
                    target_chars: target,
                    current_length: length,
                    current_text: text.to_string(),
                });
            }
        }
    }
    offenders
}

/// Rewrites flagged fields through the provider. Replacements are applied
/// only when strictly shorter than the current text.
pub async fn refine_slides(
    provider: &dyn TextProvider,
    mut slides: Vec<GeneratedSlide>,
    plan: &[PlannedSlide],
    catalog: &Catalog,
) -> Vec<GeneratedSlide> {
    let offenders = collect_offenders(&slides, plan, catalog);
    if offenders.is_empty() {
        return slides;
    }
    debug!(offenders = offenders.len(), "starting refinement pass");

    let offenders_json = match serde_json::to_string(&offenders) {
        Ok(json) => json,
        Err(e) => {
            warn!("refinement skipped, offender encoding failed: {e}");
            return slides;
        }
    };

    let text = match provider
        .submit(&prompts::refine_prompt(&offenders_json), TEMPERATURE)
        .await
    {
        Ok(text) => text,
        Err(e) => {
            warn!("refinement skipped, provider call failed: {e}");
            return slides;
        }
    };

    let Some(items) = coerce_array_strict(&text) else {
        warn!("refinement skipped, response was not a JSON array");
        return slides;
    };

    let mut applied = 0usize;
    for item in items {
        let refinement: Refinement = serde_json::from_value(item).unwrap_or_default();
        let (Some(idx), Some(field), Some(refined)) =
            (refinement.slide_index, refinement.field, refinement.refined_text)
        else {
            continue;
        };
        let Some(slide) = slides.get_mut(idx) else {
            continue;
        };
        let shorter = field_text(slide, &field)
            .is_some_and(|current| refined.chars().count() < current.chars().count());
        if shorter {
            set_field(slide, &field, refined);
            applied += 1;
        }
    }
    debug!(applied, "refinement pass finished");

    slides
}
