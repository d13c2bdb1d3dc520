//! Planner call — assigns a role and template to each slide before any copy
//! is written.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::catalog::targets::{derive_word_targets, merge_word_targets, RawWordTargets, WordTargets};
use crate::catalog::Catalog;
use crate::generation::coerce::coerce_array;
use crate::generation::language::detect_language;
use crate::generation::{prompts, summarize_templates, GenerationError, TEMPERATURE};
use crate::llm::TextProvider;

/// One planned slide. Immutable once produced; slide 0 is already bound to a
/// cover template and carries role `cover` when the model left it blank.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedSlide {
    pub role: String,
    pub template_id: String,
    pub word_targets: WordTargets,
}

/// Raw planner item as decoded from the model's array.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawPlanItem {
    role: Option<String>,
    template_id: Option<String>,
    word_targets: RawWordTargets,
}

/// Asks the model for a slide plan and post-processes it into exactly
/// `slide_count` planned slides.
pub async fn plan_slides(
    provider: &dyn TextProvider,
    user_prompt: &str,
    slide_count: u32,
    catalog: &Catalog,
) -> Result<Vec<PlannedSlide>, GenerationError> {
    let language = detect_language(user_prompt);
    let templates_json = serde_json::to_string(&summarize_templates(catalog))
        .unwrap_or_else(|_| "[]".to_string());
    let prompt = prompts::planner_prompt(slide_count, language, &templates_json, user_prompt);

    let text = provider.submit(&prompt, TEMPERATURE).await?;
    let items = coerce_array(&text).ok_or(GenerationError::Unparsable { stage: "planner" })?;
    if items.is_empty() {
        return Err(GenerationError::Empty { stage: "planner" });
    }

    Ok(post_process(items, slide_count, catalog))
}

/// Truncates or pads the decoded array to `slide_count` items, binds slide 0
/// to a cover template, and resolves each slide's word targets.
fn post_process(items: Vec<Value>, slide_count: u32, catalog: &Catalog) -> Vec<PlannedSlide> {
    let Some(first) = catalog.templates.first() else {
        return Vec::new();
    };
    let count = slide_count as usize;
    let mut raw: Vec<RawPlanItem> = items
        .into_iter()
        .take(count)
        .map(|v| serde_json::from_value(v).unwrap_or_default())
        .collect();
    // Pad short plans; defaults resolve to the first template below.
    while raw.len() < count {
        raw.push(RawPlanItem::default());
    }
    debug!(planned = raw.len(), "planner response decoded");

    raw.into_iter()
        .enumerate()
        .map(|(idx, item)| {
            let template = if idx == 0 {
                catalog.cover().unwrap_or(first)
            } else {
                item.template_id
                    .as_deref()
                    .and_then(|id| catalog.by_id(id))
                    .unwrap_or(first)
            };

            let base = derive_word_targets(template);
            let word_targets = merge_word_targets(&base, &item.word_targets);
            let role = item
                .role
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| if idx == 0 { "cover" } else { "content" }.to_string());

            PlannedSlide {
                role,
                template_id: template.id.clone(),
                word_targets,
            }
        })
        .collect()
}
