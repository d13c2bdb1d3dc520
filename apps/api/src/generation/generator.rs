//! Generator call — writes the final text for every planned slide in one
//! request.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Catalog;
use crate::generation::coerce::coerce_array;
use crate::generation::language::detect_language;
use crate::generation::planner::PlannedSlide;
use crate::generation::{prompts, summarize_templates, GenerationError, TEMPERATURE};
use crate::llm::TextProvider;

/// One slide's generated content. All fields optional: the model only fills
/// what the chosen template supports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratedSlide {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bullets: Option<Vec<String>>,
}

impl GeneratedSlide {
    /// Number of content fields present (title, subtitle, body, non-empty
    /// bullets), the selector's target field count.
    pub fn field_count(&self) -> usize {
        [
            self.title.is_some(),
            self.subtitle.is_some(),
            self.body.is_some(),
            self.bullets.as_ref().is_some_and(|b| !b.is_empty()),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }
}

/// Asks the model to write content for the planned deck. The result always
/// has exactly `plan.len()` slides, each carrying its plan's template id and
/// role even when the model dropped them.
pub async fn generate_slides(
    provider: &dyn TextProvider,
    user_prompt: &str,
    plan: &[PlannedSlide],
    catalog: &Catalog,
) -> Result<Vec<GeneratedSlide>, GenerationError> {
    let language = detect_language(user_prompt);
    let plan_json = serde_json::to_string(plan).unwrap_or_else(|_| "[]".to_string());
    let templates_json = serde_json::to_string(&summarize_templates(catalog))
        .unwrap_or_else(|_| "[]".to_string());
    let prompt = prompts::generator_prompt(language, &plan_json, &templates_json, user_prompt);

    let text = provider.submit(&prompt, TEMPERATURE).await?;
    let items = coerce_array(&text).ok_or(GenerationError::Unparsable { stage: "generator" })?;
    if items.is_empty() {
        return Err(GenerationError::Empty { stage: "generator" });
    }
    debug!(slides = items.len(), "generator response decoded");

    let mut slides: Vec<GeneratedSlide> = items
        .into_iter()
        .take(plan.len())
        .map(|v| serde_json::from_value(v).unwrap_or_default())
        .collect();
    while slides.len() < plan.len() {
        slides.push(GeneratedSlide::default());
    }

    for (slide, planned) in slides.iter_mut().zip(plan) {
        if slide.template_id.is_none() {
            slide.template_id = Some(planned.template_id.clone());
        }
        if slide.role.is_none() {
            slide.role = Some(planned.role.clone());
        }
    }

    Ok(slides)
}
