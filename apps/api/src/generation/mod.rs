//! Content generation — the planner, generator, and refinement calls plus
//! the shared decoding machinery around them.
//!
//! Everything here is provider-agnostic; the only way out to the network is
//! the [`TextProvider`](crate::llm::TextProvider) trait.

use serde::Serialize;
use thiserror::Error;

use crate::catalog::{Catalog, SlotRole};
use crate::llm::ProviderError;

pub mod coerce;
pub mod generator;
pub mod language;
pub mod planner;
pub mod prompts;
pub mod refine;

/// Sampling temperature for all generation calls.
pub const TEMPERATURE: f32 = 0.35;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("unable to parse {stage} response as a JSON array")]
    Unparsable { stage: &'static str },

    #[error("{stage} returned an empty array")]
    Empty { stage: &'static str },
}

/// Minified per-template capability summary shipped to the model. The number
/// sample keeps page numbering consistent across generated slides.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    pub id: String,
    pub is_cover: bool,
    pub has_title: bool,
    pub has_subtitle: bool,
    pub has_body: bool,
    pub has_bullets: bool,
    pub has_number: bool,
    pub number_example: String,
}

/// Builds the summary list for a catalog, in template order.
pub fn summarize_templates(catalog: &Catalog) -> Vec<TemplateSummary> {
    catalog
        .templates
        .iter()
        .map(|t| TemplateSummary {
            id: t.id.clone(),
            is_cover: t.is_cover,
            has_title: t.has_role(SlotRole::Title),
            has_subtitle: t.has_role(SlotRole::Subtitle) || t.has_role(SlotRole::Caption),
            has_body: t.has_role(SlotRole::Body),
            has_bullets: t.has_role(SlotRole::Bullets),
            has_number: t.has_role(SlotRole::Number),
            number_example: t
                .slot_with_role(SlotRole::Number)
                .map(|s| s.original_text.clone())
                .unwrap_or_default(),
        })
        .collect()
}
