//! Template catalog — the analyzed view of the document's candidate frames.
//!
//! Built once per generation request from the live scene and discarded at the
//! end of the request; template ids (`template-<index>`) are stable within a
//! run only.

pub mod builder;
pub mod classifier;
pub mod estimator;
pub mod targets;

use serde::{Deserialize, Serialize};

/// Which part of the document supplies candidate template frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scope {
    #[serde(rename = "selection")]
    Selection,
    #[serde(rename = "thisPage")]
    ThisPage,
    #[serde(rename = "allPages")]
    AllPages,
    #[serde(rename = "entireFile")]
    EntireFile,
}

impl Default for Scope {
    fn default() -> Self {
        Scope::Selection
    }
}

/// Semantic purpose of a text slot. Assigned exactly once at catalog-build
/// time and never mutated afterward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotRole {
    Title,
    Subtitle,
    Body,
    Bullets,
    Number,
    Caption,
    Misc,
}

impl SlotRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotRole::Title => "title",
            SlotRole::Subtitle => "subtitle",
            SlotRole::Body => "body",
            SlotRole::Bullets => "bullets",
            SlotRole::Number => "number",
            SlotRole::Caption => "caption",
            SlotRole::Misc => "misc",
        }
    }
}

/// Coarse layout tag derived from a template's slot count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutTag {
    #[serde(rename = "title-only")]
    TitleOnly,
    #[serde(rename = "title+body")]
    TitleBody,
    #[serde(rename = "title+subtitle+body")]
    TitleSubtitleBody,
    #[serde(rename = "multi-block")]
    MultiBlock,
}

impl LayoutTag {
    pub fn from_slot_count(count: usize) -> Self {
        match count {
            0 | 1 => LayoutTag::TitleOnly,
            2 => LayoutTag::TitleBody,
            3 => LayoutTag::TitleSubtitleBody,
            _ => LayoutTag::MultiBlock,
        }
    }
}

/// One editable text region inside a template frame.
///
/// `estimated_chars` is seeded from box geometry (what the box can hold),
/// `estimated_words` from the slot's current content length — an intentional
/// asymmetry. Both are always positive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSlot {
    pub node_id: String,
    pub name: String,
    pub role: SlotRole,
    pub estimated_chars: u32,
    pub estimated_words: u32,
    pub original_text: String,
    pub font_size: f32,
    pub font_family: String,
    pub font_style: String,
    pub width: f32,
    pub height: f32,
}

/// An analyzed template frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    /// `template-<index>` in enumeration order; not persisted across runs.
    pub id: String,
    pub name: String,
    /// True only for the first enumerated frame.
    pub is_cover: bool,
    pub layout: LayoutTag,
    pub slots: Vec<TextSlot>,
    /// Frame node id in the source scene.
    pub source_frame: String,
}

impl Template {
    pub fn has_role(&self, role: SlotRole) -> bool {
        self.slots.iter().any(|s| s.role == role)
    }

    pub fn slot_with_role(&self, role: SlotRole) -> Option<&TextSlot> {
        self.slots.iter().find(|s| s.role == role)
    }

    pub fn bullet_slot_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.role == SlotRole::Bullets)
            .count()
    }
}

/// The full set of analyzed templates for a single generation request.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub templates: Vec<Template>,
    /// True when the scope yielded at least as many frames as the cap.
    pub hit_cap: bool,
}

impl Catalog {
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn by_id(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn cover(&self) -> Option<&Template> {
        self.templates
            .iter()
            .find(|t| t.is_cover)
            .or_else(|| self.templates.first())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_round_trips_camel_case_names() {
        for (scope, s) in [
            (Scope::Selection, "\"selection\""),
            (Scope::ThisPage, "\"thisPage\""),
            (Scope::AllPages, "\"allPages\""),
            (Scope::EntireFile, "\"entireFile\""),
        ] {
            assert_eq!(serde_json::to_string(&scope).unwrap(), s);
            assert_eq!(serde_json::from_str::<Scope>(s).unwrap(), scope);
        }
    }

    #[test]
    fn test_layout_tag_from_slot_count() {
        assert_eq!(LayoutTag::from_slot_count(0), LayoutTag::TitleOnly);
        assert_eq!(LayoutTag::from_slot_count(1), LayoutTag::TitleOnly);
        assert_eq!(LayoutTag::from_slot_count(2), LayoutTag::TitleBody);
        assert_eq!(LayoutTag::from_slot_count(3), LayoutTag::TitleSubtitleBody);
        assert_eq!(LayoutTag::from_slot_count(7), LayoutTag::MultiBlock);
    }

    #[test]
    fn test_slot_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&SlotRole::Title).unwrap(), "\"title\"");
        assert_eq!(
            serde_json::from_str::<SlotRole>("\"bullets\"").unwrap(),
            SlotRole::Bullets
        );
    }
}
