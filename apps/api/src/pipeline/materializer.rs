//! Slide materialization — writing a generated slide's fields into a cloned
//! template frame.
//!
//! Slot/field correspondence matches slot identity first and falls back to
//! positional index; clones carry fresh node ids, so in practice the
//! positional fallback is what fires. Content is mapped strictly by role —
//! an unmapped slot receives the empty string, never a generic fallback.

use crate::catalog::builder::collect_text_nodes;
use crate::catalog::{SlotRole, Template, TextSlot};
use crate::document::{DocumentHost, FrameNode};
use crate::generation::generator::GeneratedSlide;

struct ContentMap {
    title: Option<String>,
    subtitle: Option<String>,
    bullets: Option<String>,
    body: Option<String>,
}

impl ContentMap {
    fn new(slide: &GeneratedSlide) -> Self {
        ContentMap {
            title: slide.title.clone(),
            subtitle: slide.subtitle.clone(),
            bullets: slide
                .bullets
                .as_ref()
                .filter(|b| !b.is_empty())
                .map(|b| b.join("\n")),
            body: slide.body.clone(),
        }
    }

    fn pick(&self, slot: Option<&TextSlot>) -> &str {
        match slot.map(|s| s.role) {
            Some(SlotRole::Title) => self.title.as_deref().unwrap_or(""),
            Some(SlotRole::Subtitle) | Some(SlotRole::Caption) => {
                self.subtitle.as_deref().unwrap_or("")
            }
            Some(SlotRole::Bullets) => self.bullets.as_deref().unwrap_or(""),
            Some(SlotRole::Body) => self
                .body
                .as_deref()
                .or(self.bullets.as_deref())
                .unwrap_or(""),
            Some(SlotRole::Misc) => self
                .body
                .as_deref()
                .or(self.subtitle.as_deref())
                .unwrap_or(""),
            Some(SlotRole::Number) => "",
            None => self
                .body
                .as_deref()
                .or(self.title.as_deref())
                .unwrap_or(""),
        }
    }
}

/// Writes the slide's content into the clone's text nodes. Number-role slots
/// are never touched. Returns per-node write failures; all are non-fatal.
pub fn apply_slide(
    doc: &mut dyn DocumentHost,
    clone: &FrameNode,
    template: &Template,
    slide: &GeneratedSlide,
) -> Vec<String> {
    let map = ContentMap::new(slide);
    let mut errors = Vec::new();

    let node_ids: Vec<String> = collect_text_nodes(clone)
        .into_iter()
        .map(|node| node.id.clone())
        .collect();

    for (i, node_id) in node_ids.iter().enumerate() {
        let slot = template
            .slots
            .iter()
            .find(|s| s.node_id == *node_id)
            .or_else(|| template.slots.get(i));
        if slot.is_some_and(|s| s.role == SlotRole::Number) {
            continue;
        }
        let content = map.pick(slot).to_string();
        if let Err(e) = doc.write_text(node_id, &content) {
            errors.push(format!("{}: {e}", clone.name));
        }
    }

    errors
}
