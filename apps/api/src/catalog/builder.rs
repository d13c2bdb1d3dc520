//! Template catalog construction — walks the scoped frames, extracts their
//! text slots with a bounded traversal, and runs the classifier and capacity
//! estimator over each slot.
//!
//! Fails soft: an empty scope yields an empty catalog; the caller reports it
//! as a non-fatal "no templates" condition.

use tracing::debug;

use crate::catalog::classifier::infer_slot_role;
use crate::catalog::estimator::{box_char_capacity, word_baseline};
use crate::catalog::{Catalog, LayoutTag, Scope, Template, TextSlot};
use crate::document::{DocumentHost, FrameNode, SceneNode, TextNode};

/// Scope cap, bounding per-request analysis cost on large files.
pub const MAX_TEMPLATES: usize = 50;
/// Traversal bound per frame.
const MAX_NODES_PER_FRAME: usize = 200;
/// Children inspected per nesting level.
const MAX_CHILDREN_PER_LEVEL: usize = 20;

/// Collects a frame's text nodes in document order with the bounded walk.
pub fn collect_text_nodes(frame: &FrameNode) -> Vec<&TextNode> {
    let mut out = Vec::new();
    let mut visited = 0usize;
    walk(&frame.children, &mut out, &mut visited);
    out
}

fn walk<'a>(children: &'a [SceneNode], out: &mut Vec<&'a TextNode>, visited: &mut usize) {
    for child in children.iter().take(MAX_CHILDREN_PER_LEVEL) {
        if *visited >= MAX_NODES_PER_FRAME {
            return;
        }
        *visited += 1;
        match child {
            SceneNode::Text(t) => out.push(t),
            SceneNode::Group(g) => walk(&g.children, out, visited),
        }
    }
}

/// Builds the slot list for one frame's text nodes.
fn build_slots(text_nodes: &[&TextNode]) -> Vec<TextSlot> {
    let total = text_nodes.len();
    text_nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| TextSlot {
            node_id: node.id.clone(),
            name: node.name.clone(),
            role: infer_slot_role(&node.name, idx, total, &node.characters),
            estimated_chars: box_char_capacity(
                node.font_size,
                &node.font_family,
                node.width,
                node.height,
            ),
            estimated_words: word_baseline(node.characters.chars().count()),
            original_text: node.characters.clone(),
            font_size: node.font_size,
            font_family: node.font_family.clone(),
            font_style: node.font_style.clone(),
            width: node.width,
            height: node.height,
        })
        .collect()
}

/// Builds the template catalog for a scope. The first frame in the resolved
/// scope is flagged as the cover.
pub fn build_catalog(doc: &dyn DocumentHost, scope: Scope) -> Catalog {
    let frames = doc.frames_in_scope(scope);
    let hit_cap = frames.len() >= MAX_TEMPLATES;

    let templates: Vec<Template> = frames
        .iter()
        .take(MAX_TEMPLATES)
        .enumerate()
        .map(|(index, frame)| {
            let text_nodes = collect_text_nodes(frame);
            let slots = build_slots(&text_nodes);
            Template {
                id: format!("template-{index}"),
                name: frame.name.clone(),
                is_cover: index == 0,
                layout: LayoutTag::from_slot_count(slots.len()),
                slots,
                source_frame: frame.id.clone(),
            }
        })
        .collect();

    debug!(
        templates = templates.len(),
        hit_cap, "Template catalog built"
    );
    Catalog { templates, hit_cap }
}
