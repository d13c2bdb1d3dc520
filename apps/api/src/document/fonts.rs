//! Font loading for slide materialization.
//!
//! Fonts are loaded in batches of 5 and memoized in a process-wide cache
//! keyed by `family-style`, so repeated slides sharing a font do not reload
//! it. The cache is an explicit object injected through `AppState`, never
//! evicted within a session.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::document::{DocumentHost, SceneNode, TextNode};

const FONT_BATCH_SIZE: usize = 5;

/// Process-wide memoization of successfully loaded fonts.
#[derive(Debug, Default)]
pub struct FontCache {
    loaded: Mutex<HashSet<String>>,
}

impl FontCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(family: &str, style: &str) -> String {
        format!("{family}-{style}")
    }

    pub fn contains(&self, family: &str, style: &str) -> bool {
        self.loaded
            .lock()
            .expect("font cache lock poisoned")
            .contains(&Self::key(family, style))
    }

    fn mark(&self, family: &str, style: &str) {
        self.loaded
            .lock()
            .expect("font cache lock poisoned")
            .insert(Self::key(family, style));
    }
}

/// Collects the text nodes of a frame subtree in document order.
pub fn text_nodes(children: &[SceneNode]) -> Vec<&TextNode> {
    let mut out = Vec::new();
    collect(children, &mut out);
    out
}

fn collect<'a>(children: &'a [SceneNode], out: &mut Vec<&'a TextNode>) {
    for child in children {
        match child {
            SceneNode::Text(t) => out.push(t),
            SceneNode::Group(g) => collect(&g.children, out),
        }
    }
}

/// Loads every font used by `nodes` that the cache has not seen yet.
///
/// Individual load failures are degraded-continue: the failure message is
/// returned and the remaining fonts still load.
pub fn ensure_fonts(
    doc: &mut dyn DocumentHost,
    nodes: &[&TextNode],
    cache: &FontCache,
) -> Vec<String> {
    let mut errors = Vec::new();

    let mut pending: Vec<(String, String)> = Vec::new();
    let mut seen = HashSet::new();
    for node in nodes {
        let key = FontCache::key(&node.font_family, &node.font_style);
        if cache.contains(&node.font_family, &node.font_style) || !seen.insert(key) {
            continue;
        }
        pending.push((node.font_family.clone(), node.font_style.clone()));
    }

    for batch in pending.chunks(FONT_BATCH_SIZE) {
        for (family, style) in batch {
            match doc.load_font(family, style) {
                Ok(()) => cache.mark(family, style),
                Err(e) => errors.push(e.to_string()),
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Scene, SceneDocument};

    fn node(family: &str, style: &str) -> TextNode {
        TextNode {
            font_family: family.to_string(),
            font_style: style.to_string(),
            ..TextNode::default()
        }
    }

    #[test]
    fn test_fonts_memoized_after_first_load() {
        let mut doc = SceneDocument::new(Scene::default());
        let cache = FontCache::new();
        let a = node("Inter", "Regular");
        let b = node("Inter", "Bold");

        let errors = ensure_fonts(&mut doc, &[&a, &b, &a], &cache);
        assert!(errors.is_empty());
        assert!(cache.contains("Inter", "Regular"));
        assert!(cache.contains("Inter", "Bold"));
        assert!(!cache.contains("Inter", "Italic"));
    }

    #[test]
    fn test_failed_font_not_cached_and_reported() {
        let mut doc = SceneDocument::new(Scene::default());
        let cache = FontCache::new();
        let bad = node("", "Regular");
        let good = node("Lato", "Regular");

        let errors = ensure_fonts(&mut doc, &[&bad, &good], &cache);
        assert_eq!(errors.len(), 1, "failing font reported, loading continues");
        assert!(cache.contains("Lato", "Regular"));
        assert!(!cache.contains("", "Regular"));
    }

    #[test]
    fn test_family_and_style_key_independently() {
        let mut doc = SceneDocument::new(Scene::default());
        let cache = FontCache::new();
        ensure_fonts(&mut doc, &[&node("Oswald", "Regular")], &cache);
        assert!(!cache.contains("Oswald", "Bold"));
    }

    #[test]
    fn test_text_nodes_walks_groups() {
        use crate::document::GroupNode;
        let children = vec![
            SceneNode::Text(node("Inter", "Regular")),
            SceneNode::Group(GroupNode {
                id: "g".to_string(),
                name: "g".to_string(),
                children: vec![SceneNode::Text(node("Lato", "Regular"))],
            }),
        ];
        assert_eq!(text_nodes(&children).len(), 2);
    }
}
