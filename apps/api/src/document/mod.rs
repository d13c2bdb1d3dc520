//! Document capability — the host canvas the pipeline reads templates from
//! and writes slides into.
//!
//! The pipeline never touches a concrete document type directly; it talks to
//! the `DocumentHost` trait. `SceneDocument` is the in-memory implementation
//! operating on the request-supplied scene, and the only one this service
//! ships. The contract mirrors a design-canvas API: enumerate frames in a
//! scope, read text-bearing descendants, write text, clone and position
//! frames, group them into a named section, load fonts.

pub mod fonts;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::catalog::Scope;

// ────────────────────────────────────────────────────────────────────────────
// Scene model
// ────────────────────────────────────────────────────────────────────────────

/// A document scene: pages of frames plus the current selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Scene {
    pub pages: Vec<Page>,
    /// Index into `pages` of the page the user is looking at.
    pub current_page: usize,
    /// Ids of currently selected frames (scope `selection`).
    pub selection: Vec<String>,
    /// Sections created by grouping generated slides.
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub name: String,
    pub frames: Vec<FrameNode>,
}

impl Default for Page {
    fn default() -> Self {
        Page {
            id: Uuid::new_v4().to_string(),
            name: "Page 1".to_string(),
            frames: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FrameNode {
    pub id: String,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub children: Vec<SceneNode>,
}

/// A node inside a frame. Only text nodes carry editable content; groups
/// exist so traversal depth is exercised the way real documents nest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SceneNode {
    Text(TextNode),
    Group(GroupNode),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GroupNode {
    pub id: String,
    pub name: String,
    pub children: Vec<SceneNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextNode {
    pub id: String,
    pub name: String,
    pub characters: String,
    pub font_size: f32,
    pub font_family: String,
    pub font_style: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for TextNode {
    fn default() -> Self {
        TextNode {
            id: Uuid::new_v4().to_string(),
            name: String::new(),
            characters: String::new(),
            font_size: 16.0,
            font_family: "Inter".to_string(),
            font_style: "Regular".to_string(),
            x: 0.0,
            y: 0.0,
            width: 200.0,
            height: 40.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub frame_ids: Vec<String>,
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("node {0} not found")]
    NodeNotFound(String),

    #[error("font '{family} {style}' is not loadable")]
    FontUnavailable { family: String, style: String },

    #[error("cannot create a section from zero frames")]
    EmptySection,
}

// ────────────────────────────────────────────────────────────────────────────
// Capability trait
// ────────────────────────────────────────────────────────────────────────────

/// The host document capability consumed by the pipeline.
pub trait DocumentHost {
    /// Frames eligible as templates under the given scope, in document order.
    fn frames_in_scope(&self, scope: Scope) -> Vec<FrameNode>;

    /// Clones `source_id` onto the current page with a new name and position.
    /// Every node in the clone receives a fresh id.
    fn clone_frame(
        &mut self,
        source_id: &str,
        name: &str,
        x: f32,
        y: f32,
    ) -> Result<FrameNode, DocumentError>;

    /// Writes `text` into the text node with the given id, anywhere in the scene.
    fn write_text(&mut self, node_id: &str, text: &str) -> Result<(), DocumentError>;

    /// Ensures a font is available for writing. Idempotent.
    fn load_font(&mut self, family: &str, style: &str) -> Result<(), DocumentError>;

    /// Groups the named frames into a section sized to their bounding box.
    /// Returns the section name.
    fn create_section(&mut self, name: &str, frame_ids: &[String])
        -> Result<String, DocumentError>;
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory implementation
// ────────────────────────────────────────────────────────────────────────────

pub struct SceneDocument {
    scene: Scene,
}

impl SceneDocument {
    pub fn new(scene: Scene) -> Self {
        SceneDocument { scene }
    }

    pub fn into_scene(self) -> Scene {
        self.scene
    }

    fn current_page_index(&self) -> usize {
        self.scene.current_page.min(self.scene.pages.len().saturating_sub(1))
    }

    fn find_frame(&self, id: &str) -> Option<&FrameNode> {
        self.scene
            .pages
            .iter()
            .flat_map(|p| p.frames.iter())
            .find(|f| f.id == id)
    }

    fn find_text_mut<'a>(nodes: &'a mut [SceneNode], node_id: &str) -> Option<&'a mut TextNode> {
        for node in nodes {
            match node {
                SceneNode::Text(t) if t.id == node_id => return Some(t),
                SceneNode::Text(_) => {}
                SceneNode::Group(g) => {
                    if let Some(found) = Self::find_text_mut(&mut g.children, node_id) {
                        return Some(found);
                    }
                }
            }
        }
        None
    }

    fn reassign_ids(nodes: &mut [SceneNode]) {
        for node in nodes {
            match node {
                SceneNode::Text(t) => t.id = Uuid::new_v4().to_string(),
                SceneNode::Group(g) => {
                    g.id = Uuid::new_v4().to_string();
                    Self::reassign_ids(&mut g.children);
                }
            }
        }
    }
}

impl DocumentHost for SceneDocument {
    fn frames_in_scope(&self, scope: Scope) -> Vec<FrameNode> {
        match scope {
            Scope::Selection => {
                let page = match self.scene.pages.get(self.current_page_index()) {
                    Some(p) => p,
                    None => return Vec::new(),
                };
                page.frames
                    .iter()
                    .filter(|f| self.scene.selection.iter().any(|id| *id == f.id))
                    .cloned()
                    .collect()
            }
            Scope::ThisPage => self
                .scene
                .pages
                .get(self.current_page_index())
                .map(|p| p.frames.clone())
                .unwrap_or_default(),
            Scope::AllPages | Scope::EntireFile => self
                .scene
                .pages
                .iter()
                .flat_map(|p| p.frames.iter().cloned())
                .collect(),
        }
    }

    fn clone_frame(
        &mut self,
        source_id: &str,
        name: &str,
        x: f32,
        y: f32,
    ) -> Result<FrameNode, DocumentError> {
        let mut clone = self
            .find_frame(source_id)
            .cloned()
            .ok_or_else(|| DocumentError::NodeNotFound(source_id.to_string()))?;
        clone.id = Uuid::new_v4().to_string();
        clone.name = name.to_string();
        clone.x = x;
        clone.y = y;
        Self::reassign_ids(&mut clone.children);

        let page_idx = self.current_page_index();
        if self.scene.pages.is_empty() {
            self.scene.pages.push(Page::default());
        }
        self.scene.pages[page_idx].frames.push(clone.clone());
        Ok(clone)
    }

    fn write_text(&mut self, node_id: &str, text: &str) -> Result<(), DocumentError> {
        for page in &mut self.scene.pages {
            for frame in &mut page.frames {
                if let Some(node) = Self::find_text_mut(&mut frame.children, node_id) {
                    node.characters = text.to_string();
                    return Ok(());
                }
            }
        }
        Err(DocumentError::NodeNotFound(node_id.to_string()))
    }

    fn load_font(&mut self, family: &str, style: &str) -> Result<(), DocumentError> {
        // The in-memory scene has no real font registry; an empty family is
        // the one condition that models an unloadable font.
        if family.trim().is_empty() {
            return Err(DocumentError::FontUnavailable {
                family: family.to_string(),
                style: style.to_string(),
            });
        }
        Ok(())
    }

    fn create_section(
        &mut self,
        name: &str,
        frame_ids: &[String],
    ) -> Result<String, DocumentError> {
        let members: Vec<&FrameNode> = frame_ids
            .iter()
            .filter_map(|id| self.find_frame(id))
            .collect();
        if members.is_empty() {
            return Err(DocumentError::EmptySection);
        }

        let min_x = members.iter().map(|f| f.x).fold(f32::INFINITY, f32::min);
        let min_y = members.iter().map(|f| f.y).fold(f32::INFINITY, f32::min);
        let max_x = members
            .iter()
            .map(|f| f.x + f.width)
            .fold(f32::NEG_INFINITY, f32::max);
        let max_y = members
            .iter()
            .map(|f| f.y + f.height)
            .fold(f32::NEG_INFINITY, f32::max);

        let section = Section {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
            frame_ids: frame_ids.to_vec(),
        };
        let section_name = section.name.clone();
        self.scene.sections.push(section);
        Ok(section_name)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Test fixtures (shared across the crate's test modules)
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub mod fixtures {
    use super::*;

    pub fn text(name: &str, characters: &str) -> TextNode {
        TextNode {
            name: name.to_string(),
            characters: characters.to_string(),
            ..TextNode::default()
        }
    }

    pub fn frame(name: &str, x: f32, texts: Vec<TextNode>) -> FrameNode {
        FrameNode {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            x,
            y: 0.0,
            width: 960.0,
            height: 540.0,
            children: texts.into_iter().map(SceneNode::Text).collect(),
        }
    }

    /// The happy-path scene from the design: one cover (title + subtitle)
    /// and two content frames (title + body).
    pub fn three_frame_scene() -> Scene {
        let cover = frame(
            "Cover",
            0.0,
            vec![text("Title", "Deck title"), text("Subtitle", "A subtitle")],
        );
        let content_a = frame(
            "Content A",
            1100.0,
            vec![text("Title", "Section"), text("Body", "Body text goes here")],
        );
        let content_b = frame(
            "Content B",
            2200.0,
            vec![text("Title", "Section"), text("Body", "More body text")],
        );
        Scene {
            pages: vec![Page {
                id: "page-1".to_string(),
                name: "Page 1".to_string(),
                frames: vec![cover, content_a, content_b],
            }],
            current_page: 0,
            selection: Vec::new(),
            sections: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_this_page_scope_returns_page_frames() {
        let doc = SceneDocument::new(three_frame_scene());
        let frames = doc.frames_in_scope(Scope::ThisPage);
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].name, "Cover");
    }

    #[test]
    fn test_selection_scope_filters_by_selected_ids() {
        let mut scene = three_frame_scene();
        let picked = scene.pages[0].frames[1].id.clone();
        scene.selection = vec![picked.clone()];
        let doc = SceneDocument::new(scene);
        let frames = doc.frames_in_scope(Scope::Selection);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].id, picked);
    }

    #[test]
    fn test_all_pages_scope_flattens_pages() {
        let mut scene = three_frame_scene();
        scene.pages.push(Page {
            id: "page-2".to_string(),
            name: "Page 2".to_string(),
            frames: vec![frame("Extra", 0.0, vec![text("Title", "x")])],
        });
        let doc = SceneDocument::new(scene);
        assert_eq!(doc.frames_in_scope(Scope::AllPages).len(), 4);
        assert_eq!(doc.frames_in_scope(Scope::ThisPage).len(), 3);
    }

    #[test]
    fn test_empty_scene_yields_no_frames() {
        let doc = SceneDocument::new(Scene::default());
        assert!(doc.frames_in_scope(Scope::EntireFile).is_empty());
    }

    #[test]
    fn test_clone_frame_assigns_fresh_ids() {
        let scene = three_frame_scene();
        let source_id = scene.pages[0].frames[0].id.clone();
        let child_id = match &scene.pages[0].frames[0].children[0] {
            SceneNode::Text(t) => t.id.clone(),
            _ => unreachable!(),
        };

        let mut doc = SceneDocument::new(scene);
        let clone = doc.clone_frame(&source_id, "cover", 50.0, 0.0).unwrap();

        assert_ne!(clone.id, source_id);
        assert_eq!(clone.name, "cover");
        assert_eq!(clone.x, 50.0);
        match &clone.children[0] {
            SceneNode::Text(t) => assert_ne!(t.id, child_id, "clone must not share node ids"),
            _ => panic!("expected text child"),
        }

        // Clone lands on the current page.
        assert_eq!(doc.into_scene().pages[0].frames.len(), 4);
    }

    #[test]
    fn test_clone_missing_frame_errors() {
        let mut doc = SceneDocument::new(three_frame_scene());
        assert!(matches!(
            doc.clone_frame("nope", "x", 0.0, 0.0),
            Err(DocumentError::NodeNotFound(_))
        ));
    }

    #[test]
    fn test_write_text_reaches_nested_nodes() {
        let inner = text("Body", "old");
        let inner_id = inner.id.clone();
        let mut scene = Scene::default();
        scene.pages.push(Page {
            id: "p".to_string(),
            name: "p".to_string(),
            frames: vec![FrameNode {
                id: "f".to_string(),
                name: "f".to_string(),
                width: 960.0,
                height: 540.0,
                children: vec![SceneNode::Group(GroupNode {
                    id: "g".to_string(),
                    name: "g".to_string(),
                    children: vec![SceneNode::Text(inner)],
                })],
                ..FrameNode::default()
            }],
        });

        let mut doc = SceneDocument::new(scene);
        doc.write_text(&inner_id, "new").unwrap();
        assert!(doc.write_text("missing", "x").is_err());

        let scene = doc.into_scene();
        match &scene.pages[0].frames[0].children[0] {
            SceneNode::Group(g) => match &g.children[0] {
                SceneNode::Text(t) => assert_eq!(t.characters, "new"),
                _ => panic!(),
            },
            _ => panic!(),
        }
    }

    #[test]
    fn test_section_bounds_fit_members_exactly() {
        let scene = three_frame_scene();
        let ids: Vec<String> = scene.pages[0].frames.iter().map(|f| f.id.clone()).collect();
        let mut doc = SceneDocument::new(scene);
        let name = doc.create_section("AI Slides – bees", &ids).unwrap();
        assert_eq!(name, "AI Slides – bees");

        let scene = doc.into_scene();
        let section = &scene.sections[0];
        assert_eq!(section.x, 0.0);
        // Last frame starts at 2200 and is 960 wide.
        assert_eq!(section.width, 3160.0);
        assert_eq!(section.frame_ids.len(), 3);
    }

    #[test]
    fn test_section_from_no_frames_errors() {
        let mut doc = SceneDocument::new(three_frame_scene());
        assert!(matches!(
            doc.create_section("empty", &[]),
            Err(DocumentError::EmptySection)
        ));
    }

    #[test]
    fn test_load_font_rejects_empty_family() {
        let mut doc = SceneDocument::new(Scene::default());
        assert!(doc.load_font("Inter", "Regular").is_ok());
        assert!(doc.load_font("  ", "Bold").is_err());
    }
}
