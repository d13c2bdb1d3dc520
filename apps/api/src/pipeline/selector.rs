//! Template selection for a generated slide.
//!
//! An exact template id match short-circuits scoring entirely. Otherwise the
//! lowest score wins and ties keep the first candidate in catalog order.

use crate::catalog::{Catalog, Template};
use crate::generation::generator::GeneratedSlide;

/// Guaranteed-pick score for an exact id match inside the scoring path.
const EXACT_ID_SCORE: i32 = -10;

/// Scores a candidate template against a slide; lower is better.
pub fn score_template(template: &Template, slide: &GeneratedSlide) -> i32 {
    if slide
        .template_id
        .as_deref()
        .is_some_and(|id| id == template.id)
    {
        return EXACT_ID_SCORE;
    }

    let target_count = slide.field_count() as i32;
    let diff = (template.slots.len() as i32 - target_count).abs();

    let mut bonus = 0;
    if let Some(bullets) = slide.bullets.as_ref().filter(|b| !b.is_empty()) {
        if template.slots.len() >= bullets.len() + 1 {
            bonus -= 1;
        }
    }
    if slide
        .role
        .as_deref()
        .is_some_and(|r| r.to_lowercase().contains("cover"))
        && template.is_cover
    {
        bonus -= 2;
    }

    diff + bonus
}

/// Picks the template for a slide: exact id fast path, then stable best
/// score.
pub fn pick_template<'a>(catalog: &'a Catalog, slide: &GeneratedSlide) -> Option<&'a Template> {
    if let Some(by_id) = slide.template_id.as_deref().and_then(|id| catalog.by_id(id)) {
        return Some(by_id);
    }

    let mut best: Option<(&Template, i32)> = None;
    for template in &catalog.templates {
        let score = score_template(template, slide);
        if best.map_or(true, |(_, s)| score < s) {
            best = Some((template, score));
        }
    }
    best.map(|(t, _)| t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{builder::build_catalog, Scope};
    use crate::document::fixtures::three_frame_scene;
    use crate::document::SceneDocument;

    fn catalog() -> Catalog {
        let doc = SceneDocument::new(three_frame_scene());
        build_catalog(&doc, Scope::ThisPage)
    }

    fn slide(template_id: Option<&str>, role: Option<&str>) -> GeneratedSlide {
        GeneratedSlide {
            template_id: template_id.map(str::to_string),
            role: role.map(str::to_string),
            ..GeneratedSlide::default()
        }
    }

    #[test]
    fn test_exact_id_short_circuits() {
        let catalog = catalog();
        let picked = pick_template(&catalog, &slide(Some("template-2"), None)).unwrap();
        assert_eq!(picked.id, "template-2");
    }

    #[test]
    fn test_exact_id_scores_guaranteed_pick() {
        let catalog = catalog();
        let s = slide(Some("template-1"), None);
        assert_eq!(score_template(&catalog.templates[1], &s), EXACT_ID_SCORE);
    }

    #[test]
    fn test_cover_role_prefers_cover_template() {
        let catalog = catalog();
        let mut s = slide(Some("template-99"), Some("cover"));
        s.title = Some("t".to_string());
        s.subtitle = Some("s".to_string());
        let picked = pick_template(&catalog, &s).unwrap();
        assert!(picked.is_cover);
    }

    #[test]
    fn test_slot_count_proximity_decides_without_role_hint() {
        let catalog = catalog();
        let mut s = slide(None, Some("content"));
        s.title = Some("t".to_string());
        s.body = Some("b".to_string());
        // All three templates have 2 slots; the first is kept on ties.
        let picked = pick_template(&catalog, &s).unwrap();
        assert_eq!(picked.id, "template-0");
    }

    #[test]
    fn test_empty_catalog_yields_none() {
        assert!(pick_template(&Catalog::default(), &slide(None, None)).is_none());
    }

    #[test]
    fn test_bullet_capacity_bonus() {
        let catalog = catalog();
        let mut s = slide(None, None);
        s.bullets = Some(vec!["a".to_string()]);
        // diff |2 slots - 1 field| = 1, bonus -1 because 2 >= 1 bullet + 1.
        assert_eq!(score_template(&catalog.templates[1], &s), 0);
        s.bullets = Some(vec!["a".to_string(), "b".to_string()]);
        // 2 slots < 2 bullets + 1: no bonus.
        assert_eq!(score_template(&catalog.templates[1], &s), 1);
    }
}
