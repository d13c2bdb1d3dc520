//! The generation pipeline: scope → catalog → plan → content → fit →
//! materialize, with one `finish` summary per request no matter what failed
//! along the way.
//!
//! Stage failures never escape this module. Fatal conditions abort the
//! request with a bucket entry and an empty summary; degraded conditions are
//! recorded and the loop continues.

pub mod materializer;
pub mod selector;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::builder::{build_catalog, MAX_TEMPLATES};
use crate::catalog::Scope;
use crate::document::fonts::{ensure_fonts, text_nodes, FontCache};
use crate::document::{DocumentHost, Scene, SceneDocument};
use crate::errors::ErrorBucket;
use crate::generation::generator::generate_slides;
use crate::generation::planner::plan_slides;
use crate::generation::refine::refine_slides;
use crate::layout::enforce_all;
use crate::llm::TextProvider;
use crate::pipeline::materializer::apply_slide;
use crate::pipeline::selector::pick_template;

/// Horizontal gap between positioned slides.
const SLIDE_GAP: f32 = 80.0;
/// Prefix length of the prompt used in the section name.
const SECTION_LABEL_CHARS: usize = 20;

// ────────────────────────────────────────────────────────────────────────────
// Request / response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerateDeckRequest {
    pub prompt: String,
    pub slide_count: i64,
    pub scope: Scope,
    pub group_in_section: bool,
    pub scene: Scene,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunStatus {
    Done,
    Cancelled,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishSummary {
    pub status: RunStatus,
    pub created: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

/// One created slide, as reported back to the caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideRecord {
    pub name: String,
    pub frame_id: String,
    pub template_id: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckResponse {
    pub errors: ErrorBucket,
    pub summary: FinishSummary,
    pub slides: Vec<SlideRecord>,
    pub scene: Scene,
}

// ────────────────────────────────────────────────────────────────────────────
// Run control
// ────────────────────────────────────────────────────────────────────────────

/// Serializes generation requests and carries the cancellation flag.
///
/// One request runs at a time; starting a new one resets the flag, which
/// implicitly supersedes any still-finishing prior request's checks. The
/// flag is polled at slide-creation granularity, never inside an in-flight
/// network call.
#[derive(Debug, Default)]
pub struct ActiveRun {
    cancelled: AtomicBool,
    runs: AtomicU64,
    gate: tokio::sync::Mutex<()>,
}

impl ActiveRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn begin(&self) -> u64 {
        self.cancelled.store(false, Ordering::SeqCst);
        self.runs.fetch_add(1, Ordering::SeqCst) + 1
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestration
// ────────────────────────────────────────────────────────────────────────────

fn abort(errors: ErrorBucket, doc: SceneDocument, status: RunStatus) -> DeckResponse {
    DeckResponse {
        errors,
        summary: FinishSummary {
            status,
            created: 0,
            section: None,
        },
        slides: Vec::new(),
        scene: doc.into_scene(),
    }
}

/// Runs one full generation request. Always returns a response with exactly
/// one summary; errors land in the buckets, never in a panic or early `Err`.
pub async fn run_generation(
    req: GenerateDeckRequest,
    provider: &dyn TextProvider,
    fonts: &FontCache,
    active: &ActiveRun,
    refine: bool,
) -> DeckResponse {
    let _gate = active.gate.lock().await;
    let run = active.begin();

    let mut errors = ErrorBucket::new();
    let mut doc = SceneDocument::new(req.scene);

    let prompt = req.prompt.trim().to_string();
    if prompt.is_empty() {
        errors.generation("Prompt is empty.");
        return abort(errors, doc, RunStatus::Done);
    }
    if req.slide_count <= 0 {
        errors.generation("Slide count must be a positive number.");
        return abort(errors, doc, RunStatus::Done);
    }
    let slide_count = req.slide_count as u32;

    let catalog = build_catalog(&doc, req.scope);
    if catalog.is_empty() {
        errors.template("No template frames found in the selected scope.");
        return abort(errors, doc, RunStatus::Done);
    }
    if catalog.hit_cap {
        errors.misc(format!(
            "Found {} templates. Limited to {MAX_TEMPLATES} to prevent performance issues. \
             Consider selecting specific templates or using a smaller scope.",
            catalog.templates.len()
        ));
    }
    info!(run, progress = 10, templates = catalog.templates.len(), "analyzing templates");

    if active.is_cancelled() {
        errors.misc("Operation cancelled.");
        return abort(errors, doc, RunStatus::Cancelled);
    }

    let plan = match plan_slides(provider, &prompt, slide_count, &catalog).await {
        Ok(plan) => plan,
        Err(e) => {
            errors.generation(format!("Failed to plan slides: {e}"));
            return abort(errors, doc, RunStatus::Done);
        }
    };
    if plan.is_empty() {
        errors.generation("Planner returned no slides.");
        return abort(errors, doc, RunStatus::Done);
    }

    let mut slides = match generate_slides(provider, &prompt, &plan, &catalog).await {
        Ok(slides) => slides,
        Err(e) => {
            errors.generation(format!("Failed to generate slides: {e}"));
            return abort(errors, doc, RunStatus::Done);
        }
    };

    for warning in enforce_all(&mut slides, &plan, &catalog) {
        errors.misc(warning);
    }

    if refine && !active.is_cancelled() {
        info!(run, progress = 85, "refining overlong fields");
        slides = refine_slides(provider, slides, &plan, &catalog).await;
    }

    // All slides line up to the right of the first chosen template's frame.
    let first_template = &catalog.templates[0];
    let anchor = pick_template(&catalog, &slides[0]).unwrap_or(first_template);
    let frames = doc.frames_in_scope(req.scope);
    let (start_x, slide_width) = frames
        .iter()
        .find(|f| f.id == anchor.source_frame)
        .map(|f| (f.x, f.width))
        .unwrap_or((0.0, 960.0));

    let mut created: Vec<SlideRecord> = Vec::new();
    for (i, slide) in slides.iter().enumerate() {
        if active.is_cancelled() {
            break;
        }
        if i % 3 == 0 {
            let progress = 20.0 + (i as f32 / slides.len() as f32) * 60.0;
            info!(run, progress = progress as u32, "creating slide {}/{}", i + 1, slides.len());
            tokio::task::yield_now().await;
        }

        let template = pick_template(&catalog, slide).unwrap_or(first_template);
        let name = if i == 0 {
            "cover".to_string()
        } else {
            format!("slide-{i}")
        };
        let x = start_x + i as f32 * (slide_width + SLIDE_GAP);

        let clone = match doc.clone_frame(&template.source_frame, &name, x, 0.0) {
            Ok(clone) => clone,
            Err(e) => {
                errors.misc(format!("{name}: {e}"));
                continue;
            }
        };

        let nodes = text_nodes(&clone.children);
        for e in ensure_fonts(&mut doc, &nodes, fonts) {
            errors.font(format!("{name}: {e}"));
        }

        for e in apply_slide(&mut doc, &clone, template, slide) {
            errors.misc(e);
        }

        created.push(SlideRecord {
            name,
            frame_id: clone.id.clone(),
            template_id: template.id.clone(),
            role: slide.role.clone().unwrap_or_default(),
        });
    }

    let mut section = None;
    if !active.is_cancelled() && req.group_in_section && !created.is_empty() {
        let label: String = prompt.chars().take(SECTION_LABEL_CHARS).collect();
        let ids: Vec<String> = created.iter().map(|s| s.frame_id.clone()).collect();
        match doc.create_section(&format!("AI Slides – {label}"), &ids) {
            Ok(name) => section = Some(name),
            Err(e) => errors.misc(e.to_string()),
        }
    }

    let status = if active.is_cancelled() {
        errors.misc("Operation cancelled.");
        RunStatus::Cancelled
    } else {
        RunStatus::Done
    };
    info!(run, created = created.len(), ?status, "generation request finished");

    DeckResponse {
        errors,
        summary: FinishSummary {
            status,
            created: created.len(),
            section,
        },
        slides: created,
        scene: doc.into_scene(),
    }
}
