//! Deck generation endpoints.
//!
//! POST /api/v1/decks runs the full pipeline against the request-supplied
//! scene and always answers 200 with a finish summary; pipeline failures are
//! reported through the error buckets, not HTTP status codes.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use tracing::info;

use crate::errors::ErrorBucket;
use crate::llm::make_provider;
use crate::pipeline::{
    run_generation, DeckResponse, FinishSummary, GenerateDeckRequest, RunStatus,
};
use crate::state::AppState;

/// POST /api/v1/decks
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateDeckRequest>,
) -> Json<DeckResponse> {
    // The chosen scope is remembered for the next session.
    state.settings.set_scope(req.scope);

    let provider = match make_provider(
        state.config.provider,
        state.http.clone(),
        state.settings.api_key(),
    ) {
        Ok(provider) => provider,
        Err(e) => {
            let mut errors = ErrorBucket::new();
            errors.generation(format!("Failed to plan slides: {e}"));
            return Json(DeckResponse {
                errors,
                summary: FinishSummary {
                    status: RunStatus::Done,
                    created: 0,
                    section: None,
                },
                slides: Vec::new(),
                scene: req.scene,
            });
        }
    };

    let response = run_generation(
        req,
        provider.as_ref(),
        &state.fonts,
        &state.active,
        state.config.refine_enabled,
    )
    .await;
    Json(response)
}

/// POST /api/v1/decks/cancel
pub async fn handle_cancel(State(state): State<AppState>) -> Json<Value> {
    state.active.request_cancel();
    info!("cancellation requested");
    Json(json!({ "cancelled": true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::{Config, ProviderKind};
    use crate::document::fonts::FontCache;
    use crate::pipeline::ActiveRun;
    use crate::settings::SettingsStore;

    fn state(dir: &tempfile::TempDir) -> AppState {
        AppState {
            config: Config {
                provider: ProviderKind::Gemini,
                provider_api_key: None,
                settings_path: dir.path().join("settings.json"),
                refine_enabled: false,
                port: 0,
                rust_log: "info".to_string(),
            },
            http: reqwest::Client::new(),
            settings: Arc::new(SettingsStore::load(dir.path().join("settings.json"), None)),
            fonts: Arc::new(FontCache::new()),
            active: Arc::new(ActiveRun::new()),
        }
    }

    #[tokio::test]
    async fn test_generate_without_key_reports_fatal_generation_error() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(&dir);
        let req = GenerateDeckRequest {
            prompt: "bees".to_string(),
            slide_count: 3,
            ..GenerateDeckRequest::default()
        };

        let Json(response) = handle_generate(State(state), Json(req)).await;
        assert_eq!(response.summary.created, 0);
        assert!(response.errors.generation[0].contains("no API key configured"));
    }

    #[tokio::test]
    async fn test_generate_persists_requested_scope() {
        use crate::catalog::Scope;

        let dir = tempfile::tempdir().unwrap();
        let state = state(&dir);
        let settings = Arc::clone(&state.settings);
        let req = GenerateDeckRequest {
            prompt: "bees".to_string(),
            slide_count: 1,
            scope: Scope::AllPages,
            ..GenerateDeckRequest::default()
        };

        let _ = handle_generate(State(state), Json(req)).await;
        assert_eq!(settings.snapshot().scope, Some(Scope::AllPages));
    }

    #[tokio::test]
    async fn test_cancel_sets_the_flag() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(&dir);
        let active = Arc::clone(&state.active);

        let Json(body) = handle_cancel(State(state)).await;
        assert_eq!(body["cancelled"], true);
        assert!(active.is_cancelled());
    }
}
