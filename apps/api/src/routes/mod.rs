pub mod decks;
pub mod health;
pub mod settings;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Deck generation
        .route("/api/v1/decks", post(decks::handle_generate))
        .route("/api/v1/decks/cancel", post(decks::handle_cancel))
        // Persisted UI settings
        .route("/api/v1/settings", get(settings::handle_get_settings))
        .route(
            "/api/v1/settings/size",
            put(settings::handle_save_size).delete(settings::handle_reset_size),
        )
        // Provider credential lifecycle
        .route(
            "/api/v1/settings/key",
            put(settings::handle_save_key).delete(settings::handle_clear_key),
        )
        .route("/api/v1/settings/key/status", get(settings::handle_key_status))
        .with_state(state)
}
