//! Persisted UI settings and provider credential endpoints.
//!
//! The credential itself never appears in any response; only its presence
//! does.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::catalog::Scope;
use crate::state::AppState;

/// Settings as exposed over the API. The stored API key is reduced to a
/// presence flag.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsView {
    pub ui_width: f32,
    pub ui_height: f32,
    pub resized: bool,
    pub scope: Option<Scope>,
    pub has_key: bool,
}

fn view(state: &AppState) -> SettingsView {
    let snapshot = state.settings.snapshot();
    SettingsView {
        ui_width: snapshot.ui_width,
        ui_height: snapshot.ui_height,
        resized: snapshot.resized,
        scope: snapshot.scope,
        has_key: snapshot.api_key.is_some(),
    }
}

/// GET /api/v1/settings
pub async fn handle_get_settings(State(state): State<AppState>) -> Json<SettingsView> {
    Json(view(&state))
}

#[derive(Debug, Deserialize)]
pub struct SaveSizeRequest {
    pub width: f32,
    pub height: f32,
}

/// PUT /api/v1/settings/size
pub async fn handle_save_size(
    State(state): State<AppState>,
    Json(req): Json<SaveSizeRequest>,
) -> Json<SettingsView> {
    state.settings.save_size(req.width, req.height);
    Json(view(&state))
}

/// DELETE /api/v1/settings/size
pub async fn handle_reset_size(State(state): State<AppState>) -> Json<SettingsView> {
    state.settings.reset_size();
    Json(view(&state))
}

#[derive(Debug, Deserialize)]
pub struct SaveKeyRequest {
    pub key: String,
}

/// PUT /api/v1/settings/key
pub async fn handle_save_key(
    State(state): State<AppState>,
    Json(req): Json<SaveKeyRequest>,
) -> Json<Value> {
    state.settings.save_key(&req.key);
    Json(json!({ "hasKey": state.settings.has_key() }))
}

/// DELETE /api/v1/settings/key
pub async fn handle_clear_key(State(state): State<AppState>) -> Json<Value> {
    state.settings.clear_key();
    Json(json!({ "hasKey": false }))
}

/// GET /api/v1/settings/key/status
pub async fn handle_key_status(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "hasKey": state.settings.has_key(),
        "provider": state.config.provider.as_str(),
    }))
}
