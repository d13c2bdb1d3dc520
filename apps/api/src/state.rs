use std::sync::Arc;

use reqwest::Client;

use crate::config::Config;
use crate::document::fonts::FontCache;
use crate::pipeline::ActiveRun;
use crate::settings::SettingsStore;

/// Shared application state injected into all route handlers via Axum
/// extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// One HTTP client for all provider calls.
    pub http: Client,
    pub settings: Arc<SettingsStore>,
    /// Process-wide font memoization, cleared only on restart.
    pub fonts: Arc<FontCache>,
    /// Run serialization and the cancellation flag.
    pub active: Arc<ActiveRun>,
}
