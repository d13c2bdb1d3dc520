//! Persisted user settings — last window size, last-used scope, and the
//! provider API credential. Read at startup, written on explicit save/clear.
//! Absence of a credential is a status flag, not an error.

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::Scope;

pub const DEFAULT_UI_WIDTH: f32 = 360.0;
pub const DEFAULT_UI_HEIGHT: f32 = 520.0;
pub const MIN_UI_WIDTH: f32 = 280.0;
pub const MIN_UI_HEIGHT: f32 = 200.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub ui_width: f32,
    pub ui_height: f32,
    pub resized: bool,
    pub scope: Option<Scope>,
    pub api_key: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            ui_width: DEFAULT_UI_WIDTH,
            ui_height: DEFAULT_UI_HEIGHT,
            resized: false,
            scope: None,
            api_key: None,
            updated_at: None,
        }
    }
}

/// File-backed settings store shared across requests.
///
/// Persistence is best-effort: a failed write is logged and the in-memory
/// state stays authoritative for the rest of the session.
pub struct SettingsStore {
    path: PathBuf,
    inner: Mutex<Settings>,
}

impl SettingsStore {
    /// Loads settings from `path`, falling back to defaults when the file is
    /// missing or unreadable. `env_key` seeds the credential when the file
    /// carries none.
    pub fn load(path: PathBuf, env_key: Option<String>) -> Self {
        let mut settings = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Settings file {} is malformed: {e}", path.display());
                Settings::default()
            }),
            Err(_) => Settings::default(),
        };
        if settings.api_key.is_none() {
            settings.api_key = env_key.filter(|k| !k.is_empty());
        }
        SettingsStore {
            path,
            inner: Mutex::new(settings),
        }
    }

    pub fn snapshot(&self) -> Settings {
        self.inner.lock().expect("settings lock poisoned").clone()
    }

    pub fn api_key(&self) -> Option<String> {
        self.inner
            .lock()
            .expect("settings lock poisoned")
            .api_key
            .clone()
    }

    pub fn has_key(&self) -> bool {
        self.api_key().is_some()
    }

    pub fn save_key(&self, key: &str) {
        let trimmed = key.trim();
        self.update(|s| {
            s.api_key = if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            };
        });
    }

    pub fn clear_key(&self) {
        self.update(|s| s.api_key = None);
    }

    pub fn set_scope(&self, scope: Scope) {
        self.update(|s| s.scope = Some(scope));
    }

    /// Saves an explicit window size, clamped to the documented minimums.
    pub fn save_size(&self, width: f32, height: f32) {
        self.update(|s| {
            s.ui_width = width.max(MIN_UI_WIDTH);
            s.ui_height = height.max(MIN_UI_HEIGHT);
            s.resized = true;
        });
    }

    pub fn reset_size(&self) {
        self.update(|s| {
            s.ui_width = DEFAULT_UI_WIDTH;
            s.ui_height = DEFAULT_UI_HEIGHT;
            s.resized = false;
        });
    }

    fn update(&self, f: impl FnOnce(&mut Settings)) {
        let mut guard = self.inner.lock().expect("settings lock poisoned");
        f(&mut guard);
        guard.updated_at = Some(Utc::now());
        let serialized = serde_json::to_string_pretty(&*guard);
        drop(guard);
        match serialized {
            Ok(body) => {
                if let Err(e) = std::fs::write(&self.path, body) {
                    warn!("Failed to persist settings to {}: {e}", self.path.display());
                }
            }
            Err(e) => warn!("Failed to serialize settings: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, SettingsStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::load(dir.path().join("settings.json"), None);
        (dir, store)
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let (_dir, store) = store();
        let s = store.snapshot();
        assert_eq!(s.ui_width, DEFAULT_UI_WIDTH);
        assert_eq!(s.ui_height, DEFAULT_UI_HEIGHT);
        assert!(!store.has_key());
    }

    #[test]
    fn test_env_key_seeds_credential() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::load(
            dir.path().join("settings.json"),
            Some("seed-key".to_string()),
        );
        assert!(store.has_key());
        assert_eq!(store.api_key().as_deref(), Some("seed-key"));
    }

    #[test]
    fn test_save_and_clear_key() {
        let (_dir, store) = store();
        store.save_key("  abc123  ");
        assert_eq!(store.api_key().as_deref(), Some("abc123"));
        store.clear_key();
        assert!(!store.has_key());
    }

    #[test]
    fn test_saving_empty_key_clears_it() {
        let (_dir, store) = store();
        store.save_key("abc");
        store.save_key("   ");
        assert!(!store.has_key());
    }

    #[test]
    fn test_size_clamped_to_minimums() {
        let (_dir, store) = store();
        store.save_size(100.0, 50.0);
        let s = store.snapshot();
        assert_eq!(s.ui_width, MIN_UI_WIDTH);
        assert_eq!(s.ui_height, MIN_UI_HEIGHT);
        assert!(s.resized);

        store.reset_size();
        let s = store.snapshot();
        assert_eq!(s.ui_width, DEFAULT_UI_WIDTH);
        assert!(!s.resized);
    }

    #[test]
    fn test_settings_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        {
            let store = SettingsStore::load(path.clone(), None);
            store.save_key("persisted");
            store.set_scope(Scope::ThisPage);
        }
        let reloaded = SettingsStore::load(path, None);
        assert_eq!(reloaded.api_key().as_deref(), Some("persisted"));
        assert_eq!(reloaded.snapshot().scope, Some(Scope::ThisPage));
    }
}
