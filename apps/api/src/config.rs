use anyhow::{Context, Result};
use std::path::PathBuf;

/// Which remote text-generation provider to use for a run.
/// Both providers share the same contract; only the envelope differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    OpenAi,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::OpenAi => "openai",
        }
    }

    fn parse(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "gemini" => Ok(ProviderKind::Gemini),
            "openai" => Ok(ProviderKind::OpenAi),
            other => anyhow::bail!("Unknown TEXT_PROVIDER '{other}' (expected gemini|openai)"),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderKind,
    /// Optional API key seed; the settings store takes precedence once a key
    /// has been saved through the credentials endpoint.
    pub provider_api_key: Option<String>,
    /// Where persisted user settings (window size, scope, credential) live.
    pub settings_path: PathBuf,
    /// Whether the post-truncation refinement LLM round runs.
    pub refine_enabled: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            provider: ProviderKind::parse(
                &std::env::var("TEXT_PROVIDER").unwrap_or_else(|_| "gemini".to_string()),
            )?,
            provider_api_key: std::env::var("PROVIDER_API_KEY")
                .ok()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            settings_path: std::env::var("SETTINGS_PATH")
                .unwrap_or_else(|_| "slidesmith-settings.json".to_string())
                .into(),
            refine_enabled: std::env::var("REFINE_ENABLED")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parses_both_providers() {
        assert_eq!(ProviderKind::parse("gemini").unwrap(), ProviderKind::Gemini);
        assert_eq!(ProviderKind::parse("OpenAI").unwrap(), ProviderKind::OpenAi);
    }

    #[test]
    fn test_provider_kind_rejects_unknown() {
        assert!(ProviderKind::parse("claude-everything").is_err());
    }
}
