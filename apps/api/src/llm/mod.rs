//! Provider client — the single point of entry for all text-model calls.
//!
//! No other module may talk to a provider's HTTP API directly. The pipeline
//! depends on the [`TextProvider`] trait only, so tests swap in a mock and the
//! generation code never learns which vendor is behind it.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use crate::config::ProviderKind;

pub mod gemini;
pub mod openai;

const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("no API key configured")]
    MissingKey,

    #[error("provider returned empty content")]
    EmptyContent,

    #[error("rate limited after {retries} retries")]
    RateLimited { retries: u32 },
}

/// A text-generation backend. `submit` sends one prompt and returns the raw
/// text of the first candidate; envelope unwrapping is the implementation's
/// concern.
#[async_trait]
pub trait TextProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn submit(&self, prompt: &str, temperature: f32) -> Result<String, ProviderError>;
}

/// Builds the configured provider. Fails fast when no key is available so a
/// run never reaches the network half-configured.
pub fn make_provider(
    kind: ProviderKind,
    http: Client,
    api_key: Option<String>,
) -> Result<Arc<dyn TextProvider>, ProviderError> {
    let key = api_key
        .filter(|k| !k.trim().is_empty())
        .ok_or(ProviderError::MissingKey)?;
    Ok(match kind {
        ProviderKind::Gemini => Arc::new(gemini::GeminiProvider::new(http, key)),
        ProviderKind::OpenAi => Arc::new(openai::OpenAiProvider::new(http, key)),
    })
}

/// Shared retry loop: retries on transport errors, 429, and 5xx with
/// exponential backoff (1s, 2s, 4s). `attempt_fn` performs one HTTP exchange.
pub(crate) async fn with_retries<F, Fut>(mut attempt_fn: F) -> Result<String, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<String, ProviderError>>,
{
    let mut last_error: Option<ProviderError> = None;

    for attempt in 0..MAX_RETRIES {
        if attempt > 0 {
            let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
            tracing::warn!(
                "provider call attempt {} failed, retrying after {}ms",
                attempt,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }

        match attempt_fn().await {
            Ok(text) => return Ok(text),
            Err(e @ ProviderError::Http(_)) => last_error = Some(e),
            Err(ProviderError::Api { status, message }) if status == 429 || status >= 500 => {
                tracing::warn!("provider API returned {}: {}", status, message);
                last_error = Some(ProviderError::Api { status, message });
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_error.unwrap_or(ProviderError::RateLimited {
        retries: MAX_RETRIES,
    }))
}
