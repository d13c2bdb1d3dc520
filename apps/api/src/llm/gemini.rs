//! Gemini backend. Key travels as a query parameter; the reply text lives at
//! `candidates[0].content.parts[0].text`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{with_retries, ProviderError, TextProvider};

const MODEL: &str = "gemini-2.5-flash-lite";

pub struct GeminiProvider {
    http: Client,
    api_key: String,
}

impl GeminiProvider {
    pub fn new(http: Client, api_key: String) -> Self {
        Self { http, api_key }
    }

    fn endpoint(&self) -> String {
        format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{MODEL}:generateContent?key={}",
            self.api_key
        )
    }
}

#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<OwnedPart>,
}

#[derive(Deserialize)]
struct OwnedPart {
    #[serde(default)]
    text: String,
}

fn extract_text(body: GeminiResponse) -> Result<String, ProviderError> {
    body.candidates
        .into_iter()
        .next()
        .and_then(|c| c.content.parts.into_iter().next())
        .map(|p| p.text)
        .filter(|t| !t.trim().is_empty())
        .ok_or(ProviderError::EmptyContent)
}

#[async_trait]
impl TextProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn submit(&self, prompt: &str, temperature: f32) -> Result<String, ProviderError> {
        let url = self.endpoint();
        with_retries(|| {
            let url = url.clone();
            async move {
                let request = GeminiRequest {
                    contents: vec![Content {
                        parts: vec![Part { text: prompt }],
                    }],
                    generation_config: GenerationConfig { temperature },
                };

                let response = self.http.post(&url).json(&request).send().await?;
                let status = response.status();
                if !status.is_success() {
                    let message = response.text().await.unwrap_or_default();
                    return Err(ProviderError::Api {
                        status: status.as_u16(),
                        message,
                    });
                }

                let body: GeminiResponse = response
                    .json()
                    .await
                    .map_err(ProviderError::Http)?;
                extract_text(body)
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_first_candidate_first_part() {
        let body: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"hello"},{"text":"ignored"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(body).unwrap(), "hello");
    }

    #[test]
    fn test_empty_candidates_is_empty_content() {
        let body: GeminiResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(matches!(extract_text(body), Err(ProviderError::EmptyContent)));
    }

    #[test]
    fn test_blank_text_is_empty_content() {
        let body: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"  "}]}}]}"#,
        )
        .unwrap();
        assert!(matches!(extract_text(body), Err(ProviderError::EmptyContent)));
    }

    #[test]
    fn test_request_shape_includes_temperature() {
        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part { text: "p" }],
            }],
            generation_config: GenerationConfig { temperature: 0.35 },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "p");
        let temp = json["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temp - 0.35).abs() < 1e-6);
    }
}
