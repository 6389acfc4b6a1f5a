//! Itinerary generation against an ordered list of text models.
//!
//! Each configured model is tried once, in order, and the first one that
//! answers with non-blank text wins. There is no retry of the same model and
//! no parallel racing.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("request to {model} failed: {message}")]
    Request { model: String, message: String },
    #[error("{model} returned HTTP {status}: {body}")]
    Upstream {
        model: String,
        status: u16,
        body: String,
    },
    #[error("could not parse response from {model}: {message}")]
    Parse { model: String, message: String },
    #[error("{model} returned no text")]
    EmptyResponse { model: String },
    #[error("all generation backends failed")]
    Exhausted { last_error: Option<String> },
}

// ── Service seam ─────────────────────────────────────────────────────────────

/// A text-generation backend addressed by model identifier.
///
/// `async_trait` keeps this object-safe so the router state can hold an
/// `Arc<dyn TextGenerationService>`.
#[async_trait]
pub trait TextGenerationService: Send + Sync {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, GenerationError>;
}

// ── Fallback driver ──────────────────────────────────────────────────────────

pub struct ItineraryGenerator {
    service: Arc<dyn TextGenerationService>,
    models: Vec<String>,
}

impl ItineraryGenerator {
    pub fn new(service: Arc<dyn TextGenerationService>, models: Vec<String>) -> Self {
        Self { service, models }
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Return the text of the first model that succeeds. When all fail, the
    /// error carries the message of the last failure.
    pub async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let mut last_error = None;

        for model in &self.models {
            tracing::info!(model = %model, "attempting generation");
            match self.service.generate(model, prompt).await {
                Ok(text) if !text.trim().is_empty() => {
                    tracing::info!(model = %model, "generation succeeded");
                    return Ok(text);
                }
                Ok(_) => {
                    let err = GenerationError::EmptyResponse {
                        model: model.clone(),
                    };
                    tracing::warn!(model = %model, "{}", err);
                    last_error = Some(err.to_string());
                }
                Err(err) => {
                    tracing::warn!(model = %model, "generation failed: {}", err);
                    last_error = Some(err.to_string());
                }
            }
        }

        tracing::error!("all {} generation backends failed", self.models.len());
        Err(GenerationError::Exhausted { last_error })
    }
}

// ── Gemini client ────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Client for the Gemini `generateContent` REST endpoint.
pub struct GeminiClient {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(client: reqwest::Client, api_base: &str, api_key: &str) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.api_base, model)
    }
}

#[async_trait]
impl TextGenerationService for GeminiClient {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, GenerationError> {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Request {
                model: model.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Upstream {
                model: model.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse =
            response.json().await.map_err(|e| GenerationError::Parse {
                model: model.to_string(),
                message: e.to_string(),
            })?;

        response_text(parsed).ok_or_else(|| GenerationError::EmptyResponse {
            model: model.to_string(),
        })
    }
}

/// Concatenate the text parts of the first candidate.
fn response_text(response: GenerateContentResponse) -> Option<String> {
    let content = response.candidates.into_iter().next()?.content?;
    let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
