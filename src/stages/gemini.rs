//! Gemini Vision refinement stage
//!
//! Sends the recognized text together with the scanned image to a Gemini
//! model and asks it to correct recognition errors. Uses blocking ureq so the
//! stage fits the synchronous pipeline.

use crate::config::Config;
use crate::error::PipelineError;
use crate::stage::TextRefiner;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Refiner backed by the Gemini `generateContent` API
pub struct GeminiRefiner {
    api_key: String,
    model: String,
    endpoint: String,
    agent: ureq::Agent,
}

impl GeminiRefiner {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build()
            .into();

        Self {
            api_key: api_key.into(),
            model: model.into(),
            endpoint: endpoint.into(),
            agent,
        }
    }

    /// Build from configuration; `None` when no API key is set
    pub fn from_config(config: &Config) -> Option<Self> {
        config.gemini_api_key.as_ref().map(|key| {
            Self::new(
                key.clone(),
                config.gemini_model.clone(),
                config.gemini_endpoint.clone(),
            )
        })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

impl TextRefiner for GeminiRefiner {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn refine(&self, text: &str, image_path: &Path) -> Result<String, PipelineError> {
        let image = std::fs::read(image_path).map_err(|e| {
            PipelineError::RefinementFailure(format!("Failed to read image: {}", e))
        })?;
        let mime_type = super::image_mime_type(image_path, &image);
        let body = request_body(text, &image, mime_type);

        tracing::debug!(
            "Requesting Gemini refinement ({}, {} chars, {} image bytes)",
            self.model,
            text.len(),
            image.len()
        );

        let mut response = self
            .agent
            .post(self.generate_url())
            .header("x-goog-api-key", self.api_key.as_str())
            .send_json(&body)
            .map_err(|e| {
                PipelineError::RefinementFailure(format!("Gemini request failed: {}", e))
            })?;

        let parsed: GenerateContentResponse = response.body_mut().read_json().map_err(|e| {
            PipelineError::RefinementFailure(format!("Invalid Gemini response: {}", e))
        })?;

        response_text(parsed)
    }
}

fn correction_prompt(text: &str) -> String {
    format!("Correct OCR errors in this Gujarati-English text: {}", text)
}

fn request_body(text: &str, image: &[u8], mime_type: &str) -> Value {
    json!({
        "contents": [{
            "parts": [
                { "text": correction_prompt(text) },
                { "inline_data": { "mime_type": mime_type, "data": STANDARD.encode(image) } }
            ]
        }]
    })
}

/// Concatenated text parts of the first candidate
fn response_text(response: GenerateContentResponse) -> Result<String, PipelineError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(PipelineError::RefinementFailure(
            "Gemini returned no text".to_string(),
        ));
    }

    Ok(text.trim().to_string())
}
