//! Recognition and refinement stage implementations
//!
//! Recognizers are conditionally compiled based on feature flags. The
//! placeholder recognizer is always available so the pipeline can run without
//! any OCR engine installed.

pub mod gemini;
pub mod placeholder;

#[cfg(feature = "engine-tesseract")]
pub mod tesseract;

use crate::config::Config;
use crate::error::PipelineError;
use crate::stage::{TextRecognizer, TextRefiner};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

pub use gemini::GeminiRefiner;
pub use placeholder::{PassthroughRefiner, PlaceholderRecognizer};

/// Information about an available recognizer
#[derive(Debug, Clone, Serialize)]
pub struct RecognizerInfo {
    pub name: &'static str,
    pub description: &'static str,
}

/// Registry of available recognition stages
pub struct StageRegistry {
    recognizers: Vec<Arc<dyn TextRecognizer>>,
    default_recognizer: String,
}

impl StageRegistry {
    /// Create a registry with every compiled-in recognizer initialized
    pub fn new(config: &Config) -> Result<Self, PipelineError> {
        #[allow(unused_mut)]
        let mut recognizers: Vec<Arc<dyn TextRecognizer>> =
            vec![Arc::new(PlaceholderRecognizer::new(config))];

        #[cfg(feature = "engine-tesseract")]
        {
            tracing::info!("Initializing tesseract recognizer...");
            recognizers.push(Arc::new(tesseract::TesseractRecognizer::new(config)?));
        }

        Self::with_recognizers(recognizers, &config.recognizer)
    }

    /// Create a registry from explicit recognizers; `default` must name one of them
    pub fn with_recognizers(
        recognizers: Vec<Arc<dyn TextRecognizer>>,
        default: &str,
    ) -> Result<Self, PipelineError> {
        if recognizers.is_empty() {
            return Err(PipelineError::InitializationError(
                "No recognizers available".to_string(),
            ));
        }

        if !recognizers.iter().any(|r| r.name() == default) {
            return Err(PipelineError::UnknownRecognizer(default.to_string()));
        }

        Ok(Self {
            recognizers,
            default_recognizer: default.to_string(),
        })
    }

    /// Get a recognizer by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn TextRecognizer>> {
        self.recognizers.iter().find(|r| r.name() == name).cloned()
    }

    /// Get the default recognizer
    pub fn default_recognizer(&self) -> Arc<dyn TextRecognizer> {
        // Presence is checked on construction
        self.get(&self.default_recognizer)
            .unwrap_or_else(|| Arc::clone(&self.recognizers[0]))
    }

    pub fn default_name(&self) -> &str {
        &self.default_recognizer
    }

    /// List all available recognizer names
    pub fn list(&self) -> Vec<&str> {
        self.recognizers.iter().map(|r| r.name()).collect()
    }

    pub fn info(&self) -> Vec<RecognizerInfo> {
        self.recognizers
            .iter()
            .map(|r| RecognizerInfo {
                name: r.name(),
                description: r.description(),
            })
            .collect()
    }
}

/// Pick the refinement stage for a configuration.
///
/// `None` means refinement is disabled and the stage is skipped entirely.
pub fn build_refiner(config: &Config) -> Option<Arc<dyn TextRefiner>> {
    if !config.enable_ai_refinement {
        tracing::info!("AI refinement disabled");
        return None;
    }

    match GeminiRefiner::from_config(config) {
        Some(refiner) => {
            tracing::info!("AI refinement via Gemini model {}", config.gemini_model);
            Some(Arc::new(refiner))
        }
        None => {
            tracing::warn!(
                "AI refinement enabled but no Gemini API key configured, passing text through"
            );
            Some(Arc::new(PassthroughRefiner))
        }
    }
}

/// Detect an image's MIME type from its content, falling back to its extension
pub fn image_mime_type(path: &Path, bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .or_else(|_| image::ImageFormat::from_path(path))
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream")
}
