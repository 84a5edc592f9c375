//! Stand-in stages used when no OCR engine or refinement model is configured

use crate::config::Config;
use crate::error::PipelineError;
use crate::stage::{TextRecognizer, TextRefiner};
use std::path::Path;

/// Text returned by the placeholder recognizer for every image
pub const PLACEHOLDER_TEXT: &str = "[Tesseract OCR output would appear here]";

/// Recognizer that does not read the image and returns fixed text
pub struct PlaceholderRecognizer {
    languages: String,
}

impl PlaceholderRecognizer {
    pub fn new(config: &Config) -> Self {
        Self {
            languages: config.languages.clone(),
        }
    }
}

impl TextRecognizer for PlaceholderRecognizer {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    fn description(&self) -> &'static str {
        "Placeholder recognizer - returns fixed text without running OCR"
    }

    fn recognize(&self, path: &Path) -> Result<String, PipelineError> {
        tracing::debug!(
            "Placeholder recognition of {:?} (languages: {})",
            path,
            self.languages
        );
        Ok(PLACEHOLDER_TEXT.to_string())
    }
}

/// Refiner that returns its input unchanged
pub struct PassthroughRefiner;

impl TextRefiner for PassthroughRefiner {
    fn name(&self) -> &'static str {
        "passthrough"
    }

    fn refine(&self, text: &str, _image_path: &Path) -> Result<String, PipelineError> {
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_ignores_image() {
        let recognizer = PlaceholderRecognizer::new(&Config::default());
        let text = recognizer
            .recognize(Path::new("/does/not/exist.jpg"))
            .unwrap();
        assert_eq!(text, PLACEHOLDER_TEXT);
    }

    #[test]
    fn test_passthrough_returns_input() {
        let refined = PassthroughRefiner
            .refine("Registation No. 5", Path::new("scan.png"))
            .unwrap();
        assert_eq!(refined, "Registation No. 5");
    }
}
