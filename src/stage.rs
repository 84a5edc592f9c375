use crate::error::PipelineError;
use std::path::Path;

/// Stage 1: turns a scanned image into raw text
pub trait TextRecognizer: Send + Sync {
    /// Returns the recognizer identifier (e.g., "placeholder", "tesseract")
    fn name(&self) -> &'static str;

    /// Returns a human-readable description of the recognizer
    fn description(&self) -> &'static str;

    /// Extract text from the image at `path`
    fn recognize(&self, path: &Path) -> Result<String, PipelineError>;
}

/// Stage 2: corrects recognition errors with the source image as context
pub trait TextRefiner: Send + Sync {
    fn name(&self) -> &'static str;

    fn refine(&self, text: &str, image_path: &Path) -> Result<String, PipelineError>;
}
