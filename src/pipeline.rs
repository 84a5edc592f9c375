//! Three-stage correction pipeline
//!
//! Recognition, optional AI refinement, then legal vocabulary correction,
//! followed by primary script detection.

use crate::config::Config;
use crate::error::PipelineError;
use crate::script::{classify_script, Language};
use crate::stage::{TextRecognizer, TextRefiner};
use crate::stages::{build_refiner, StageRegistry};
use crate::vocabulary::CorrectionDictionary;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Pipeline output for one scanned image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionResult {
    pub text: String,
    /// Configured constant, not derived from the input
    pub confidence: f32,
    pub language: Language,
    /// Distinct dictionary entries that matched
    pub corrections_applied: usize,
    pub recognizer: String,
    pub refined: bool,
}

pub struct Pipeline {
    registry: StageRegistry,
    refiner: Option<Arc<dyn TextRefiner>>,
    dictionary: CorrectionDictionary,
    confidence: f32,
}

impl Pipeline {
    /// Build every stage from configuration
    pub fn new(config: &Config) -> Result<Self, PipelineError> {
        let mut dictionary = CorrectionDictionary::legal(config.strict_dictionary)?;
        if let Some(path) = &config.dictionary_path {
            dictionary.merge_file(path)?;
        }

        let registry = StageRegistry::new(config)?;
        let refiner = build_refiner(config);

        tracing::info!(
            "Pipeline ready (recognizer: {}, refiner: {}, corrections: {}, languages: {})",
            registry.default_name(),
            refiner.as_ref().map(|r| r.name()).unwrap_or("disabled"),
            dictionary.len(),
            config.languages
        );

        Ok(Self::with_stages(
            registry,
            refiner,
            dictionary,
            config.confidence,
        ))
    }

    /// Assemble a pipeline from explicit stages
    pub fn with_stages(
        registry: StageRegistry,
        refiner: Option<Arc<dyn TextRefiner>>,
        dictionary: CorrectionDictionary,
        confidence: f32,
    ) -> Self {
        Self {
            registry,
            refiner,
            dictionary,
            confidence,
        }
    }

    /// Run the full pipeline with the default recognizer
    pub fn process(&self, image_path: &Path) -> Result<CorrectionResult, PipelineError> {
        self.run(self.registry.default_recognizer().as_ref(), image_path)
    }

    /// Run the full pipeline with a named recognizer
    pub fn process_with(
        &self,
        recognizer: &str,
        image_path: &Path,
    ) -> Result<CorrectionResult, PipelineError> {
        let recognizer = self
            .registry
            .get(recognizer)
            .ok_or_else(|| PipelineError::UnknownRecognizer(recognizer.to_string()))?;

        self.run(recognizer.as_ref(), image_path)
    }

    fn run(
        &self,
        recognizer: &dyn TextRecognizer,
        image_path: &Path,
    ) -> Result<CorrectionResult, PipelineError> {
        validate_input(image_path)?;

        tracing::debug!("Stage 1: {} recognition of {:?}", recognizer.name(), image_path);
        let raw_text = recognizer.recognize(image_path)?;

        let refined_text = match &self.refiner {
            Some(refiner) => {
                tracing::debug!("Stage 2: {} refinement", refiner.name());
                refiner.refine(&raw_text, image_path)?
            }
            None => raw_text,
        };

        tracing::debug!("Stage 3: legal vocabulary correction");
        let (text, corrections_applied) = self.dictionary.apply(&refined_text);
        let language = classify_script(&text);

        tracing::info!(
            "Processed {:?}: language {}, {} corrections, {} chars",
            image_path,
            language,
            corrections_applied,
            text.chars().count()
        );

        Ok(CorrectionResult {
            text,
            confidence: self.confidence,
            language,
            corrections_applied,
            recognizer: recognizer.name().to_string(),
            refined: self.refiner.is_some(),
        })
    }

    pub fn registry(&self) -> &StageRegistry {
        &self.registry
    }

    /// Name of the refinement stage, `None` when refinement is disabled
    pub fn refiner_name(&self) -> Option<&'static str> {
        self.refiner.as_ref().map(|r| r.name())
    }

    pub fn dictionary(&self) -> &CorrectionDictionary {
        &self.dictionary
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }
}

fn validate_input(image_path: &Path) -> Result<(), PipelineError> {
    if image_path.as_os_str().is_empty() {
        return Err(PipelineError::InvalidInput(
            "Image path is empty".to_string(),
        ));
    }

    if !image_path.is_file() {
        return Err(PipelineError::InvalidInput(format!(
            "Image not found or not a file: {}",
            image_path.display()
        )));
    }

    Ok(())
}
