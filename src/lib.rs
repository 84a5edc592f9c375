//! Scanned legal document OCR pipeline for Gujarati + English text
//!
//! Recognition and AI refinement are pluggable stages; the crate itself owns
//! the legal vocabulary correction pass and the primary script detection.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod script;
pub mod server;
pub mod stage;
pub mod stages;
pub mod vocabulary;

pub use config::Config;
pub use error::PipelineError;
pub use pipeline::{CorrectionResult, Pipeline};
pub use script::{classify_script, Language};
pub use vocabulary::{apply_corrections, CorrectionDictionary};
