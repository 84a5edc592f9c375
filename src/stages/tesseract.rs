//! Tesseract recognition stage
//!
//! Uses tesseract-static for static linking (no system dependencies).
//! Downloads tessdata for every configured language on first use.

use crate::config::Config;
use crate::error::PipelineError;
use crate::stage::TextRecognizer;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tesseract_static::tesseract::Tesseract;

/// Tesseract OCR recognizer
pub struct TesseractRecognizer {
    /// Path to tessdata directory
    tessdata_path: String,
    /// Language codes joined with '+', e.g. "guj+eng"
    languages: String,
}

impl TesseractRecognizer {
    pub fn new(config: &Config) -> Result<Self, PipelineError> {
        let languages = config.languages.clone();
        let codes = language_codes(&languages);
        if codes.is_empty() {
            return Err(PipelineError::InitializationError(
                "No recognition languages configured".to_string(),
            ));
        }

        let cache_dir = tessdata_dir()?;
        for code in &codes {
            ensure_traineddata(&cache_dir, code)?;
        }

        let tessdata_path = cache_dir
            .to_str()
            .map(|s| s.to_string())
            .ok_or_else(|| PipelineError::InitializationError("Invalid tessdata path".to_string()))?;

        // Validate that tessdata is usable before accepting requests
        Tesseract::new(Some(&tessdata_path), Some(&languages)).map_err(|e| {
            PipelineError::InitializationError(format!("Failed to initialize Tesseract: {}", e))
        })?;

        tracing::info!(
            "Tesseract recognizer initialized (tessdata: {}, languages: {})",
            tessdata_path,
            languages
        );

        Ok(Self {
            tessdata_path,
            languages,
        })
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn description(&self) -> &'static str {
        "Tesseract OCR engine with Gujarati and English traineddata"
    }

    fn recognize(&self, path: &Path) -> Result<String, PipelineError> {
        let img = load_image(path)?;

        // BMP is always supported by leptonica
        let rgb_img = img.to_rgb8();
        let (width, height) = rgb_img.dimensions();
        let mut bmp_data = Vec::new();
        rgb_img
            .write_to(&mut std::io::Cursor::new(&mut bmp_data), image::ImageFormat::Bmp)
            .map_err(|e| {
                PipelineError::RecognitionFailure(format!("Failed to convert to BMP: {}", e))
            })?;

        tracing::debug!("Recognizing {}x{} image with {}", width, height, self.languages);

        let text = Tesseract::new(Some(&self.tessdata_path), Some(&self.languages))
            .map_err(|e| {
                PipelineError::RecognitionFailure(format!("Failed to create Tesseract: {}", e))
            })?
            .set_image_from_mem(&bmp_data)
            .map_err(|e| PipelineError::RecognitionFailure(format!("Failed to set image: {}", e)))?
            .recognize()
            .map_err(|e| {
                PipelineError::RecognitionFailure(format!("Failed to recognize text: {}", e))
            })?
            .get_text()
            .map_err(|e| PipelineError::RecognitionFailure(format!("Failed to get text: {}", e)))?;

        Ok(text.trim().to_string())
    }
}

/// Decode by content so uploads saved without an image extension still load
fn load_image(path: &Path) -> Result<image::DynamicImage, PipelineError> {
    image::ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| PipelineError::RecognitionFailure(format!("Failed to open image: {}", e)))?
        .decode()
        .map_err(|e| PipelineError::RecognitionFailure(format!("Failed to load image: {}", e)))
}

fn language_codes(languages: &str) -> Vec<&str> {
    languages
        .split('+')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .collect()
}

fn tessdata_dir() -> Result<PathBuf, PipelineError> {
    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("legal-ocr-pipeline")
        .join("tessdata");

    std::fs::create_dir_all(&cache_dir).map_err(|e| {
        PipelineError::InitializationError(format!("Failed to create tessdata directory: {}", e))
    })?;

    Ok(cache_dir)
}

fn ensure_traineddata(cache_dir: &Path, language: &str) -> Result<(), PipelineError> {
    let traineddata_path = cache_dir.join(format!("{}.traineddata", language));

    if traineddata_path.exists() {
        tracing::info!("Using cached tessdata for '{}'", language);
        return Ok(());
    }

    tracing::info!(
        "Downloading tessdata for '{}' (this may take a moment)...",
        language
    );
    download_file(&tessdata_url(language), &traineddata_path)?;
    tracing::info!("Downloaded tessdata to {:?}", traineddata_path);

    Ok(())
}

fn tessdata_url(language: &str) -> String {
    format!(
        "https://github.com/tesseract-ocr/tessdata_fast/raw/main/{}.traineddata",
        language
    )
}

fn download_file(url: &str, path: &Path) -> Result<(), PipelineError> {
    let response = ureq::get(url).call().map_err(|e| {
        PipelineError::InitializationError(format!("Failed to download tessdata: {}", e))
    })?;

    let buffer = response.into_body().read_to_vec().map_err(|e| {
        PipelineError::InitializationError(format!("Failed to read tessdata response: {}", e))
    })?;

    let mut file = File::create(path).map_err(|e| {
        PipelineError::InitializationError(format!("Failed to create tessdata file: {}", e))
    })?;

    file.write_all(&buffer).map_err(|e| {
        PipelineError::InitializationError(format!("Failed to write tessdata file: {}", e))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_codes_split() {
        assert_eq!(language_codes("guj+eng"), vec!["guj", "eng"]);
        assert_eq!(language_codes(" guj + "), vec!["guj"]);
        assert!(language_codes("").is_empty());
    }

    #[test]
    fn test_load_image_sniffs_format_without_extension() {
        let mut file = tempfile::Builder::new().suffix(".tmp").tempfile().unwrap();
        image::DynamicImage::ImageRgb8(image::RgbImage::new(4, 3))
            .write_to(&mut file, image::ImageFormat::Png)
            .unwrap();

        let img = load_image(file.path()).unwrap();
        assert_eq!((img.width(), img.height()), (4, 3));
    }

    #[test]
    fn test_tessdata_url() {
        assert!(tessdata_url("guj").ends_with("/guj.traineddata"));
    }
}
