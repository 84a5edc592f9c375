use std::path::PathBuf;

pub const DEFAULT_LANGUAGES: &str = "guj+eng";
pub const DEFAULT_RECOGNIZER: &str = "placeholder";
pub const DEFAULT_CONFIDENCE: f32 = 0.85;
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Options shared by every command that runs the pipeline
#[derive(clap::Args, Debug, Clone)]
pub struct PipelineArgs {
    /// Recognition language codes passed to the OCR engine (e.g., "guj+eng")
    #[arg(long, env = "OCR_LANGUAGES", default_value = DEFAULT_LANGUAGES)]
    pub languages: String,

    /// Run the AI refinement stage between recognition and vocabulary correction
    #[arg(
        long,
        env = "OCR_ENABLE_AI_REFINEMENT",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub enable_ai_refinement: bool,

    /// Gemini API key; without it the refinement stage passes text through
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Gemini model used for refinement
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    pub gemini_model: String,

    /// Base URL of the Gemini API
    #[arg(long, env = "GEMINI_ENDPOINT", default_value = DEFAULT_GEMINI_ENDPOINT)]
    pub gemini_endpoint: String,

    /// Default recognition stage
    #[arg(long, env = "OCR_RECOGNIZER", default_value = DEFAULT_RECOGNIZER)]
    pub recognizer: String,

    /// Confidence reported with every result, between 0.0 and 1.0
    #[arg(
        long,
        env = "OCR_CONFIDENCE",
        default_value_t = DEFAULT_CONFIDENCE,
        value_parser = parse_confidence
    )]
    pub confidence: f32,

    /// JSON file with extra {"wrong": "right"} corrections
    #[arg(long, env = "OCR_DICTIONARY")]
    pub dictionary: Option<PathBuf>,

    /// Fail at startup when two correction tables define the same key
    #[arg(long, env = "OCR_STRICT_DICTIONARY")]
    pub strict_dictionary: bool,
}

fn parse_confidence(value: &str) -> Result<f32, String> {
    let confidence: f32 = value
        .trim()
        .parse()
        .map_err(|e| format!("'{}' is not a number: {}", value, e))?;

    if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
        return Err(format!("{} is outside 0.0..=1.0", value));
    }

    Ok(confidence)
}

/// HTTP server options
#[derive(clap::Args, Debug, Clone)]
pub struct ServeArgs {
    /// Host address to bind to
    #[arg(long, env = "OCR_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "OCR_PORT", default_value = "9292")]
    pub port: u16,

    /// Maximum file size in bytes (default: 50MB)
    #[arg(long, env = "OCR_MAX_FILE_SIZE", default_value = "52428800")]
    pub max_file_size: usize,
}

/// Pipeline configuration, immutable once the pipeline is built
#[derive(Debug, Clone)]
pub struct Config {
    pub languages: String,
    pub enable_ai_refinement: bool,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_endpoint: String,
    pub recognizer: String,
    pub confidence: f32,
    pub dictionary_path: Option<PathBuf>,
    pub strict_dictionary: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            languages: DEFAULT_LANGUAGES.to_string(),
            enable_ai_refinement: true,
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
            recognizer: DEFAULT_RECOGNIZER.to_string(),
            confidence: DEFAULT_CONFIDENCE,
            dictionary_path: None,
            strict_dictionary: false,
        }
    }
}

impl From<PipelineArgs> for Config {
    fn from(args: PipelineArgs) -> Self {
        Self {
            languages: args.languages,
            enable_ai_refinement: args.enable_ai_refinement,
            gemini_api_key: args.gemini_api_key.filter(|key| !key.trim().is_empty()),
            gemini_model: args.gemini_model,
            gemini_endpoint: args.gemini_endpoint,
            recognizer: args.recognizer,
            confidence: args.confidence,
            dictionary_path: args.dictionary,
            strict_dictionary: args.strict_dictionary,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_file_size: usize,
}

impl From<ServeArgs> for ServerConfig {
    fn from(args: ServeArgs) -> Self {
        Self {
            host: args.host,
            port: args.port,
            max_file_size: args.max_file_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_confidence_accepts_unit_interval() {
        assert_eq!(parse_confidence("0.85"), Ok(0.85));
        assert_eq!(parse_confidence("0"), Ok(0.0));
        assert_eq!(parse_confidence("1"), Ok(1.0));
    }

    #[test]
    fn test_parse_confidence_rejects_out_of_range() {
        assert!(parse_confidence("1.5").is_err());
        assert!(parse_confidence("-0.1").is_err());
        assert!(parse_confidence("NaN").is_err());
        assert!(parse_confidence("inf").is_err());
        assert!(parse_confidence("high").is_err());
    }
}
