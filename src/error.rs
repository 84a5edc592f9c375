use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Text recognition failed: {0}")]
    RecognitionFailure(String),

    #[error("Text refinement failed: {0}")]
    RefinementFailure(String),

    #[error("Correction dictionary defines '{key}' more than once")]
    DictionaryConflict { key: String },

    #[error("Failed to initialize pipeline: {0}")]
    InitializationError(String),

    #[error("Unknown recognizer: {0}")]
    UnknownRecognizer(String),

    #[error("Image too large: {size} bytes (max: {max} bytes)")]
    ImageTooLarge { size: usize, max: usize },

    #[error("Upload exceeds the {max} byte file limit")]
    UploadTooLarge { max: usize },

    #[error("Missing file in request")]
    MissingFile,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl PipelineError {
    /// HTTP status and stable machine-readable code for this error
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            PipelineError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            PipelineError::RecognitionFailure(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "RECOGNITION_FAILURE")
            }
            PipelineError::RefinementFailure(_) => (StatusCode::BAD_GATEWAY, "REFINEMENT_FAILURE"),
            PipelineError::DictionaryConflict { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "DICTIONARY_CONFLICT")
            }
            PipelineError::InitializationError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INIT_ERROR")
            }
            PipelineError::UnknownRecognizer(_) => (StatusCode::BAD_REQUEST, "UNKNOWN_RECOGNIZER"),
            PipelineError::ImageTooLarge { .. } => {
                (StatusCode::PAYLOAD_TOO_LARGE, "IMAGE_TOO_LARGE")
            }
            PipelineError::UploadTooLarge { .. } => {
                (StatusCode::PAYLOAD_TOO_LARGE, "IMAGE_TOO_LARGE")
            }
            PipelineError::MissingFile => (StatusCode::BAD_REQUEST, "MISSING_FILE"),
            PipelineError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            PipelineError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}
