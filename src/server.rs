use crate::config::ServerConfig;
use crate::error::PipelineError;
use crate::pipeline::{CorrectionResult, Pipeline};
use crate::stages::RecognizerInfo;
use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;

/// Room for multipart boundaries and part headers on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub config: Arc<ServerConfig>,
}

/// OCR response
#[derive(Serialize)]
pub struct OcrResponse {
    #[serde(flatten)]
    pub result: CorrectionResult,
    pub processing_time_ms: u64,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Server info response
#[derive(Serialize)]
pub struct InfoResponse {
    pub version: String,
    pub default_recognizer: String,
    pub available_recognizers: Vec<RecognizerInfo>,
    pub refinement_enabled: bool,
    pub refiner: Option<String>,
    pub dictionary_entries: usize,
    pub confidence: f32,
    pub max_file_size_bytes: usize,
}

pub fn router(pipeline: Arc<Pipeline>, config: ServerConfig) -> Router {
    let max_file_size = config.max_file_size;

    let state = AppState {
        pipeline,
        config: Arc::new(config),
    };

    Router::new()
        .route("/ocr", post(handle_ocr))
        .route("/ocr/:recognizer", post(handle_ocr_with_recognizer))
        .route("/health", get(handle_health))
        .route("/info", get(handle_info))
        .layer(DefaultBodyLimit::max(
            max_file_size.saturating_add(MULTIPART_OVERHEAD),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server
pub async fn run(pipeline: Pipeline, config: ServerConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let app = router(Arc::new(pipeline), config);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Handle OCR requests with the default recognizer
async fn handle_ocr(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<OcrResponse>, PipelineError> {
    process_upload(state, None, multipart).await
}

/// Handle OCR requests with a named recognizer
async fn handle_ocr_with_recognizer(
    State(state): State<AppState>,
    Path(recognizer): Path<String>,
    multipart: Multipart,
) -> Result<Json<OcrResponse>, PipelineError> {
    if state.pipeline.registry().get(&recognizer).is_none() {
        return Err(PipelineError::UnknownRecognizer(recognizer));
    }

    process_upload(state, Some(recognizer), multipart).await
}

async fn process_upload(
    state: AppState,
    recognizer: Option<String>,
    mut multipart: Multipart,
) -> Result<Json<OcrResponse>, PipelineError> {
    let start = Instant::now();

    let mut file_data: Option<Bytes> = None;
    let mut content_type: Option<String> = None;

    let max_file_size = state.config.max_file_size;

    // Parse multipart form
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "Failed to parse multipart", max_file_size))?
    {
        if field.name() == Some("file") {
            content_type = field.content_type().map(|s| s.to_string());
            file_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e, "Failed to read file data", max_file_size))?,
            );
        }
    }

    let data = file_data.ok_or(PipelineError::MissingFile)?;

    if data.len() > state.config.max_file_size {
        return Err(PipelineError::ImageTooLarge {
            size: data.len(),
            max: state.config.max_file_size,
        });
    }

    let mime = content_type.unwrap_or_else(|| "application/octet-stream".to_string());
    if !mime.starts_with("image/") {
        tracing::warn!("Received file with content type: {}", mime);
    }

    // Keep the extension so stages can detect the format from the path
    let extension = match mime.as_str() {
        "image/png" => ".png",
        "image/jpeg" => ".jpg",
        "image/gif" => ".gif",
        "image/bmp" => ".bmp",
        "image/webp" => ".webp",
        "image/tiff" => ".tiff",
        _ => ".tmp",
    };

    let mut temp_file = tempfile::Builder::new()
        .suffix(extension)
        .tempfile()
        .map_err(|e| PipelineError::Internal(format!("Failed to create temp file: {}", e)))?;

    temp_file
        .write_all(&data)
        .map_err(|e| PipelineError::Internal(format!("Failed to write temp file: {}", e)))?;

    let pipeline = Arc::clone(&state.pipeline);
    let result = tokio::task::spawn_blocking(move || match recognizer.as_deref() {
        Some(name) => pipeline.process_with(name, temp_file.path()),
        None => pipeline.process(temp_file.path()),
    })
    .await
    .map_err(|e| PipelineError::Internal(format!("Pipeline task failed: {}", e)))??;

    let processing_time_ms = start.elapsed().as_millis() as u64;

    tracing::info!(
        "OCR completed in {}ms, language: {}, corrections: {}, text length: {}",
        processing_time_ms,
        result.language,
        result.corrections_applied,
        result.text.len()
    );

    Ok(Json(OcrResponse {
        result,
        processing_time_ms,
    }))
}

/// Body limit rejections become 413, everything else is a malformed request
fn multipart_error(err: MultipartError, context: &str, max_file_size: usize) -> PipelineError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        PipelineError::UploadTooLarge { max: max_file_size }
    } else {
        PipelineError::InvalidRequest(format!("{}: {}", context, err))
    }
}

/// Handle health check requests
async fn handle_health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handle info requests
async fn handle_info(State(state): State<AppState>) -> impl IntoResponse {
    let pipeline = &state.pipeline;

    Json(InfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        default_recognizer: pipeline.registry().default_name().to_string(),
        available_recognizers: pipeline.registry().info(),
        refinement_enabled: pipeline.refiner_name().is_some(),
        refiner: pipeline.refiner_name().map(|name| name.to_string()),
        dictionary_entries: pipeline.dictionary().len(),
        confidence: pipeline.confidence(),
        max_file_size_bytes: state.config.max_file_size,
    })
}
