use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;

use crate::cli::ServeArgs;
use crate::core::sequence::{InvalidSequenceError, NucleotideSequence};
use crate::matching::engine::{ComparisonAggregator, ComparisonResult};
use crate::matching::report::ReportRecord;
use crate::pipeline::extraction::{
    Extraction, ExtractionError, ExtractionPayload, ExtractionPipeline, PipelineConfig,
};
use crate::utils::validation::{validate_upload, ValidationError};
use crate::web::session::{RequestIdSource, RequestIds, SessionContext};

/// Security configuration constants to prevent `DoS` attacks
pub const MAX_MULTIPART_FIELDS: usize = 10;
pub const MAX_FILE_FIELD_SIZE: usize = 16 * 1024 * 1024; // 16MB
pub const MAX_TEXT_FIELD_SIZE: usize = 1024 * 1024; // 1MB
pub const MAX_BODY_SIZE: usize = 20 * 1024 * 1024; // 20MB

/// Shared application state
#[derive(Debug, Default)]
pub struct AppState {
    pub pipeline: ExtractionPipeline,
    pub aggregator: ComparisonAggregator,
    pub request_ids: RequestIds,
}

impl RequestIdSource for AppState {
    fn request_ids(&self) -> &RequestIds {
        &self.request_ids
    }
}

impl AppState {
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            pipeline: ExtractionPipeline::new(config),
            aggregator: ComparisonAggregator::new(),
            request_ids: RequestIds::default(),
        }
    }
}

/// Enhanced error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
    pub details: Option<String>,
}

/// Create a safe error response that prevents information disclosure
/// while logging detailed errors server-side for debugging
pub fn create_safe_error_response(
    error_type: &str,
    user_message: &str,
    internal_error: Option<&str>,
) -> ErrorResponse {
    if let Some(internal_msg) = internal_error {
        tracing::error!("Internal error ({}): {}", error_type, internal_msg);
    }

    ErrorResponse {
        error: user_message.to_string(),
        error_type: error_type.to_string(),
        details: None,
    }
}

fn reject(
    status: StatusCode,
    error_type: &str,
    user_message: &str,
    internal_error: Option<&str>,
) -> Response {
    (
        status,
        Json(create_safe_error_response(error_type, user_message, internal_error)),
    )
        .into_response()
}

#[derive(Serialize)]
struct ServiceInfo {
    name: &'static str,
    version: &'static str,
    endpoints: [&'static str; 5],
}

#[derive(Serialize)]
struct PairExtractionResponse {
    image1: ExtractionPayload,
    image2: ExtractionPayload,
    stage: &'static str,
}

#[derive(Serialize)]
struct ComparisonResponse {
    comparison: ComparisonResult,
    report: ReportRecord,
    stage: &'static str,
}

/// An image field read from a multipart form
#[derive(Debug)]
struct UploadedImage {
    /// Sanitized filename, or the form field name when none was sent
    filename: String,
    bytes: Vec<u8>,
}

/// Fields read from a multipart form, keyed by field name
#[derive(Debug, Default)]
struct FormData {
    images: HashMap<String, UploadedImage>,
    texts: HashMap<String, String>,
}

impl FormData {
    fn take_image(&mut self, field: &str) -> Result<UploadedImage, Response> {
        self.images.remove(field).ok_or_else(|| {
            reject(
                StatusCode::BAD_REQUEST,
                "missing_input",
                &format!("No image uploaded in field '{field}'"),
                None,
            )
        })
    }

    fn text(&self, field: &str) -> Option<&str> {
        self.texts.get(field).map(String::as_str)
    }

    /// A text field that must be present and non-blank
    fn require_text(&self, field: &str) -> Result<String, Response> {
        self.text(field)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(ToString::to_string)
            .ok_or_else(|| {
                reject(
                    StatusCode::BAD_REQUEST,
                    "missing_input",
                    &format!("Missing form field '{field}'"),
                    None,
                )
            })
    }
}

/// Run the web server
///
/// # Errors
///
/// Returns an error if the tokio runtime cannot be created or the server fails to start.
pub fn run(args: ServeArgs) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move { run_server(args).await })
}

/// Routes and every middleware layer except per-IP rate limiting, which
/// needs the peer address of a real connection.
pub fn api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/dna/process-image", post(process_image_handler))
        .route("/dna/compare", post(compare_images_handler))
        .route("/dna/compare/algorithms", post(compare_algorithms_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                // Security headers for browser protection
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-frame-options"),
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("referrer-policy"),
                    HeaderValue::from_static("strict-origin-when-cross-origin"),
                ))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(30),
                ))
                .layer(ConcurrencyLimitLayer::new(100))
                .layer(DefaultBodyLimit::max(MAX_BODY_SIZE)),
        )
}

/// Create the application router with all routes and middleware configured.
///
/// # Errors
///
/// Returns an error if the rate limiter configuration is rejected.
pub fn create_router(config: PipelineConfig) -> anyhow::Result<Router> {
    let state = Arc::new(AppState::new(config));

    let governor_conf = GovernorConfigBuilder::default()
        .per_second(10) // 10 requests per second per IP
        .burst_size(50)
        .finish()
        .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?;

    Ok(api_router(state).layer(GovernorLayer {
        config: Arc::new(governor_conf),
    }))
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let app = create_router(args.calling.to_config())?;

    let addr = format!("{}:{}", args.address, args.port);
    println!("Starting chroma-compare web server at http://{addr}");

    if args.open {
        let _ = open::that(format!("http://{addr}"));
    }

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

async fn index_handler() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        endpoints: [
            "GET /",
            "GET /health",
            "POST /dna/process-image",
            "POST /dna/compare",
            "POST /dna/compare/algorithms",
        ],
    })
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Extract the sequence of a single uploaded image
async fn process_image_handler(
    session: SessionContext,
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Response {
    let mut form = match read_form(&mut multipart, &["file"], &[]).await {
        Ok(form) => form,
        Err(response) => return response,
    };
    let image = match form.take_image("file") {
        Ok(image) => image,
        Err(response) => return response,
    };

    tracing::info!(
        request_id = session.request_id,
        authenticated = session.is_authenticated(),
        image = %image.filename,
        "Processing image"
    );

    let result = tokio::task::spawn_blocking(move || {
        state.pipeline.extract(&image.filename, &image.bytes)
    })
    .await;

    match result {
        Ok(Ok(extraction)) => Json(extraction.to_payload()).into_response(),
        Ok(Err(err)) => extraction_error_response(&err),
        Err(join_err) => join_error_response(&join_err),
    }
}

/// Extract both uploaded images, in parallel
async fn compare_images_handler(
    session: SessionContext,
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Response {
    let mut form = match read_form(&mut multipart, &["file1", "file2"], &[]).await {
        Ok(form) => form,
        Err(response) => return response,
    };
    let (first, second) = match (form.take_image("file1"), form.take_image("file2")) {
        (Ok(first), Ok(second)) => (first, second),
        (Err(response), _) | (_, Err(response)) => return response,
    };

    tracing::info!(
        request_id = session.request_id,
        authenticated = session.is_authenticated(),
        image1 = %first.filename,
        image2 = %second.filename,
        "Extracting image pair"
    );

    let result = tokio::task::spawn_blocking(move || {
        state.pipeline.extract_pair(
            (first.filename.as_str(), first.bytes.as_slice()),
            (second.filename.as_str(), second.bytes.as_slice()),
        )
    })
    .await;

    match result {
        Ok(Ok((first, second))) => Json(pair_response(&first, &second)).into_response(),
        Ok(Err(err)) => extraction_error_response(&err),
        Err(join_err) => join_error_response(&join_err),
    }
}

fn pair_response(first: &Extraction, second: &Extraction) -> PairExtractionResponse {
    PairExtractionResponse {
        image1: first.to_payload(),
        image2: second.to_payload(),
        stage: "peak_intensity",
    }
}

/// Compare two previously extracted sequences
async fn compare_algorithms_handler(
    session: SessionContext,
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Response {
    let form = match read_form(
        &mut multipart,
        &[],
        &["seq1", "seq2", "image1_name", "image2_name"],
    )
    .await
    {
        Ok(form) => form,
        Err(response) => return response,
    };

    let parsed = NucleotideSequence::parse_required("seq1", form.text("seq1")).and_then(|seq1| {
        NucleotideSequence::parse_required("seq2", form.text("seq2")).map(|seq2| (seq1, seq2))
    });
    let (seq1, seq2) = match parsed {
        Ok(pair) => pair,
        Err(err) => return invalid_sequence_response(&err),
    };

    let (image1_name, image2_name) =
        match (form.require_text("image1_name"), form.require_text("image2_name")) {
            (Ok(first), Ok(second)) => (first, second),
            (Err(response), _) | (_, Err(response)) => return response,
        };

    tracing::info!(
        request_id = session.request_id,
        authenticated = session.is_authenticated(),
        seq1_len = seq1.len(),
        seq2_len = seq2.len(),
        "Comparing sequences"
    );

    let result = tokio::task::spawn_blocking(move || {
        let comparison = state.aggregator.compare(&seq1, &seq2);
        let report = ReportRecord::new(image1_name, image2_name, seq1, seq2, &comparison);
        ComparisonResponse {
            comparison,
            report,
            stage: "algorithms",
        }
    })
    .await;

    match result {
        Ok(response) => Json(response).into_response(),
        Err(join_err) => join_error_response(&join_err),
    }
}

fn extraction_error_response(err: &ExtractionError) -> Response {
    tracing::warn!(image = err.image(), error = %err, "Extraction failed");
    match err {
        ExtractionError::Decode { image, .. } => reject(
            StatusCode::UNPROCESSABLE_ENTITY,
            "decode_failed",
            &format!("Could not decode image '{image}'"),
            None,
        ),
        ExtractionError::NoSignal { image, .. } => reject(
            StatusCode::UNPROCESSABLE_ENTITY,
            "no_signal",
            &format!("Image '{image}' has no usable signal"),
            None,
        ),
        ExtractionError::Render { image, source } => reject(
            StatusCode::INTERNAL_SERVER_ERROR,
            "render_failed",
            &format!("Could not render chromatogram for '{image}'"),
            Some(&source.to_string()),
        ),
    }
}

fn invalid_sequence_response(err: &InvalidSequenceError) -> Response {
    tracing::warn!(error = %err, "Rejected sequence");
    reject(StatusCode::BAD_REQUEST, "invalid_sequence", &err.to_string(), None)
}

fn join_error_response(err: &tokio::task::JoinError) -> Response {
    reject(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "Processing failed unexpectedly",
        Some(&err.to_string()),
    )
}

fn validation_error_response(err: &ValidationError) -> Response {
    tracing::warn!(error = %err, "Rejected upload");
    match err {
        ValidationError::FilenameTooLong => reject(
            StatusCode::BAD_REQUEST,
            "filename_too_long",
            "Filename exceeds maximum length limit",
            None,
        ),
        ValidationError::InvalidFilename | ValidationError::EmptyFilename => reject(
            StatusCode::BAD_REQUEST,
            "invalid_filename",
            "Filename contains invalid or dangerous characters",
            None,
        ),
        ValidationError::InvalidFileContent => reject(
            StatusCode::BAD_REQUEST,
            "invalid_content",
            "Uploaded file is empty",
            None,
        ),
        ValidationError::UnsupportedFormat => reject(
            StatusCode::BAD_REQUEST,
            "unsupported_format",
            "Uploaded file is not a PNG, JPEG, BMP or GIF image",
            None,
        ),
        ValidationError::FormatValidationFailed { .. } => reject(
            StatusCode::BAD_REQUEST,
            "format_mismatch",
            "File content does not match the format named by its extension",
            None,
        ),
    }
}

/// Read the named image and text fields of a multipart form.
///
/// Unknown fields are skipped but still count towards the field limit.
async fn read_form(
    multipart: &mut Multipart,
    image_fields: &[&str],
    text_fields: &[&str],
) -> Result<FormData, Response> {
    let mut form = FormData::default();
    let mut fields_received = 0usize;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                return Err(reject(
                    StatusCode::BAD_REQUEST,
                    "malformed_form",
                    "Failed to parse multipart form",
                    Some(&err.to_string()),
                ))
            }
        };
        fields_received += 1;
        if fields_received > MAX_MULTIPART_FIELDS {
            return Err(reject(
                StatusCode::BAD_REQUEST,
                "field_limit_exceeded",
                "Too many form fields",
                None,
            ));
        }
        let name = field.name().unwrap_or_default().to_string();

        if image_fields.contains(&name.as_str()) {
            let filename = field.file_name().map(ToString::to_string);
            let bytes = field.bytes().await.map_err(|err| {
                reject(
                    StatusCode::BAD_REQUEST,
                    "malformed_form",
                    &format!("Failed to read field '{name}'"),
                    Some(&err.to_string()),
                )
            })?;

            if bytes.len() > MAX_FILE_FIELD_SIZE {
                return Err(reject(
                    StatusCode::PAYLOAD_TOO_LARGE,
                    "file_too_large",
                    "File size exceeds limit",
                    None,
                ));
            }

            let validated = validate_upload(filename.as_deref(), &bytes)
                .map_err(|err| validation_error_response(&err))?;
            let filename = validated.filename.unwrap_or_else(|| name.clone());
            form.images.insert(
                name,
                UploadedImage {
                    filename,
                    bytes: bytes.to_vec(),
                },
            );
        } else if text_fields.contains(&name.as_str()) {
            let text = field.text().await.map_err(|err| {
                reject(
                    StatusCode::BAD_REQUEST,
                    "malformed_form",
                    &format!("Failed to read field '{name}'"),
                    Some(&err.to_string()),
                )
            })?;

            if text.len() > MAX_TEXT_FIELD_SIZE {
                return Err(reject(
                    StatusCode::PAYLOAD_TOO_LARGE,
                    "text_too_large",
                    "Text field size exceeds limit",
                    None,
                ));
            }
            form.texts.insert(name, text);
        }
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_error_response_hides_details() {
        let response = create_safe_error_response("decode_failed", "Bad image", Some("stack"));
        assert_eq!(response.error, "Bad image");
        assert_eq!(response.error_type, "decode_failed");
        assert!(response.details.is_none());
    }

    #[test]
    fn test_extraction_errors_map_to_distinct_types() {
        let decode = ExtractionPipeline::default()
            .extract("a.png", b"not an image")
            .unwrap_err();
        assert_eq!(
            extraction_error_response(&decode).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );

        let invalid = NucleotideSequence::parse_named("seq1", "ACXG").unwrap_err();
        assert_eq!(
            invalid_sequence_response(&invalid).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_create_router_builds() {
        assert!(create_router(PipelineConfig::default()).is_ok());
    }
}
