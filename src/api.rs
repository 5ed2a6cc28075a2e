//! HTTP surface for pdfbrief.
//!
//! - `POST /generate-summary` – multipart upload with a `file` field holding a PDF. Returns
//!   `{"summary": ...}` plus `"flowchart"` when the diagram step is enabled.
//! - `GET /metrics` – request counters since startup.
//! - `GET /commands` – machine-readable catalog of the routes above.
//!
//! Every failure is answered as `{"error": <message>}`: request problems with `400` (or `413`
//! for oversized uploads), extraction and generation failures with `500`.

use crate::metrics::MetricsSnapshot;
use crate::processing::{
    ProcessingError, SummaryApi, SummaryPayload, UploadedDocument, ValidationError,
};
use axum::{
    Extension, Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Multipart field carrying the uploaded PDF.
pub const FILE_FIELD: &str = "file";

/// Request body ceiling shared with the upload handler for error reporting.
#[derive(Clone, Copy)]
struct UploadLimit(usize);

/// Build the HTTP router around a summary service.
pub fn create_router<S>(service: Arc<S>, max_upload_bytes: usize) -> Router
where
    S: SummaryApi + 'static,
{
    Router::new()
        .route("/generate-summary", post(generate_summary::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .layer(Extension(UploadLimit(max_upload_bytes)))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Summarize an uploaded PDF.
///
/// Intake checks run first: the multipart body must carry a `file` field with a non-empty
/// filename and non-empty contents. The document then flows through the summary service.
async fn generate_summary<S>(
    State(service): State<Arc<S>>,
    Extension(limit): Extension<UploadLimit>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SummaryPayload>, AppError>
where
    S: SummaryApi,
{
    let document = match read_upload(multipart, limit).await {
        Ok(document) => document,
        Err(error) => {
            service.record_rejected_request();
            tracing::info!(error = %error, "Upload rejected");
            return Err(error.into());
        }
    };

    tracing::info!(
        filename = %document.filename,
        bytes = document.bytes.len(),
        "Summary request received"
    );
    let outcome = service.summarize_document(document).await?;
    Ok(Json(outcome.payload))
}

/// Pull the `file` field out of a multipart body.
async fn read_upload(
    multipart: Result<Multipart, MultipartRejection>,
    limit: UploadLimit,
) -> Result<UploadedDocument, ValidationError> {
    let multipart_error = |error: MultipartError| {
        if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ValidationError::UploadTooLarge { limit: limit.0 }
        } else {
            ValidationError::InvalidMultipart(error.body_text())
        }
    };
    let mut multipart =
        multipart.map_err(|rejection| ValidationError::InvalidMultipart(rejection.body_text()))?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;
        let document = UploadedDocument {
            filename,
            bytes: bytes.to_vec(),
        };
        document.validate()?;
        return Ok(document);
    }

    Err(ValidationError::MissingFilePart)
}

/// Return the pipeline counters.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<MetricsSnapshot>
where
    S: SummaryApi,
{
    Json(service.metrics_snapshot())
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery by front ends and tools.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "generate_summary",
                method: "POST",
                path: "/generate-summary",
                description: "Upload a PDF as multipart field `file`. Response returns { \"summary\": string, \"flowchart\"?: string }.",
                request_example: Some(json!({
                    "content_type": "multipart/form-data",
                    "fields": { "file": "lecture-notes.pdf" }
                })),
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return request and generation counters since startup.",
                request_example: None,
            },
        ],
    })
}

/// Error wrapper translating pipeline failures into HTTP responses.
struct AppError(ProcessingError);

impl AppError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            ProcessingError::Validation(ValidationError::UploadTooLarge { .. }) => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            ProcessingError::Validation(_) => StatusCode::BAD_REQUEST,
            ProcessingError::Extraction(_)
            | ProcessingError::Chunking(_)
            | ProcessingError::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

impl From<ProcessingError> for AppError {
    fn from(inner: ProcessingError) -> Self {
        Self(inner)
    }
}

impl From<ValidationError> for AppError {
    fn from(inner: ValidationError) -> Self {
        Self(inner.into())
    }
}
