//! Request handling for the framing endpoint.
//!
//! Response contract:
//! - 200 `{"processedImages": [...]}` with one entry per overlay, in
//!   overlay order
//! - 400 `{"error": "No image file provided"}` when the upload carries
//!   no usable `image` field
//! - 500 `{"error": "Failed to process image"}` for anything else; the
//!   underlying cause is logged, never exposed

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use dpframe_common::{DpframeError, DpframeResult};
use dpframe_framing_core::{frame, CanvasSpec, DecodeLimits, FrameOverlay, InputImage};
use dpframe_storage::{to_data_url, FrameStore, FsFrameStore};

/// Shared immutable state: everything a request needs to run the
/// pipeline. Requests share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    pub canvas: CanvasSpec,
    pub limits: DecodeLimits,
    pub overlays: Arc<Vec<FrameOverlay>>,
    /// When set, outputs are persisted and the response carries URLs
    /// instead of inline data.
    pub store: Option<Arc<FsFrameStore>>,
}

/// Build the application router.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/api/process-image", post(process_image))
        .route("/healthz", get(healthz))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProcessResponse {
    processed_images: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

async fn healthz() -> &'static str {
    "ok"
}

async fn process_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ProcessResponse>, ApiError> {
    let photo = read_image_field(&mut multipart).await.map_err(reject)?;

    // The pipeline is CPU-bound; keep it off the async runtime.
    let worker_state = state.clone();
    let outputs = tokio::task::spawn_blocking(move || -> DpframeResult<_> {
        let input = InputImage::decode_with_limits(&photo, &worker_state.limits)?;
        frame(&input, &worker_state.canvas, &worker_state.overlays)
    })
    .await
    .map_err(|e| reject(DpframeError::processing(format!("worker task failed: {e}"))))?
    .map_err(reject)?;

    let processed_images = match &state.store {
        Some(store) => outputs
            .iter()
            .map(|output| {
                store
                    .store(output)
                    .map(|stored| stored.url.unwrap_or(stored.file_name))
            })
            .collect::<DpframeResult<Vec<_>>>()
            .map_err(reject)?,
        None => outputs.iter().map(|output| to_data_url(&output.png)).collect(),
    };

    Ok(Json(ProcessResponse { processed_images }))
}

/// Pull the bytes of the `image` field out of the multipart stream.
async fn read_image_field(multipart: &mut Multipart) -> DpframeResult<Vec<u8>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| DpframeError::processing(format!("multipart read failed: {e}")))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| DpframeError::processing(format!("upload read failed: {e}")))?;
        if bytes.is_empty() {
            return Err(DpframeError::NoInput);
        }
        return Ok(bytes.to_vec());
    }
    Err(DpframeError::NoInput)
}

/// Map a pipeline error onto the API contract.
fn reject(err: DpframeError) -> ApiError {
    if err.is_user_error() {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: err.to_string(),
            }),
        )
    } else {
        tracing::error!("Processing failed: {err}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Failed to process image".to_string(),
            }),
        )
    }
}
