use axum::{body::Bytes, extract::State, response::Response};

use super::export::attachment;
use crate::error::ApiError;
use crate::models::QuantizerOptions;
use crate::server::AppState;
use crate::services::{batch, Download, PaletteQuantizer};

/// File name of the batch archive
pub const BATCH_ARCHIVE_NAME: &str = "quantized.zip";

/// Options from the request body, or the configured defaults for an empty one.
fn request_options(state: &AppState, body: &Bytes) -> Result<QuantizerOptions, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(state.config.quantizer.options.clone());
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("invalid quantizer options: {e}")))
}

fn quantizer(state: &AppState) -> Result<&dyn PaletteQuantizer, ApiError> {
    state
        .quantizer
        .as_deref()
        .ok_or_else(|| ApiError::Unavailable("no quantizer binary configured".into()))
}

/// Quantize the selected image with the external engine
///
/// Sends the selected image's original bytes to the configured quantizer.
/// An empty body uses the configured default options; a body that is not a
/// valid option set is rejected.
#[utoipa::path(
    post,
    path = "/api/quantize",
    request_body(content = QuantizerOptions, description = "Quantizer options (optional)"),
    responses(
        (status = 200, description = "Quantized output file"),
        (status = 400, description = "Invalid options"),
        (status = 409, description = "No image selected"),
        (status = 502, description = "Quantizer failed"),
        (status = 503, description = "No quantizer configured"),
    ),
    tag = "Quantize"
)]
pub async fn handle_quantize(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let options = request_options(&state, &body)?;
    let quantizer = quantizer(&state)?;
    let (image, bytes) = state
        .session
        .original()
        .await
        .ok_or_else(|| ApiError::Conflict("no image selected".into()))?;

    let output = quantizer.quantize(&bytes, &image.name, &options).await?;

    Ok(attachment(Download {
        file_name: output.file_name,
        content_type: output.content_type,
        bytes: output.bytes,
    }))
}

/// Quantize every uploaded image into one ZIP archive
///
/// Images are processed in upload order up to the configured batch size.
/// The archive's `manifest.json` lists each image as included, failed or
/// excluded.
#[utoipa::path(
    post,
    path = "/api/quantize/batch",
    request_body(content = QuantizerOptions, description = "Quantizer options (optional)"),
    responses(
        (status = 200, description = "ZIP archive of quantized files", content_type = "application/zip"),
        (status = 400, description = "Invalid options"),
        (status = 409, description = "No images uploaded"),
        (status = 503, description = "No quantizer configured"),
    ),
    tag = "Quantize"
)]
pub async fn handle_quantize_batch(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let options = request_options(&state, &body)?;
    let quantizer = quantizer(&state)?;
    let images = state.session.originals().await;
    if images.is_empty() {
        return Err(ApiError::Conflict("no images uploaded".into()));
    }

    let outcome = batch::quantize_batch(
        quantizer,
        images,
        &options,
        state.config.quantizer.max_batch,
    )
    .await?;
    let archive = tokio::task::spawn_blocking(move || outcome.into_archive())
        .await
        .map_err(|e| ApiError::Internal(format!("archive task failed: {e}")))?
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(attachment(Download {
        file_name: BATCH_ARCHIVE_NAME.to_string(),
        content_type: "application/zip".to_string(),
        bytes: archive,
    }))
}
