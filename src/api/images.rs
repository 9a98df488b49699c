use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::headers::{media_type, HeaderMapExt};
use super::{settle, WaitQuery};
use crate::error::ApiError;
use crate::models::{ImageId, ImageSummary, IncomingFile};
use crate::server::AppState;
use crate::services::RenderEvent;

/// Response from POST /api/images
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IngestResponse {
    /// Images registered by this upload
    pub added: Vec<ImageSummary>,
    /// Files refused because the registry is full
    pub skipped: Vec<String>,
    /// Current preview target
    pub selected: Option<ImageId>,
    /// Render outcome, present when `wait=true` and a render was scheduled
    pub render: Option<RenderEvent>,
}

/// Response from GET /api/images
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ImageListResponse {
    pub images: Vec<ImageSummary>,
    pub selected: Option<ImageId>,
}

/// Response from DELETE /api/images
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RemoveAllResponse {
    /// Number of images released
    pub removed: usize,
    pub render: Option<RenderEvent>,
}

/// Request body for PUT /api/selection
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SelectRequest {
    pub id: ImageId,
}

/// Response from PUT /api/selection
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SelectResponse {
    pub selected: ImageSummary,
    pub render: Option<RenderEvent>,
}

/// Upload one image
///
/// The request body is the raw file. The first image uploaded into an empty
/// session becomes the preview target. Bytes are not validated here; files
/// that cannot be decoded are reported through render events.
#[utoipa::path(
    post,
    path = "/api/images",
    request_body(content = Vec<u8>, description = "Raw image file", content_type = "application/octet-stream"),
    responses(
        (status = 201, description = "Image registered", body = IngestResponse),
        (status = 200, description = "Registry full, file skipped", body = IngestResponse),
        (status = 400, description = "Missing File-Name header"),
    ),
    params(
        ("File-Name" = String, Header, description = "Original file name, percent-encoded if not ASCII"),
        ("Content-Type" = Option<String>, Header, description = "MIME type (guessed from the name if absent)"),
        WaitQuery,
    ),
    tag = "Images"
)]
pub async fn handle_upload(
    State(state): State<AppState>,
    Query(query): Query<WaitQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    // Header values are ASCII; clients percent-encode other names
    let name = percent_decode_str(headers.require_str("File-Name")?)
        .decode_utf8_lossy()
        .into_owned();
    let mime_type = media_type(&headers)
        .filter(|m| m != "application/octet-stream")
        .unwrap_or_else(|| IncomingFile::guess_mime(&name).to_string());

    let file = IncomingFile::new(name, mime_type, body.to_vec());
    let (report, render) = state.session.ingest(vec![file]).await;
    let render = settle(render, query.wait).await;

    let images = state.session.images().await;
    let added = images
        .into_iter()
        .filter(|image| report.added.contains(&image.id))
        .collect();
    let selected = state.session.selected().await.map(|image| image.id);

    let status = if report.added.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };

    Ok((
        status,
        Json(IngestResponse {
            added,
            skipped: report.skipped,
            selected,
            render,
        }),
    )
        .into_response())
}

/// List registered images
#[utoipa::path(
    get,
    path = "/api/images",
    responses(
        (status = 200, description = "Registered images in upload order", body = ImageListResponse),
    ),
    tag = "Images"
)]
pub async fn handle_list(State(state): State<AppState>) -> Json<ImageListResponse> {
    let images = state.session.images().await;
    let selected = state.session.selected().await.map(|image| image.id);
    Json(ImageListResponse { images, selected })
}

/// Remove every image
///
/// Releases all stored bytes, clears the selection and empties the preview.
#[utoipa::path(
    delete,
    path = "/api/images",
    responses(
        (status = 200, description = "All images removed", body = RemoveAllResponse),
    ),
    params(WaitQuery),
    tag = "Images"
)]
pub async fn handle_remove_all(
    State(state): State<AppState>,
    Query(query): Query<WaitQuery>,
) -> Json<RemoveAllResponse> {
    let (removed, render) = state.session.remove_all().await;
    let render = settle(render, query.wait).await;
    Json(RemoveAllResponse { removed, render })
}

/// Choose the preview target
#[utoipa::path(
    put,
    path = "/api/selection",
    request_body = SelectRequest,
    responses(
        (status = 200, description = "Selection changed", body = SelectResponse),
        (status = 404, description = "Unknown image id"),
    ),
    params(WaitQuery),
    tag = "Images"
)]
pub async fn handle_select(
    State(state): State<AppState>,
    Query(query): Query<WaitQuery>,
    Json(request): Json<SelectRequest>,
) -> Result<Json<SelectResponse>, ApiError> {
    let (selected, render) = state.session.select(&request.id).await?;
    let render = settle(render, query.wait).await;

    Ok(Json(SelectResponse { selected, render }))
}
