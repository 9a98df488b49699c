use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};

use crate::server::AppState;
use crate::services::SessionStatus;

/// Current preview surface as PNG
///
/// Reflects the last committed render. Returns 204 while the surface is empty.
#[utoipa::path(
    get,
    path = "/api/preview",
    responses(
        (status = 200, description = "PNG of the preview surface", content_type = "image/png"),
        (status = 204, description = "Surface is empty"),
    ),
    tag = "Preview"
)]
pub async fn handle_preview(State(state): State<AppState>) -> Response {
    match state.session.surface_png().await {
        Some(png_bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "image/png"),
                (header::CONTENT_LENGTH, &png_bytes.len().to_string()),
            ],
            Bytes::from(png_bytes),
        )
            .into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// Session overview
#[utoipa::path(
    get,
    path = "/api/status",
    responses(
        (status = 200, description = "Registry, parameters and surface state", body = SessionStatus),
    ),
    tag = "Preview"
)]
pub async fn handle_status(State(state): State<AppState>) -> Json<SessionStatus> {
    Json(state.session.status().await)
}
