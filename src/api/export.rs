use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::server::AppState;
use crate::services::Download;

/// Download the composited preview
///
/// Named `<stem>-glint.png` after the selected image. Returns 204 when
/// nothing is selected, nothing has been drawn yet, or encoding fails.
#[utoipa::path(
    get,
    path = "/api/export/composite",
    responses(
        (status = 200, description = "Composite PNG", content_type = "image/png"),
        (status = 204, description = "Nothing to export"),
    ),
    tag = "Export"
)]
pub async fn handle_export_composite(State(state): State<AppState>) -> Response {
    match state.export.export_composite(&state.session).await {
        Some(download) => attachment(download),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// Download the selected image as uploaded
#[utoipa::path(
    get,
    path = "/api/export/original",
    responses(
        (status = 200, description = "Original file bytes"),
        (status = 204, description = "Nothing selected"),
    ),
    tag = "Export"
)]
pub async fn handle_export_original(State(state): State<AppState>) -> Response {
    match state.export.export_original(&state.session).await {
        Some(download) => attachment(download),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// Characters left unescaped in an RFC 5987 `filename*` value
const FILENAME_ATTR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Binary response with a `Content-Disposition: attachment` header.
pub(crate) fn attachment(download: Download) -> Response {
    let disposition = content_disposition(&download.file_name);
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, download.content_type),
            (header::CONTENT_LENGTH, download.bytes.len().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Bytes::from(download.bytes),
    )
        .into_response()
}

/// `attachment` disposition; non-ASCII names also get a UTF-8 `filename*`.
fn content_disposition(name: &str) -> String {
    let fallback = quoted_file_name(name);
    if name.is_ascii() {
        format!("attachment; filename=\"{fallback}\"")
    } else {
        format!(
            "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
            utf8_percent_encode(name, FILENAME_ATTR)
        )
    }
}

/// Keep a file name safe inside a quoted header parameter.
fn quoted_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_control() || !c.is_ascii() => '_',
            c => c,
        })
        .collect()
}
