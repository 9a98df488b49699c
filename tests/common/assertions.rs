//! Assertion helpers for tests.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use super::app::TestResponse;

/// Assert response has expected status code
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status,
        expected,
        "Expected status {}, got {}. Body: {}",
        expected,
        response.status,
        response.text()
    );
}

/// Assert response is OK (200)
pub fn assert_ok(response: &TestResponse) {
    assert_status(response, StatusCode::OK);
}

/// Assert response is a valid PNG image and return its dimensions
pub fn assert_png(response: &TestResponse) -> (u32, u32) {
    assert_ok(response);
    assert!(
        response.is_png(),
        "Expected PNG image, got {} bytes starting with {:?}",
        response.body.len(),
        &response.body[..8.min(response.body.len())]
    );

    // Check Content-Type header
    assert_eq!(
        response.header("content-type"),
        Some("image/png"),
        "Expected Content-Type: image/png"
    );

    let image = image::load_from_memory(&response.body).expect("PNG should decode");
    (image.width(), image.height())
}

/// Assert response is a download with the given file name
pub fn assert_attachment(response: &TestResponse, file_name: &str) {
    assert_ok(response);
    assert_eq!(
        response.header("content-disposition"),
        Some(format!("attachment; filename=\"{file_name}\"").as_str())
    );
}

/// Assert JSON error body carries the HTTP status
pub fn assert_json_error(response: &TestResponse, expected: StatusCode) {
    assert_status(response, expected);
    let json: serde_json::Value = response.json();
    assert_eq!(
        json["status"].as_u64(),
        Some(expected.as_u16() as u64),
        "Expected JSON status {}, got {}",
        expected.as_u16(),
        serde_json::to_string_pretty(&json).unwrap()
    );
    assert!(json["error"].is_string(), "Expected error message");
}

/// Assert a render outcome in a mutating response
pub fn assert_render_status(json: &serde_json::Value, expected: &str) {
    assert_eq!(
        json["render"]["status"].as_str(),
        Some(expected),
        "Unexpected render outcome: {}",
        json["render"]
    );
}
