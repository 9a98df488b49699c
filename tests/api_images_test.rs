//! Tests for /api/images and /api/selection endpoints.

mod common;

use axum::http::StatusCode;
use common::{fixtures, TestApp};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_upload_registers_and_selects_first() {
    let app = TestApp::new();

    let response = app
        .upload("/api/images?wait=true", "cat.png", "image/png", fixtures::png(40, 20))
        .await;
    common::assert_status(&response, StatusCode::CREATED);

    let json: serde_json::Value = response.json();
    let id = json["added"][0]["id"].as_str().unwrap();
    assert_eq!(id.len(), 12);
    assert_eq!(json["added"][0]["name"], "cat.png");
    assert_eq!(json["added"][0]["mime_type"], "image/png");
    assert_eq!(json["selected"], id);
    common::assert_render_status(&json, "committed");
    assert_eq!(json["render"]["width"], 40);
    assert_eq!(json["render"]["height"], 20);
}

#[tokio::test]
async fn test_second_upload_keeps_selection() {
    let app = TestApp::new();
    let first = app.upload_png("a.png", fixtures::png(10, 10)).await;

    let response = app
        .upload("/api/images?wait=true", "b.png", "image/png", fixtures::png(12, 12))
        .await;
    common::assert_status(&response, StatusCode::CREATED);

    let json: serde_json::Value = response.json();
    assert_eq!(json["selected"], first.as_str());
    // Selection and parameters are unchanged, so nothing was rendered
    assert!(json["render"].is_null());
}

#[tokio::test]
async fn test_upload_without_file_name() {
    let app = TestApp::new();

    let response = app.post("/api/images").await;

    common::assert_json_error(&response, StatusCode::BAD_REQUEST);
    assert!(response.text().contains("File-Name"));
}

#[tokio::test]
async fn test_upload_guesses_missing_mime_type() {
    let app = TestApp::new();

    let response = app
        .upload(
            "/api/images",
            "photo.jpeg",
            "application/octet-stream",
            vec![0xff, 0xd8, 0xff],
        )
        .await;

    let json: serde_json::Value = response.json();
    assert_eq!(json["added"][0]["mime_type"], "image/jpeg");
    assert_eq!(json["added"][0]["byte_size"], 3);
}

#[tokio::test]
async fn test_upload_accepts_undecodable_bytes() {
    let app = TestApp::new();

    let response = app
        .upload("/api/images?wait=true", "broken.png", "image/png", fixtures::garbage())
        .await;
    common::assert_status(&response, StatusCode::CREATED);

    let json: serde_json::Value = response.json();
    common::assert_render_status(&json, "decode_failed");

    // Registered all the same, preview stays empty
    let list: serde_json::Value = app.get("/api/images").await.json();
    assert_eq!(list["images"].as_array().unwrap().len(), 1);
    common::assert_status(&app.get("/api/preview").await, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_list_images_in_upload_order() {
    let app = TestApp::new();
    let a = app.upload_png("a.png", fixtures::png(4, 4)).await;
    let b = app.upload_png("b.png", fixtures::png(4, 4)).await;

    let response = app.get("/api/images").await;
    common::assert_ok(&response);

    let json: serde_json::Value = response.json();
    let images = json["images"].as_array().unwrap();
    assert_eq!(images.len(), 2);
    assert_eq!(images[0]["id"], a.as_str());
    assert_eq!(images[1]["id"], b.as_str());
    assert!(images[0]["handle"].as_str().unwrap().starts_with("blob:glint/"));
    assert_eq!(json["selected"], a.as_str());
}

#[tokio::test]
async fn test_select_image() {
    let app = TestApp::new();
    app.upload_png("a.png", fixtures::png(10, 10)).await;
    let b = app.upload_png("b.png", fixtures::png(30, 15)).await;

    let response = app
        .put_json("/api/selection?wait=true", &format!(r#"{{"id":"{b}"}}"#))
        .await;
    common::assert_ok(&response);

    let json: serde_json::Value = response.json();
    assert_eq!(json["selected"]["id"], b.as_str());
    assert_eq!(json["selected"]["name"], "b.png");
    common::assert_render_status(&json, "committed");

    let dims = common::assert_png(&app.get("/api/preview").await);
    assert_eq!(dims, (30, 15));
}

#[tokio::test]
async fn test_select_unknown_image() {
    let app = TestApp::new();
    let a = app.upload_png("a.png", fixtures::png(10, 10)).await;

    let response = app
        .put_json("/api/selection", r#"{"id":"000000000000"}"#)
        .await;

    common::assert_json_error(&response, StatusCode::NOT_FOUND);
    let list: serde_json::Value = app.get("/api/images").await.json();
    assert_eq!(list["selected"], a.as_str());
}

#[tokio::test]
async fn test_remove_all() {
    let app = TestApp::new();
    app.upload_png("a.png", fixtures::png(10, 10)).await;
    app.upload_png("b.png", fixtures::png(10, 10)).await;

    let response = app.delete("/api/images?wait=true").await;
    common::assert_ok(&response);

    let json: serde_json::Value = response.json();
    assert_eq!(json["removed"], 2);
    common::assert_render_status(&json, "no_selection");

    let status: serde_json::Value = app.get("/api/status").await.json();
    assert_eq!(status["images"], 0);
    assert_eq!(status["live_handles"], 0);
    assert!(status["selected"].is_null());
    assert_eq!(status["surface"]["width"], 0);
    assert_eq!(status["surface"]["height"], 0);
}

#[tokio::test]
async fn test_registry_capacity() {
    let mut config = common::app::test_config();
    config.registry.max_images = Some(1);
    let app = TestApp::with_config(config);
    app.upload_png("a.png", fixtures::png(4, 4)).await;

    let response = app
        .upload("/api/images", "b.png", "image/png", fixtures::png(4, 4))
        .await;
    common::assert_ok(&response);

    let json: serde_json::Value = response.json();
    assert_eq!(json["added"].as_array().unwrap().len(), 0);
    assert_eq!(json["skipped"][0], "b.png");
}
