//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::DefaultBodyLimit,
    http::{header::CACHE_CONTROL, HeaderValue},
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::api;
use crate::models::AppConfig;
use crate::services::{ExportService, ExternalQuantizer, PaletteQuantizer, PreviewSession};

/// Largest accepted upload body
pub const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub session: PreviewSession,
    pub export: ExportService,
    pub quantizer: Option<Arc<dyn PaletteQuantizer>>,
}

/// Create application state from a loaded configuration.
pub fn create_app_state(config: AppConfig) -> AppState {
    let session = PreviewSession::new(&config);
    let export = ExportService::new(&config.export);
    let quantizer = config.quantizer.binary.as_ref().map(|binary| {
        tracing::info!(binary = %binary.display(), "External quantizer configured");
        Arc::new(ExternalQuantizer::new(binary.clone())) as Arc<dyn PaletteQuantizer>
    });

    AppState {
        config: Arc::new(config),
        session,
        export,
        quantizer,
    }
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests. Responses are
/// marked `no-store` since every one reflects mutable session state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Images and selection
        .route(
            "/api/images",
            post(api::handle_upload)
                .get(api::handle_list)
                .delete(api::handle_remove_all),
        )
        .route("/api/selection", put(api::handle_select))
        // Effects
        .route(
            "/api/params",
            get(api::handle_get_params).put(api::handle_update_params),
        )
        .route("/api/refresh", post(api::handle_refresh))
        // Preview and export
        .route("/api/preview", get(api::handle_preview))
        .route("/api/status", get(api::handle_status))
        .route("/api/events", get(api::handle_events))
        .route("/api/export/composite", get(api::handle_export_composite))
        .route("/api/export/original", get(api::handle_export_original))
        .route("/api/quantize", post(api::handle_quantize))
        .route("/api/quantize/batch", post(api::handle_quantize_batch))
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Add state and tracing
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}
