use glint_fx::{FxError, Pixmap};

use super::session::PreviewSession;
use crate::models::ExportConfig;

/// Suffix appended to the source file stem for composite downloads
pub const COMPOSITE_SUFFIX: &str = "-glint";

/// A file ready to hand to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Serializes the surface or returns original bytes on demand.
///
/// Every failure collapses into `None`; nothing here reaches the user as an
/// error.
#[derive(Debug, Clone)]
pub struct ExportService {
    optimize: bool,
}

impl ExportService {
    pub fn new(config: &ExportConfig) -> Self {
        Self {
            optimize: config.optimize,
        }
    }

    /// The composited surface as PNG, named after the selected image.
    ///
    /// Returns `None` unless the surface currently shows the selected image.
    pub async fn export_composite(&self, session: &PreviewSession) -> Option<Download> {
        let Some((image, pixmap)) = session.composite_snapshot().await else {
            tracing::debug!("Nothing to export: surface does not show the selection");
            return None;
        };

        let optimize = self.optimize;
        let bytes = match tokio::task::spawn_blocking(move || encode(&pixmap, optimize)).await {
            Ok(Ok(bytes)) => bytes,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Composite export failed");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Composite export task failed");
                return None;
            }
        };

        let file_name = composite_file_name(&image.name);
        tracing::info!(
            id = %image.id,
            file_name = %file_name,
            size = bytes.len(),
            optimized = optimize,
            "Composite exported"
        );

        Some(Download {
            file_name,
            content_type: "image/png".to_string(),
            bytes,
        })
    }

    /// The selected image's original bytes, name and MIME type.
    pub async fn export_original(&self, session: &PreviewSession) -> Option<Download> {
        let Some((image, bytes)) = session.original().await else {
            tracing::debug!("Nothing to export: no selection");
            return None;
        };

        tracing::info!(id = %image.id, name = %image.name, "Original exported");

        Some(Download {
            file_name: image.name,
            content_type: image.mime_type,
            bytes: bytes.to_vec(),
        })
    }
}

/// Encode the surface, re-compressing with oxipng when asked.
fn encode(pixmap: &Pixmap, optimize: bool) -> Result<Vec<u8>, FxError> {
    let png_bytes = glint_fx::encode_png(pixmap)?;
    if !optimize {
        return Ok(png_bytes);
    }

    Ok(oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    )
    .unwrap_or(png_bytes))
}

/// `photo.jpeg` -> `photo-glint.png`
pub fn composite_file_name(source_name: &str) -> String {
    let stem = match source_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => source_name,
    };
    let stem = if stem.is_empty() { "image" } else { stem };
    format!("{stem}{COMPOSITE_SUFFIX}.png")
}
