//! Contract with the external palette-quantization engine.
//!
//! Palette reduction itself is not implemented here. [`ExternalQuantizer`]
//! hands the image to a separate binary and collects the file it writes:
//!
//! ```text
//! <binary> --input <dir>/input.<ext> --output <dir>/<stem>.<format> <options...>
//! ```
//!
//! Both paths live in a temporary directory removed after the run.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::process::Command;

use crate::models::QuantizerOptions;

#[derive(Debug, Error)]
pub enum QuantizeError {
    #[error("Quantizer binary not found: {0}")]
    BinaryNotFound(PathBuf),

    #[error("Quantizer exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("Quantizer wrote no output file")]
    MissingOutput,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// File produced by a quantizer run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizedOutput {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Trait for palette quantization engines
#[async_trait]
pub trait PaletteQuantizer: Send + Sync {
    /// Quantize `bytes` (an encoded image called `name`) with `options`.
    async fn quantize(
        &self,
        bytes: &[u8],
        name: &str,
        options: &QuantizerOptions,
    ) -> Result<QuantizedOutput, QuantizeError>;
}

/// Runs a quantizer executable once per request
#[derive(Debug, Clone)]
pub struct ExternalQuantizer {
    binary: PathBuf,
}

impl ExternalQuantizer {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl PaletteQuantizer for ExternalQuantizer {
    async fn quantize(
        &self,
        bytes: &[u8],
        name: &str,
        options: &QuantizerOptions,
    ) -> Result<QuantizedOutput, QuantizeError> {
        let (stem, ext) = split_name(name);
        let workdir = tempfile::tempdir()?;
        let input = workdir.path().join(format!("input.{ext}"));
        let file_name = format!("{stem}.{}", options.output.extension());
        let output = workdir.path().join(&file_name);

        tokio::fs::write(&input, bytes).await?;

        let args = options.to_cli_args();
        tracing::debug!(
            binary = %self.binary.display(),
            input = %input.display(),
            ?args,
            "Running quantizer"
        );

        let result = Command::new(&self.binary)
            .arg("--input")
            .arg(&input)
            .arg("--output")
            .arg(&output)
            .args(&args)
            .output()
            .await;
        let result = match result {
            Ok(result) => result,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(QuantizeError::BinaryNotFound(self.binary.clone()));
            }
            Err(e) => return Err(e.into()),
        };

        if !result.status.success() {
            return Err(QuantizeError::Failed {
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        let bytes = match tokio::fs::read(&output).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(QuantizeError::MissingOutput);
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            file_name = %file_name,
            size = bytes.len(),
            format = %options.output,
            "Quantization finished"
        );

        Ok(QuantizedOutput {
            file_name,
            content_type: options.output.content_type().to_string(),
            bytes,
        })
    }
}

/// Split `photo.JPG` into (`photo`, `jpg`), defaulting to (`image`, `img`).
fn split_name(name: &str) -> (String, String) {
    let base = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    match base.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            (stem.to_string(), ext.to_ascii_lowercase())
        }
        _ if !base.is_empty() => (base.to_string(), "img".to_string()),
        _ => ("image".to_string(), "img".to_string()),
    }
}
