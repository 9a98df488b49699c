//! Batch quantization of every registered image into one ZIP bundle.
//!
//! Images are quantized one at a time in upload order. Once `max_entries`
//! images have been processed the rest are excluded. Every image ends up in
//! the bundle's `manifest.json` as included, failed or excluded, so callers
//! can tell what is missing from the archive.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::sync::Arc;
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::quantizer::{PaletteQuantizer, QuantizeError, QuantizedOutput};
use crate::models::{ImageId, ImageSummary, OutputFormat, QuantizerOptions};

/// Name of the manifest entry inside every bundle
pub const MANIFEST_NAME: &str = "manifest.json";

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("Failed to write archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Failed to write archive entry: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// What happened to one image of the batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntryStatus {
    /// Quantized and stored in the archive as `file`
    Included { file: String },
    /// The quantizer rejected this image
    Failed { error: String },
    /// Past the batch capacity; not processed
    Excluded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub id: ImageId,
    pub name: String,
    #[serde(flatten)]
    pub status: EntryStatus,
}

/// Contents of `manifest.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchManifest {
    pub format: OutputFormat,
    pub entries: Vec<BatchEntry>,
}

impl BatchManifest {
    pub fn count(&self, pred: impl Fn(&EntryStatus) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.status)).count()
    }
}

/// Quantizer results ready to be bundled
#[derive(Debug)]
pub struct BatchOutcome {
    pub manifest: BatchManifest,
    outputs: Vec<(String, Vec<u8>)>,
}

impl BatchOutcome {
    /// Write the outputs and the manifest into a deflated ZIP archive.
    pub fn into_archive(self) -> Result<Vec<u8>, BundleError> {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for (name, bytes) in &self.outputs {
            writer.start_file(name.as_str(), options)?;
            writer.write_all(bytes)?;
        }
        writer.start_file(MANIFEST_NAME, options)?;
        writer.write_all(&serde_json::to_vec_pretty(&self.manifest)?)?;

        Ok(writer.finish()?.into_inner())
    }
}

/// Quantize `images` in order, processing at most `max_entries` of them.
///
/// A missing quantizer binary aborts the whole batch; any other failure is
/// recorded against its image and the batch continues.
pub async fn quantize_batch(
    quantizer: &dyn PaletteQuantizer,
    images: Vec<(ImageSummary, Arc<[u8]>)>,
    options: &QuantizerOptions,
    max_entries: usize,
) -> Result<BatchOutcome, QuantizeError> {
    let mut entries = Vec::with_capacity(images.len());
    let mut outputs = Vec::new();
    let mut used = HashSet::from([MANIFEST_NAME.to_string()]);

    for (index, (image, bytes)) in images.into_iter().enumerate() {
        let status = if index >= max_entries {
            tracing::warn!(
                id = %image.id,
                name = %image.name,
                max_entries,
                "Batch capacity reached, image excluded"
            );
            EntryStatus::Excluded
        } else {
            match quantizer.quantize(&bytes, &image.name, options).await {
                Ok(QuantizedOutput {
                    file_name, bytes, ..
                }) => {
                    let file = unique_entry_name(&file_name, &mut used);
                    outputs.push((file.clone(), bytes));
                    EntryStatus::Included { file }
                }
                Err(e @ QuantizeError::BinaryNotFound(_)) => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        id = %image.id,
                        name = %image.name,
                        error = %e,
                        "Batch entry failed"
                    );
                    EntryStatus::Failed {
                        error: e.to_string(),
                    }
                }
            }
        };
        entries.push(BatchEntry {
            id: image.id,
            name: image.name,
            status,
        });
    }

    let manifest = BatchManifest {
        format: options.output,
        entries,
    };
    tracing::info!(
        included = manifest.count(|s| matches!(s, EntryStatus::Included { .. })),
        failed = manifest.count(|s| matches!(s, EntryStatus::Failed { .. })),
        excluded = manifest.count(|s| matches!(s, EntryStatus::Excluded)),
        "Batch quantization finished"
    );

    Ok(BatchOutcome { manifest, outputs })
}

/// `a.png`, then `a-2.png`, `a-3.png` for repeated names.
fn unique_entry_name(name: &str, used: &mut HashSet<String>) -> String {
    if used.insert(name.to_string()) {
        return name.to_string();
    }
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) => (stem, format!(".{ext}")),
        None => (name, String::new()),
    };
    let mut n = 2;
    loop {
        let candidate = format!("{stem}-{n}{ext}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
