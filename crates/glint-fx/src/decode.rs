//! Image decoding via the `image` crate.

use image::RgbaImage;

use crate::FxError;

/// Decode raw file bytes into straight-alpha RGBA8 pixels.
///
/// The format is sniffed from the content, not the file name. Images with a
/// zero-length side are rejected so nothing downstream has to handle them.
pub fn decode(bytes: &[u8]) -> Result<RgbaImage, FxError> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(FxError::EmptyImage { width, height });
    }
    Ok(rgba)
}
