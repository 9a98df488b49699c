//! Error type for the glint-fx public API.
//!
//! [`FxError`] covers every way a composite can fail to materialize: the
//! input bytes do not decode, the decoded image has no area, the drawing
//! surface cannot be allocated, or PNG encoding of the surface fails.

use std::fmt;

/// Unified error type for decoding, compositing and encoding.
#[derive(Debug)]
pub enum FxError {
    /// The input bytes are not a decodable raster image.
    Decode(image::ImageError),
    /// The decoded image is 0 pixels wide or tall.
    EmptyImage { width: u32, height: u32 },
    /// A pixmap of the requested size could not be allocated.
    SurfaceAllocation { width: u32, height: u32 },
    /// The surface could not be serialized to PNG.
    Encode(png::EncodingError),
}

impl fmt::Display for FxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FxError::Decode(err) => write!(f, "decode error: {}", err),
            FxError::EmptyImage { width, height } => {
                write!(f, "image has no area: {}x{}", width, height)
            }
            FxError::SurfaceAllocation { width, height } => {
                write!(f, "failed to allocate {}x{} surface", width, height)
            }
            FxError::Encode(err) => write!(f, "PNG encode error: {}", err),
        }
    }
}

impl std::error::Error for FxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FxError::Decode(err) => Some(err),
            FxError::Encode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<image::ImageError> for FxError {
    fn from(err: image::ImageError) -> Self {
        FxError::Decode(err)
    }
}

impl From<png::EncodingError> for FxError {
    fn from(err: png::EncodingError) -> Self {
        FxError::Encode(err)
    }
}
