//! Shared fixtures for unit tests.

use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

use crate::models::IncomingFile;

/// Encode a `width` x `height` horizontal gradient as PNG bytes.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
    });
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, ImageFormat::Png)
        .expect("encode fixture png");
    buf.into_inner()
}

pub fn png_file(name: &str, width: u32, height: u32) -> IncomingFile {
    IncomingFile::new(name, "image/png", png_bytes(width, height))
}
