//! Test fixtures: images generated in memory.

use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// Encode a `width` x `height` test pattern as PNG
pub fn png(width: u32, height: u32) -> Vec<u8> {
    encode(pattern(width, height), ImageFormat::Png)
}

/// A solid color PNG
pub fn solid_png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    encode(RgbaImage::from_pixel(width, height, Rgba(color)), ImageFormat::Png)
}

/// Bytes that no decoder accepts
pub fn garbage() -> Vec<u8> {
    b"definitely not an image".to_vec()
}

fn pattern(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 3 % 256) as u8, (y * 5 % 256) as u8, ((x + y) % 256) as u8, 255])
    })
}

fn encode(image: RgbaImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, format).expect("encode fixture");
    buf.into_inner()
}
