//! PNG serialization of a composited surface.

use std::io::Cursor;
use tiny_skia::Pixmap;

use crate::FxError;

/// Encode a pixmap as an 8-bit RGBA PNG (un-premultiplied).
pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, FxError> {
    let rgba: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, pixmap.width(), pixmap.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&rgba)?;
    }
    Ok(buf.into_inner())
}
