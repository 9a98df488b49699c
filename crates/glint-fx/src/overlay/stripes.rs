//! Diagonal stripe layer.
//!
//! Bands are laid out horizontally in a local frame centred on the surface
//! and rotated by 45°. The local frame spans `±(width + height)` on both axes,
//! which always exceeds half the surface diagonal, so the rotated bands cover
//! every corner.

use tiny_skia::{BlendMode, Paint, Pixmap, Rect, Transform};

use crate::color::Rgb;

/// Rotation of the stripe frame in degrees.
const STRIPE_ANGLE: f32 = 45.0;

/// Distance between consecutive bands, in pixels.
pub fn stripe_gap(intensity: f32) -> u32 {
    let shrink = (intensity * 18.0).round() as i32;
    (38 - shrink).max(16) as u32
}

/// Thickness of a single band.
pub fn band_height(gap: u32) -> f32 {
    gap as f32 / 2.2
}

/// Fill alpha of each band.
pub fn band_alpha(grain: f32) -> f32 {
    0.08 + grain * 0.12
}

/// Opacity of the whole layer.
pub fn layer_alpha(intensity: f32) -> f32 {
    0.14 + intensity * 0.20
}

/// Overlay-blend repeating white diagonal bands across the surface.
pub fn draw_stripes(pixmap: &mut Pixmap, intensity: f32, grain: f32) {
    let (w, h) = (pixmap.width() as f32, pixmap.height() as f32);
    let gap = stripe_gap(intensity);
    let thickness = band_height(gap);
    let reach = w + h;

    let mut paint = Paint {
        blend_mode: BlendMode::Overlay,
        anti_alias: true,
        ..Default::default()
    };
    // Bands never overlap, so folding the layer opacity into each fill is
    // equivalent to a separate layer alpha.
    paint.set_color(Rgb::WHITE.with_alpha(band_alpha(grain) * layer_alpha(intensity)));

    let transform = Transform::from_rotate(STRIPE_ANGLE).post_translate(w / 2.0, h / 2.0);

    let mut y = -reach;
    while y < reach {
        if let Some(rect) = Rect::from_xywh(-reach, y, reach * 2.0, thickness) {
            pixmap.fill_rect(rect, &paint, transform, None);
        }
        y += gap as f32;
    }
}
