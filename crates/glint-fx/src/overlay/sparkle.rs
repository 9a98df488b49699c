//! Sparkle layer.
//!
//! Sample positions come from a classic `fract(sin(x) * k)` style hash driven
//! by the sample index and the animation seed. The constants are fixed; any
//! change to them changes every rendered preview.
//!
//! | Axis | Index factor | Seed factor | Amplitude    | Trig  |
//! |------|--------------|-------------|--------------|-------|
//! | x    | 12.9898      | 1.7         | 43758.5453   | `sin` |
//! | y    | 78.233       | 0.9         | 12345.6789   | `cos` |
//!
//! The hash is evaluated in `f64` so it stays a pure function of
//! `(index, width, height, seed)` on every platform.

use tiny_skia::{BlendMode, Paint, Pixmap, Rect, Transform};

use crate::color::ACCENT_CYAN;

/// Upper bound on samples per render.
pub const MAX_SPARKLES: u32 = 1400;

const X_INDEX_FACTOR: f64 = 12.9898;
const X_SEED_FACTOR: f64 = 1.7;
const X_AMPLITUDE: f64 = 43758.5453;
const Y_INDEX_FACTOR: f64 = 78.233;
const Y_SEED_FACTOR: f64 = 0.9;
const Y_AMPLITUDE: f64 = 12345.6789;

/// Number of samples for a surface of the given size.
pub fn sparkle_count(width: u32, height: u32, grain: f32) -> u32 {
    let n = ((width + height) as f64 * 0.2 * (0.6 + grain as f64)).round();
    (n.max(0.0) as u32).min(MAX_SPARKLES)
}

/// Position of sample `index` on a `width`×`height` surface.
///
/// Both coordinates lie in `[0, width)` and `[0, height)`.
pub fn sparkle_position(index: u32, width: u32, height: u32, seed: u64) -> (f64, f64) {
    let i = index as f64;
    let s = seed as f64;
    let x = ((i * X_INDEX_FACTOR + s * X_SEED_FACTOR).sin() * X_AMPLITUDE).abs() % width as f64;
    let y = ((i * Y_INDEX_FACTOR + s * Y_SEED_FACTOR).cos() * Y_AMPLITUDE).abs() % height as f64;
    (x, y)
}

/// Side length of each sample square.
pub fn sparkle_size(intensity: f32) -> f32 {
    1.0 + intensity * 2.0
}

/// Fill alpha of each sample.
pub fn sparkle_alpha(grain: f32) -> f32 {
    0.12 + grain * 0.18
}

/// Opacity of the whole layer.
pub fn layer_alpha(grain: f32) -> f32 {
    0.35 * (0.4 + grain)
}

/// Screen-blend the seeded sparkle samples onto the surface.
pub fn draw_sparkles(pixmap: &mut Pixmap, intensity: f32, grain: f32, seed: u64) {
    let (width, height) = (pixmap.width(), pixmap.height());
    let size = sparkle_size(intensity);

    let mut paint = Paint {
        blend_mode: BlendMode::Screen,
        anti_alias: true,
        ..Default::default()
    };
    paint.set_color(ACCENT_CYAN.with_alpha(sparkle_alpha(grain) * layer_alpha(grain)));

    for index in 0..sparkle_count(width, height, grain) {
        let (x, y) = sparkle_position(index, width, height, seed);
        if let Some(rect) = Rect::from_xywh(x as f32, y as f32, size, size) {
            pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        }
    }
}
