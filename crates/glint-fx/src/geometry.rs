//! Preview sizing.
//!
//! Pure functions, testable without decoding anything.

/// Widest preview surface produced by default.
pub const DEFAULT_MAX_WIDTH: u32 = 1024;

/// Compute the surface size for an image of `width`×`height`.
///
/// The scale factor is `min(1, max_width / width)`, so images are only ever
/// shrunk. Each side is rounded and never drops below one pixel.
///
/// # Examples
/// ```
/// # use glint_fx::preview_dimensions;
/// assert_eq!(preview_dimensions(2000, 1000, 1024), (1024, 512));
/// assert_eq!(preview_dimensions(640, 480, 1024), (640, 480));
/// ```
pub fn preview_dimensions(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    let scale = preview_scale(width, max_width);
    let w = ((width as f64 * scale).round() as u32).max(1);
    let h = ((height as f64 * scale).round() as u32).max(1);
    (w, h)
}

/// Scale factor applied to an image of the given original width.
pub fn preview_scale(width: u32, max_width: u32) -> f64 {
    if width == 0 {
        return 1.0;
    }
    (max_width as f64 / width as f64).min(1.0)
}
