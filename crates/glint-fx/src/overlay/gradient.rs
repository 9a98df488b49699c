//! Tint gradient layer.

use tiny_skia::{
    BlendMode, GradientStop, LinearGradient, Paint, Pixmap, Point, Rect, SpreadMode, Transform,
};

use crate::color::{Rgb, ACCENT_BLUE};

/// Alpha of the tint stop (top-left corner).
pub fn tint_alpha(intensity: f32) -> f32 {
    0.12 + intensity * 0.25
}

/// Alpha of the accent stop (bottom-right corner).
pub fn accent_alpha(grain: f32) -> f32 {
    0.10 + grain * 0.30
}

/// Soft-light a diagonal tint → accent-blue gradient over the whole surface.
pub fn draw_tint_gradient(pixmap: &mut Pixmap, tint: Rgb, intensity: f32, grain: f32) {
    let (w, h) = (pixmap.width() as f32, pixmap.height() as f32);
    let Some(rect) = Rect::from_xywh(0.0, 0.0, w, h) else {
        return;
    };

    let stops = vec![
        GradientStop::new(0.0, tint.with_alpha(tint_alpha(intensity))),
        GradientStop::new(1.0, ACCENT_BLUE.with_alpha(accent_alpha(grain))),
    ];
    // Degenerate only for a 0x0 surface, already excluded above
    let Some(shader) = LinearGradient::new(
        Point::from_xy(0.0, 0.0),
        Point::from_xy(w, h),
        stops,
        SpreadMode::Pad,
        Transform::identity(),
    ) else {
        return;
    };

    let paint = Paint {
        shader,
        blend_mode: BlendMode::SoftLight,
        anti_alias: false,
        ..Default::default()
    };
    pixmap.fill_rect(rect, &paint, Transform::identity(), None);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_alphas() {
        assert!((tint_alpha(1.0) - 0.37).abs() < 1e-6);
        assert!((accent_alpha(1.0) - 0.40).abs() < 1e-6);
        assert!((tint_alpha(0.0) - 0.12).abs() < 1e-6);
    }

    #[test]
    fn test_gradient_changes_opaque_surface() {
        let mut pixmap = Pixmap::new(16, 16).unwrap();
        pixmap.fill(tiny_skia::Color::from_rgba8(128, 128, 128, 255));
        let before = pixmap.data().to_vec();

        draw_tint_gradient(&mut pixmap, Rgb::new(255, 0, 0), 1.0, 1.0);

        assert_ne!(before, pixmap.data());
        // Soft light onto an opaque backdrop keeps it opaque
        assert!(pixmap.pixels().iter().all(|p| p.alpha() == 255));
    }
}
