//! Full-frame effect compositing.
//!
//! [`Compositor::compose`] turns a decoded image and a parameter set into a
//! finished preview surface:
//!
//! 1. Bound the size with [`preview_dimensions`]
//! 2. Resize (triangle filter) and run the [`ToneFilter`]
//!    ([`Compositor::compose_base`])
//! 3. Draw the result onto a cleared surface
//! 4. Tint gradient (soft light), stripes (overlay), sparkles (screen)
//!
//! Every call is a full redraw. Output is a pure function of the inputs.

use image::imageops::{self, FilterType};
use image::RgbaImage;
use tiny_skia::{Color, IntSize, Pixmap, PixmapPaint, Transform};

use crate::color::Rgb;
use crate::geometry::{preview_dimensions, DEFAULT_MAX_WIDTH};
use crate::overlay::{draw_sparkles, draw_stripes, draw_tint_gradient};
use crate::tone::ToneFilter;
use crate::FxError;

/// Inputs that shape a composite besides the image itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FxParams {
    /// Effect strength, 0..=1.
    pub intensity: f32,
    /// Grain amount, 0..=1.
    pub grain: f32,
    /// Color of the gradient's first stop.
    pub tint: Rgb,
    /// Animation seed for the sparkle hash.
    pub seed: u64,
}

impl Default for FxParams {
    fn default() -> Self {
        Self {
            intensity: 0.5,
            grain: 0.35,
            tint: Rgb::new(0xff, 0x4f, 0xd8),
            seed: 0,
        }
    }
}

/// Produces preview surfaces bounded to a maximum width.
#[derive(Debug, Clone, Copy)]
pub struct Compositor {
    max_width: u32,
}

impl Compositor {
    pub fn new(max_width: u32) -> Self {
        Self {
            max_width: max_width.max(1),
        }
    }

    pub fn max_width(&self) -> u32 {
        self.max_width
    }

    /// Surface size for a source image of the given size.
    pub fn surface_size(&self, width: u32, height: u32) -> (u32, u32) {
        preview_dimensions(width, height, self.max_width)
    }

    /// The scaled, toned image every composite starts from, before any
    /// overlay is drawn.
    pub fn compose_base(&self, image: &RgbaImage, intensity: f32) -> Result<Pixmap, FxError> {
        let (src_w, src_h) = image.dimensions();
        if src_w == 0 || src_h == 0 {
            return Err(FxError::EmptyImage {
                width: src_w,
                height: src_h,
            });
        }
        let (width, height) = self.surface_size(src_w, src_h);

        let mut base = if (width, height) == (src_w, src_h) {
            image.clone()
        } else {
            imageops::resize(image, width, height, FilterType::Triangle)
        };
        ToneFilter::from_intensity(intensity).apply(&mut base);
        to_pixmap(base)
    }

    /// Render `image` with `params` into a new surface.
    pub fn compose(&self, image: &RgbaImage, params: &FxParams) -> Result<Pixmap, FxError> {
        let base = self.compose_base(image, params.intensity)?;
        let (width, height) = (base.width(), base.height());

        let mut surface =
            Pixmap::new(width, height).ok_or(FxError::SurfaceAllocation { width, height })?;
        surface.fill(Color::TRANSPARENT);
        surface.draw_pixmap(
            0,
            0,
            base.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );

        draw_tint_gradient(&mut surface, params.tint, params.intensity, params.grain);
        draw_stripes(&mut surface, params.intensity, params.grain);
        draw_sparkles(&mut surface, params.intensity, params.grain, params.seed);

        Ok(surface)
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WIDTH)
    }
}

/// Convert straight-alpha RGBA8 into a premultiplied pixmap.
fn to_pixmap(image: RgbaImage) -> Result<Pixmap, FxError> {
    let (width, height) = image.dimensions();
    let size =
        IntSize::from_wh(width, height).ok_or(FxError::SurfaceAllocation { width, height })?;

    let mut data = image.into_raw();
    for px in data.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a < 255 {
            for c in &mut px[..3] {
                *c = ((*c as u16 * a + 127) / 255) as u8;
            }
        }
    }

    Pixmap::from_vec(data, size).ok_or(FxError::SurfaceAllocation { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn gradient_image(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 7 % 256) as u8, (y * 5 % 256) as u8, 90, 255])
        })
    }

    #[test]
    fn test_surface_is_bounded() {
        let surface = Compositor::default()
            .compose(&gradient_image(2000, 1000), &FxParams::default())
            .unwrap();
        assert_eq!((surface.width(), surface.height()), (1024, 512));
    }

    #[test]
    fn test_same_inputs_same_pixels() {
        let image = gradient_image(120, 80);
        let params = FxParams {
            intensity: 0.7,
            grain: 0.6,
            tint: Rgb::new(10, 200, 30),
            seed: 4,
        };
        let compositor = Compositor::default();
        let a = compositor.compose(&image, &params).unwrap();
        let b = compositor.compose(&image, &params).unwrap();
        assert_eq!(a.data(), b.data());
    }

    #[test]
    fn test_seed_changes_sparkles() {
        let image = gradient_image(120, 80);
        let params = FxParams {
            intensity: 1.0,
            grain: 1.0,
            tint: Rgb::BLACK,
            seed: 0,
        };
        let compositor = Compositor::default();
        let a = compositor.compose(&image, &params).unwrap();
        let b = compositor
            .compose(&image, &FxParams { seed: 1, ..params })
            .unwrap();
        assert_ne!(a.data(), b.data());
    }

    #[test]
    fn test_tint_changes_output() {
        let image = gradient_image(64, 64);
        let compositor = Compositor::default();
        let params = FxParams::default();
        let a = compositor.compose(&image, &params).unwrap();
        let b = compositor
            .compose(
                &image,
                &FxParams {
                    tint: Rgb::new(0, 255, 0),
                    ..params
                },
            )
            .unwrap();
        assert_ne!(a.data(), b.data());
    }

    #[test]
    fn test_opaque_input_stays_opaque() {
        let surface = Compositor::default()
            .compose(&gradient_image(40, 30), &FxParams::default())
            .unwrap();
        assert!(surface.pixels().iter().all(|p| p.alpha() == 255));
    }

    #[test]
    fn test_empty_image_rejected() {
        let err = Compositor::default()
            .compose(&RgbaImage::new(0, 0), &FxParams::default())
            .unwrap_err();
        assert!(matches!(err, FxError::EmptyImage { .. }));
    }

    #[test]
    fn test_premultiply_transparent_pixel() {
        let image = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 0]));
        let pixmap = to_pixmap(image).unwrap();
        assert_eq!(pixmap.data(), &[0, 0, 0, 0]);
    }
}
