//! glint-fx: deterministic procedural effects for image previews
//!
//! This crate owns the pixel work behind a glint preview: decoding uploaded
//! bytes, bounding the preview size, the tonal adjustment, the three
//! procedural overlay layers, and PNG serialization of the result. It has no
//! notion of sessions, selection or scheduling.
//!
//! # Quick Start
//!
//! ```
//! use glint_fx::{Compositor, FxParams, Rgb};
//! use image::{Rgba, RgbaImage};
//!
//! let image = RgbaImage::from_pixel(64, 32, Rgba([120, 80, 40, 255]));
//! let params = FxParams {
//!     intensity: 1.0,
//!     grain: 0.5,
//!     tint: Rgb::new(0, 0, 0),
//!     seed: 0,
//! };
//! let surface = Compositor::default().compose(&image, &params).unwrap();
//! assert_eq!((surface.width(), surface.height()), (64, 32));
//!
//! let png = glint_fx::encode_png(&surface).unwrap();
//! assert!(png.starts_with(b"\x89PNG"));
//! ```
//!
//! # Layer Order
//!
//! | Step | Layer          | Blend      | Driven by                  |
//! |------|----------------|------------|----------------------------|
//! | 1    | base image     | source-over| intensity (tone filter)    |
//! | 2    | tint gradient  | soft light | tint, intensity, grain     |
//! | 3    | stripes        | overlay    | intensity, grain           |
//! | 4    | sparkles       | screen     | intensity, grain, seed     |
//!
//! # Determinism
//!
//! For a fixed image, [`FxParams`] and maximum width, [`Compositor::compose`]
//! returns byte-identical pixmaps. Only the seed moves the sparkle samples.

pub mod color;
pub mod compositor;
pub mod decode;
pub mod encode;
pub mod error;
pub mod geometry;
pub mod overlay;
pub mod tone;


pub use color::{ParseColorError, Rgb, ACCENT_BLUE, ACCENT_CYAN};
pub use compositor::{Compositor, FxParams};
pub use decode::decode;
pub use encode::encode_png;
pub use error::FxError;
pub use geometry::{preview_dimensions, preview_scale, DEFAULT_MAX_WIDTH};
pub use tone::ToneFilter;

pub use image::RgbaImage;
pub use tiny_skia::Pixmap;
