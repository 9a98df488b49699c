//! Procedural overlay layers.
//!
//! Each layer draws with its own blend mode and alpha baked into its paint,
//! so nothing leaks from one layer into the next and later draws are plain
//! source-over.

pub mod gradient;
pub mod sparkle;
pub mod stripes;

pub use gradient::draw_tint_gradient;
pub use sparkle::{draw_sparkles, sparkle_count, sparkle_position, MAX_SPARKLES};
pub use stripes::{draw_stripes, stripe_gap};
