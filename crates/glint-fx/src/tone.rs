//! Base tonal adjustment applied to the image before overlays.
//!
//! The filter chains three primitives in a fixed order, matching the Filter
//! Effects definitions of `saturate()`, `brightness()` and `contrast()`:
//!
//! 1. **Saturation**: luminance-preserving color matrix
//! 2. **Brightness**: per-channel multiply
//! 3. **Contrast**: scale around the 0.5 midpoint
//!
//! Channels are un-premultiplied sRGB in 0..=1 and clamped after each step.
//! Alpha is left untouched.

/// Saturation gain per unit of intensity.
const SATURATION_GAIN: f32 = 0.8;
/// Brightness gain per unit of intensity.
const BRIGHTNESS_GAIN: f32 = 0.25;
/// Contrast gain per unit of intensity.
const CONTRAST_GAIN: f32 = 0.35;

/// Multipliers for the three tonal primitives. 1.0 means "no change".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneFilter {
    pub saturation: f32,
    pub brightness: f32,
    pub contrast: f32,
}

impl ToneFilter {
    /// The identity filter.
    pub const NEUTRAL: ToneFilter = ToneFilter {
        saturation: 1.0,
        brightness: 1.0,
        contrast: 1.0,
    };

    /// Derive the filter from the effect intensity (0..=1).
    pub fn from_intensity(intensity: f32) -> Self {
        Self {
            saturation: 1.0 + intensity * SATURATION_GAIN,
            brightness: 1.0 + intensity * BRIGHTNESS_GAIN,
            contrast: 1.0 + intensity * CONTRAST_GAIN,
        }
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }

    /// Filter a straight-alpha RGBA8 buffer in place.
    pub fn apply(&self, rgba: &mut [u8]) {
        if self.is_neutral() {
            return;
        }
        for px in rgba.chunks_exact_mut(4) {
            let [r, g, b] = self.apply_rgb([
                px[0] as f32 / 255.0,
                px[1] as f32 / 255.0,
                px[2] as f32 / 255.0,
            ]);
            px[0] = to_u8(r);
            px[1] = to_u8(g);
            px[2] = to_u8(b);
        }
    }

    /// Filter a single color with channels in 0..=1.
    pub fn apply_rgb(&self, rgb: [f32; 3]) -> [f32; 3] {
        let [r, g, b] = rgb;
        let s = self.saturation;

        let sr = (0.213 + 0.787 * s) * r + (0.715 - 0.715 * s) * g + (0.072 - 0.072 * s) * b;
        let sg = (0.213 - 0.213 * s) * r + (0.715 + 0.285 * s) * g + (0.072 - 0.072 * s) * b;
        let sb = (0.213 - 0.213 * s) * r + (0.715 - 0.715 * s) * g + (0.072 + 0.928 * s) * b;

        [sr, sg, sb].map(|c| {
            let c = (c.clamp(0.0, 1.0) * self.brightness).clamp(0.0, 1.0);
            ((c - 0.5) * self.contrast + 0.5).clamp(0.0, 1.0)
        })
    }
}

impl Default for ToneFilter {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

#[inline]
fn to_u8(c: f32) -> u8 {
    (c * 255.0).round() as u8
}
