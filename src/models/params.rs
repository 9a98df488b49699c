use glint_fx::{FxParams, Rgb};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Gradient tint, serialized as a `#rrggbb` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tint(pub Rgb);

impl FromStr for Tint {
    type Err = glint_fx::ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Tint)
    }
}

impl fmt::Display for Tint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Serialize for Tint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Tint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// User-controlled effect settings read by every render.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct EffectParameters {
    /// Effect strength, 0..=1
    pub intensity: f32,
    /// Grain amount, 0..=1
    pub grain: f32,
    /// Gradient tint as `#rrggbb`
    #[schema(value_type = String, example = "#ff4fd8")]
    pub tint: Tint,
}

impl EffectParameters {
    /// Build a parameter set, clamping the scalar fields into 0..=1.
    pub fn new(intensity: f32, grain: f32, tint: Rgb) -> Self {
        Self {
            intensity: clamp_unit(intensity),
            grain: clamp_unit(grain),
            tint: Tint(tint),
        }
    }

    pub fn set_intensity(&mut self, value: f32) {
        self.intensity = clamp_unit(value);
    }

    pub fn set_grain(&mut self, value: f32) {
        self.grain = clamp_unit(value);
    }

    pub fn set_tint(&mut self, tint: Rgb) {
        self.tint = Tint(tint);
    }

    /// Combine with the animation seed into compositor inputs.
    pub fn to_fx(&self, seed: u64) -> FxParams {
        FxParams {
            intensity: self.intensity,
            grain: self.grain,
            tint: self.tint.0,
            seed,
        }
    }
}

impl Default for EffectParameters {
    fn default() -> Self {
        Self::new(0.5, 0.35, Rgb::new(0xff, 0x4f, 0xd8))
    }
}

/// NaN collapses to 0 so the parameter set always stays comparable.
fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}
