//! 8-bit RGB colors used by the overlay layers.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Fixed accent blue used at the far end of the tint gradient.
pub const ACCENT_BLUE: Rgb = Rgb::new(0x3b, 0x82, 0xf6);

/// Fixed accent cyan used for sparkle samples.
pub const ACCENT_CYAN: Rgb = Rgb::new(0x22, 0xd3, 0xee);

/// An opaque sRGB color with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to a tiny-skia color with the given alpha (clamped to 0..=1).
    pub fn with_alpha(self, alpha: f32) -> tiny_skia::Color {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, a)
    }
}

/// Error returned when a hex color string cannot be parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseColorError {
    /// Hex string has invalid length (must be 3 or 6 characters after stripping '#')
    InvalidLength,
    /// Invalid hexadecimal character encountered
    InvalidHex(ParseIntError),
}

impl From<ParseIntError> for ParseColorError {
    fn from(err: ParseIntError) -> Self {
        ParseColorError::InvalidHex(err)
    }
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseColorError::InvalidLength => {
                write!(f, "invalid hex color length (expected 3 or 6 characters)")
            }
            ParseColorError::InvalidHex(err) => write!(f, "invalid hex character: {}", err),
        }
    }
}

impl std::error::Error for ParseColorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseColorError::InvalidHex(err) => Some(err),
            _ => None,
        }
    }
}

impl FromStr for Rgb {
    type Err = ParseColorError;

    /// Parse `#RRGGBB`, `RRGGBB`, `#RGB` or `RGB` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if !s.is_ascii() {
            return Err(ParseColorError::InvalidLength);
        }

        match s.len() {
            3 => {
                let r = u8::from_str_radix(&s[0..1], 16)? * 17;
                let g = u8::from_str_radix(&s[1..2], 16)? * 17;
                let b = u8::from_str_radix(&s[2..3], 16)? * 17;
                Ok(Self::new(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&s[0..2], 16)?;
                let g = u8::from_str_radix(&s[2..4], 16)?;
                let b = u8::from_str_radix(&s[4..6], 16)?;
                Ok(Self::new(r, g, b))
            }
            _ => Err(ParseColorError::InvalidLength),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_form() {
        let c: Rgb = "#FF4FD8".parse().unwrap();
        assert_eq!(c, Rgb::new(0xff, 0x4f, 0xd8));
    }

    #[test]
    fn test_parse_short_form_without_hash() {
        let c: Rgb = "f0a".parse().unwrap();
        assert_eq!(c, Rgb::new(0xff, 0x00, 0xaa));
    }

    #[test]
    fn test_parse_rejects_bad_length() {
        assert_eq!(
            "#12345".parse::<Rgb>(),
            Err(ParseColorError::InvalidLength)
        );
    }

    #[test]
    fn test_parse_rejects_non_hex() {
        assert!(matches!(
            "#zz0000".parse::<Rgb>(),
            Err(ParseColorError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_parse_rejects_multibyte_input() {
        assert!("#é00".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_display_round_trips_lowercase() {
        assert_eq!(Rgb::new(0, 128, 255).to_string(), "#0080ff");
    }

    #[test]
    fn test_with_alpha_clamps() {
        let c = Rgb::WHITE.with_alpha(2.0);
        assert_eq!(c.alpha(), 1.0);
    }
}
