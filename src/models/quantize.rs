//! Option model for the external palette quantizer.
//!
//! One option set feeds both the HTTP API and the argument vector handed to
//! the quantizer binary, so new output formats only touch this file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use utoipa::ToSchema;

/// Target machine color system
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ColorSystem {
    #[default]
    Msx1,
    Msx2,
}

/// Dithering strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum DitherMode {
    None,
    #[default]
    FloydSteinberg,
    Atkinson,
    Bayer,
}

/// Dithering of dark regions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum DarkDither {
    #[default]
    Off,
    On,
}

/// Handling of the 8-dot two-color attribute constraint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum EightDotMode {
    None,
    Fast,
    #[default]
    Basic,
    Best,
}

/// Color distance metric used for palette matching
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum DistanceMetric {
    #[default]
    Rgb,
    Hsb,
    Cie76,
    Cie94,
}

/// Packaging of the quantized output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Single quantized PNG
    #[default]
    Png,
    /// Screen 2 VRAM dump
    Sc2,
    /// Disk image
    Dsk,
    /// ROM image
    Rom,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Sc2 => "sc2",
            OutputFormat::Dsk => "dsk",
            OutputFormat::Rom => "rom",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            _ => "application/octet-stream",
        }
    }
}

/// Write the serde name of a unit enum variant (`FloydSteinberg` -> `floyd-steinberg`).
macro_rules! display_as_serde {
    ($($ty:ty),* $(,)?) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match serde_json::to_value(self) {
                    Ok(serde_json::Value::String(s)) => f.write_str(&s),
                    _ => Err(fmt::Error),
                }
            }
        }
    )*};
}

display_as_serde!(
    ColorSystem,
    DitherMode,
    DarkDither,
    EightDotMode,
    DistanceMetric,
    OutputFormat
);

/// Full option set for one quantizer run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct QuantizerOptions {
    pub color_system: ColorSystem,
    pub dither: DitherMode,
    pub dark_dither: DarkDither,
    pub eight_dot: EightDotMode,
    pub distance: DistanceMetric,
    /// Optional pre-computed color lookup table
    #[schema(value_type = Option<String>)]
    pub lut_file: Option<PathBuf>,
    pub output: OutputFormat,
    /// Free-form options passed through as `--key value`
    pub extra: BTreeMap<String, String>,
}

impl QuantizerOptions {
    /// Render the options as CLI arguments for the quantizer binary.
    ///
    /// Keys in `extra` are emitted after the known options, in key order.
    pub fn to_cli_args(&self) -> Vec<String> {
        let mut args = vec![
            "--color-system".to_string(),
            self.color_system.to_string(),
            "--dither".to_string(),
            self.dither.to_string(),
            "--dark-dither".to_string(),
            self.dark_dither.to_string(),
            "--8dot".to_string(),
            self.eight_dot.to_string(),
            "--distance".to_string(),
            self.distance.to_string(),
            "--format".to_string(),
            self.output.to_string(),
        ];
        if let Some(lut) = &self.lut_file {
            args.push("--lut".to_string());
            args.push(lut.display().to_string());
        }
        for (key, value) in &self.extra {
            args.push(format!("--{key}"));
            args.push(value.clone());
        }
        args
    }

    /// Parse `key=value,key=value` pairs into `extra`, ignoring malformed chunks.
    pub fn parse_extra(spec: &str) -> BTreeMap<String, String> {
        spec.split(',')
            .filter_map(|chunk| chunk.split_once('='))
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            .filter(|(k, _)| !k.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cli_args() {
        let args = QuantizerOptions::default().to_cli_args();
        assert_eq!(
            args,
            vec![
                "--color-system",
                "msx1",
                "--dither",
                "floyd-steinberg",
                "--dark-dither",
                "off",
                "--8dot",
                "basic",
                "--distance",
                "rgb",
                "--format",
                "png",
            ]
        );
    }

    #[test]
    fn test_lut_and_extra_args() {
        let options = QuantizerOptions {
            lut_file: Some(PathBuf::from("/tmp/table.lut")),
            extra: QuantizerOptions::parse_extra("gamma=2.2, contrast = high"),
            ..Default::default()
        };
        let args = options.to_cli_args();
        let tail: Vec<&str> = args[12..].iter().map(String::as_str).collect();
        assert_eq!(
            tail,
            vec!["--lut", "/tmp/table.lut", "--contrast", "high", "--gamma", "2.2"]
        );
    }

    #[test]
    fn test_parse_extra_skips_malformed() {
        let extra = QuantizerOptions::parse_extra("novalue,=x,a=1");
        assert_eq!(extra.len(), 1);
        assert_eq!(extra.get("a").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_deserialize_partial_options() {
        let options: QuantizerOptions =
            serde_json::from_str(r#"{"dither":"bayer","output":"rom"}"#).unwrap();
        assert_eq!(options.dither, DitherMode::Bayer);
        assert_eq!(options.output, OutputFormat::Rom);
        assert_eq!(options.color_system, ColorSystem::Msx1);
    }

    #[test]
    fn test_output_format_extension() {
        assert_eq!(OutputFormat::Dsk.extension(), "dsk");
        assert_eq!(OutputFormat::Png.content_type(), "image/png");
    }
}
