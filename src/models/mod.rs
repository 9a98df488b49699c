pub mod config;
pub mod image;
pub mod params;
pub mod quantize;

pub use self::image::{ImageId, ImageSummary, IncomingFile};
pub use config::{AppConfig, ExportConfig, PreviewConfig, QuantizerConfig, RegistryConfig};
pub use params::{EffectParameters, Tint};
pub use quantize::{
    ColorSystem, DarkDither, DistanceMetric, DitherMode, EightDotMode, OutputFormat,
    QuantizerOptions,
};
