use glint_fx::DEFAULT_MAX_WIDTH;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::{EffectParameters, QuantizerOptions};

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    /// Preview surface settings
    #[serde(default)]
    pub preview: PreviewConfig,

    /// Initial effect parameters
    #[serde(default)]
    pub effects: EffectParameters,

    /// Ingestion limits
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Composite export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// External palette quantizer
    #[serde(default)]
    pub quantizer: QuantizerConfig,
}

/// Configuration for the preview surface
#[derive(Debug, Deserialize, Clone)]
pub struct PreviewConfig {
    /// Widest surface in pixels; wider images are scaled down
    #[serde(default = "default_max_width")]
    pub max_width: u32,
}

fn default_max_width() -> u32 {
    DEFAULT_MAX_WIDTH
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            max_width: default_max_width(),
        }
    }
}

/// Configuration for the image registry
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RegistryConfig {
    /// Maximum number of images held at once (unlimited when absent)
    #[serde(default)]
    pub max_images: Option<usize>,
}

/// Configuration for composite export
#[derive(Debug, Deserialize, Clone)]
pub struct ExportConfig {
    /// Re-compress exported PNGs with oxipng
    #[serde(default = "default_optimize")]
    pub optimize: bool,
}

fn default_optimize() -> bool {
    true
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            optimize: default_optimize(),
        }
    }
}

/// Configuration for the external quantizer
#[derive(Debug, Deserialize, Clone)]
pub struct QuantizerConfig {
    /// Path to the quantizer executable; quantization is disabled when absent
    #[serde(default)]
    pub binary: Option<PathBuf>,

    /// Options used when a request does not supply its own
    #[serde(default)]
    pub options: QuantizerOptions,

    /// Images processed by one batch run; later uploads are excluded
    #[serde(default = "default_max_batch")]
    pub max_batch: usize,
}

fn default_max_batch() -> usize {
    32
}

impl Default for QuantizerConfig {
    fn default() -> Self {
        Self {
            binary: None,
            options: QuantizerOptions::default(),
            max_batch: default_max_batch(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file, falling back to defaults.
    ///
    /// A missing path, unreadable file or parse error all yield the default
    /// configuration with a warning.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::debug!("No config file configured, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(config) => {
                    tracing::info!(
                        path = %path.display(),
                        max_width = config.preview.max_width,
                        max_images = ?config.registry.max_images,
                        quantizer = config.quantizer.binary.is_some(),
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Parse configuration from YAML, normalizing out-of-range values.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        let mut config: Self = serde_yaml::from_str(content)?;
        let effects = config.effects;
        config.effects = EffectParameters::new(effects.intensity, effects.grain, effects.tint.0);
        config.preview.max_width = config.preview.max_width.max(1);
        Ok(config)
    }
}
