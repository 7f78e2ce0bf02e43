//! Resizer configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by the user's file, and command-line flags override both.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [constraints]
//! max_width = 1024          # Output never wider than this...
//! max_height = 1024         # ...or taller than this
//! # min_width = 0           # Upscale narrower images (0 = unset)
//! # min_height = 0          # Upscale shorter images (0 = unset)
//!
//! [encoding]
//! format = "jpeg"           # jpeg | png | webp
//! quality = 100             # 0-100, lossy formats only
//! rotation = 0              # 0 | 90 | 180 | 270, clockwise
//!
//! [output]
//! output_type = "base64"    # base64 | blob | file
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [encoding]
//! format = "webp"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{CompressFormat, Constraints, EncodingOptions, Quality, Rotation};
use crate::pipeline::{OutputType, ResizeRequest};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Settings for one resize run. Every key has a default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizerConfig {
    /// The constraint box every output must fit.
    pub constraints: ConstraintsConfig,
    /// Output format, quality and rotation.
    pub encoding: EncodingConfig,
    /// Output representation.
    pub output: OutputConfig,
}

impl ResizerConfig {
    /// Reject boxes that cannot be satisfied and qualities outside 0-100.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.constraints;
        if c.max_width == 0 || c.max_height == 0 {
            return Err(ConfigError::Validation(
                "constraints.max_width and constraints.max_height must be non-zero".into(),
            ));
        }
        if c.min_width.is_some_and(|m| m > c.max_width) {
            return Err(ConfigError::Validation(
                "constraints.min_width must not exceed constraints.max_width".into(),
            ));
        }
        if c.min_height.is_some_and(|m| m > c.max_height) {
            return Err(ConfigError::Validation(
                "constraints.min_height must not exceed constraints.max_height".into(),
            ));
        }
        if self.encoding.quality > 100 {
            return Err(ConfigError::Validation(
                "encoding.quality must be 0-100".into(),
            ));
        }
        Ok(())
    }

    /// The request this config describes.
    pub fn to_request(&self) -> ResizeRequest {
        ResizeRequest::new(self.constraints.to_constraints())
            .with_encoding(self.encoding.to_options())
            .with_output_type(self.output.output_type)
    }
}

/// Constraint box settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConstraintsConfig {
    pub max_width: u32,
    pub max_height: u32,
    /// Minimum width; images narrower than this are scaled up. Zero means unset.
    pub min_width: Option<u32>,
    /// Minimum height; images shorter than this are scaled up. Zero means unset.
    pub min_height: Option<u32>,
}

impl Default for ConstraintsConfig {
    fn default() -> Self {
        Self {
            max_width: 1024,
            max_height: 1024,
            min_width: None,
            min_height: None,
        }
    }
}

impl ConstraintsConfig {
    pub fn to_constraints(&self) -> Constraints {
        Constraints {
            max_width: self.max_width,
            max_height: self.max_height,
            min_width: self.min_width,
            min_height: self.min_height,
        }
    }
}

/// Encoding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodingConfig {
    pub format: CompressFormat,
    /// Lossy encoding quality (0 = worst, 100 = best).
    pub quality: u32,
    /// Clockwise rotation in degrees.
    pub rotation: Rotation,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            format: CompressFormat::default(),
            quality: Quality::default().value(),
            rotation: Rotation::default(),
        }
    }
}

impl EncodingConfig {
    pub fn to_options(&self) -> EncodingOptions {
        EncodingOptions {
            format: self.format,
            quality: Quality::new(self.quality),
            rotation: self.rotation,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub output_type: OutputType,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// [`ResizerConfig::default`] as a TOML table, the layer a user file is laid over.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ResizerConfig::default()).expect("default config must serialize")
}

/// Lay `overlay` over `base`.
///
/// Sections merge key by key, so a file that only sets `[encoding] format`
/// keeps every other default. Any non-table value in `overlay` wins outright.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut defaults), toml::Value::Table(user)) => {
            for (key, value) in user {
                let merged = match defaults.remove(&key) {
                    Some(default) => merge_toml(default, value),
                    None => value,
                };
                defaults.insert(key, merged);
            }
            toml::Value::Table(defaults)
        }
        (_, overlay) => overlay,
    }
}

/// Parse the file at `path` without interpreting it.
///
/// A missing file is `Ok(None)`; the resizer then runs on stock defaults.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    Ok(Some(toml::from_str(&content)?))
}

/// Turn defaults plus an optional user layer into a checked [`ResizerConfig`].
pub fn resolve_config(
    defaults: toml::Value,
    user: Option<toml::Value>,
) -> Result<ResizerConfig, ConfigError> {
    let merged = match user {
        Some(user) => merge_toml(defaults, user),
        None => defaults,
    };
    let config: ResizerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Read the resizer settings from `path` (usually `./config.toml`).
///
/// Unknown keys and out-of-range values are errors. Command-line flags are
/// applied by the caller afterwards.
pub fn load_config(path: &Path) -> Result<ResizerConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(path)?)
}

/// The documented `config.toml` printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# Image File Resizer Configuration
# ================================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Command-line flags override this file.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Constraint box
# ---------------------------------------------------------------------------
[constraints]
# Images wider or taller than these are scaled down, keeping aspect ratio.
# When both would apply, the height limit wins.
max_width = 1024
max_height = 1024

# Images narrower or shorter than these are scaled up. 0 behaves as unset.
# Setting min = max on both axes forces an exact output size.
# min_width = 0
# min_height = 0

# ---------------------------------------------------------------------------
# Encoding
# ---------------------------------------------------------------------------
[encoding]
# Output format: "jpeg", "png" or "webp".
format = "jpeg"

# Encoding quality for JPEG and WebP (0 = worst, 100 = best). PNG ignores it.
quality = 100

# Clockwise rotation in degrees: 0, 90, 180 or 270.
rotation = 0

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# "base64" prints a data URI, "blob" writes raw bytes,
# "file" writes raw bytes under a name derived from the input.
output_type = "base64"
"##
}
