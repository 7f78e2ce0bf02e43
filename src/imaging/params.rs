//! Parameter types for image operations.
//!
//! These types describe *what* to produce, not *how* to produce it. They are
//! the interface between the [`operations`](super::operations) module (which
//! decides the geometry) and the [`backend`](super::backend) (which owns the
//! pixels).
//!
//! ## Types
//!
//! - [`Constraints`]: The constraint box: required max width/height, optional min width/height.
//! - [`Quality`]: Lossy encoding quality (0–100, default 100). Clamped on construction.
//! - [`Rotation`]: Quarter-turn rotation applied while drawing (0, 90, 180, 270).
//! - [`CompressFormat`]: Output encoding (jpeg, png, webp).
//! - [`EncodingOptions`]: Format + quality + rotation for one render.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    #[error("unsupported format '{0}' (expected jpeg, png or webp)")]
    Format(String),
    #[error("unsupported rotation '{0}' (expected 0, 90, 180 or 270)")]
    Rotation(String),
}

/// The box an output image must fit in.
///
/// `min_width <= max_width` and `min_height <= max_height` are the caller's
/// responsibility. A minimum of `Some(0)` behaves exactly like `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraints {
    pub max_width: u32,
    pub max_height: u32,
    pub min_width: Option<u32>,
    pub min_height: Option<u32>,
}

impl Constraints {
    /// A box with only upper bounds.
    pub fn max(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width,
            max_height,
            min_width: None,
            min_height: None,
        }
    }

    pub fn with_min(mut self, min_width: u32, min_height: u32) -> Self {
        self.min_width = Some(min_width);
        self.min_height = Some(min_height);
        self
    }

    /// A box whose min and max coincide: the output is always exactly this size.
    pub fn exact(width: u32, height: u32) -> Self {
        Self::max(width, height).with_min(width, height)
    }
}

/// Quality setting for lossy image encoding (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.min(100))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// Quality as the `0.0..=1.0` fraction rendering surfaces expect.
    pub fn as_fraction(self) -> f32 {
        self.0 as f32 / 100.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(100)
    }
}

impl From<u32> for Quality {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<Quality> for u32 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

/// Clockwise rotation applied to the drawn image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn degrees(self) -> u32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    pub fn radians(self) -> f64 {
        self.degrees() as f64 * std::f64::consts::PI / 180.0
    }

    /// Quarter turns put the image on its side, so the canvas axes swap.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

impl TryFrom<u32> for Rotation {
    type Error = ParamError;

    fn try_from(degrees: u32) -> Result<Self, Self::Error> {
        match degrees {
            0 | 360 => Ok(Rotation::Deg0),
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            other => Err(ParamError::Rotation(other.to_string())),
        }
    }
}

impl From<Rotation> for u32 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

impl FromStr for Rotation {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let degrees: u32 = s
            .trim()
            .parse()
            .map_err(|_| ParamError::Rotation(s.to_string()))?;
        Rotation::try_from(degrees)
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degrees())
    }
}

/// Output encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressFormat {
    #[default]
    Jpeg,
    Png,
    Webp,
}

impl CompressFormat {
    /// Lowercase name, also used as the output file extension.
    pub fn name(self) -> &'static str {
        match self {
            CompressFormat::Jpeg => "jpeg",
            CompressFormat::Png => "png",
            CompressFormat::Webp => "webp",
        }
    }

    /// `image/<name>`, the content type stamped on every output.
    pub fn mime_type(self) -> &'static str {
        match self {
            CompressFormat::Jpeg => "image/jpeg",
            CompressFormat::Png => "image/png",
            CompressFormat::Webp => "image/webp",
        }
    }
}

impl FromStr for CompressFormat {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(CompressFormat::Jpeg),
            "png" => Ok(CompressFormat::Png),
            "webp" => Ok(CompressFormat::Webp),
            _ => Err(ParamError::Format(s.to_string())),
        }
    }
}

impl fmt::Display for CompressFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything the surface needs to know to serialize one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodingOptions {
    pub format: CompressFormat,
    pub quality: Quality,
    pub rotation: Rotation,
}
