//! Explicit pipeline configuration.
//!
//! Every scale factor the transform math needs lives here and is passed into
//! each operation. Values are validated when the config is built or loaded.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

pub const DEFAULT_PIXELS_PER_UNIT: f32 = 16.0;
pub const DEFAULT_LAYER_SCALE: f32 = 1000.0;

/// Largest layer scale at which adjacent integer layers still map to distinct
/// depth values in an f32 (`Depth32Float`) buffer. A 24-bit unorm buffer has
/// fewer steps near 1.0 and needs a scale of at most 2^23.
pub const MAX_LAYER_SCALE: f32 = 16_777_216.0;

/// How the atlas is filtered when a color is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Nearest texel. Never bleeds between neighbouring atlas regions.
    #[default]
    Nearest,
    /// Bilinear. Sampling regions are inset by half a texel to avoid bleed.
    Linear,
}

/// Validated configuration for the transform pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTransformConfig", into = "RawTransformConfig")]
pub struct TransformConfig {
    pixels_per_unit: f32,
    layer_scale: f32,
    filter: FilterMode,
    snap_camera: bool,
}

/// Unvalidated on-disk form of [`TransformConfig`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
struct RawTransformConfig {
    pixels_per_unit: f32,
    layer_scale: f32,
    filter: FilterMode,
    snap_camera: bool,
}

impl Default for RawTransformConfig {
    fn default() -> Self {
        TransformConfig::default().into()
    }
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            pixels_per_unit: DEFAULT_PIXELS_PER_UNIT,
            layer_scale: DEFAULT_LAYER_SCALE,
            filter: FilterMode::Nearest,
            snap_camera: true,
        }
    }
}

impl TryFrom<RawTransformConfig> for TransformConfig {
    type Error = ConfigError;

    fn try_from(raw: RawTransformConfig) -> Result<Self, Self::Error> {
        Ok(Self::new(raw.pixels_per_unit, raw.layer_scale)?
            .with_filter(raw.filter)
            .with_snap_camera(raw.snap_camera))
    }
}

impl From<TransformConfig> for RawTransformConfig {
    fn from(config: TransformConfig) -> Self {
        Self {
            pixels_per_unit: config.pixels_per_unit,
            layer_scale: config.layer_scale,
            filter: config.filter,
            snap_camera: config.snap_camera,
        }
    }
}

impl TransformConfig {
    /// Build a config with the default filter and camera snapping enabled.
    pub fn new(pixels_per_unit: f32, layer_scale: f32) -> Result<Self, ConfigError> {
        if !pixels_per_unit.is_finite() || pixels_per_unit <= 0.0 {
            return Err(ConfigError::InvalidPixelsPerUnit(pixels_per_unit));
        }
        if !layer_scale.is_finite() || !(1.0..=MAX_LAYER_SCALE).contains(&layer_scale) {
            return Err(ConfigError::InvalidLayerScale {
                value: layer_scale,
                max: MAX_LAYER_SCALE,
            });
        }
        let config = Self {
            pixels_per_unit,
            layer_scale,
            ..Self::default()
        };
        if !config.exact_snapping() {
            tracing::warn!(
                pixels_per_unit,
                "pixels_per_unit is not a power of two; pixel snapping loses exactness far from the origin"
            );
        }
        Ok(config)
    }

    /// Whether `pixels_per_unit` is a power of two. Only then is snapping to
    /// the pixel grid exact, and so idempotent, at every world magnitude;
    /// other scales round the product and quotient and may drift by one
    /// f32 step at large coordinates.
    pub fn exact_snapping(&self) -> bool {
        let bits = self.pixels_per_unit.to_bits();
        self.pixels_per_unit.is_normal() && bits & 0x007f_ffff == 0
    }

    pub fn with_filter(mut self, filter: FilterMode) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_snap_camera(mut self, snap_camera: bool) -> Self {
        self.snap_camera = snap_camera;
        self
    }

    /// Atlas pixels per world unit.
    pub fn pixels_per_unit(&self) -> f32 {
        self.pixels_per_unit
    }

    /// Divisor mapping layers into the `[0, 1)` depth range.
    pub fn layer_scale(&self) -> f32 {
        self.layer_scale
    }

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    /// Whether the camera center is floored to the pixel grid each draw.
    pub fn snap_camera(&self) -> bool {
        self.snap_camera
    }

    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path.as_ref())?;
        let config: Self = serde_json::from_reader(file)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            pixels_per_unit = config.pixels_per_unit,
            layer_scale = config.layer_scale,
            "loaded transform config"
        );
        Ok(config)
    }

    /// Save the config as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}
