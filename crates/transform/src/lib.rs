//! Sprite transform pipeline: per-corner projection and atlas sampling.
//!
//! For every (instance, corner) pair the pipeline produces a clip-space
//! position and the atlas coordinate to sample there. Each pair is a pure
//! function of its inputs.
//!
//! # Invariants
//! - Atlas regions are normalized; the only unit conversion is
//!   `extents * atlas_size / pixels_per_unit` when sizing the quad.
//! - Pixel snapping applies to the instance center, never to expanded corners.
//! - Higher layers map to larger depth values and are drawn on top.
//! - Invalid cameras and configs are rejected at construction, never per draw.

pub mod camera;
pub mod config;
pub mod depth;
pub mod dispatch;
mod error;
pub mod fetch;
pub mod projection;
pub mod sampling;

pub use camera::Camera;
pub use config::{FilterMode, TransformConfig};
pub use dispatch::{DrawOutput, DrawStats, QuadVertex, QuadVertices, transform_draw, transform_instance};
pub use error::{AtlasError, CameraError, ConfigError};
pub use fetch::{Atlas, Rgba};

pub use pixelquad_common::{AtlasRegion, AtlasSize, CornerOffset, SpriteInstance};
