//! Shared value types for the pixelquad sprite pipeline.
//!
//! Everything here is a plain per-frame value: created by the batching layer,
//! read by the transform pipeline, dropped after the draw.
//!
//! # Conventions
//! - Atlas regions are stored in normalized atlas coordinates (0..1 spans the
//!   whole texture). Pixel rectangles are converted once, on the way in.
//! - Atlas `v` grows in the same direction as world `+y`, so atlas rows are
//!   stored bottom row first.

mod types;

pub use types::{AtlasRegion, AtlasSize, CornerOffset, SpriteInstance};
