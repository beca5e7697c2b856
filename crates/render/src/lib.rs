//! Rendering adapter: renderer-agnostic interface over the transform pipeline.
//!
//! # Invariants
//! - Renderers never mutate the instances, camera, or atlas of a draw.
//! - Every renderer runs the same transform math; only rasterization differs.
//! - Depth is cleared to `0.0` and tested with `GreaterEqual`, so higher
//!   layers land on top and equal layers keep submission order.

mod renderer;
mod software;
mod viewport;

pub use renderer::{DebugTextRenderer, DrawCall, Renderer};
pub use software::{Frame, MAX_TARGET_DIMENSION, RenderError, SoftwareRenderer};
pub use viewport::letterbox_extents;

pub fn crate_info() -> &'static str {
    "pixelquad-render v0.1.0"
}
