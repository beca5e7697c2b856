//! wgpu render backend for sprite quads.
//!
//! Draws instanced quads into a low-resolution target sized to the camera's
//! pixel resolution, then upscales that target onto the caller's surface
//! with letterboxing. The vertex shader evaluates the same transform as
//! `pixelquad-transform`.
//!
//! # Invariants
//! - Renderer never mutates the instances or camera it is given.
//! - Window and surface handling belong to the caller.
//! - Instances stream through a fixed-size buffer in batches of
//!   [`DYN_QUAD_CAP`], or are uploaded once into a [`SpriteBuffer`].
//! - The first pass of a frame clears; later layers load, so depth and color
//!   carry across layers until [`SpriteFrame::present`].

mod batch;
mod buffer;
mod frame;
mod gpu;
mod shaders;

pub use batch::{DYN_QUAD_CAP, QuadBatch};
pub use buffer::{SpriteBuffer, encode_sprites};
pub use frame::SpriteFrame;
pub use gpu::{GpuError, GpuSprite, GpuUniform, SpriteRenderer};
pub use shaders::{SPRITE_SHADER, UPSCALE_SHADER, sprite_vertex};
