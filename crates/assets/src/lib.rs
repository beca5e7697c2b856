//! Atlas assets: PNG loading and named sprite rectangles.
//!
//! Images are authored with the origin at the top-left. The transform
//! pipeline samples with the origin at the bottom-left, so this crate flips
//! rows on load and on save, and converts sprite rectangles once into
//! normalized [`AtlasRegion`]s.

mod image_io;
mod sheet;

pub use image_io::{atlas_from_image, atlas_size, load_atlas, save_rgba_png};
pub use sheet::{PixelRect, SpriteSheet};

use pixelquad_common::AtlasSize;

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("atlas data error: {0}")]
    Atlas(#[from] pixelquad_transform::AtlasError),
    #[error("unknown sprite: {0}")]
    UnknownSprite(String),
    #[error("sprite {name} at {rect:?} lies outside the {size:?} atlas")]
    RegionOutOfBounds {
        name: String,
        rect: PixelRect,
        size: AtlasSize,
    },
}

pub fn crate_info() -> &'static str {
    "pixelquad-assets v0.1.0"
}
