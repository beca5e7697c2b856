use image::{RgbaImage, imageops};
use pixelquad_common::AtlasSize;
use pixelquad_transform::Atlas;
use std::path::Path;

use crate::AssetError;

/// Load a PNG atlas from disk.
pub fn load_atlas(path: impl AsRef<Path>) -> Result<Atlas, AssetError> {
    let image = image::open(path.as_ref())?.to_rgba8();
    let atlas = atlas_from_image(&image)?;
    tracing::debug!(
        path = %path.as_ref().display(),
        width = image.width(),
        height = image.height(),
        "loaded atlas"
    );
    Ok(atlas)
}

/// Read an atlas image's dimensions from its header without decoding texels.
pub fn atlas_size(path: impl AsRef<Path>) -> Result<AtlasSize, AssetError> {
    let (width, height) = image::image_dimensions(path.as_ref())?;
    Ok(AtlasSize::new(width, height))
}

/// Convert a top-left-origin image into a bottom-row-first atlas.
pub fn atlas_from_image(image: &RgbaImage) -> Result<Atlas, AssetError> {
    let flipped = imageops::flip_vertical(image);
    let size = AtlasSize::new(image.width(), image.height());
    Ok(Atlas::from_rgba8(size, flipped.as_raw())?)
}

/// Write bottom-row-first RGBA8 pixels as a regular top-down PNG.
pub fn save_rgba_png(
    path: impl AsRef<Path>,
    width: u32,
    height: u32,
    bottom_up: &[u8],
) -> Result<(), AssetError> {
    let row = width as usize * 4;
    let mut top_down = Vec::with_capacity(bottom_up.len());
    if row > 0 {
        for chunk in bottom_up.chunks_exact(row).rev() {
            top_down.extend_from_slice(chunk);
        }
    }
    image::save_buffer(
        path.as_ref(),
        &top_down,
        width,
        height,
        image::ExtendedColorType::Rgba8,
    )?;
    tracing::debug!(path = %path.as_ref().display(), width, height, "wrote png");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use pixelquad_transform::FilterMode;

    const TOP: [u8; 4] = [255, 0, 0, 255];
    const BOTTOM: [u8; 4] = [0, 255, 0, 255];

    fn top_red_bottom_green() -> RgbaImage {
        RgbaImage::from_fn(2, 2, |_, y| {
            if y == 0 {
                image::Rgba(TOP)
            } else {
                image::Rgba(BOTTOM)
            }
        })
    }

    #[test]
    fn image_rows_are_flipped() {
        let atlas = atlas_from_image(&top_red_bottom_green()).unwrap();
        assert_eq!(atlas.size(), AtlasSize::new(2, 2));
        assert_eq!(atlas.fetch(Vec2::new(0.5, 0.9), FilterMode::Nearest), TOP);
        assert_eq!(atlas.fetch(Vec2::new(0.5, 0.1), FilterMode::Nearest), BOTTOM);
    }

    #[test]
    fn png_round_trip_keeps_orientation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atlas.png");
        top_red_bottom_green().save(&path).unwrap();

        let atlas = load_atlas(&path).unwrap();
        let out = dir.path().join("out.png");
        save_rgba_png(&out, 2, 2, &atlas.as_bytes()).unwrap();

        let reloaded = image::open(&out).unwrap().to_rgba8();
        assert_eq!(reloaded.get_pixel(0, 0).0, TOP);
        assert_eq!(reloaded.get_pixel(1, 1).0, BOTTOM);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_atlas(dir.path().join("nope.png")).is_err());
        assert!(atlas_size(dir.path().join("nope.png")).is_err());
    }

    #[test]
    fn size_is_read_from_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        RgbaImage::new(48, 16).save(&path).unwrap();
        assert_eq!(atlas_size(&path).unwrap(), AtlasSize::new(48, 16));
    }
}
