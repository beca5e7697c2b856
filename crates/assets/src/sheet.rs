use glam::Vec2;
use pixelquad_common::{AtlasRegion, AtlasSize};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::AssetError;

/// Sprite rectangle in image pixels, origin at the image's top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// True when the rectangle fits inside an atlas of `size`.
    pub fn fits(&self, size: AtlasSize) -> bool {
        self.x as u64 + self.w as u64 <= size.width as u64
            && self.y as u64 + self.h as u64 <= size.height as u64
    }

    /// Normalized region, flipping `y` to the bottom-left origin.
    pub fn to_region(&self, size: AtlasSize) -> AtlasRegion {
        let bottom = size.height as f32 - self.y as f32 - self.h as f32;
        AtlasRegion::from_pixel_rect(
            Vec2::new(self.x as f32, bottom),
            Vec2::new(self.w as f32, self.h as f32),
            size,
        )
    }
}

/// Named sprite rectangles for one atlas image.
///
/// Persisted as JSON:
/// ```json
/// { "size": { "width": 64, "height": 64 },
///   "sprites": { "player": { "x": 0, "y": 0, "w": 16, "h": 16 } } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpriteSheet {
    size: AtlasSize,
    sprites: BTreeMap<String, PixelRect>,
}

impl SpriteSheet {
    pub fn new(size: AtlasSize) -> Self {
        Self {
            size,
            sprites: BTreeMap::new(),
        }
    }

    /// Sheet of equally sized cells named `"{row}_{col}"`, row 0 at the top.
    pub fn grid(size: AtlasSize, cell_w: u32, cell_h: u32) -> Self {
        let mut sheet = Self::new(size);
        if cell_w == 0 || cell_h == 0 {
            return sheet;
        }
        for row in 0..size.height / cell_h {
            for col in 0..size.width / cell_w {
                sheet.sprites.insert(
                    format!("{row}_{col}"),
                    PixelRect::new(col * cell_w, row * cell_h, cell_w, cell_h),
                );
            }
        }
        sheet
    }

    pub fn size(&self) -> AtlasSize {
        self.size
    }

    /// Add or replace a sprite. Rectangles outside the atlas are rejected.
    pub fn insert(&mut self, name: impl Into<String>, rect: PixelRect) -> Result<(), AssetError> {
        let name = name.into();
        if !rect.fits(self.size) {
            return Err(AssetError::RegionOutOfBounds {
                name,
                rect,
                size: self.size,
            });
        }
        self.sprites.insert(name, rect);
        Ok(())
    }

    pub fn rect(&self, name: &str) -> Option<PixelRect> {
        self.sprites.get(name).copied()
    }

    /// Normalized atlas region for a named sprite.
    pub fn region(&self, name: &str) -> Result<AtlasRegion, AssetError> {
        self.rect(name)
            .map(|rect| rect.to_region(self.size))
            .ok_or_else(|| AssetError::UnknownSprite(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sprites.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Load a sheet from JSON, rejecting out-of-bounds rectangles.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let file = std::fs::File::open(path.as_ref())?;
        let sheet: Self = serde_json::from_reader(file)?;
        sheet.validate()?;
        tracing::debug!(path = %path.as_ref().display(), sprites = sheet.len(), "loaded sprite sheet");
        Ok(sheet)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AssetError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    fn validate(&self) -> Result<(), AssetError> {
        match self.sprites.iter().find(|(_, rect)| !rect.fits(self.size)) {
            Some((name, rect)) => Err(AssetError::RegionOutOfBounds {
                name: name.clone(),
                rect: *rect,
                size: self.size,
            }),
            None => Ok(()),
        }
    }
}
