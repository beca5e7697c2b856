use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Pixel dimensions of an atlas texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AtlasSize {
    pub width: u32,
    pub height: u32,
}

impl AtlasSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// True when either axis is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Size of one texel in normalized units. Zero on an empty axis.
    pub fn texel_size(self) -> Vec2 {
        let recip = |n: u32| if n == 0 { 0.0 } else { 1.0 / n as f32 };
        Vec2::new(recip(self.width), recip(self.height))
    }
}

/// A rectangle inside the atlas, in normalized atlas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AtlasRegion {
    pub center: Vec2,
    /// Half-size of the rectangle.
    pub extents: Vec2,
}

impl AtlasRegion {
    pub const ZERO: Self = Self {
        center: Vec2::ZERO,
        extents: Vec2::ZERO,
    };

    pub fn new(center: Vec2, extents: Vec2) -> Self {
        Self { center, extents }
    }

    /// Build a region from a pixel rectangle whose `min` corner is measured
    /// from the atlas' bottom-left texel.
    ///
    /// This is the one place pixel units become normalized units. An empty
    /// atlas axis collapses the region on that axis.
    pub fn from_pixel_rect(min: Vec2, size: Vec2, atlas: AtlasSize) -> Self {
        let texel = atlas.texel_size();
        Self {
            center: (min + size * 0.5) * texel,
            extents: size * 0.5 * texel,
        }
    }

    /// Lower-left corner in normalized coordinates.
    pub fn min(&self) -> Vec2 {
        self.center - self.extents
    }

    /// Upper-right corner in normalized coordinates.
    pub fn max(&self) -> Vec2 {
        self.center + self.extents
    }

    /// Half-size of the region measured in atlas pixels.
    pub fn pixel_extents(&self, atlas: AtlasSize) -> Vec2 {
        self.extents * atlas.as_vec2()
    }

    /// Shrink the region by half a texel on every side.
    ///
    /// Linear filtering reads the neighbouring texel at the region border;
    /// the inset keeps those reads inside the region. Extents never go
    /// negative.
    pub fn inset_half_texel(&self, atlas: AtlasSize) -> Self {
        let half_texel = atlas.texel_size() * 0.5;
        Self {
            center: self.center,
            extents: (self.extents - half_texel).max(Vec2::ZERO),
        }
    }

    /// True when the region covers no area.
    pub fn is_degenerate(&self) -> bool {
        self.extents.x == 0.0 || self.extents.y == 0.0
    }
}

/// One corner of the shared unit quad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CornerOffset {
    BottomLeft,
    BottomRight,
    TopRight,
    TopLeft,
}

impl CornerOffset {
    /// Corners in vertex-buffer order.
    pub const ALL: [CornerOffset; 4] = [
        CornerOffset::BottomLeft,
        CornerOffset::BottomRight,
        CornerOffset::TopRight,
        CornerOffset::TopLeft,
    ];

    /// Two counter-clockwise triangles over [`CornerOffset::ALL`].
    pub const INDICES: [u16; 6] = [0, 1, 2, 2, 3, 0];

    /// Offset of the corner from the quad center, in half-extent units.
    pub fn offset(self) -> Vec2 {
        match self {
            CornerOffset::BottomLeft => Vec2::new(-1.0, -1.0),
            CornerOffset::BottomRight => Vec2::new(1.0, -1.0),
            CornerOffset::TopRight => Vec2::new(1.0, 1.0),
            CornerOffset::TopLeft => Vec2::new(-1.0, 1.0),
        }
    }

    /// Offsets of [`CornerOffset::ALL`], ready for a vertex buffer.
    pub fn offsets() -> [Vec2; 4] {
        Self::ALL.map(Self::offset)
    }
}

/// One sprite to draw this frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpriteInstance {
    /// World-space pivot.
    pub center: Vec2,
    /// Atlas rectangle sampled for this sprite. Its size also sets the
    /// sprite's world size.
    pub region: AtlasRegion,
    /// Draw-order index. Higher layers are drawn on top.
    #[serde(default)]
    pub layer: f32,
}

impl SpriteInstance {
    pub fn new(center: Vec2, region: AtlasRegion, layer: f32) -> Self {
        Self {
            center,
            region,
            layer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_offsets_are_unit_square() {
        let offsets = CornerOffset::offsets();
        assert_eq!(offsets[0], Vec2::new(-1.0, -1.0));
        assert_eq!(offsets[2], Vec2::new(1.0, 1.0));
        assert_eq!(offsets.iter().copied().sum::<Vec2>(), Vec2::ZERO);
    }

    #[test]
    fn indices_reference_all_corners() {
        for i in 0..CornerOffset::ALL.len() as u16 {
            assert!(CornerOffset::INDICES.contains(&i));
        }
    }

    #[test]
    fn pixel_rect_converts_to_normalized() {
        let atlas = AtlasSize::new(64, 32);
        let region = AtlasRegion::from_pixel_rect(Vec2::new(16.0, 8.0), Vec2::new(16.0, 8.0), atlas);
        assert_eq!(region.min(), Vec2::new(0.25, 0.25));
        assert_eq!(region.max(), Vec2::new(0.5, 0.5));
        assert_eq!(region.pixel_extents(atlas), Vec2::new(8.0, 4.0));
    }

    #[test]
    fn empty_atlas_collapses_region() {
        let atlas = AtlasSize::new(0, 16);
        let region = AtlasRegion::from_pixel_rect(Vec2::ZERO, Vec2::splat(8.0), atlas);
        assert_eq!(region.extents.x, 0.0);
        assert!(region.is_degenerate());
        assert!(atlas.is_empty());
    }

    #[test]
    fn half_texel_inset_never_goes_negative() {
        let atlas = AtlasSize::new(4, 4);
        let region = AtlasRegion::new(Vec2::splat(0.5), Vec2::new(0.25, 0.05));
        let inset = region.inset_half_texel(atlas);
        assert_eq!(inset.center, region.center);
        assert_eq!(inset.extents, Vec2::new(0.125, 0.0));
    }

    #[test]
    fn instance_layer_defaults_when_missing() {
        let json = r#"{"center":[1.0,2.0],"region":{"center":[0.5,0.5],"extents":[0.1,0.1]}}"#;
        let inst: SpriteInstance = serde_json::from_str(json).unwrap();
        assert_eq!(inst.layer, 0.0);
        assert_eq!(inst.center, Vec2::new(1.0, 2.0));
    }
}
