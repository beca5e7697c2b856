//! CPU atlas fetch with clamp-to-edge addressing.
//!
//! Mirrors the sampler the GPU backend configures: coordinates outside the
//! atlas clamp to the border texel and never wrap into another region.

use glam::Vec2;
use pixelquad_common::AtlasSize;

use crate::config::FilterMode;
use crate::error::AtlasError;

/// Straight-alpha RGBA8 color.
pub type Rgba = [u8; 4];

pub const TRANSPARENT: Rgba = [0, 0, 0, 0];

/// Atlas pixels, bottom row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atlas {
    size: AtlasSize,
    texels: Vec<Rgba>,
}

impl Atlas {
    /// Wrap tightly packed RGBA8 bytes whose first row is the bottom row.
    pub fn from_rgba8(size: AtlasSize, bytes: &[u8]) -> Result<Self, AtlasError> {
        let expected = size.width as usize * size.height as usize * 4;
        if bytes.len() != expected {
            return Err(AtlasError::ByteCountMismatch {
                width: size.width,
                height: size.height,
                expected,
                actual: bytes.len(),
            });
        }
        let texels = bytes
            .chunks_exact(4)
            .map(|c| [c[0], c[1], c[2], c[3]])
            .collect();
        Ok(Self { size, texels })
    }

    /// Atlas filled with one color.
    pub fn solid(size: AtlasSize, color: Rgba) -> Self {
        Self {
            size,
            texels: vec![color; size.width as usize * size.height as usize],
        }
    }

    /// Atlas whose texel at `(x, y)` is `f(x, y)`, with `y = 0` the bottom row.
    pub fn from_fn(size: AtlasSize, mut f: impl FnMut(u32, u32) -> Rgba) -> Self {
        let mut texels = Vec::with_capacity(size.width as usize * size.height as usize);
        for y in 0..size.height {
            for x in 0..size.width {
                texels.push(f(x, y));
            }
        }
        Self { size, texels }
    }

    pub fn size(&self) -> AtlasSize {
        self.size
    }

    /// Raw RGBA8 bytes, bottom row first.
    pub fn as_bytes(&self) -> Vec<u8> {
        self.texels.iter().flatten().copied().collect()
    }

    /// Texel at integer coordinates, clamped to the atlas edge.
    pub fn texel(&self, x: i64, y: i64) -> Rgba {
        if self.size.is_empty() {
            return TRANSPARENT;
        }
        let x = x.clamp(0, self.size.width as i64 - 1) as usize;
        let y = y.clamp(0, self.size.height as i64 - 1) as usize;
        self.texels[y * self.size.width as usize + x]
    }

    /// Color at normalized coordinate `uv`.
    pub fn fetch(&self, uv: Vec2, filter: FilterMode) -> Rgba {
        if self.size.is_empty() {
            return TRANSPARENT;
        }
        let p = uv * self.size.as_vec2();
        match filter {
            // `as` saturates, and NaN becomes 0, before the edge clamp.
            FilterMode::Nearest => self.texel(p.x.floor() as i64, p.y.floor() as i64),
            FilterMode::Linear => self.fetch_bilinear(p - Vec2::splat(0.5)),
        }
    }

    fn fetch_bilinear(&self, p: Vec2) -> Rgba {
        let base = p.floor();
        let t = p - base;
        let (x0, y0) = (base.x as i64, base.y as i64);

        let c00 = self.texel(x0, y0);
        let c10 = self.texel(x0.saturating_add(1), y0);
        let c01 = self.texel(x0, y0.saturating_add(1));
        let c11 = self.texel(x0.saturating_add(1), y0.saturating_add(1));

        let mut out = TRANSPARENT;
        for i in 0..4 {
            let bottom = lerp(c00[i] as f32, c10[i] as f32, t.x);
            let top = lerp(c01[i] as f32, c11[i] as f32, t.x);
            out[i] = lerp(bottom, top, t.y).round().clamp(0.0, 255.0) as u8;
        }
        out
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
