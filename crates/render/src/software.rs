//! Software reference rasterizer.
//!
//! Runs the transform pipeline, then fills each quad's pixels by sampling the
//! atlas at the interpolated coordinate. Sprite quads are axis-aligned, so
//! the interpolation is affine over the quad's NDC rectangle.

use glam::{UVec2, Vec2};
use pixelquad_transform::{QuadVertices, Rgba, transform_draw};

use crate::renderer::{DrawCall, Renderer};

/// Errors from the software renderer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("render target of {width}x{height} pixels has no area")]
    EmptyTarget { width: u32, height: u32 },
    #[error("render target of {width}x{height} pixels exceeds {max} pixels per side")]
    TargetTooLarge { width: u32, height: u32, max: u32 },
}

/// Largest target side the software renderer allocates. Matches the default
/// 2D texture limit of the GPU backend.
pub const MAX_TARGET_DIMENSION: u32 = 8192;

/// Color and depth buffers, bottom row first.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    color: Vec<Rgba>,
    depth: Vec<f32>,
}

impl Frame {
    /// Frame cleared to `clear` with depth `0.0`.
    pub fn new(width: u32, height: u32, clear: Rgba) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            color: vec![clear; len],
            depth: vec![0.0; len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Color at `(x, y)`, `y = 0` being the bottom row.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        self.index(x, y).map(|i| self.color[i])
    }

    /// Depth at `(x, y)`.
    pub fn depth(&self, x: u32, y: u32) -> Option<f32> {
        self.index(x, y).map(|i| self.depth[i])
    }

    /// RGBA8 bytes, bottom row first.
    pub fn as_bytes(&self) -> Vec<u8> {
        self.color.iter().flatten().copied().collect()
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    /// Depth-test and blend one fragment.
    fn write(&mut self, i: usize, src: Rgba, depth: f32) {
        if src[3] == 0 || depth < self.depth[i] {
            return;
        }
        self.color[i] = blend_over(src, self.color[i]);
        self.depth[i] = depth;
    }
}

/// Straight-alpha source-over blend.
fn blend_over(src: Rgba, dst: Rgba) -> Rgba {
    let a = src[3] as f32 / 255.0;
    let mut out = [0u8; 4];
    for c in 0..3 {
        out[c] = (src[c] as f32 * a + dst[c] as f32 * (1.0 - a)).round() as u8;
    }
    out[3] = (src[3] as f32 + dst[3] as f32 * (1.0 - a)).round().min(255.0) as u8;
    out
}

/// CPU renderer producing a [`Frame`] sized to the camera's pixel resolution.
#[derive(Debug, Clone)]
pub struct SoftwareRenderer {
    pub clear: Rgba,
}

impl Default for SoftwareRenderer {
    fn default() -> Self {
        Self {
            clear: [0, 0, 0, 255],
        }
    }
}

impl SoftwareRenderer {
    pub fn new(clear: Rgba) -> Self {
        Self { clear }
    }

    fn rasterize_quad(&self, frame: &mut Frame, quad: &QuadVertices, draw: &DrawCall<'_>) {
        let size = Vec2::new(frame.width as f32, frame.height as f32);
        let lo = to_pixels(quad[0].clip.truncate().truncate(), size);
        let hi = to_pixels(quad[2].clip.truncate().truncate(), size);
        let span = hi - lo;
        if span.x <= 0.0 || span.y <= 0.0 {
            return;
        }

        let uv0 = quad[0].uv;
        let duv = quad[2].uv - quad[0].uv;
        let depth = quad[0].clip.z;

        // A pixel is covered when its center lies in [lo, hi).
        let start = (lo - 0.5).ceil().max(Vec2::ZERO);
        let end = (hi - 0.5).ceil().min(size);
        if start.x >= end.x || start.y >= end.y {
            return;
        }
        let (start, end) = (start.as_uvec2(), end.as_uvec2());

        for y in start.y..end.y {
            for x in start.x..end.x {
                let t = (UVec2::new(x, y).as_vec2() + 0.5 - lo) / span;
                let uv = uv0 + duv * t;
                let color = draw.atlas.fetch(uv, draw.config.filter());
                let i = y as usize * frame.width as usize + x as usize;
                frame.write(i, color, depth);
            }
        }
    }
}

fn to_pixels(ndc: Vec2, size: Vec2) -> Vec2 {
    (ndc * 0.5 + 0.5) * size
}

impl Renderer for SoftwareRenderer {
    type Output = Result<Frame, RenderError>;

    fn render(&self, draw: &DrawCall<'_>) -> Self::Output {
        let _span = tracing::info_span!("software_render", instances = draw.instances.len()).entered();
        let out = transform_draw(draw.instances, draw.camera, draw.atlas.size(), draw.config);

        let target = out.camera.target_size(draw.config.pixels_per_unit());
        if target.x == 0 || target.y == 0 {
            return Err(RenderError::EmptyTarget {
                width: target.x,
                height: target.y,
            });
        }
        if target.x > MAX_TARGET_DIMENSION || target.y > MAX_TARGET_DIMENSION {
            return Err(RenderError::TargetTooLarge {
                width: target.x,
                height: target.y,
                max: MAX_TARGET_DIMENSION,
            });
        }

        let mut frame = Frame::new(target.x, target.y, self.clear);
        for quad in &out.quads {
            self.rasterize_quad(&mut frame, quad, draw);
        }
        tracing::debug!(width = target.x, height = target.y, quads = out.quads.len(), "frame rasterized");
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelquad_common::{AtlasRegion, AtlasSize, SpriteInstance};
    use pixelquad_transform::{Atlas, Camera, TransformConfig};

    const BLACK: Rgba = [0, 0, 0, 255];
    const RED: Rgba = [255, 0, 0, 255];
    const GREEN: Rgba = [0, 255, 0, 255];

    /// 4x4 world units at 1 pixel per unit: an 8x8 pixel target.
    fn setup() -> (Camera, TransformConfig) {
        let camera = Camera::new(Vec2::ZERO, Vec2::splat(4.0)).unwrap();
        let config = TransformConfig::new(1.0, 1000.0).unwrap();
        (camera, config)
    }

    /// 4x2 atlas: a red 2x2 block, then a green 2x2 block.
    fn atlas() -> Atlas {
        Atlas::from_fn(AtlasSize::new(4, 2), |x, _| if x < 2 { RED } else { GREEN })
    }

    /// 2x2 world-unit sprite showing block `index` of [`atlas`].
    fn sprite(center: Vec2, index: u32, layer: f32) -> SpriteInstance {
        let region = AtlasRegion::from_pixel_rect(
            Vec2::new(index as f32 * 2.0, 0.0),
            Vec2::splat(2.0),
            AtlasSize::new(4, 2),
        );
        SpriteInstance::new(center, region, layer)
    }

    fn render(instances: &[SpriteInstance], atlas: &Atlas, camera: &Camera, config: &TransformConfig) -> Frame {
        SoftwareRenderer::default()
            .render(&DrawCall {
                instances,
                camera,
                atlas,
                config,
            })
            .unwrap()
    }

    #[test]
    fn target_matches_camera_resolution() {
        let (camera, config) = setup();
        let frame = render(&[], &atlas(), &camera, &config);
        assert_eq!((frame.width(), frame.height()), (8, 8));
        assert_eq!(frame.pixel(0, 0), Some(BLACK));
        assert_eq!(frame.pixel(8, 0), None);
    }

    #[test]
    fn quad_covers_expected_pixels() {
        let (camera, config) = setup();
        let atlas = Atlas::solid(AtlasSize::new(2, 2), RED);
        // Full-atlas region: 2x2 atlas pixels -> 2x2 world units at the center.
        let instance = SpriteInstance::new(Vec2::ZERO, AtlasRegion::new(Vec2::splat(0.5), Vec2::splat(0.5)), 0.0);
        let frame = render(&[instance], &atlas, &camera, &config);

        for y in 0..8 {
            for x in 0..8 {
                let inside = (3..5).contains(&x) && (3..5).contains(&y);
                let expected = if inside { RED } else { BLACK };
                assert_eq!(frame.pixel(x, y), Some(expected), "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn uv_interpolates_across_quad() {
        let (camera, config) = setup();
        let atlas = atlas();
        // Whole 4x2 atlas -> 4x2 world quad spanning pixels 2..6 x 3..5;
        // left half red, right half green.
        let region = AtlasRegion::new(Vec2::splat(0.5), Vec2::splat(0.5));
        let instance = SpriteInstance::new(Vec2::ZERO, region, 0.0);
        let frame = render(&[instance], &atlas, &camera, &config);

        assert_eq!(frame.pixel(2, 4), Some(RED));
        assert_eq!(frame.pixel(3, 4), Some(RED));
        assert_eq!(frame.pixel(4, 4), Some(GREEN));
        assert_eq!(frame.pixel(5, 3), Some(GREEN));
        assert_eq!(frame.pixel(1, 4), Some(BLACK));
        assert_eq!(frame.pixel(6, 4), Some(BLACK));
        assert_eq!(frame.pixel(4, 5), Some(BLACK));
    }

    #[test]
    fn higher_layer_wins_regardless_of_order() {
        let (camera, config) = setup();
        let atlas = atlas();
        let front = sprite(Vec2::ZERO, 1, 5.0);
        let back = sprite(Vec2::ZERO, 0, 1.0);

        let a = render(&[front, back], &atlas, &camera, &config);
        let b = render(&[back, front], &atlas, &camera, &config);
        assert_eq!(a.pixel(4, 4), Some(GREEN));
        assert_eq!(b.pixel(4, 4), Some(GREEN));
        assert_eq!(a.depth(4, 4), Some(0.005));
    }

    #[test]
    fn equal_layers_keep_submission_order() {
        let (camera, config) = setup();
        let atlas = atlas();
        let first = sprite(Vec2::ZERO, 0, 3.0);
        let second = sprite(Vec2::ZERO, 1, 3.0);
        let frame = render(&[first, second], &atlas, &camera, &config);
        assert_eq!(frame.pixel(4, 4), Some(GREEN));
    }

    #[test]
    fn transparent_texels_are_discarded() {
        let (camera, config) = setup();
        let clear = Atlas::solid(AtlasSize::new(1, 1), [9, 9, 9, 0]);
        let instance = SpriteInstance::new(Vec2::ZERO, AtlasRegion::new(Vec2::splat(0.5), Vec2::splat(0.5)), 10.0);
        let frame = render(&[instance], &clear, &camera, &config);
        assert_eq!(frame.pixel(3, 3), Some(BLACK));
        assert_eq!(frame.depth(3, 3), Some(0.0));
    }

    #[test]
    fn degenerate_and_offscreen_quads_draw_nothing() {
        let (camera, config) = setup();
        let atlas = atlas();
        let flat = SpriteInstance::new(Vec2::ZERO, AtlasRegion::new(Vec2::splat(0.5), Vec2::new(0.5, 0.0)), 0.0);
        let far = sprite(Vec2::new(100.0, 0.0), 0, 0.0);
        let frame = render(&[flat, far], &atlas, &camera, &config);
        assert!(frame.as_bytes().chunks(4).all(|c| c == BLACK));
    }

    #[test]
    fn oversized_target_is_rejected_before_allocation() {
        let (_, config) = setup();
        let atlas = atlas();
        let wide = Camera::new(Vec2::ZERO, Vec2::new(5000.0, 4.0)).unwrap();
        let err = SoftwareRenderer::default()
            .render(&DrawCall {
                instances: &[],
                camera: &wide,
                atlas: &atlas,
                config: &config,
            })
            .unwrap_err();
        assert_eq!(
            err,
            RenderError::TargetTooLarge {
                width: 10000,
                height: 8,
                max: MAX_TARGET_DIMENSION,
            }
        );

        let edge = Camera::new(Vec2::ZERO, Vec2::new(4096.0, 1.0)).unwrap();
        let frame = SoftwareRenderer::default()
            .render(&DrawCall {
                instances: &[],
                camera: &edge,
                atlas: &atlas,
                config: &config,
            })
            .unwrap();
        assert_eq!((frame.width(), frame.height()), (MAX_TARGET_DIMENSION, 2));
    }

    #[test]
    fn blend_over_mixes_by_alpha() {
        assert_eq!(blend_over([255, 0, 0, 255], BLACK), [255, 0, 0, 255]);
        assert_eq!(blend_over([255, 255, 255, 128], [0, 0, 0, 255]), [128, 128, 128, 255]);
    }
}
