use pixelquad_common::{AtlasSize, SpriteInstance};
use pixelquad_transform::{Atlas, Camera, TransformConfig, transform_draw};
use std::fmt::Write;

/// Inputs of one draw call. Read-only for the whole draw.
#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a> {
    pub instances: &'a [SpriteInstance],
    pub camera: &'a Camera,
    pub atlas: &'a Atlas,
    pub config: &'a TransformConfig,
}

/// Renderer-agnostic interface. All renderers implement this trait.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one draw call.
    fn render(&self, draw: &DrawCall<'_>) -> Self::Output;
}

/// Dumps the transformed corners of every instance as text.
///
/// Useful for CLI output and for checking the transform without a GPU.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Describe a draw given only the atlas dimensions. The text output never
    /// reads texels, so callers without an atlas image can skip loading one.
    pub fn describe(
        &self,
        instances: &[SpriteInstance],
        camera: &Camera,
        atlas_size: AtlasSize,
        config: &TransformConfig,
    ) -> String {
        let out_draw = transform_draw(instances, camera, atlas_size, config);
        let cam = out_draw.camera;

        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Draw (instances={}, clamped_layers={}) ===",
            out_draw.stats.instances, out_draw.stats.clamped_layers
        );
        let _ = writeln!(
            out,
            "Camera: center=({:.3}, {:.3}) extents=({:.3}, {:.3})",
            cam.center().x,
            cam.center().y,
            cam.extents().x,
            cam.extents().y
        );
        let _ = writeln!(out, "Atlas: {}x{}", atlas_size.width, atlas_size.height);

        for (i, quad) in out_draw.quads.iter().enumerate() {
            let _ = writeln!(out, "  [{i}] layer={}", instances[i].layer);
            for v in quad {
                let _ = writeln!(
                    out,
                    "    clip=({:.4}, {:.4}, {:.4}, {:.1}) uv=({:.4}, {:.4})",
                    v.clip.x, v.clip.y, v.clip.z, v.clip.w, v.uv.x, v.uv.y
                );
            }
        }

        out
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, draw: &DrawCall<'_>) -> String {
        self.describe(draw.instances, draw.camera, draw.atlas.size(), draw.config)
    }
}
