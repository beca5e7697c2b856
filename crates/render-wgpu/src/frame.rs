//! One frame: any number of layers drawn into the low-resolution target,
//! then a single letterboxed upscale onto the surface.

use glam::{UVec2, Vec2};
use pixelquad_common::{CornerOffset, SpriteInstance};
use pixelquad_render::letterbox_extents;
use pixelquad_transform::{Camera, DrawStats, TransformConfig, depth, dispatch};

use crate::batch::{DYN_QUAD_CAP, QuadBatch};
use crate::buffer::SpriteBuffer;
use crate::gpu::{GpuAtlas, GpuContext, GpuError, GpuSprite, GpuUniform, Pipelines, RenderTarget};

/// Load ops for one sprite pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PassLoads {
    pub color: wgpu::LoadOp<wgpu::Color>,
    pub depth: wgpu::LoadOp<f32>,
}

/// Whether the target has been drawn to this frame.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PassState {
    has_rendered: bool,
}

impl PassState {
    /// The first pass of a frame clears color and depth; later passes load
    /// what earlier ones wrote.
    pub(crate) fn next(&mut self, clear: wgpu::Color) -> PassLoads {
        let loads = if self.has_rendered {
            PassLoads {
                color: wgpu::LoadOp::Load,
                depth: wgpu::LoadOp::Load,
            }
        } else {
            PassLoads {
                color: wgpu::LoadOp::Clear(clear),
                depth: wgpu::LoadOp::Clear(0.0),
            }
        };
        self.has_rendered = true;
        loads
    }

    pub(crate) fn has_rendered(&self) -> bool {
        self.has_rendered
    }
}

/// A frame in progress. Created by
/// [`SpriteRenderer::begin_frame`](crate::SpriteRenderer::begin_frame).
///
/// Layers share the frame's depth buffer, so a higher layer value stays on
/// top across layers. Dropping a frame without presenting it leaves the
/// surface untouched.
pub struct SpriteFrame<'a> {
    pub(crate) ctx: GpuContext<'a>,
    pub(crate) config: &'a TransformConfig,
    pub(crate) clear: wgpu::Color,
    pub(crate) pipes: &'a Pipelines,
    pub(crate) atlas: &'a GpuAtlas,
    pub(crate) target: &'a RenderTarget,
    /// Supplies the extents; each layer sets its own center.
    pub(crate) camera: Camera,
    pub(crate) passes: PassState,
    pub(crate) stats: DrawStats,
    pub(crate) layers: usize,
}

impl SpriteFrame<'_> {
    /// Pixel size of the low-resolution target.
    pub fn target_size(&self) -> UVec2 {
        self.target.size
    }

    /// Counters accumulated over the layers drawn so far.
    pub fn stats(&self) -> DrawStats {
        self.stats
    }

    /// Draw `instances` seen from a camera centered at `center`, streaming
    /// them through the instance buffer in batches of [`DYN_QUAD_CAP`].
    pub fn draw_layer(&mut self, center: Vec2, instances: &[SpriteInstance]) -> Result<(), GpuError> {
        let camera = self.layer_camera(center)?;
        let _span = tracing::debug_span!("draw_layer", layer = self.layers, instances = instances.len()).entered();

        let (ctx, pipes, atlas, target, config, clear) =
            (self.ctx, self.pipes, self.atlas, self.target, self.config, self.clear);
        pipes.write_uniform(ctx.queue, &GpuUniform::new(&camera, atlas.size, config));

        let passes = &mut self.passes;
        let mut sink = |sprites: &[GpuSprite]| {
            ctx.queue
                .write_buffer(&pipes.instance_buffer, 0, bytemuck::cast_slice(sprites));
            let slice = pipes.instance_buffer.slice(..);
            pipes.draw_pass(ctx, target, atlas, Some((slice, sprites.len() as u32)), passes.next(clear));
        };

        let mut clamped_layers = 0;
        let mut batch = QuadBatch::new(DYN_QUAD_CAP);
        for instance in instances {
            if !depth::layer_in_range(instance.layer, config) {
                clamped_layers += 1;
            }
            batch.push(GpuSprite::from_instance(instance, atlas.size, config), &mut sink);
        }
        batch.finish(&mut sink);
        tracing::trace!(batches = batch.flushes(), "layer submitted");

        self.record(instances.len(), clamped_layers);
        Ok(())
    }

    /// Draw a previously uploaded buffer seen from a camera centered at
    /// `center`, in one pass.
    pub fn draw_buffer(&mut self, center: Vec2, buffer: &SpriteBuffer) -> Result<(), GpuError> {
        if !buffer.encoded_for(self.atlas.size, self.config) {
            return Err(GpuError::BufferMismatch);
        }
        let camera = self.layer_camera(center)?;
        let _span = tracing::debug_span!("draw_buffer", layer = self.layers, instances = buffer.len()).entered();

        self.pipes
            .write_uniform(self.ctx.queue, &GpuUniform::new(&camera, self.atlas.size, self.config));
        if let Some(slice) = buffer.slice() {
            let loads = self.passes.next(self.clear);
            self.pipes
                .draw_pass(self.ctx, self.target, self.atlas, Some((slice, buffer.len() as u32)), loads);
        }

        self.record(buffer.len(), buffer.clamped_layers());
        Ok(())
    }

    /// Upscale the frame onto `surface_view`, a surface of `surface_size`
    /// pixels, letterboxed to the camera's aspect ratio.
    pub fn present(mut self, surface_view: &wgpu::TextureView, surface_size: UVec2) -> DrawStats {
        if !self.passes.has_rendered() {
            let loads = self.passes.next(self.clear);
            self.pipes.draw_pass(self.ctx, self.target, self.atlas, None, loads);
        }

        self.pipes
            .write_letterbox(self.ctx.queue, letterbox_extents(surface_size, self.camera.aspect()));
        self.pipes.upscale(self.ctx, surface_view, self.target);

        if self.stats.clamped_layers > 0 {
            tracing::warn!(
                clamped_layers = self.stats.clamped_layers,
                max_layer = depth::max_layer(self.config),
                "sprite layers outside the depth range were clamped"
            );
        }
        tracing::trace!(layers = self.layers, instances = self.stats.instances, "frame presented");
        self.stats
    }

    fn layer_camera(&self, center: Vec2) -> Result<Camera, GpuError> {
        let mut camera = self.camera;
        camera.set_center(center)?;
        Ok(dispatch::frame_camera(&camera, self.config))
    }

    fn record(&mut self, instances: usize, clamped_layers: usize) {
        self.stats.instances += instances;
        self.stats.vertices += instances * CornerOffset::ALL.len();
        self.stats.clamped_layers += clamped_layers;
        self.layers += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAR: wgpu::Color = wgpu::Color {
        r: 0.25,
        g: 0.5,
        b: 0.75,
        a: 1.0,
    };

    #[test]
    fn first_pass_clears_and_later_passes_load() {
        let mut passes = PassState::default();
        assert!(!passes.has_rendered());

        let first = passes.next(CLEAR);
        assert_eq!(first.color, wgpu::LoadOp::Clear(CLEAR));
        assert_eq!(first.depth, wgpu::LoadOp::Clear(0.0));
        assert!(passes.has_rendered());

        for _ in 0..3 {
            let later = passes.next(CLEAR);
            assert_eq!(later.color, wgpu::LoadOp::Load);
            assert_eq!(later.depth, wgpu::LoadOp::Load);
        }
    }

    #[test]
    fn each_frame_starts_with_a_clear() {
        let mut frame_a = PassState::default();
        frame_a.next(CLEAR);
        frame_a.next(CLEAR);

        let mut frame_b = PassState::default();
        assert!(matches!(frame_b.next(wgpu::Color::BLACK).color, wgpu::LoadOp::Clear(_)));
    }
}
