use bytemuck::{Pod, Zeroable};
use glam::{UVec2, Vec2};
use pixelquad_common::{AtlasSize, CornerOffset, SpriteInstance};
use pixelquad_transform::{
    Atlas, Camera, CameraError, DrawStats, FilterMode, Rgba, TransformConfig, depth, sampling,
};
use wgpu::util::DeviceExt;

use crate::batch::DYN_QUAD_CAP;
use crate::buffer::SpriteBuffer;
use crate::frame::{PassLoads, PassState, SpriteFrame};
use crate::shaders;

const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Errors from the wgpu backend.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GpuError {
    #[error("no atlas has been uploaded")]
    NoAtlas,
    #[error("atlas of {width}x{height} pixels has no area")]
    EmptyAtlas { width: u32, height: u32 },
    #[error("render target of {width}x{height} pixels has no area")]
    EmptyTarget { width: u32, height: u32 },
    #[error("render target of {width}x{height} pixels exceeds the device limit of {max} per side")]
    TargetTooLarge { width: u32, height: u32, max: u32 },
    #[error("invalid layer camera: {0}")]
    Camera(#[from] CameraError),
    #[error("sprite buffer was encoded for a different atlas or config")]
    BufferMismatch,
    #[error("{len} sprites do not fit a buffer of {capacity}")]
    BufferOverflow { len: usize, capacity: usize },
}

/// Device and queue used for one operation.
#[derive(Clone, Copy)]
pub(crate) struct GpuContext<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
}

/// Per-draw constants read by the sprite vertex shader.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct GpuUniform {
    pub camera_center: [f32; 2],
    pub camera_extents: [f32; 2],
    pub atlas_size: [f32; 2],
    pub pixels_per_unit: f32,
    pub layer_scale: f32,
}

impl GpuUniform {
    pub fn new(camera: &Camera, atlas: AtlasSize, config: &TransformConfig) -> Self {
        Self {
            camera_center: camera.center().to_array(),
            camera_extents: camera.extents().to_array(),
            atlas_size: atlas.as_vec2().to_array(),
            pixels_per_unit: config.pixels_per_unit(),
            layer_scale: config.layer_scale(),
        }
    }
}

/// One sprite instance as laid out in the instance buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct GpuSprite {
    pub center: [f32; 2],
    pub region_center: [f32; 2],
    /// Sizes the quad.
    pub region_extents: [f32; 2],
    /// Spans the sampled coordinates; inset under linear filtering.
    pub sample_extents: [f32; 2],
    pub layer: f32,
}

impl GpuSprite {
    pub fn from_instance(instance: &SpriteInstance, atlas: AtlasSize, config: &TransformConfig) -> Self {
        let sample = sampling::sampling_region(&instance.region, atlas, config.filter());
        Self {
            center: instance.center.to_array(),
            region_center: instance.region.center.to_array(),
            region_extents: instance.region.extents.to_array(),
            sample_extents: sample.extents.to_array(),
            // WGSL clamp is unspecified for NaN; resolve it here.
            layer: depth::clamp_layer(instance.layer, config),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct LetterboxUniform {
    extents: [f32; 2],
    padding: [f32; 2],
}

pub(crate) struct GpuAtlas {
    pub size: AtlasSize,
    bind_group: wgpu::BindGroup,
}

/// Low-resolution color and depth targets at the camera's pixel size.
pub(crate) struct RenderTarget {
    pub size: UVec2,
    color: wgpu::TextureView,
    depth: wgpu::TextureView,
    upscale_bind_group: wgpu::BindGroup,
}

/// Reject targets with no area or larger than the device allows.
pub(crate) fn check_target_size(size: UVec2, max: u32) -> Result<(), GpuError> {
    if size.x == 0 || size.y == 0 {
        return Err(GpuError::EmptyTarget {
            width: size.x,
            height: size.y,
        });
    }
    if size.x > max || size.y > max {
        return Err(GpuError::TargetTooLarge {
            width: size.x,
            height: size.y,
            max,
        });
    }
    Ok(())
}

/// Pipelines and buffers shared by every frame.
pub(crate) struct Pipelines {
    sprite_pipeline: wgpu::RenderPipeline,
    upscale_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    letterbox_buffer: wgpu::Buffer,
    atlas_layout: wgpu::BindGroupLayout,
    upscale_layout: wgpu::BindGroupLayout,
    frame_sampler: wgpu::Sampler,
    corner_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    /// Holds one batch of streamed sprites.
    pub instance_buffer: wgpu::Buffer,
}

impl Pipelines {
    pub(crate) fn write_uniform(&self, queue: &wgpu::Queue, uniform: &GpuUniform) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniform));
    }

    pub(crate) fn write_letterbox(&self, queue: &wgpu::Queue, extents: Vec2) {
        queue.write_buffer(
            &self.letterbox_buffer,
            0,
            bytemuck::bytes_of(&LetterboxUniform {
                extents: extents.to_array(),
                padding: [0.0, 0.0],
            }),
        );
    }

    /// Record and submit one pass into the low-resolution target.
    ///
    /// `instances` is a vertex buffer slice of [`GpuSprite`]s and their
    /// count; `None` only applies the load ops, which clears an empty frame.
    pub(crate) fn draw_pass(
        &self,
        ctx: GpuContext<'_>,
        target: &RenderTarget,
        atlas: &GpuAtlas,
        instances: Option<(wgpu::BufferSlice<'_>, u32)>,
        loads: PassLoads,
    ) {
        let mut encoder = ctx.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("sprite_encoder"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sprite_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.color,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: loads.color,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &target.depth,
                    depth_ops: Some(wgpu::Operations {
                        load: loads.depth,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            if let Some((slice, count)) = instances.filter(|(_, count)| *count > 0) {
                pass.set_pipeline(&self.sprite_pipeline);
                pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                pass.set_bind_group(1, &atlas.bind_group, &[]);
                pass.set_vertex_buffer(0, self.corner_buffer.slice(..));
                pass.set_vertex_buffer(1, slice);
                pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                pass.draw_indexed(0..CornerOffset::INDICES.len() as u32, 0, 0..count);
            }
        }
        ctx.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Blit the low-resolution target onto the surface, letterboxed.
    pub(crate) fn upscale(&self, ctx: GpuContext<'_>, surface_view: &wgpu::TextureView, target: &RenderTarget) {
        let mut encoder = ctx.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("upscale_encoder"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("upscale_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                ..Default::default()
            });
            pass.set_pipeline(&self.upscale_pipeline);
            pass.set_bind_group(0, &target.upscale_bind_group, &[]);
            pass.draw(0..6, 0..1);
        }
        ctx.queue.submit(std::iter::once(encoder.finish()));
    }
}

/// wgpu sprite renderer.
///
/// A frame is opened with [`SpriteRenderer::begin_frame`], filled with any
/// number of layers, and shown with [`SpriteFrame::present`]. Each layer may
/// move the camera; depth and color carry over between layers.
pub struct SpriteRenderer {
    config: TransformConfig,
    clear: wgpu::Color,
    pipes: Pipelines,
    atlas: Option<GpuAtlas>,
    target: Option<RenderTarget>,
}

impl SpriteRenderer {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat, config: TransformConfig) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sprite_uniform_buffer"),
            contents: bytemuck::bytes_of(&GpuUniform::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprite_uniform_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sprite_uniform_bind_group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let atlas_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("atlas_layout"),
            entries: &[texture_entry(0), sampler_entry(1)],
        });

        let letterbox_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("letterbox_buffer"),
            contents: bytemuck::bytes_of(&LetterboxUniform {
                extents: [1.0, 1.0],
                padding: [0.0, 0.0],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let upscale_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("upscale_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                texture_entry(1),
                sampler_entry(2),
            ],
        });

        // Sprite pipeline
        let sprite_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sprite_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SPRITE_SHADER.into()),
        });

        let sprite_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sprite_pipeline_layout"),
            bind_group_layouts: &[&uniform_layout, &atlas_layout],
            push_constant_ranges: &[],
        });

        let sprite_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sprite_pipeline"),
            layout: Some(&sprite_layout),
            vertex: wgpu::VertexState {
                module: &sprite_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<[f32; 2]>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![0 => Float32x2],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<GpuSprite>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            1 => Float32x2,
                            2 => Float32x2,
                            3 => Float32x2,
                            4 => Float32x2,
                            5 => Float32,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &sprite_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: TARGET_FORMAT,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            // Cleared to 0.0; higher layers have greater depth and equal
            // layers keep submission order.
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::GreaterEqual,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        // Upscale pipeline
        let upscale_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("upscale_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::UPSCALE_SHADER.into()),
        });

        let upscale_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("upscale_pipeline_layout"),
            bind_group_layouts: &[&upscale_layout],
            push_constant_ranges: &[],
        });

        let upscale_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("upscale_pipeline"),
            layout: Some(&upscale_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &upscale_shader,
                entry_point: Some("vs_upscale"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &upscale_shader,
                entry_point: Some("fs_upscale"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        // Shared unit quad
        let corners = CornerOffset::offsets().map(|c| c.to_array());
        let corner_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("corner_buffer"),
            contents: bytemuck::cast_slice(&corners),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_index_buffer"),
            contents: bytemuck::cast_slice(&CornerOffset::INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        // Instance buffer holds one batch
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("sprite_instance_buffer"),
            size: (DYN_QUAD_CAP * std::mem::size_of::<GpuSprite>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let frame_sampler = clamped_sampler(device, "frame_sampler", wgpu::FilterMode::Nearest);

        let pipes = Pipelines {
            sprite_pipeline,
            upscale_pipeline,
            uniform_buffer,
            uniform_bind_group,
            letterbox_buffer,
            atlas_layout,
            upscale_layout,
            frame_sampler,
            corner_buffer,
            index_buffer,
            instance_buffer,
        };

        Self {
            config,
            clear: wgpu::Color::BLACK,
            pipes,
            atlas: None,
            target: None,
        }
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Color the low-resolution target is cleared to each frame.
    pub fn set_clear(&mut self, color: Rgba) {
        let c = |v: u8| v as f64 / 255.0;
        self.clear = wgpu::Color {
            r: c(color[0]),
            g: c(color[1]),
            b: c(color[2]),
            a: c(color[3]),
        };
    }

    /// Upload the atlas every subsequent draw samples.
    ///
    /// Rows are uploaded bottom row first, so texture `v = 0` is the
    /// bottom of the atlas and matches the normalized region convention.
    pub fn set_atlas(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, atlas: &Atlas) -> Result<(), GpuError> {
        let size = atlas.size();
        if size.is_empty() {
            return Err(GpuError::EmptyAtlas {
                width: size.width,
                height: size.height,
            });
        }

        let extent = wgpu::Extent3d {
            width: size.width,
            height: size.height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("atlas_texture"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &atlas.as_bytes(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(size.width * 4),
                rows_per_image: Some(size.height),
            },
            extent,
        );

        let filter = match self.config.filter() {
            FilterMode::Nearest => wgpu::FilterMode::Nearest,
            FilterMode::Linear => wgpu::FilterMode::Linear,
        };
        let sampler = clamped_sampler(device, "atlas_sampler", filter);
        let view = texture.create_view(&Default::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("atlas_bind_group"),
            layout: &self.pipes.atlas_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        tracing::debug!(width = size.width, height = size.height, ?filter, "atlas uploaded");
        self.atlas = Some(GpuAtlas { size, bind_group });
        Ok(())
    }


    /// Open a frame for `camera`'s pixel resolution.
    ///
    /// The low-resolution target is reused while the resolution is
    /// unchanged. Nothing is drawn until the first layer or
    /// [`SpriteFrame::present`].
    pub fn begin_frame<'a>(
        &'a mut self,
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        camera: &Camera,
    ) -> Result<SpriteFrame<'a>, GpuError> {
        let Self {
            config,
            clear,
            pipes,
            atlas,
            target,
        } = self;
        let atlas = atlas.as_ref().ok_or(GpuError::NoAtlas)?;

        let size = camera.target_size(config.pixels_per_unit());
        check_target_size(size, device.limits().max_texture_dimension_2d)?;
        let current = match target.take() {
            Some(current) if current.size == size => current,
            _ => {
                tracing::debug!(width = size.x, height = size.y, "creating render target");
                create_target(device, pipes, size)
            }
        };
        let target = target.insert(current);

        Ok(SpriteFrame {
            ctx: GpuContext { device, queue },
            config,
            clear: *clear,
            pipes,
            atlas,
            target,
            camera: *camera,
            passes: PassState::default(),
            stats: DrawStats::default(),
            layers: 0,
        })
    }

    /// Encode and upload `instances` once for drawing in any later frame
    /// with [`SpriteFrame::draw_buffer`].
    pub fn create_buffer(&self, device: &wgpu::Device, instances: &[SpriteInstance]) -> Result<SpriteBuffer, GpuError> {
        let atlas = self.atlas.as_ref().ok_or(GpuError::NoAtlas)?;
        Ok(SpriteBuffer::new(device, instances, atlas.size, &self.config))
    }

    /// Draw `instances` as a single layer and present the result
    /// letterboxed onto `surface_view`, a surface of `surface_size` pixels.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_view: &wgpu::TextureView,
        surface_size: UVec2,
        camera: &Camera,
        instances: &[SpriteInstance],
    ) -> Result<DrawStats, GpuError> {
        let _span = tracing::info_span!("wgpu_render", instances = instances.len()).entered();
        let mut frame = self.begin_frame(device, queue, camera)?;
        frame.draw_layer(camera.center(), instances)?;
        Ok(frame.present(surface_view, surface_size))
    }
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

/// Sampler that clamps to the edge texel and never wraps.
fn clamped_sampler(device: &wgpu::Device, label: &str, filter: wgpu::FilterMode) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: filter,
        min_filter: filter,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    })
}

fn create_target(device: &wgpu::Device, pipes: &Pipelines, size: UVec2) -> RenderTarget {
    let extent = wgpu::Extent3d {
        width: size.x,
        height: size.y,
        depth_or_array_layers: 1,
    };
    let color = device
        .create_texture(&wgpu::TextureDescriptor {
            label: Some("frame_color"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TARGET_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        })
        .create_view(&Default::default());
    let depth = device
        .create_texture(&wgpu::TextureDescriptor {
            label: Some("frame_depth"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
        .create_view(&Default::default());

    let upscale_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("upscale_bind_group"),
        layout: &pipes.upscale_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: pipes.letterbox_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&color),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(&pipes.frame_sampler),
            },
        ],
    });

    RenderTarget {
        size,
        color,
        depth,
        upscale_bind_group,
    }
}
