use pixelquad_common::{AtlasSize, SpriteInstance};
use pixelquad_transform::{TransformConfig, depth};
use wgpu::util::DeviceExt;

use crate::gpu::{GpuError, GpuSprite};

/// Sprites uploaded once and drawn in any number of frames.
///
/// Encoding bakes in the atlas size and config (sampling inset and layer
/// clamp), so a buffer only draws against the atlas and config it was
/// encoded for.
#[derive(Debug)]
pub struct SpriteBuffer {
    buffer: wgpu::Buffer,
    capacity: usize,
    len: usize,
    clamped_layers: usize,
    atlas: AtlasSize,
    config: TransformConfig,
}

impl SpriteBuffer {
    /// Upload `instances`. The buffer's capacity is their count.
    pub fn new(device: &wgpu::Device, instances: &[SpriteInstance], atlas: AtlasSize, config: &TransformConfig) -> Self {
        let (sprites, clamped_layers) = encode_sprites(instances, atlas, config);
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sprite_buffer"),
            contents: bytemuck::cast_slice(&sprites),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        tracing::debug!(sprites = sprites.len(), clamped_layers, "sprite buffer uploaded");
        Self {
            buffer,
            capacity: sprites.len(),
            len: sprites.len(),
            clamped_layers,
            atlas,
            config: *config,
        }
    }

    /// Empty buffer with room for `capacity` sprites.
    pub fn with_capacity(device: &wgpu::Device, capacity: usize, atlas: AtlasSize, config: &TransformConfig) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("sprite_buffer"),
            size: (capacity * std::mem::size_of::<GpuSprite>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            buffer,
            capacity,
            len: 0,
            clamped_layers: 0,
            atlas,
            config: *config,
        }
    }

    /// Replace the contents with `instances`.
    pub fn write(&mut self, queue: &wgpu::Queue, instances: &[SpriteInstance]) -> Result<(), GpuError> {
        check_capacity(instances.len(), self.capacity)?;
        let (sprites, clamped_layers) = encode_sprites(instances, self.atlas, &self.config);
        if !sprites.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&sprites));
        }
        self.len = sprites.len();
        self.clamped_layers = clamped_layers;
        Ok(())
    }

    /// Sprites drawn by [`SpriteFrame::draw_buffer`](crate::SpriteFrame::draw_buffer).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Instances whose layer was clamped while encoding.
    pub fn clamped_layers(&self) -> usize {
        self.clamped_layers
    }

    pub(crate) fn encoded_for(&self, atlas: AtlasSize, config: &TransformConfig) -> bool {
        self.atlas == atlas && self.config == *config
    }

    /// The written sprites, or `None` when there are none.
    pub(crate) fn slice(&self) -> Option<wgpu::BufferSlice<'_>> {
        let bytes = (self.len * std::mem::size_of::<GpuSprite>()) as u64;
        (bytes > 0).then(|| self.buffer.slice(..bytes))
    }
}

/// Encode `instances` for upload, counting layers outside the depth range.
pub fn encode_sprites(
    instances: &[SpriteInstance],
    atlas: AtlasSize,
    config: &TransformConfig,
) -> (Vec<GpuSprite>, usize) {
    let clamped = instances
        .iter()
        .filter(|i| !depth::layer_in_range(i.layer, config))
        .count();
    let sprites = instances
        .iter()
        .map(|i| GpuSprite::from_instance(i, atlas, config))
        .collect();
    (sprites, clamped)
}

fn check_capacity(len: usize, capacity: usize) -> Result<(), GpuError> {
    if len > capacity {
        return Err(GpuError::BufferOverflow { len, capacity });
    }
    Ok(())
}
