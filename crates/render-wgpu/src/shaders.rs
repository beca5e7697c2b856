use glam::{Vec2, Vec4};

use crate::gpu::{GpuSprite, GpuUniform};

/// WGSL shader for instanced sprite quads.
///
/// Vertex stage: snap the instance center to the pixel grid, size the quad
/// from its atlas region, project through the orthographic camera and map
/// the clamped layer to depth. Fragment stage: sample the atlas and discard
/// fully transparent texels.
pub const SPRITE_SHADER: &str = r#"
struct Uniforms {
    camera_center: vec2<f32>,
    camera_extents: vec2<f32>,
    atlas_size: vec2<f32>,
    pixels_per_unit: f32,
    layer_scale: f32,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

@group(1) @binding(0)
var atlas_texture: texture_2d<f32>;
@group(1) @binding(1)
var atlas_sampler: sampler;

struct CornerInput {
    @location(0) offset: vec2<f32>,
};

struct SpriteInput {
    @location(1) center: vec2<f32>,
    @location(2) region_center: vec2<f32>,
    @location(3) region_extents: vec2<f32>,
    @location(4) sample_extents: vec2<f32>,
    @location(5) layer: f32,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

// Round half away from zero, matching the CPU path.
fn round_away(v: vec2<f32>) -> vec2<f32> {
    return sign(v) * floor(abs(v) + vec2<f32>(0.5));
}

@vertex
fn vs_main(corner: CornerInput, sprite: SpriteInput) -> VertexOutput {
    let ppu = uniforms.pixels_per_unit;
    let center = round_away(sprite.center * ppu) / ppu;
    let extents = sprite.region_extents * uniforms.atlas_size / ppu;
    let world = center + corner.offset * extents;
    let ndc = (world - uniforms.camera_center) / uniforms.camera_extents;
    let layer = clamp(sprite.layer, 0.0, uniforms.layer_scale - 1.0);

    var out: VertexOutput;
    out.clip_position = vec4<f32>(ndc, layer / uniforms.layer_scale, 1.0);
    out.uv = sprite.region_center + corner.offset * sprite.sample_extents;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let color = textureSample(atlas_texture, atlas_sampler, in.uv);
    if color.a == 0.0 {
        discard;
    }
    return color;
}
"#;

/// `vs_main` evaluated on the CPU, statement for statement: the clip
/// position and atlas coordinate of `corner` of `sprite`.
pub fn sprite_vertex(corner: Vec2, sprite: &GpuSprite, uniforms: &GpuUniform) -> (Vec4, Vec2) {
    // signum(0) is 1 where WGSL sign(0) is 0; the floor term is 0 either way.
    let round_away = |v: Vec2| v.signum() * (v.abs() + Vec2::splat(0.5)).floor();
    let ppu = uniforms.pixels_per_unit;
    let center = round_away(Vec2::from(sprite.center) * ppu) / ppu;
    let extents = Vec2::from(sprite.region_extents) * Vec2::from(uniforms.atlas_size) / ppu;
    let world = center + corner * extents;
    let ndc = (world - Vec2::from(uniforms.camera_center)) / Vec2::from(uniforms.camera_extents);
    let layer = sprite.layer.clamp(0.0, uniforms.layer_scale - 1.0);

    let clip = ndc.extend(layer / uniforms.layer_scale).extend(1.0);
    let uv = Vec2::from(sprite.region_center) + corner * Vec2::from(sprite.sample_extents);
    (clip, uv)
}

/// WGSL shader that blits the low-resolution target onto the surface.
pub const UPSCALE_SHADER: &str = r#"
struct Letterbox {
    extents: vec2<f32>,
    padding: vec2<f32>,
};

@group(0) @binding(0)
var<uniform> letterbox: Letterbox;
@group(0) @binding(1)
var frame_texture: texture_2d<f32>;
@group(0) @binding(2)
var frame_sampler: sampler;

struct UpscaleOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_upscale(@builtin(vertex_index) index: u32) -> UpscaleOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
        vec2<f32>(-1.0, -1.0),
    );
    let corner = corners[index];

    var out: UpscaleOutput;
    out.clip_position = vec4<f32>(corner * letterbox.extents, 0.0, 1.0);
    out.uv = vec2<f32>(corner.x * 0.5 + 0.5, 0.5 - corner.y * 0.5);
    return out;
}

@fragment
fn fs_upscale(in: UpscaleOutput) -> @location(0) vec4<f32> {
    return textureSample(frame_texture, frame_sampler, in.uv);
}
"#;
