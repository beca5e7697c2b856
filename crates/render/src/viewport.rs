use glam::{UVec2, Vec2};

/// NDC half-extents of a `target_aspect` image letterboxed into an output
/// surface of `output` pixels.
///
/// The image fills the output on one axis and is centered on the other.
pub fn letterbox_extents(output: UVec2, target_aspect: f32) -> Vec2 {
    if output.x == 0 || output.y == 0 || target_aspect.is_nan() || target_aspect <= 0.0 {
        return Vec2::ONE;
    }
    let output_aspect = output.x as f32 / output.y as f32;
    if output_aspect < target_aspect {
        Vec2::new(1.0, output_aspect / target_aspect)
    } else {
        Vec2::new(target_aspect / output_aspect, 1.0)
    }
}
