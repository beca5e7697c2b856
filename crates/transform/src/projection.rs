//! World-space quad expansion and orthographic projection.

use glam::{Vec2, Vec4};
use pixelquad_common::{AtlasRegion, AtlasSize, SpriteInstance};

use crate::camera::Camera;
use crate::config::TransformConfig;
use crate::depth;

/// Round a world position onto the pixel grid.
///
/// Idempotent at every magnitude when `pixels_per_unit` is a power of two
/// (see [`TransformConfig::exact_snapping`]). Other scales are idempotent
/// near the origin but may move a snapped value by one f32 step once
/// `|position * pixels_per_unit|` approaches 2^24.
pub fn snap_to_pixel_grid(position: Vec2, pixels_per_unit: f32) -> Vec2 {
    (position * pixels_per_unit).round() / pixels_per_unit
}

/// World-space half-size of the quad drawn for `region`.
///
/// The sprite's size comes from its atlas rectangle: one atlas pixel covers
/// `1 / pixels_per_unit` world units.
pub fn quad_extents(region: &AtlasRegion, atlas: AtlasSize, pixels_per_unit: f32) -> Vec2 {
    region.extents * atlas.as_vec2() / pixels_per_unit
}

/// World-space position of one corner of `instance`.
pub fn world_corner(
    instance: &SpriteInstance,
    corner: Vec2,
    atlas: AtlasSize,
    config: &TransformConfig,
) -> Vec2 {
    let ppu = config.pixels_per_unit();
    // Snap the pivot only; snapping corners would split shared edges.
    let center = snap_to_pixel_grid(instance.center, ppu);
    center + corner * quad_extents(&instance.region, atlas, ppu)
}

/// Normalized device coordinates of a world position.
pub fn project_world(world: Vec2, camera: &Camera) -> Vec2 {
    (world - camera.center()) / camera.extents()
}

/// Clip-space position `(ndc.x, ndc.y, depth, 1)` of one corner.
pub fn project_corner(
    instance: &SpriteInstance,
    corner: Vec2,
    camera: &Camera,
    atlas: AtlasSize,
    config: &TransformConfig,
) -> Vec4 {
    let ndc = project_world(world_corner(instance, corner, atlas, config), camera);
    ndc.extend(depth::layer_depth(instance.layer, config)).extend(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelquad_common::CornerOffset;

    fn camera() -> Camera {
        Camera::new(Vec2::ZERO, Vec2::new(16.0, 9.0)).unwrap()
    }

    #[test]
    fn snapping_is_idempotent() {
        for ppu in [16.0, 10.0, 3.0] {
            for i in -500..500 {
                let c = Vec2::new(i as f32 * 0.0173, i as f32 * -0.311 + 0.5);
                let once = snap_to_pixel_grid(c, ppu);
                assert_eq!(snap_to_pixel_grid(once, ppu), once, "ppu {ppu}, c {c}");
            }
        }
    }

    #[test]
    fn power_of_two_snapping_is_idempotent_far_from_origin() {
        for ppu in [0.5, 8.0, 16.0, 64.0] {
            for x in [1_049_158.4_f32, -3_000_000.7, 16_777_215.0, 123_456.79] {
                let c = Vec2::new(x, -x * 0.37);
                let once = snap_to_pixel_grid(c, ppu);
                assert_eq!(snap_to_pixel_grid(once, ppu), once, "ppu {ppu}, c {c}");
            }
        }
    }

    #[test]
    fn snapping_applies_to_center_only() {
        let config = TransformConfig::default();
        let atlas = AtlasSize::new(64, 64);
        // 3x3 atlas pixels: the corners land on half-pixel positions.
        let region = AtlasRegion::from_pixel_rect(Vec2::ZERO, Vec2::splat(3.0), atlas);
        let instance = SpriteInstance::new(Vec2::new(0.51, 0.0), region, 0.0);

        let right = world_corner(&instance, Vec2::new(1.0, 0.0), atlas, &config);
        let left = world_corner(&instance, Vec2::new(-1.0, 0.0), atlas, &config);
        assert!((right.x - left.x - 3.0 / 16.0).abs() < 1e-6);
        assert!(((right.x + left.x) * 0.5 - 0.5).abs() < 1e-6);
    }

    #[test]
    fn camera_center_projects_to_origin() {
        for extents in [Vec2::new(16.0, 9.0), Vec2::new(0.25, 1000.0), Vec2::ONE] {
            let cam = Camera::new(Vec2::new(-3.5, 12.25), extents).unwrap();
            assert_eq!(project_world(cam.center(), &cam), Vec2::ZERO);
        }
    }

    #[test]
    fn corners_are_symmetric_about_center() {
        let cam = Camera::new(Vec2::new(2.0, -1.0), Vec2::new(7.0, 3.0)).unwrap();
        let c = Vec2::new(5.3, 8.1);
        let e = Vec2::new(1.5, 0.75);
        let sum = project_world(c + e, &cam) + project_world(c - e, &cam);
        assert!(sum.abs_diff_eq(2.0 * project_world(c, &cam), 1e-5));
    }

    #[test]
    fn zero_sized_atlas_gives_degenerate_quad() {
        let config = TransformConfig::default();
        let instance = SpriteInstance::new(Vec2::ONE, AtlasRegion::new(Vec2::splat(0.5), Vec2::splat(0.25)), 0.0);
        let atlas = AtlasSize::new(0, 0);
        let corners = CornerOffset::offsets().map(|c| world_corner(&instance, c, atlas, &config));
        assert!(corners.iter().all(|&p| p == Vec2::ONE));
    }

    #[test]
    fn extents_scale_end_to_end() {
        let config = TransformConfig::default();
        let atlas = AtlasSize::new(16, 16);
        let region = AtlasRegion::new(Vec2::ZERO, Vec2::new(8.0, 8.0));
        assert_eq!(quad_extents(&region, atlas, config.pixels_per_unit()), Vec2::new(8.0, 8.0));

        let instance = SpriteInstance::new(Vec2::new(16.0, 0.0), region, 0.0);
        let clip = project_corner(&instance, Vec2::new(1.0, 1.0), &camera(), atlas, &config);
        assert!((clip.x - 1.5).abs() < 1e-6);
        assert!((clip.y - 8.0 / 9.0).abs() < 1e-6);
        assert_eq!(clip.z, 0.0);
        assert_eq!(clip.w, 1.0);
    }

    #[test]
    fn depth_lands_in_clip_z() {
        let config = TransformConfig::default();
        let instance = SpriteInstance::new(Vec2::ZERO, AtlasRegion::ZERO, 250.0);
        let clip = project_corner(&instance, Vec2::ZERO, &camera(), AtlasSize::new(8, 8), &config);
        assert_eq!(clip.z, 0.25);
    }
}
