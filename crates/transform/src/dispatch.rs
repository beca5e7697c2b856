//! Per-draw evaluation of every (instance, corner) pair.
//!
//! This is the CPU form of the vertex stage. Pairs are independent, so the
//! order of evaluation does not matter; output order follows the input
//! instances and [`CornerOffset::ALL`].

use glam::{Vec2, Vec4};
use pixelquad_common::{AtlasSize, CornerOffset, SpriteInstance};

use crate::camera::Camera;
use crate::config::TransformConfig;
use crate::{depth, projection, sampling};

/// Output of the transform for one corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadVertex {
    /// `(ndc.x, ndc.y, depth, 1)`.
    pub clip: Vec4,
    /// Normalized atlas coordinate.
    pub uv: Vec2,
}

/// The four corners of one instance, in [`CornerOffset::ALL`] order.
pub type QuadVertices = [QuadVertex; 4];

/// Counters for one draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub instances: usize,
    pub vertices: usize,
    /// Instances whose layer fell outside the depth range and was clamped.
    pub clamped_layers: usize,
}

/// Transformed quads for a whole draw.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawOutput {
    pub quads: Vec<QuadVertices>,
    pub stats: DrawStats,
    /// The camera actually used, after optional pixel snapping.
    pub camera: Camera,
}

/// Camera used for a draw: snapped to the pixel grid when configured.
pub fn frame_camera(camera: &Camera, config: &TransformConfig) -> Camera {
    if config.snap_camera() {
        camera.snapped(config.pixels_per_unit())
    } else {
        *camera
    }
}

/// Transform the four corners of one instance against an already prepared
/// camera.
pub fn transform_instance(
    instance: &SpriteInstance,
    camera: &Camera,
    atlas: AtlasSize,
    config: &TransformConfig,
) -> QuadVertices {
    let region = sampling::sampling_region(&instance.region, atlas, config.filter());
    CornerOffset::ALL.map(|corner| {
        let offset = corner.offset();
        QuadVertex {
            clip: projection::project_corner(instance, offset, camera, atlas, config),
            uv: sampling::sample_uv(offset, &region),
        }
    })
}

/// Transform every instance of a draw.
pub fn transform_draw(
    instances: &[SpriteInstance],
    camera: &Camera,
    atlas: AtlasSize,
    config: &TransformConfig,
) -> DrawOutput {
    let _span = tracing::info_span!("transform_draw", instances = instances.len()).entered();
    let camera = frame_camera(camera, config);

    let quads: Vec<QuadVertices> = instances
        .iter()
        .map(|instance| transform_instance(instance, &camera, atlas, config))
        .collect();

    let clamped_layers = instances
        .iter()
        .filter(|i| !depth::layer_in_range(i.layer, config))
        .count();
    if clamped_layers > 0 {
        tracing::warn!(
            clamped_layers,
            max_layer = depth::max_layer(config),
            "sprite layers outside the depth range were clamped"
        );
    }
    if atlas.is_empty() && !instances.is_empty() {
        tracing::debug!(?atlas, "empty atlas: every quad in this draw is degenerate");
    }

    let stats = DrawStats {
        instances: instances.len(),
        vertices: quads.len() * CornerOffset::ALL.len(),
        clamped_layers,
    };
    tracing::trace!(?stats, "draw transformed");

    DrawOutput {
        quads,
        stats,
        camera,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterMode;
    use pixelquad_common::AtlasRegion;

    fn camera() -> Camera {
        Camera::new(Vec2::ZERO, Vec2::new(16.0, 9.0)).unwrap()
    }

    #[test]
    fn one_quad_per_instance() {
        let config = TransformConfig::default();
        let instances = vec![SpriteInstance::default(); 3];
        let out = transform_draw(&instances, &camera(), AtlasSize::new(16, 16), &config);
        assert_eq!(out.quads.len(), 3);
        assert_eq!(out.stats.vertices, 12);
        assert_eq!(out.stats.clamped_layers, 0);
    }

    #[test]
    fn corners_follow_vertex_order() {
        let config = TransformConfig::default();
        let atlas = AtlasSize::new(16, 16);
        let region = AtlasRegion::new(Vec2::splat(0.5), Vec2::splat(0.5));
        let instance = SpriteInstance::new(Vec2::ZERO, region, 0.0);
        let quad = transform_instance(&instance, &camera(), atlas, &config);

        assert_eq!(quad[0].uv, Vec2::new(0.0, 0.0));
        assert_eq!(quad[1].uv, Vec2::new(1.0, 0.0));
        assert_eq!(quad[2].uv, Vec2::new(1.0, 1.0));
        assert_eq!(quad[3].uv, Vec2::new(0.0, 1.0));
        assert!(quad[0].clip.x < quad[1].clip.x);
        assert!(quad[1].clip.y < quad[2].clip.y);
    }

    #[test]
    fn linear_filter_insets_uv_but_not_quad() {
        let atlas = AtlasSize::new(16, 16);
        let region = AtlasRegion::from_pixel_rect(Vec2::ZERO, Vec2::splat(16.0), atlas);
        let instance = SpriteInstance::new(Vec2::ZERO, region, 0.0);
        let nearest = transform_instance(&instance, &camera(), atlas, &TransformConfig::default());
        let linear = transform_instance(
            &instance,
            &camera(),
            atlas,
            &TransformConfig::default().with_filter(FilterMode::Linear),
        );

        assert_eq!(nearest[0].clip, linear[0].clip);
        assert_eq!(linear[0].uv, Vec2::splat(1.0 / 32.0));
        assert_eq!(nearest[0].uv, Vec2::ZERO);
    }

    #[test]
    fn camera_is_snapped_when_configured() {
        let cam = Camera::new(Vec2::new(0.03, 0.0), Vec2::new(16.0, 9.0)).unwrap();
        let snapped = transform_draw(&[], &cam, AtlasSize::new(1, 1), &TransformConfig::default());
        assert_eq!(snapped.camera.center(), Vec2::ZERO);

        let raw = transform_draw(
            &[],
            &cam,
            AtlasSize::new(1, 1),
            &TransformConfig::default().with_snap_camera(false),
        );
        assert_eq!(raw.camera.center(), cam.center());
    }

    #[test]
    fn out_of_range_layers_are_counted_and_clamped() {
        let config = TransformConfig::default();
        let instances = [
            SpriteInstance::new(Vec2::ZERO, AtlasRegion::ZERO, 5.0),
            SpriteInstance::new(Vec2::ZERO, AtlasRegion::ZERO, 4000.0),
            SpriteInstance::new(Vec2::ZERO, AtlasRegion::ZERO, -1.0),
        ];
        let out = transform_draw(&instances, &camera(), AtlasSize::new(4, 4), &config);
        assert_eq!(out.stats.clamped_layers, 2);
        assert_eq!(out.quads[1][0].clip.z, 0.999);
        assert_eq!(out.quads[2][0].clip.z, 0.0);
    }

    #[test]
    fn higher_layer_has_greater_depth() {
        let config = TransformConfig::default();
        let back = SpriteInstance::new(Vec2::ZERO, AtlasRegion::ZERO, 3.0);
        let front = SpriteInstance::new(Vec2::ZERO, AtlasRegion::ZERO, 4.0);
        let atlas = AtlasSize::new(4, 4);
        let b = transform_instance(&back, &camera(), atlas, &config);
        let f = transform_instance(&front, &camera(), atlas, &config);
        assert!(f[0].clip.z > b[0].clip.z);
    }
}
