//! Corner-to-atlas mapping.

use glam::Vec2;
use pixelquad_common::{AtlasRegion, AtlasSize};

use crate::config::FilterMode;

/// Atlas coordinate sampled at `corner` of a quad showing `region`.
pub fn sample_uv(corner: Vec2, region: &AtlasRegion) -> Vec2 {
    region.center + corner * region.extents
}

/// Region the sampler should read for `region` under `filter`.
///
/// Linear filtering blends with the neighbouring texel, so the sampled
/// rectangle is inset by half a texel. Quad sizing always uses the full
/// region.
pub fn sampling_region(region: &AtlasRegion, atlas: AtlasSize, filter: FilterMode) -> AtlasRegion {
    match filter {
        FilterMode::Nearest => *region,
        FilterMode::Linear => region.inset_half_texel(atlas),
    }
}
