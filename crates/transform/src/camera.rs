use glam::{UVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::error::CameraError;

/// Orthographic 2D camera.
///
/// The visible world region is `center ± extents`. Extents are validated on
/// construction, so projection never divides by zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CameraDesc", into = "CameraDesc")]
pub struct Camera {
    center: Vec2,
    extents: Vec2,
}

/// Either camera parameterization, as written in scene files.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum CameraDesc {
    Extents {
        center: Vec2,
        extents: Vec2,
    },
    Ortho {
        center: Vec2,
        max_ortho_size: f32,
        aspect: f32,
    },
}

impl TryFrom<CameraDesc> for Camera {
    type Error = CameraError;

    fn try_from(desc: CameraDesc) -> Result<Self, Self::Error> {
        match desc {
            CameraDesc::Extents { center, extents } => Camera::new(center, extents),
            CameraDesc::Ortho {
                center,
                max_ortho_size,
                aspect,
            } => Camera::from_ortho(center, max_ortho_size, aspect),
        }
    }
}

impl From<Camera> for CameraDesc {
    fn from(camera: Camera) -> Self {
        CameraDesc::Extents {
            center: camera.center,
            extents: camera.extents,
        }
    }
}

impl Camera {
    /// Camera showing `center ± extents` in world units.
    pub fn new(center: Vec2, extents: Vec2) -> Result<Self, CameraError> {
        if !center.is_finite() {
            return Err(CameraError::NonFiniteCenter(center.to_array()));
        }
        if !extents.is_finite() {
            return Err(CameraError::NonFiniteExtent(extents.to_array()));
        }
        if extents.x == 0.0 || extents.y == 0.0 {
            return Err(CameraError::ZeroExtent(extents.to_array()));
        }
        if extents.x < 0.0 || extents.y < 0.0 {
            return Err(CameraError::NegativeExtent(extents.to_array()));
        }
        Ok(Self { center, extents })
    }

    /// Camera from a vertical half-size and a width/height aspect ratio.
    pub fn from_ortho(center: Vec2, max_ortho_size: f32, aspect: f32) -> Result<Self, CameraError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(max_ortho_size) || !valid(aspect) {
            return Err(CameraError::InvalidOrtho {
                max_ortho_size,
                aspect,
            });
        }
        Self::new(center, max_ortho_size * Vec2::new(aspect, 1.0))
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// Half-size of the visible world region.
    pub fn extents(&self) -> Vec2 {
        self.extents
    }

    /// Width over height of the visible region.
    pub fn aspect(&self) -> f32 {
        self.extents.x / self.extents.y
    }

    /// Move the camera. Non-finite centers are rejected.
    pub fn set_center(&mut self, center: Vec2) -> Result<(), CameraError> {
        if !center.is_finite() {
            return Err(CameraError::NonFiniteCenter(center.to_array()));
        }
        self.center = center;
        Ok(())
    }

    /// Copy of this camera with its center floored onto the pixel grid.
    pub fn snapped(&self, pixels_per_unit: f32) -> Self {
        Self {
            center: (self.center * pixels_per_unit).floor() / pixels_per_unit,
            extents: self.extents,
        }
    }

    /// Pixel size of a render target that shows the visible region at one
    /// texel per atlas pixel.
    pub fn target_size(&self, pixels_per_unit: f32) -> UVec2 {
        (self.extents * 2.0 * pixels_per_unit).round().as_uvec2()
    }
}
