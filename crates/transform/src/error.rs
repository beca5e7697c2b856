/// Rejected camera parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CameraError {
    #[error("camera extents must be non-zero, got {0:?}")]
    ZeroExtent([f32; 2]),
    #[error("camera extents must be positive, got {0:?}")]
    NegativeExtent([f32; 2]),
    #[error("camera extents must be finite, got {0:?}")]
    NonFiniteExtent([f32; 2]),
    #[error("camera center must be finite, got {0:?}")]
    NonFiniteCenter([f32; 2]),
    #[error("orthographic size {max_ortho_size} and aspect {aspect} must be finite and positive")]
    InvalidOrtho { max_ortho_size: f32, aspect: f32 },
}

/// Rejected or unreadable transform configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("pixels_per_unit must be finite and positive, got {0}")]
    InvalidPixelsPerUnit(f32),
    #[error("layer_scale must be finite and within [1, {max}], got {value}")]
    InvalidLayerScale { value: f32, max: f32 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Pixel data that does not match its declared atlas size.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AtlasError {
    #[error("atlas of {width}x{height} needs {expected} bytes, got {actual}")]
    ByteCountMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}
