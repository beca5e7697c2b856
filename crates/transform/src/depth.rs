//! Layer-to-depth policy.
//!
//! Layers are clamped to `[0, layer_scale - 1]` and divided by `layer_scale`,
//! giving depths in `[0, 1)`. A larger layer means a larger depth, and
//! backends test depth with `GreaterEqual` against a buffer cleared to `0.0`,
//! so higher layers draw on top and equal layers keep submission order.

use crate::config::TransformConfig;

/// Highest layer that still maps below depth `1.0`.
pub fn max_layer(config: &TransformConfig) -> f32 {
    config.layer_scale() - 1.0
}

/// True when `layer` lies in the representable range without clamping.
pub fn layer_in_range(layer: f32, config: &TransformConfig) -> bool {
    (0.0..=max_layer(config)).contains(&layer)
}

/// Clamp a layer into the representable range. NaN maps to layer 0.
pub fn clamp_layer(layer: f32, config: &TransformConfig) -> f32 {
    if layer.is_nan() {
        return 0.0;
    }
    layer.clamp(0.0, max_layer(config))
}

/// Depth value written for `layer`.
pub fn layer_depth(layer: f32, config: &TransformConfig) -> f32 {
    clamp_layer(layer, config) / config.layer_scale()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_LAYER_SCALE;

    #[test]
    fn depth_is_strictly_monotonic_over_default_range() {
        let config = TransformConfig::default();
        let mut prev = layer_depth(0.0, &config);
        assert_eq!(prev, 0.0);
        for layer in 1..config.layer_scale() as u32 {
            let depth = layer_depth(layer as f32, &config);
            assert!(depth > prev, "layer {layer} depth {depth} <= {prev}");
            assert!(depth < 1.0);
            prev = depth;
        }
    }

    #[test]
    fn adjacent_layers_distinct_at_max_scale() {
        let config = TransformConfig::new(16.0, MAX_LAYER_SCALE).unwrap();
        let top = max_layer(&config);
        let below = layer_depth(top - 1.0, &config);
        let at_top = layer_depth(top, &config);
        assert!(at_top > below);
        assert!(at_top < 1.0);
    }

    #[test]
    fn top_layers_stay_ordered_in_f32() {
        let config = TransformConfig::new(16.0, MAX_LAYER_SCALE).unwrap();
        let top = max_layer(&config);
        let depths: Vec<f32> = (0..16).map(|i| layer_depth(top - 15.0 + i as f32, &config)).collect();
        assert!(depths.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn out_of_range_layers_clamp() {
        let config = TransformConfig::default();
        assert_eq!(clamp_layer(-5.0, &config), 0.0);
        assert_eq!(clamp_layer(1000.0, &config), 999.0);
        assert_eq!(clamp_layer(f32::INFINITY, &config), 999.0);
        assert_eq!(clamp_layer(f32::NAN, &config), 0.0);
        assert_eq!(layer_depth(5000.0, &config), layer_depth(999.0, &config));
    }

    #[test]
    fn range_check() {
        let config = TransformConfig::default();
        assert!(layer_in_range(0.0, &config));
        assert!(layer_in_range(999.0, &config));
        assert!(!layer_in_range(1000.0, &config));
        assert!(!layer_in_range(-0.5, &config));
        assert!(!layer_in_range(f32::NAN, &config));
    }
}
