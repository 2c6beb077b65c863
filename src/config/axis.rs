//! Per-axis configuration from TOML.

use serde::Deserialize;

use super::units::{Millimeters, StepsPerMm};

/// Configuration of one machine axis.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AxisConfig {
    /// Step scale of the axis drive train.
    pub steps_per_mm: StepsPerMm,

    /// Work-area origin offset applied at init, in millimetres.
    #[serde(default, rename = "origin_offset_mm")]
    pub origin_offset: Millimeters,
}

impl AxisConfig {
    /// Create an axis configuration with no origin offset.
    pub const fn new(steps_per_mm: f64) -> Self {
        Self {
            steps_per_mm: StepsPerMm(steps_per_mm),
            origin_offset: Millimeters(0.0),
        }
    }
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_defaults() {
        let axis = AxisConfig::new(32.8);
        assert!((axis.steps_per_mm.value() - 32.8).abs() < 1e-9);
        assert_eq!(axis.origin_offset.value(), 0.0);
    }
}
