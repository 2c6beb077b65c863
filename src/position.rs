//! Absolute position tracking.
//!
//! Maintains the machine position as cumulative steps from origin on
//! three axes, with millimetre conversions at the API surface. Only the
//! Bresenham tracer moves it; homing destroys it.

use crate::config::units::{Millimeters, StepsPerMm};
use crate::config::AxesConfig;

/// Axis index of X.
pub const X_AXIS: usize = 0;
/// Axis index of Y.
pub const Y_AXIS: usize = 1;
/// Axis index of Z.
pub const Z_AXIS: usize = 2;

/// Three-axis absolute step position.
#[derive(Debug, Clone, Copy, Default)]
pub struct Position3 {
    steps: [i32; 3],
    scale: [StepsPerMm; 3],
}

impl Position3 {
    /// Create a zeroed position tracker with the given axis scales.
    pub fn new(axes: &AxesConfig) -> Self {
        Self {
            steps: [0; 3],
            scale: [axes.x.steps_per_mm, axes.y.steps_per_mm, axes.z.steps_per_mm],
        }
    }

    /// Current position of one axis in steps.
    #[inline]
    pub fn steps(&self, axis: usize) -> i32 {
        self.steps[axis]
    }

    /// Current position of one axis in millimetres.
    #[inline]
    pub fn millimeters(&self, axis: usize) -> f64 {
        Millimeters::from_steps(self.steps[axis], self.scale[axis]).value()
    }

    /// Move one axis by a signed number of steps.
    #[inline]
    pub fn advance(&mut self, axis: usize, delta: i32) {
        self.steps[axis] += delta;
    }

    /// Set the position from millimetre coordinates, quantized to steps.
    pub fn set_millimeters(&mut self, x: f64, y: f64, z: f64) {
        self.steps[X_AXIS] = Millimeters(x).to_steps(self.scale[X_AXIS]);
        self.steps[Y_AXIS] = Millimeters(y).to_steps(self.scale[Y_AXIS]);
        self.steps[Z_AXIS] = Millimeters(z).to_steps(self.scale[Z_AXIS]);
    }

    /// Reset all axes to zero.
    #[inline]
    pub fn clear(&mut self) {
        self.steps = [0; 3];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AxisConfig;

    fn axes() -> AxesConfig {
        AxesConfig {
            x: AxisConfig::new(32.8),
            y: AxisConfig::new(32.8),
            z: AxisConfig::new(128.0),
        }
    }

    #[test]
    fn test_set_get_round_trip() {
        let mut pos = Position3::new(&axes());
        pos.set_millimeters(100.0, -40.0, 2.5);

        assert!((pos.millimeters(X_AXIS) - 100.0).abs() <= 1.0 / 32.8);
        assert!((pos.millimeters(Y_AXIS) + 40.0).abs() <= 1.0 / 32.8);
        assert!((pos.millimeters(Z_AXIS) - 2.5).abs() <= 1.0 / 128.0);
    }

    #[test]
    fn test_advance_and_clear() {
        let mut pos = Position3::new(&axes());
        pos.advance(X_AXIS, 10);
        pos.advance(X_AXIS, -3);
        assert_eq!(pos.steps(X_AXIS), 7);

        pos.clear();
        assert_eq!(pos.steps(X_AXIS), 0);
    }
}
