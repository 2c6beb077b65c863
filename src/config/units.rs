//! Unit types for physical quantities.
//!
//! Provides type-safe representations of lengths and axis scale factors
//! to prevent unit confusion at compile time. Step rates stay plain
//! `u32` steps-per-minute inside the interrupt path.

use core::ops::{Add, Sub};

use serde::Deserialize;

/// Length in millimetres.
///
/// Used for configuration and the user-facing position API. Internally
/// converted to absolute step counts.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

impl Millimeters {
    /// Create a new Millimeters value.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Convert to a rounded absolute step count.
    #[inline]
    pub fn to_steps(self, scale: StepsPerMm) -> i32 {
        libm::round(self.0 * scale.0) as i32
    }

    /// Create from an absolute step count.
    #[inline]
    pub fn from_steps(steps: i32, scale: StepsPerMm) -> Self {
        Self(steps as f64 / scale.0)
    }
}

impl Add for Millimeters {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Millimeters {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

/// Axis scale factor in steps per millimetre.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize)]
#[serde(transparent)]
pub struct StepsPerMm(pub f64);

impl StepsPerMm {
    /// Create a new StepsPerMm value.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl Default for StepsPerMm {
    fn default() -> Self {
        Self(1.0)
    }
}
