//! Configuration module for laser-motion.
//!
//! Provides types for loading and validating machine configuration from
//! TOML files (with `std` feature) or pre-parsed data. Hardware variants
//! of the original driveboard (three-axis builds, interlock wiring, USB
//! boards, static PWM) are runtime fields here, not compile-time switches.

mod axis;
mod derived;
#[cfg(feature = "std")]
mod loader;
mod machine;
pub mod units;
mod validation;

pub use axis::AxisConfig;
pub use derived::DerivedParams;
pub use machine::{AxesConfig, BeamConfig, HardwareConfig, HomingConfig, MachineConfig, TimingConfig};
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Millimeters, StepsPerMm};
