//! # laser-motion
//!
//! Real-time step-pulse generation and motion execution core for laser
//! cutters, driven by pre-planned motion blocks.
//!
//! ## Features
//!
//! - **Trapezoidal speed profiles**: per-block accelerate/cruise/decelerate
//!   rate integration at a fixed acceleration tick rate
//! - **Bresenham step distribution**: simultaneous three-axis pulse
//!   rasterization with absolute position tracking
//! - **Beam modulation**: step-synchronized laser pulsing with
//!   speed-proportional dimming and per-pixel raster intensity
//! - **Configuration-driven**: machine parameters in TOML files
//! - **Hardware-agnostic**: all register access behind the
//!   [`MachinePort`] trait, so the core runs unmodified against a simulator
//! - **no_std compatible**: core library works without the standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use laser_motion::{BlockQueue, MachineConfig, RasterBuffer, Stepper};
//!
//! let config: MachineConfig = laser_motion::load_config("machine.toml")?;
//! let mut core = Stepper::new(
//!     port,
//!     BlockQueue::<16>::new(),
//!     RasterBuffer::<256>::new(),
//!     &config,
//! )?;
//!
//! core.planner_mut().push(block)?;
//! core.start_processing();
//! // ... the step timer interrupt trampolines into core.step_event() ...
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

// Core modules
pub mod beam;
pub mod config;
pub mod error;
pub mod homing;
pub mod motion;
pub mod planner;
pub mod port;
pub mod position;
pub mod raster;
pub mod stepper;
pub mod supervisor;
pub mod timing;

// Re-exports for ergonomic API
pub use config::{validate_config, AxisConfig, DerivedParams, MachineConfig};
pub use error::{Error, Result};
pub use motion::{LineTracer, SpeedProfile};
pub use planner::{Block, BlockQueue, BlockSource, BlockType};
pub use port::MachinePort;
#[cfg(feature = "std")]
pub use port::sim::SimPort;
pub use position::Position3;
pub use raster::{RasterBuffer, RasterSource};
pub use stepper::Stepper;
pub use supervisor::{StopCode, Supervisor};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::load_config;

// Unit types
pub use config::units::{Millimeters, StepsPerMm};
