//! Error types for laser-motion.
//!
//! Provides unified error handling across configuration loading and
//! foreground motion operations. The step interrupt itself has no error
//! channel; safety conditions surface through the stop supervisor instead.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all laser-motion operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Motion or queue operation error
    Motion(MotionError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// CPU clock must be nonzero
    InvalidCpuClock(u32),
    /// Acceleration tick rate must be nonzero
    InvalidAccelerationTickRate(u32),
    /// Minimum step rate must be nonzero
    InvalidMinimumRate(u32),
    /// Step scale must be > 0
    InvalidStepsPerMm {
        /// Axis name ("x", "y" or "z")
        axis: &'static str,
        /// Offending value
        value: f64,
    },
    /// Beam pulse divider must be nonzero
    InvalidBeamPulseEvery(u8),
    /// Beam dimm start must be within [0, 1]
    InvalidDimmStart(f32),
    /// Homing pulse interval must exceed the step pulse width
    InvalidHomingInterval {
        /// Configured pulse-to-pulse interval in microseconds
        interval_us: u32,
        /// Configured step pulse width in microseconds
        pulse_us: u32,
    },
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Motion and queue operation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotionError {
    /// Operation requires the step interrupt to be disarmed first
    ProcessingActive,
    /// The block queue is full
    QueueFull,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motion(e) => write!(f, "Motion error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidCpuClock(v) => {
                write!(f, "Invalid CPU clock: {} Hz. Must be > 0", v)
            }
            ConfigError::InvalidAccelerationTickRate(v) => {
                write!(f, "Invalid acceleration tick rate: {} Hz. Must be > 0", v)
            }
            ConfigError::InvalidMinimumRate(v) => {
                write!(f, "Invalid minimum rate: {} steps/min. Must be > 0", v)
            }
            ConfigError::InvalidStepsPerMm { axis, value } => {
                write!(f, "Invalid steps-per-mm on {} axis: {}. Must be > 0", axis, value)
            }
            ConfigError::InvalidBeamPulseEvery(v) => {
                write!(f, "Invalid beam pulse divider: {}. Must be > 0", v)
            }
            ConfigError::InvalidDimmStart(v) => {
                write!(f, "Invalid beam dimm start: {}. Must be within [0, 1]", v)
            }
            ConfigError::InvalidHomingInterval { interval_us, pulse_us } => {
                write!(
                    f,
                    "Homing pulse interval {} us must exceed step pulse width {} us",
                    interval_us, pulse_us
                )
            }
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionError::ProcessingActive => {
                write!(f, "Step processing is active; stop it first")
            }
            MotionError::QueueFull => write!(f, "Block queue is full"),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotionError> for Error {
    fn from(e: MotionError) -> Self {
        Error::Motion(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotionError {}
