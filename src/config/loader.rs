//! Configuration loading from files (std only).

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Error, Result};

use super::MachineConfig;

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
///
/// ```rust,ignore
/// use laser_motion::load_config;
///
/// let config = load_config("machine.toml")?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<MachineConfig> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| {
        let msg = heapless::String::try_from(e.to_string().as_str()).unwrap_or_default();
        Error::Config(ConfigError::IoError(msg))
    })?;

    parse_config(&content)
}

/// Parse configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or fails validation.
pub fn parse_config(content: &str) -> Result<MachineConfig> {
    let config: MachineConfig = toml::from_str(content).map_err(|e| {
        let msg = heapless::String::try_from(e.message()).unwrap_or_default();
        Error::Config(ConfigError::ParseError(msg))
    })?;

    // Validate the configuration
    super::validation::validate_config(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let toml = r#"
[axes.x]
steps_per_mm = 32.8

[axes.y]
steps_per_mm = 32.8

[axes.z]
steps_per_mm = 128.0
"#;

        let config = parse_config(toml).unwrap();
        assert!((config.axes.x.steps_per_mm.value() - 32.8).abs() < 1e-9);
        assert_eq!(config.timing.cpu_hz, 16_000_000);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[timing]
cpu_hz = 16000000
acceleration_ticks_per_second = 100
minimum_steps_per_minute = 1600
pulse_microseconds = 5

[axes.x]
steps_per_mm = 32.8
origin_offset_mm = 5.0

[axes.y]
steps_per_mm = 32.8
origin_offset_mm = 5.0

[axes.z]
steps_per_mm = 128.0

[beam]
pulse_every = 8
dimm_start = 0.6

[homing]
pulse_interval_us = 400

[hardware]
invert_mask = 0
three_axes = true
laser_interlocks = true
"#;

        let config = parse_config(toml).unwrap();
        assert_eq!(config.beam.pulse_every, 8);
        assert!(config.hardware.three_axes);
        assert!(config.hardware.laser_interlocks);
        assert!((config.axes.x.origin_offset.value() - 5.0).abs() < 1e-9);
        assert_eq!(config.homing.pulse_interval_us, 400);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let toml = r#"
[beam]
dimm_start = 2.0
"#;

        assert!(parse_config(toml).is_err());
    }
}
