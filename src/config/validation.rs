//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::MachineConfig;

/// Validate a machine configuration.
///
/// Checks:
/// - Clock and tick rates are nonzero
/// - Axis step scales are positive
/// - Beam pulse divider is nonzero and dimm start is within [0, 1]
/// - Homing pulse interval leaves room for the step pulse width
pub fn validate_config(config: &MachineConfig) -> Result<()> {
    if config.timing.cpu_hz == 0 {
        return Err(Error::Config(ConfigError::InvalidCpuClock(config.timing.cpu_hz)));
    }

    if config.timing.acceleration_ticks_per_second == 0 {
        return Err(Error::Config(ConfigError::InvalidAccelerationTickRate(
            config.timing.acceleration_ticks_per_second,
        )));
    }

    if config.timing.minimum_steps_per_minute == 0 {
        return Err(Error::Config(ConfigError::InvalidMinimumRate(
            config.timing.minimum_steps_per_minute,
        )));
    }

    for (name, axis) in [
        ("x", &config.axes.x),
        ("y", &config.axes.y),
        ("z", &config.axes.z),
    ] {
        if axis.steps_per_mm.value() <= 0.0 {
            return Err(Error::Config(ConfigError::InvalidStepsPerMm {
                axis: name,
                value: axis.steps_per_mm.value(),
            }));
        }
    }

    if config.beam.pulse_every == 0 {
        return Err(Error::Config(ConfigError::InvalidBeamPulseEvery(
            config.beam.pulse_every,
        )));
    }

    if !(0.0..=1.0).contains(&config.beam.dimm_start) {
        return Err(Error::Config(ConfigError::InvalidDimmStart(config.beam.dimm_start)));
    }

    if config.homing.pulse_interval_us <= config.timing.pulse_microseconds {
        return Err(Error::Config(ConfigError::InvalidHomingInterval {
            interval_us: config.homing.pulse_interval_us,
            pulse_us: config.timing.pulse_microseconds,
        }));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&MachineConfig::default()).is_ok());
    }

    #[test]
    fn test_zero_steps_per_mm_rejected() {
        let mut config = MachineConfig::default();
        config.axes.y.steps_per_mm = crate::config::units::StepsPerMm(0.0);

        let result = validate_config(&config);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidStepsPerMm { axis: "y", .. }))
        ));
    }

    #[test]
    fn test_dimm_start_out_of_range_rejected() {
        let mut config = MachineConfig::default();
        config.beam.dimm_start = 1.5;

        let result = validate_config(&config);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidDimmStart(_)))
        ));
    }

    #[test]
    fn test_homing_interval_must_exceed_pulse_width() {
        let mut config = MachineConfig::default();
        config.homing.pulse_interval_us = config.timing.pulse_microseconds;

        let result = validate_config(&config);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidHomingInterval { .. }))
        ));
    }
}
