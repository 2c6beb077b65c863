//! Derived runtime parameters computed from machine configuration.

use super::machine::MachineConfig;

/// Runtime parameters computed once at initialization and used by the
/// step interrupt without further arithmetic on configuration values.
#[derive(Debug, Clone, Copy)]
pub struct DerivedParams {
    /// CPU cycles per minute (`60 * cpu_hz`).
    pub cycles_per_minute: u64,

    /// CPU cycles per microsecond.
    pub cycles_per_microsecond: u32,

    /// CPU cycles per acceleration tick.
    pub cycles_per_acceleration_tick: u32,

    /// Slowest commanded step rate in steps per minute.
    pub minimum_steps_per_minute: u32,

    /// Step pulse high-time in microseconds.
    pub pulse_microseconds: u32,

    /// Beam dimming curve start point in Q16 (65536 = 1.0).
    pub dimm_start_q16: u32,
}

impl DerivedParams {
    /// Compute derived parameters from a machine configuration.
    pub fn from_config(config: &MachineConfig) -> Self {
        let cpu_hz = config.timing.cpu_hz;
        Self {
            cycles_per_minute: 60 * cpu_hz as u64,
            cycles_per_microsecond: cpu_hz / 1_000_000,
            cycles_per_acceleration_tick: cpu_hz / config.timing.acceleration_ticks_per_second,
            minimum_steps_per_minute: config.timing.minimum_steps_per_minute,
            pulse_microseconds: config.timing.pulse_microseconds,
            dimm_start_q16: (config.beam.dimm_start * 65536.0) as u32,
        }
    }

    /// Step-event period in CPU cycles for a given rate, before timer
    /// quantization.
    #[inline]
    pub fn cycles_for_rate(&self, steps_per_minute: u32) -> u32 {
        let spm = steps_per_minute.max(1) as u64;
        (self.cycles_per_minute / spm).min(u32::MAX as u64) as u32
    }
}
