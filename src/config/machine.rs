//! Machine configuration - root configuration structure.

use serde::Deserialize;

use super::axis::AxisConfig;

/// Timing parameters of the step-event generator.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TimingConfig {
    /// CPU clock frequency in Hz.
    #[serde(default = "default_cpu_hz")]
    pub cpu_hz: u32,

    /// Nominal acceleration decisions per second.
    #[serde(default = "default_acceleration_ticks")]
    pub acceleration_ticks_per_second: u32,

    /// Slowest commanded step rate in steps per minute.
    #[serde(default = "default_minimum_rate")]
    pub minimum_steps_per_minute: u32,

    /// Guaranteed step pulse high-time in microseconds.
    #[serde(default = "default_pulse_us")]
    pub pulse_microseconds: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            cpu_hz: default_cpu_hz(),
            acceleration_ticks_per_second: default_acceleration_ticks(),
            minimum_steps_per_minute: default_minimum_rate(),
            pulse_microseconds: default_pulse_us(),
        }
    }
}

/// The three machine axes.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct AxesConfig {
    /// X axis.
    pub x: AxisConfig,
    /// Y axis.
    pub y: AxisConfig,
    /// Z axis.
    pub z: AxisConfig,
}

/// Beam modulation parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BeamConfig {
    /// Issue one laser pulse every this many step events.
    #[serde(default = "default_pulse_every")]
    pub pulse_every: u8,

    /// Dimming curve start point, a fraction within [0, 1].
    ///
    /// Maps nominal intensity [0, 255] onto a dimming weight
    /// [`dimm_start`, 1.0]; higher intensities dim more aggressively with
    /// falling speed.
    #[serde(default = "default_dimm_start")]
    pub dimm_start: f32,

    /// Laser PWM runs at a fixed hardware frequency; per-step pulsing is
    /// bypassed entirely.
    #[serde(default)]
    pub static_pwm: bool,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            pulse_every: default_pulse_every(),
            dimm_start: default_dimm_start(),
            static_pwm: false,
        }
    }
}

/// Homing parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct HomingConfig {
    /// Pulse-to-pulse interval while seeking end-stops, in microseconds.
    #[serde(default = "default_homing_interval")]
    pub pulse_interval_us: u32,
}

impl Default for HomingConfig {
    fn default() -> Self {
        Self {
            pulse_interval_us: default_homing_interval(),
        }
    }
}

/// Board-level hardware description.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct HardwareConfig {
    /// XOR mask applied to step/direction outputs for active-low drivers.
    #[serde(default)]
    pub invert_mask: u8,

    /// The machine has a driven Z axis.
    #[serde(default)]
    pub three_axes: bool,

    /// Honor door/chiller interlocks and limit switches inside the step
    /// interrupt.
    #[serde(default)]
    pub laser_interlocks: bool,

    /// USB driveboard variant: limit inputs read active-high and carry no
    /// auxiliary assist channels.
    #[serde(default)]
    pub usb_board: bool,
}

/// Root configuration structure from TOML.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct MachineConfig {
    /// Step-event timing.
    #[serde(default)]
    pub timing: TimingConfig,

    /// Axis scales and origin offsets.
    #[serde(default)]
    pub axes: AxesConfig,

    /// Beam modulation.
    #[serde(default)]
    pub beam: BeamConfig,

    /// Homing behavior.
    #[serde(default)]
    pub homing: HomingConfig,

    /// Board-level hardware description.
    #[serde(default)]
    pub hardware: HardwareConfig,
}

fn default_cpu_hz() -> u32 {
    16_000_000
}

fn default_acceleration_ticks() -> u32 {
    100
}

fn default_minimum_rate() -> u32 {
    1600
}

fn default_pulse_us() -> u32 {
    5
}

fn default_pulse_every() -> u8 {
    10
}

fn default_dimm_start() -> f32 {
    0.7
}

fn default_homing_interval() -> u32 {
    600
}
