//! Configuration parsing and validation workflow tests.

use laser_motion::config::parse_config;
use laser_motion::{validate_config, DerivedParams, MachineConfig};

const MINIMAL_CONFIG: &str = r#"
[axes.x]
steps_per_mm = 32.8

[axes.y]
steps_per_mm = 32.8

[axes.z]
steps_per_mm = 128.0
"#;

const FULL_CONFIG: &str = r#"
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
static_pwm = false

[homing]
pulse_interval_us = 400

[hardware]
invert_mask = 0
three_axes = true
laser_interlocks = true
usb_board = true
"#;

#[test]
fn minimal_config_fills_defaults() {
    let config = parse_config(MINIMAL_CONFIG).expect("minimal config should parse");

    assert_eq!(config.timing.cpu_hz, 16_000_000);
    assert_eq!(config.timing.acceleration_ticks_per_second, 100);
    assert_eq!(config.timing.minimum_steps_per_minute, 1600);
    assert_eq!(config.beam.pulse_every, 10);
    assert!(!config.hardware.three_axes);
    assert!(!config.hardware.laser_interlocks);
}

#[test]
fn full_config_parses_every_section() {
    let config = parse_config(FULL_CONFIG).expect("full config should parse");

    assert!((config.axes.x.steps_per_mm.value() - 32.8).abs() < 1e-9);
    assert!((config.axes.x.origin_offset.value() - 5.0).abs() < 1e-9);
    assert_eq!(config.beam.pulse_every, 8);
    assert!((config.beam.dimm_start - 0.6).abs() < 1e-6);
    assert_eq!(config.homing.pulse_interval_us, 400);
    assert!(config.hardware.three_axes);
    assert!(config.hardware.usb_board);
}

#[test]
fn derived_params_follow_config() {
    let config = parse_config(FULL_CONFIG).unwrap();
    let params = DerivedParams::from_config(&config);

    assert_eq!(params.cycles_per_minute, 960_000_000);
    assert_eq!(params.cycles_per_microsecond, 16);
    assert_eq!(params.cycles_per_acceleration_tick, 160_000);
    // 0.6 in Q16.
    assert_eq!(params.dimm_start_q16, 39_321);
}

#[test]
fn default_config_validates() {
    assert!(validate_config(&MachineConfig::default()).is_ok());
}

#[test]
fn invalid_axis_scale_is_rejected() {
    let toml = r#"
[axes.x]
steps_per_mm = -1.0
"#;
    assert!(parse_config(toml).is_err());
}

#[test]
fn invalid_dimm_start_is_rejected() {
    let toml = r#"
[beam]
dimm_start = 1.5
"#;
    assert!(parse_config(toml).is_err());
}

#[test]
fn homing_interval_shorter_than_pulse_is_rejected() {
    let toml = r#"
[timing]
pulse_microseconds = 500

[homing]
pulse_interval_us = 400
"#;
    assert!(parse_config(toml).is_err());
}

#[test]
fn malformed_toml_reports_parse_error() {
    let result = parse_config("[timing\ncpu_hz = ");
    assert!(result.is_err());
}
