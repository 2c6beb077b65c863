//! Blocking homing routine.
//!
//! Drives the selected axes toward their end-stops with calibrated
//! busy-wait pulse timing, runs each axis a fixed overshoot allowance
//! past first switch assertion so the carriage seats against the stop,
//! and zeroes the absolute position on completion. Only callable while
//! the step interrupt is disarmed; the whole foreground blocks here.

use embedded_hal::delay::DelayNs;

use crate::config::HardwareConfig;
use crate::port::{
    step_bit, MachinePort, DIRECTION_MASK, LIMIT_MASK, STEP_MASK, X1_LIMIT_BIT, Y1_LIMIT_BIT,
    Z1_LIMIT_BIT,
};
use crate::position::Position3;

/// Extra pulses an axis emits after its end-stop first asserts.
///
/// Debounces the switch and guarantees mechanical seating.
pub const OVERSHOOT_STEPS: u8 = 6;

/// Home-direction limit input bit per axis index.
const HOME_LIMIT_BITS: [u8; 3] = [X1_LIMIT_BIT, Y1_LIMIT_BIT, Z1_LIMIT_BIT];

/// Run one homing pass over the given axes.
///
/// Approaches the end-stops when `reverse` is false, backs off them when
/// true (direction bits and limit reads both invert). Exits once every
/// requested axis has consumed its overshoot allowance, then resets the
/// absolute position to zero.
#[allow(clippy::too_many_arguments)]
pub(crate) fn homing_pass<P: MachinePort, D: DelayNs>(
    port: &mut P,
    position: &mut Position3,
    hardware: &HardwareConfig,
    pulse_us: u32,
    interval_us: u32,
    mut axes: [bool; 3],
    reverse: bool,
    delay: &mut D,
) {
    let step_delay_us = interval_us - pulse_us;
    let mut overshoot = [OVERSHOOT_STEPS; 3];

    let mut out_bits: u8 = DIRECTION_MASK;
    for axis in 0..3 {
        if axes[axis] {
            out_bits |= 1 << step_bit(axis);
        }
    }
    if reverse {
        out_bits ^= DIRECTION_MASK;
    }
    out_bits ^= hardware.invert_mask;

    port.set_direction_bits(out_bits & DIRECTION_MASK);

    loop {
        let mut limit_bits = port.read_limit_bits();
        if reverse {
            limit_bits ^= LIMIT_MASK;
        }

        for axis in 0..3 {
            if !axes[axis] {
                continue;
            }
            let mask = 1 << HOME_LIMIT_BITS[axis];
            // USB boards sense active-high, legacy boards active-low.
            let sensed = if hardware.usb_board {
                limit_bits & mask != 0
            } else {
                limit_bits & mask == 0
            };
            if sensed {
                if overshoot[axis] == 0 {
                    axes[axis] = false;
                    out_bits ^= 1 << step_bit(axis);
                } else {
                    overshoot[axis] -= 1;
                }
            }
        }

        if axes.iter().any(|&active| active) {
            // step all axes still active
            port.set_step_bits(out_bits & STEP_MASK);
            delay.delay_us(pulse_us);
            port.reset_step_bits();
            delay.delay_us(step_delay_us);
        } else {
            break;
        }
    }

    position.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AxesConfig;
    use crate::port::sim::{PortEvent, SimPort};
    use embedded_hal_mock::eh1::delay::NoopDelay;

    /// Simulator wrapper whose home limits assert after a fixed number
    /// of reads per axis.
    struct SeekPort {
        inner: SimPort,
        reads: u32,
        trip_after: [u32; 3],
    }

    impl SeekPort {
        fn new(trip_after: [u32; 3]) -> Self {
            Self {
                inner: SimPort::new(),
                reads: 0,
                trip_after,
            }
        }
    }

    impl MachinePort for SeekPort {
        fn set_direction_bits(&mut self, bits: u8) {
            self.inner.set_direction_bits(bits);
        }
        fn set_step_bits(&mut self, bits: u8) {
            self.inner.set_step_bits(bits);
        }
        fn reset_step_bits(&mut self) {
            self.inner.reset_step_bits();
        }
        fn program_step_timer(&mut self, prescaler: u16, ceiling: u16) {
            self.inner.program_step_timer(prescaler, ceiling);
        }
        fn arm_pulse_reset(&mut self, cycles: u32) {
            self.inner.arm_pulse_reset(cycles);
        }
        fn set_laser_pwm(&mut self, duty: u8) {
            self.inner.set_laser_pwm(duty);
        }
        fn set_beam_pin(&mut self, on: bool) {
            self.inner.set_beam_pin(on);
        }
        fn arm_beam_reset(&mut self, prescaler: u16, ticks: u8) {
            self.inner.arm_beam_reset(prescaler, ticks);
        }
        fn read_limit_bits(&mut self) -> u8 {
            self.reads += 1;
            let mut bits = 0u8;
            for axis in 0..3 {
                if self.reads > self.trip_after[axis] {
                    bits |= 1 << HOME_LIMIT_BITS[axis];
                }
            }
            self.inner.limit_bits = bits;
            bits
        }
        fn door_open(&mut self) -> bool {
            self.inner.door_open
        }
        fn chiller_off(&mut self) -> bool {
            self.inner.chiller_off
        }
        fn set_air_assist(&mut self, on: bool) {
            self.inner.set_air_assist(on);
        }
        fn set_aux1_assist(&mut self, on: bool) {
            self.inner.set_aux1_assist(on);
        }
        fn set_aux2_assist(&mut self, on: bool) {
            self.inner.set_aux2_assist(on);
        }
        fn enable_step_interrupt(&mut self) {
            self.inner.enable_step_interrupt();
        }
        fn disable_step_interrupt(&mut self) {
            self.inner.disable_step_interrupt();
        }
        fn enable_nested_interrupts(&mut self) {
            self.inner.enable_nested_interrupts();
        }
        fn disable_nested_interrupts(&mut self) {
            self.inner.disable_nested_interrupts();
        }
    }

    fn usb_hardware() -> HardwareConfig {
        HardwareConfig {
            invert_mask: 0,
            three_axes: false,
            laser_interlocks: false,
            usb_board: true,
        }
    }

    #[test]
    fn test_overshoot_allowance_is_exact() {
        // X trips on the very first read, Y after 10 reads.
        let mut port = SeekPort::new([0, 10, u32::MAX]);
        let mut position = Position3::new(&AxesConfig::default());
        let mut delay = NoopDelay::new();

        homing_pass(
            &mut port,
            &mut position,
            &usb_hardware(),
            5,
            600,
            [true, true, false],
            false,
            &mut delay,
        );

        let counts = port.inner.step_pulse_counts();
        // X: sensed from iteration one, six overshoot pulses.
        assert_eq!(counts[0], OVERSHOOT_STEPS as u32);
        // Y: ten free-running pulses, then six overshoot pulses.
        assert_eq!(counts[1], 10 + OVERSHOOT_STEPS as u32);
        // Z was never part of the pass.
        assert_eq!(counts[2], 0);
    }

    #[test]
    fn test_position_zeroed_on_completion() {
        let mut port = SeekPort::new([0, 0, u32::MAX]);
        let mut position = Position3::new(&AxesConfig::default());
        position.set_millimeters(10.0, 20.0, 0.0);
        let mut delay = NoopDelay::new();

        homing_pass(
            &mut port,
            &mut position,
            &usb_hardware(),
            5,
            600,
            [true, true, false],
            false,
            &mut delay,
        );

        assert_eq!(position.steps(0), 0);
        assert_eq!(position.steps(1), 0);
    }

    #[test]
    fn test_direction_bits_latched_before_stepping() {
        let mut port = SeekPort::new([0, 0, u32::MAX]);
        let mut position = Position3::new(&AxesConfig::default());
        let mut delay = NoopDelay::new();

        homing_pass(
            &mut port,
            &mut position,
            &usb_hardware(),
            5,
            600,
            [true, true, false],
            false,
            &mut delay,
        );

        let first_step = port
            .inner
            .events
            .iter()
            .position(|e| matches!(e, PortEvent::StepBits(_)));
        let dir_write = port
            .inner
            .events
            .iter()
            .position(|e| matches!(e, PortEvent::DirectionBits(_)));
        assert!(dir_write.unwrap() < first_step.unwrap());
    }

    #[test]
    fn test_legacy_polarity_reads_active_low() {
        // Legacy boards idle high; a zero register means every switch
        // is pressed, so each axis runs exactly its overshoot.
        let hardware = HardwareConfig {
            usb_board: false,
            ..usb_hardware()
        };
        let mut port = SimPort::new();
        port.limit_bits = 0;
        let mut position = Position3::new(&AxesConfig::default());
        let mut delay = NoopDelay::new();

        homing_pass(
            &mut port,
            &mut position,
            &hardware,
            5,
            600,
            [true, true, false],
            false,
            &mut delay,
        );

        let counts = port.step_pulse_counts();
        assert_eq!(counts[0], OVERSHOOT_STEPS as u32);
        assert_eq!(counts[1], OVERSHOOT_STEPS as u32);
    }
}
