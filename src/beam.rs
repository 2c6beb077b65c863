//! Beam intensity modulation.
//!
//! Couples the laser output to motion: pulses are issued every few step
//! events so energy per unit length stays roughly constant across speed
//! changes, intensity dims proportionally with instantaneous speed, and
//! raster lines sample their intensity from the streamed pixel bytes.
//! All hot-path arithmetic is integer Q16 fixed point.

use crate::port::MachinePort;
use crate::timing::beam_timer_settings;

/// Duties at or above this hold the beam pin continuously high instead
/// of arming the one-shot. Measured limit of the reset timer on the
/// original board.
pub const FULL_ON_DUTY: u8 = 242;

/// Q16 representation of 1.0.
const ONE_Q16: u32 = 1 << 16;

/// Step-synchronized laser pulse and dimming state.
#[derive(Debug, Clone, Copy)]
pub struct BeamModulator {
    pwm_counter: u8,
    pulse_every: u8,
    static_pwm: bool,
    dimm_start_q16: u32,
}

impl BeamModulator {
    /// Create a modulator.
    ///
    /// `dimm_start_q16` is the dimming curve start point in Q16, as
    /// precomputed by the derived parameters.
    pub fn new(pulse_every: u8, static_pwm: bool, dimm_start_q16: u32) -> Self {
        Self {
            pwm_counter: 1,
            pulse_every,
            static_pwm,
            dimm_start_q16,
        }
    }

    /// Reset the pulse divider.
    pub fn reset(&mut self) {
        self.pwm_counter = 1;
    }

    /// Issue the per-step laser pulse when the divider elapses.
    ///
    /// `duty` is the currently commanded PWM intensity. Pulse width is
    /// `pulse_every * duty * cycles_per_step_event / 256` CPU cycles,
    /// realized on the 8-bit one-shot; duty 0 holds the pin off and
    /// duties at or above [`FULL_ON_DUTY`] hold it on without a timer.
    pub fn pulse<P: MachinePort>(&mut self, port: &mut P, duty: u8, cycles_per_step_event: u32) {
        if self.static_pwm {
            return;
        }
        if self.pwm_counter < self.pulse_every {
            self.pwm_counter += 1;
            return;
        }

        if duty == 0 {
            port.set_beam_pin(false);
        } else {
            port.set_beam_pin(true);
            if duty < FULL_ON_DUTY {
                let cycles = self.pulse_every as u64
                    * duty as u64
                    * (cycles_per_step_event >> 8) as u64;
                let (prescaler, ticks) = beam_timer_settings(cycles);
                port.arm_beam_reset(prescaler, ticks);
            }
        }
        self.pwm_counter = 1;
    }

    /// Speed-proportional dimming of the nominal intensity.
    ///
    /// The nominal intensity selects a dimming weight on
    /// `[dimm_start, 1.0]`; the commanded intensity then scales with the
    /// ratio of current to nominal rate under that weight:
    /// `I * ((1 - dimm) + dimm * rate / nominal)`.
    pub fn dimmed_intensity(
        &self,
        nominal_intensity: u8,
        nominal_rate: u32,
        steps_per_minute: u32,
    ) -> u8 {
        let intensity = nominal_intensity as u32;
        let dimm_q16 =
            self.dimm_start_q16 + ((ONE_Q16 - self.dimm_start_q16) * intensity) / 255;

        let ratio_q16 = if nominal_rate == 0 {
            ONE_Q16 as u64
        } else {
            ((steps_per_minute.min(nominal_rate) as u64) << 16) / nominal_rate as u64
        };

        let factor_q16 = (ONE_Q16 - dimm_q16) as u64 + ((dimm_q16 as u64 * ratio_q16) >> 16);
        (((intensity as u64 * factor_q16) >> 16) as u32).min(255) as u8
    }

    /// Map one raster stream byte onto the block's intensity range.
    ///
    /// Bytes span `[128, 255]` linearly onto `[0, nominal]`; values
    /// below 128 clamp dark.
    pub fn raster_intensity(byte: u8, nominal_intensity: u8) -> u8 {
        let level = byte.saturating_sub(128) as u32;
        ((level * nominal_intensity as u32) / 127).min(nominal_intensity as u32) as u8
    }
}
