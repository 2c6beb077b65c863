//! Recording simulator port for tests.
//!
//! [`SimPort`] records every hardware access in order and plays back
//! configurable sense inputs, letting the scenario tests assert pulse
//! counts, write ordering and timer programming without hardware.

use super::{step_bit, MachinePort, STEP_MASK};

/// One recorded hardware access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortEvent {
    /// Direction outputs latched.
    DirectionBits(u8),
    /// Step outputs driven.
    StepBits(u8),
    /// Step outputs returned to idle.
    StepReset,
    /// Step-event timer programmed.
    StepTimer {
        /// Selected prescaler.
        prescaler: u16,
        /// Selected ceiling.
        ceiling: u16,
    },
    /// Step-event interrupt armed or disarmed.
    StepInterrupt(bool),
    /// Pulse-reset one-shot armed.
    PulseReset(u32),
    /// Laser PWM duty set.
    LaserPwm(u8),
    /// Beam pulse pin driven.
    BeamPin(bool),
    /// Beam-reset one-shot armed.
    BeamReset {
        /// Selected prescaler.
        prescaler: u16,
        /// Timer ticks until reset.
        ticks: u8,
    },
    /// Air assist valve switched.
    AirAssist(bool),
    /// Auxiliary channel 1 switched.
    Aux1Assist(bool),
    /// Auxiliary channel 2 switched.
    Aux2Assist(bool),
    /// Nested interrupts re-enabled.
    InterruptsEnabled,
    /// Nested interrupts disabled.
    InterruptsDisabled,
}

/// Recording simulator implementing [`MachinePort`].
#[derive(Debug, Default)]
pub struct SimPort {
    /// Ordered record of every hardware access.
    pub events: Vec<PortEvent>,

    /// XOR mask the core applies to step/direction outputs; needed to
    /// recover true pulses from recorded port values.
    pub invert_mask: u8,

    /// Simulated limit switch input register.
    pub limit_bits: u8,
    /// Simulated door interlock state.
    pub door_open: bool,
    /// Simulated chiller interlock state.
    pub chiller_off: bool,
}

impl SimPort {
    /// Create a simulator with all inputs idle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a simulator for a machine with the given invert mask.
    pub fn with_invert_mask(invert_mask: u8) -> Self {
        Self {
            invert_mask,
            ..Self::default()
        }
    }

    /// Number of true step pulses recorded per axis.
    pub fn step_pulse_counts(&self) -> [u32; 3] {
        let mut counts = [0u32; 3];
        for event in &self.events {
            if let PortEvent::StepBits(bits) = event {
                let active = (bits ^ self.invert_mask) & STEP_MASK;
                for (axis, count) in counts.iter_mut().enumerate() {
                    if active & (1 << step_bit(axis)) != 0 {
                        *count += 1;
                    }
                }
            }
        }
        counts
    }

    /// Per-event pulse pattern for one axis, one entry per step write.
    pub fn step_pattern(&self, axis: usize) -> Vec<bool> {
        self.events
            .iter()
            .filter_map(|event| match event {
                PortEvent::StepBits(bits) => {
                    Some((bits ^ self.invert_mask) & (1 << step_bit(axis)) != 0)
                }
                _ => None,
            })
            .collect()
    }

    /// All recorded laser PWM duty values, in order.
    pub fn laser_duties(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|event| match event {
                PortEvent::LaserPwm(duty) => Some(*duty),
                _ => None,
            })
            .collect()
    }

    /// Most recently set laser PWM duty, if any.
    pub fn last_laser_duty(&self) -> Option<u8> {
        self.laser_duties().last().copied()
    }

    /// All recorded step-timer programmings, in order.
    pub fn timer_programs(&self) -> Vec<(u16, u16)> {
        self.events
            .iter()
            .filter_map(|event| match event {
                PortEvent::StepTimer { prescaler, ceiling } => Some((*prescaler, *ceiling)),
                _ => None,
            })
            .collect()
    }
}

impl MachinePort for SimPort {
    fn set_direction_bits(&mut self, bits: u8) {
        self.events.push(PortEvent::DirectionBits(bits));
    }

    fn set_step_bits(&mut self, bits: u8) {
        self.events.push(PortEvent::StepBits(bits));
    }

    fn reset_step_bits(&mut self) {
        self.events.push(PortEvent::StepReset);
    }

    fn program_step_timer(&mut self, prescaler: u16, ceiling: u16) {
        self.events.push(PortEvent::StepTimer { prescaler, ceiling });
    }

    fn enable_step_interrupt(&mut self) {
        self.events.push(PortEvent::StepInterrupt(true));
    }

    fn disable_step_interrupt(&mut self) {
        self.events.push(PortEvent::StepInterrupt(false));
    }

    fn arm_pulse_reset(&mut self, cycles: u32) {
        self.events.push(PortEvent::PulseReset(cycles));
    }

    fn set_laser_pwm(&mut self, duty: u8) {
        self.events.push(PortEvent::LaserPwm(duty));
    }

    fn set_beam_pin(&mut self, on: bool) {
        self.events.push(PortEvent::BeamPin(on));
    }

    fn arm_beam_reset(&mut self, prescaler: u16, ticks: u8) {
        self.events.push(PortEvent::BeamReset { prescaler, ticks });
    }

    fn read_limit_bits(&mut self) -> u8 {
        self.limit_bits
    }

    fn door_open(&mut self) -> bool {
        self.door_open
    }

    fn chiller_off(&mut self) -> bool {
        self.chiller_off
    }

    fn set_air_assist(&mut self, on: bool) {
        self.events.push(PortEvent::AirAssist(on));
    }

    fn set_aux1_assist(&mut self, on: bool) {
        self.events.push(PortEvent::Aux1Assist(on));
    }

    fn set_aux2_assist(&mut self, on: bool) {
        self.events.push(PortEvent::Aux2Assist(on));
    }

    fn enable_nested_interrupts(&mut self) {
        self.events.push(PortEvent::InterruptsEnabled);
    }

    fn disable_nested_interrupts(&mut self) {
        self.events.push(PortEvent::InterruptsDisabled);
    }
}
