//! The motion core.
//!
//! [`Stepper`] pulls blocks from the planner queue and executes them by
//! pulsing the stepper outputs from a dynamically retimed step-event
//! interrupt, while driving the beam modulator in lockstep. The
//! [`Stepper::step_event`] method is the interrupt body; a platform
//! trampoline invokes it at the rate programmed into the step timer.
//!
//! Output timing within one event: the bit vector computed by the
//! previous event is driven first (direction pins, then step pins, then
//! the pulse-reset one-shot), nested interrupts are re-enabled, and only
//! then is the next vector computed. A tick arriving while the body is
//! still running is dropped, not queued; motion degrades by one period
//! and the next tick reschedules naturally.

use embedded_hal::delay::DelayNs;

use crate::beam::BeamModulator;
use crate::config::{DerivedParams, HardwareConfig, HomingConfig, MachineConfig};
use crate::error::{MotionError, Result};
use crate::homing::homing_pass;
use crate::motion::{LineTracer, SpeedProfile};
use crate::planner::{Block, BlockSource, BlockType};
use crate::port::{
    MachinePort, DIRECTION_MASK, X1_LIMIT_BIT, X2_LIMIT_BIT, Y1_LIMIT_BIT, Y2_LIMIT_BIT,
    Z1_LIMIT_BIT, Z2_LIMIT_BIT,
};
use crate::position::{Position3, X_AXIS, Y_AXIS, Z_AXIS};
use crate::raster::RasterSource;
use crate::supervisor::{StopCode, Supervisor};
use crate::timing::step_timer_settings;

/// Step-pulse generation and motion execution core.
///
/// Owns the hardware port, the planner consumption side, the raster
/// stream and all per-block execution state, so a single value can be
/// parked behind the platform's interrupt trampoline.
pub struct Stepper<P, B, R>
where
    P: MachinePort,
    B: BlockSource,
    R: RasterSource,
{
    port: P,
    planner: B,
    raster: R,

    params: DerivedParams,
    hardware: HardwareConfig,
    homing: HomingConfig,

    position: Position3,
    supervisor: Supervisor,
    beam: BeamModulator,
    profile: SpeedProfile,
    tracer: LineTracer,

    current_block: Option<Block>,
    out_bits: u8,
    step_events_completed: u32,
    cycles_per_step_event: u32,
    current_intensity: u8,
}

impl<P, B, R> Stepper<P, B, R>
where
    P: MachinePort,
    B: BlockSource,
    R: RasterSource,
{
    /// Create and initialize the core: program the slowest step rate,
    /// switch the laser off, set the position to the configured origin
    /// offsets and enter the idle state.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `config` fails validation.
    pub fn new(port: P, planner: B, raster: R, config: &MachineConfig) -> Result<Self> {
        crate::config::validate_config(config)?;

        let params = DerivedParams::from_config(config);
        let mut core = Self {
            port,
            planner,
            raster,
            params,
            hardware: config.hardware,
            homing: config.homing,
            position: Position3::new(&config.axes),
            supervisor: Supervisor::new(),
            beam: BeamModulator::new(
                config.beam.pulse_every,
                config.beam.static_pwm,
                params.dimm_start_q16,
            ),
            profile: SpeedProfile::new(params.cycles_per_acceleration_tick),
            tracer: LineTracer::default(),
            current_block: None,
            out_bits: config.hardware.invert_mask,
            step_events_completed: 0,
            cycles_per_step_event: 0,
            current_intensity: 0,
        };

        core.adjust_speed(params.minimum_steps_per_minute);
        core.set_laser_intensity(0);
        core.position.set_millimeters(
            config.axes.x.origin_offset.value(),
            config.axes.y.origin_offset.value(),
            config.axes.z.origin_offset.value(),
        );
        // Start idle; the interrupt gets armed once blocks are queued.
        core.stop_processing();

        Ok(core)
    }

    /// Arm the step-event interrupt and start processing blocks.
    pub fn start_processing(&mut self) {
        if self.supervisor.start_processing() {
            #[cfg(feature = "defmt")]
            defmt::debug!("step processing armed");
            self.out_bits = self.hardware.invert_mask;
            self.port.enable_step_interrupt();
        }
    }

    /// Disarm the step-event interrupt, drop the current block and
    /// switch the laser off.
    pub fn stop_processing(&mut self) {
        self.supervisor.stop_processing();
        self.current_block = None;
        self.port.disable_step_interrupt();
        self.set_laser_intensity(0);
    }

    /// Whether the step-event interrupt is armed.
    #[inline]
    pub fn processing(&self) -> bool {
        self.supervisor.processing()
    }

    /// Latch a stop request and halt the serial transport.
    ///
    /// Idempotent: only the first request after a resume records its
    /// code. The interrupt observes the latch on its next entry and
    /// transitions to idle.
    pub fn request_stop(&mut self, code: StopCode) {
        if self.supervisor.request_stop(code) {
            #[cfg(feature = "defmt")]
            defmt::warn!("stop requested, code {}", code as u8);
            self.raster.stop();
        }
    }

    /// Reason of the latched stop.
    #[inline]
    pub fn stop_status(&self) -> StopCode {
        self.supervisor.stop_status()
    }

    /// Whether a stop is pending.
    #[inline]
    pub fn stop_requested(&self) -> bool {
        self.supervisor.stop_requested()
    }

    /// Clear the stop latch and return to idle-ready.
    pub fn stop_resume(&mut self) {
        self.supervisor.resume();
    }

    /// X position in millimetres.
    pub fn get_position_x(&self) -> f64 {
        self.position.millimeters(X_AXIS)
    }

    /// Y position in millimetres.
    pub fn get_position_y(&self) -> f64 {
        self.position.millimeters(Y_AXIS)
    }

    /// Z position in millimetres.
    pub fn get_position_z(&self) -> f64 {
        self.position.millimeters(Z_AXIS)
    }

    /// Overwrite the absolute position from millimetre coordinates.
    pub fn set_position(&mut self, x: f64, y: f64, z: f64) {
        self.position.set_millimeters(x, y, z);
    }

    /// Blocking dual-pass homing of all enabled axes: approach the
    /// end-stops, then back off them. The position is zeroed.
    ///
    /// # Errors
    ///
    /// Returns `MotionError::ProcessingActive` when the step interrupt
    /// is still armed.
    pub fn homing_cycle<D: DelayNs>(&mut self, delay: &mut D) -> Result<()> {
        if self.supervisor.processing() {
            return Err(MotionError::ProcessingActive.into());
        }

        #[cfg(feature = "defmt")]
        defmt::info!("homing cycle");

        let axes = [true, true, self.hardware.three_axes];
        for reverse in [false, true] {
            homing_pass(
                &mut self.port,
                &mut self.position,
                &self.hardware,
                self.params.pulse_microseconds,
                self.homing.pulse_interval_us,
                axes,
                reverse,
                delay,
            );
        }
        Ok(())
    }

    /// Producer access to the block queue.
    #[inline]
    pub fn planner_mut(&mut self) -> &mut B {
        &mut self.planner
    }

    /// Producer access to the raster stream.
    #[inline]
    pub fn raster_mut(&mut self) -> &mut R {
        &mut self.raster
    }

    /// Inspect the hardware port (simulators expose their recordings).
    #[inline]
    pub fn port(&self) -> &P {
        &self.port
    }

    /// Mutable access to the hardware port (simulators take sense
    /// inputs this way).
    #[inline]
    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// Currently commanded rate in steps per minute.
    #[inline]
    pub fn current_rate(&self) -> u32 {
        self.profile.rate()
    }

    /// Step events completed within the current block.
    #[inline]
    pub fn step_events_completed(&self) -> u32 {
        self.step_events_completed
    }

    /// The step-event interrupt body.
    ///
    /// Invoked by the platform trampoline at the programmed step rate.
    /// Never blocks; a tick arriving while a previous invocation is
    /// still running is dropped.
    pub fn step_event(&mut self) {
        if !self.supervisor.enter_isr() {
            return;
        }

        if self.supervisor.stop_requested() {
            // go idle and absorb blocks; the protocol loop repeats the
            // drain because the planner may still be adding blocks
            self.stop_processing();
            self.planner.reset_block_buffer();
            self.supervisor.exit_isr();
            return;
        }

        if self.hardware.laser_interlocks {
            // honor interlocks even if the protocol loop stalls
            if self.port.door_open() || self.port.chiller_off() {
                self.set_laser_intensity(0);
            }
            if let Some(code) = self.limit_stop_code() {
                self.request_stop(code);
                self.supervisor.exit_isr();
                return;
            }
        }

        // pulse laser along with motion steps
        let duty = self.current_intensity;
        self.beam.pulse(&mut self.port, duty, self.cycles_per_step_event);

        // drive the previous event's output, then prime the pulse reset
        self.port.set_direction_bits(self.out_bits & DIRECTION_MASK);
        self.port.set_step_bits(self.out_bits);
        self.port.arm_pulse_reset(
            self.params.pulse_microseconds.saturating_sub(2) * self.params.cycles_per_microsecond,
        );
        // let the pulse-reset and serial interrupts jump in from here on
        self.port.enable_nested_interrupts();

        if self.current_block.is_none() {
            match self.planner.current_block() {
                Some(block) => {
                    if block.kind.is_motion() {
                        self.begin_motion_block(&block);
                    }
                    self.current_block = Some(block);
                }
                None => {
                    // queue underrun: go idle until the main loop re-arms
                    self.stop_processing();
                    self.supervisor.exit_isr();
                    return;
                }
            }
        }

        if let Some(block) = self.current_block {
            match block.kind {
                BlockType::Line | BlockType::RasterLine => self.execute_motion_event(&block),
                command => {
                    self.execute_command(command);
                    // idle the output so stale step bits are not re-driven
                    self.out_bits = self.hardware.invert_mask;
                    self.current_block = None;
                    self.planner.discard_current_block();
                }
            }
        }

        self.supervisor.exit_isr();
    }

    /// Initialize per-block state when entering a new motion block.
    fn begin_motion_block(&mut self, block: &Block) {
        self.profile.begin_block(block.initial_rate);
        self.adjust_speed(block.initial_rate);
        self.refresh_intensity(block);
        self.tracer = LineTracer::begin(block.step_event_count);
        self.step_events_completed = 0;
    }

    /// Execute one step event of a motion block.
    fn execute_motion_event(&mut self, block: &Block) {
        let out = self.tracer.step(block, &mut self.position);
        self.step_events_completed += 1;
        self.out_bits = out ^ self.hardware.invert_mask;

        if self.step_events_completed < block.step_event_count {
            let update =
                self.profile
                    .update(block, self.step_events_completed, self.cycles_per_step_event);

            if let Some(rate) = update.new_rate {
                self.adjust_speed(rate);
                self.refresh_intensity(block);
            }

            if update.cruising
                && block.kind == BlockType::RasterLine
                && block.pixel_steps != 0
                && self.step_events_completed % block.pixel_steps == 0
            {
                // one raster byte per pixel column; the buffer is shared
                // with the serial receive interrupt
                self.port.disable_nested_interrupts();
                let byte = self.raster.read();
                self.port.enable_nested_interrupts();
                let intensity =
                    BeamModulator::raster_intensity(byte, block.nominal_laser_intensity);
                self.set_laser_intensity(intensity);
            }
        } else {
            // block finished
            if block.kind == BlockType::RasterLine {
                self.raster.consume_pending();
            }
            self.current_block = None;
            self.planner.discard_current_block();
        }
    }

    /// Dispatch a one-shot command block.
    fn execute_command(&mut self, kind: BlockType) {
        match kind {
            BlockType::AirAssistEnable => self.port.set_air_assist(true),
            BlockType::AirAssistDisable => self.port.set_air_assist(false),
            BlockType::Aux1Enable if !self.hardware.usb_board => {
                self.port.set_aux1_assist(true)
            }
            BlockType::Aux1Disable if !self.hardware.usb_board => {
                self.port.set_aux1_assist(false)
            }
            BlockType::Aux2Enable if !self.hardware.usb_board => {
                self.port.set_aux2_assist(true)
            }
            BlockType::Aux2Disable if !self.hardware.usb_board => {
                self.port.set_aux2_assist(false)
            }
            _ => {}
        }
    }

    /// Reprogram the step timer for a commanded rate.
    fn adjust_speed(&mut self, steps_per_minute: u32) {
        let rate = steps_per_minute.max(self.params.minimum_steps_per_minute);
        let settings = step_timer_settings(self.params.cycles_for_rate(rate));
        self.port
            .program_step_timer(settings.prescaler, settings.ceiling);
        self.cycles_per_step_event = settings.actual_cycles;
    }

    /// Recompute the laser intensity for the current rate. Raster lines
    /// stay dark outside their pixel sampling.
    fn refresh_intensity(&mut self, block: &Block) {
        if block.kind == BlockType::RasterLine {
            self.set_laser_intensity(0);
        } else {
            let dimmed = self.beam.dimmed_intensity(
                block.nominal_laser_intensity,
                block.nominal_rate,
                self.profile.rate(),
            );
            self.set_laser_intensity(dimmed);
        }
    }

    /// Command a laser PWM duty and remember it for beam pulsing.
    fn set_laser_intensity(&mut self, duty: u8) {
        self.current_intensity = duty;
        self.port.set_laser_pwm(duty);
    }

    /// First asserted limit switch, if any.
    fn limit_stop_code(&mut self) -> Option<StopCode> {
        let bits = self.port.read_limit_bits();
        let asserted = |bit: u8| {
            if self.hardware.usb_board {
                bits & (1 << bit) != 0
            } else {
                bits & (1 << bit) == 0
            }
        };

        if asserted(X1_LIMIT_BIT) {
            Some(StopCode::LimitHitX1)
        } else if asserted(X2_LIMIT_BIT) {
            Some(StopCode::LimitHitX2)
        } else if asserted(Y1_LIMIT_BIT) {
            Some(StopCode::LimitHitY1)
        } else if asserted(Y2_LIMIT_BIT) {
            Some(StopCode::LimitHitY2)
        } else if self.hardware.three_axes && asserted(Z1_LIMIT_BIT) {
            Some(StopCode::LimitHitZ1)
        } else if self.hardware.three_axes && asserted(Z2_LIMIT_BIT) {
            Some(StopCode::LimitHitZ2)
        } else {
            None
        }
    }
}
