//! Trapezoidal speed profile execution.
//!
//! Integrates the block's velocity profile across its step events: ramp
//! by `rate_delta` per acceleration tick until `accelerate_until`,
//! cruise at the nominal rate, then ramp down after `decelerate_after`
//! toward the final rate. Acceleration decisions come from the derived
//! acceleration clock, so the slope is independent of the step rate.

use crate::planner::Block;
use crate::timing::AccelerationTicker;

/// Outcome of one per-event profile update.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileUpdate {
    /// Newly commanded rate, when this event changed it.
    pub new_rate: Option<u32>,
    /// The event fell into the cruise phase.
    pub cruising: bool,
}

/// Per-block speed profile state.
#[derive(Debug, Clone, Copy)]
pub struct SpeedProfile {
    adjusted_rate: u32,
    ticker: AccelerationTicker,
}

impl SpeedProfile {
    /// Create a profile executor for the given acceleration tick period.
    pub fn new(cycles_per_acceleration_tick: u32) -> Self {
        Self {
            adjusted_rate: 0,
            ticker: AccelerationTicker::new(cycles_per_acceleration_tick),
        }
    }

    /// Begin a new motion block at its initial rate.
    pub fn begin_block(&mut self, initial_rate: u32) {
        self.adjusted_rate = initial_rate;
        self.ticker.seed_midpoint();
    }

    /// Currently commanded rate in steps per minute.
    #[inline]
    pub fn rate(&self) -> u32 {
        self.adjusted_rate
    }

    /// Update the profile after a step event.
    ///
    /// `step_events_completed` is the count including this event; the
    /// caller only invokes this while the block is unfinished.
    pub fn update(
        &mut self,
        block: &Block,
        step_events_completed: u32,
        cycles_per_step_event: u32,
    ) -> ProfileUpdate {
        let mut update = ProfileUpdate::default();

        if step_events_completed < block.accelerate_until {
            // accelerating
            if self.ticker.tick(cycles_per_step_event) {
                self.adjusted_rate =
                    (self.adjusted_rate + block.rate_delta).min(block.nominal_rate);
                update.new_rate = Some(self.adjusted_rate);
            }
        } else if step_events_completed == block.decelerate_after {
            // deceleration start: reseed so every deceleration ramps the
            // same way regardless of accumulated tick phase
            self.ticker.seed_midpoint();
        } else if step_events_completed > block.decelerate_after {
            // decelerating
            if self.ticker.tick(cycles_per_step_event) {
                self.adjusted_rate = self
                    .adjusted_rate
                    .saturating_sub(block.rate_delta)
                    .max(block.final_rate);
                update.new_rate = Some(self.adjusted_rate);
            }
        } else {
            // cruising; make sure we hold exactly the nominal rate
            if self.adjusted_rate != block.nominal_rate {
                self.adjusted_rate = block.nominal_rate;
                update.new_rate = Some(self.adjusted_rate);
            }
            update.cruising = true;
        }

        update
    }
}
