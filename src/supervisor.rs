//! Stop and interlock supervision.
//!
//! Latches stop requests with their reason, tracks whether the step
//! interrupt is armed, and guards the interrupt body against reentry.
//! All fields are atomics: they are written from interrupt context and
//! observed from the foreground on a single core, so relaxed ordering
//! suffices.

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// Reason codes surfaced to the protocol layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StopCode {
    /// No stop condition.
    Ok = 0,
    /// X1 (min) limit switch asserted.
    LimitHitX1 = 1,
    /// X2 (max) limit switch asserted.
    LimitHitX2 = 2,
    /// Y1 (min) limit switch asserted.
    LimitHitY1 = 3,
    /// Y2 (max) limit switch asserted.
    LimitHitY2 = 4,
    /// Z1 (min) limit switch asserted.
    LimitHitZ1 = 5,
    /// Z2 (max) limit switch asserted.
    LimitHitZ2 = 6,
}

impl StopCode {
    /// Recover a code from its wire value; unknown values read as `Ok`.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => StopCode::LimitHitX1,
            2 => StopCode::LimitHitX2,
            3 => StopCode::LimitHitY1,
            4 => StopCode::LimitHitY2,
            5 => StopCode::LimitHitZ1,
            6 => StopCode::LimitHitZ2,
            _ => StopCode::Ok,
        }
    }
}

/// Process-wide supervisor state.
#[derive(Debug, Default)]
pub struct Supervisor {
    processing: AtomicBool,
    stop_requested: AtomicBool,
    stop_status: AtomicU8,
    busy: AtomicBool,
}

impl Supervisor {
    /// Create an idle supervisor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Latch a stop request with its reason.
    ///
    /// Idempotent: only the first request after a resume records its
    /// code. Returns whether this call latched.
    pub fn request_stop(&self, code: StopCode) -> bool {
        if self
            .stop_requested
            .compare_exchange(false, true, Ordering::Relaxed, Ordering::Relaxed)
            .is_ok()
        {
            self.stop_status.store(code as u8, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    /// Clear the stop latch and its status.
    pub fn resume(&self) {
        self.stop_status.store(StopCode::Ok as u8, Ordering::Relaxed);
        self.stop_requested.store(false, Ordering::Relaxed);
    }

    /// Whether a stop is pending.
    #[inline]
    pub fn stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Relaxed)
    }

    /// Reason of the latched stop.
    #[inline]
    pub fn stop_status(&self) -> StopCode {
        StopCode::from_u8(self.stop_status.load(Ordering::Relaxed))
    }

    /// Whether the step interrupt is armed.
    #[inline]
    pub fn processing(&self) -> bool {
        self.processing.load(Ordering::Relaxed)
    }

    /// Record the step interrupt as armed; returns false when it
    /// already was.
    pub fn start_processing(&self) -> bool {
        !self.processing.swap(true, Ordering::Relaxed)
    }

    /// Record the step interrupt as disarmed.
    pub fn stop_processing(&self) {
        self.processing.store(false, Ordering::Relaxed);
    }

    /// Test-and-set entry into the interrupt body.
    ///
    /// Returns false when a previous invocation is still running, in
    /// which case the caller must return immediately.
    #[inline]
    pub fn enter_isr(&self) -> bool {
        !self.busy.swap(true, Ordering::Relaxed)
    }

    /// Mark the interrupt body as left.
    #[inline]
    pub fn exit_isr(&self) {
        self.busy.store(false, Ordering::Relaxed);
    }
}
