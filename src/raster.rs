//! Serial raster stream interface.
//!
//! Raster lines take their per-pixel intensity from a byte stream fed by
//! the serial receive interrupt. The core reads it through
//! [`RasterSource`] with nested interrupts disabled, because the
//! underlying buffer is shared with the receive interrupt.

use heapless::Deque;

/// Consumption side of the raster byte stream.
pub trait RasterSource {
    /// Consume one raster byte.
    ///
    /// Defined only during a raster block's cruise phase; the core calls
    /// this with nested interrupts disabled. An exhausted stream yields
    /// the dark value 128.
    fn read(&mut self) -> u8;

    /// Drain any raster bytes still buffered for the current block.
    fn consume_pending(&mut self);

    /// Instruct the transport to stop accepting further data.
    fn stop(&mut self);
}

/// Bounded raster byte buffer for tests and foreground feeding.
///
/// Single producer (the serial layer), single consumer (the step
/// interrupt). The mutual exclusion the hardware needs is provided by
/// the caller disabling interrupts around [`RasterSource::read`].
#[derive(Debug, Default)]
pub struct RasterBuffer<const N: usize> {
    buffer: Deque<u8, N>,
    stopped: bool,
}

impl<const N: usize> RasterBuffer<N> {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self {
            buffer: Deque::new(),
            stopped: false,
        }
    }

    /// Feed one byte from the producer side.
    ///
    /// Returns `false` when the buffer is full or the transport has been
    /// stopped.
    pub fn feed(&mut self, byte: u8) -> bool {
        if self.stopped {
            return false;
        }
        self.buffer.push_back(byte).is_ok()
    }

    /// Feed a slice of bytes; stops at the first rejected byte.
    pub fn feed_slice(&mut self, bytes: &[u8]) -> usize {
        let mut accepted = 0;
        for &byte in bytes {
            if !self.feed(byte) {
                break;
            }
            accepted += 1;
        }
        accepted
    }

    /// Number of buffered bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Whether the transport has been stopped.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Re-open the transport after a stop.
    pub fn resume(&mut self) {
        self.stopped = false;
    }
}

impl<const N: usize> RasterSource for RasterBuffer<N> {
    fn read(&mut self) -> u8 {
        self.buffer.pop_front().unwrap_or(128)
    }

    fn consume_pending(&mut self) {
        self.buffer.clear();
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}
