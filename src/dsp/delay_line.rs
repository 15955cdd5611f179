//! # Fractional Delay Line (Tape Loop)
//!
//! A delay line stores audio samples and lets you read them back after a
//! specified time delay. In a tape echo this is the tape loop itself: the
//! record head writes, the playback head reads some distance behind it.
//!
//! In code, we use a `Vec<f32>` as the "tape" and an integer index as the
//! write head position. Each frame the engine:
//!
//! 1. Reads the delayed sample from `(write_pos - delay_in_samples)`,
//!    wrapping around to the end of the buffer if we go past the start.
//! 2. Writes the new sample at `write_pos`, which also advances the head.
//!
//! Reading before writing means the shortest reachable delay is one whole
//! sample: the read can never see the sample that is about to be written.
//!
//! ## Linear Interpolation
//!
//! Flutter modulates the delay by a fraction of a sample every frame, so
//! reads land between stored samples. Linear interpolation blends the two
//! neighbors:
//!
//! ```text
//! result = newer * (1 - frac) + older * frac
//! ```
//!
//! Without it the read head would snap between whole positions and the
//! flutter would sound like zipper noise instead of a smooth pitch wobble.

use crate::error::{EchoError, Result};

/// A ring buffer that functions as an audio delay line.
///
/// The buffer is allocated once, at construction, to the maximum delay
/// the engine can ever request. Reads clamp into the buffer, so no later
/// parameter change can require a bigger one.
#[derive(Debug)]
pub struct DelayLine {
    /// The circular buffer. All values start at 0.0 (silence).
    buffer: Vec<f32>,

    /// Where the next incoming sample will be stored. Always in
    /// `[0, buffer_len)`.
    write_pos: usize,

    buffer_len: usize,

    /// Used to convert delay times in seconds to samples.
    sample_rate: f32,
}

impl DelayLine {
    /// Create a silent delay line holding `capacity` samples.
    ///
    /// Capacity is raised to at least 2 so the valid delay range
    /// `[1, capacity - 1]` is never empty.
    ///
    /// # Errors
    /// [`EchoError::Allocation`] if the buffer can't be allocated. This is
    /// reported instead of aborting so a host can refuse one instance and
    /// keep running.
    pub fn new(capacity: usize, sample_rate: f32) -> Result<Self> {
        let buffer_len = capacity.max(2);

        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(buffer_len)
            .map_err(|_| EchoError::Allocation {
                samples: buffer_len,
            })?;
        buffer.resize(buffer_len, 0.0);

        Ok(Self {
            buffer,
            write_pos: 0,
            buffer_len,
            sample_rate,
        })
    }

    /// Store a sample at the write position and advance it by one.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos += 1;
        if self.write_pos == self.buffer_len {
            self.write_pos = 0;
        }
    }

    /// Read the signal `delay_seconds` behind the write head.
    pub fn read(&self, delay_seconds: f32) -> f32 {
        self.read_samples(delay_seconds * self.sample_rate)
    }

    /// Read the signal `delay_samples` behind the write head, with linear
    /// interpolation for the fractional part.
    ///
    /// The delay is clamped to `[1, capacity - 1]`: never the slot about
    /// to be written, never a full lap around the ring.
    ///
    /// # How the index math works
    ///
    /// To read N samples behind the write head in a circular buffer:
    ///
    /// ```text
    /// read_index = (write_pos + buffer_len - N) % buffer_len
    /// ```
    ///
    /// We add `buffer_len` before subtracting to avoid negative numbers
    /// (Rust's `usize` can't be negative).
    #[inline]
    pub fn read_samples(&self, delay_samples: f32) -> f32 {
        let max_delay = (self.buffer_len - 1) as f32;
        let delay = if delay_samples.is_nan() {
            1.0
        } else {
            delay_samples.clamp(1.0, max_delay)
        };

        // For delay = 441.3:
        //   delay_int  = 441  (the newer neighbour)
        //   delay_frac = 0.3  (how far towards the older one)
        let delay_int = delay as usize;
        let delay_frac = delay - delay_int as f32;

        let newer = (self.write_pos + self.buffer_len - delay_int) % self.buffer_len;
        let older = (newer + self.buffer_len - 1) % self.buffer_len;

        self.buffer[newer] * (1.0 - delay_frac) + self.buffer[older] * delay_frac
    }

    /// Clear the entire buffer to silence and rewind the write head.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }

    pub fn capacity(&self) -> usize {
        self.buffer_len
    }

    pub fn write_pos(&self) -> usize {
        self.write_pos
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
