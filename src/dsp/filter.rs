//! # One-Pole Tone Filter
//!
//! Each pass through a tape machine's playback head loses some treble, so
//! successive repeats get darker. The tone control models that with the
//! simplest possible IIR lowpass on the delayed signal.
//!
//! ## The Filter Equation
//!
//! ```text
//! y[n] = a0 * x[n] + b1 * y[n-1]
//! ```
//!
//! with
//!
//! ```text
//! b1 = e^(-2π * cutoff_hz / sample_rate)
//! a0 = 1 - b1
//! ```
//!
//! Because `a0 + b1 = 1` the output is a weighted average of the new input
//! and the previous output. DC passes at unity gain, and the output can
//! never exceed the largest input seen, which keeps the feedback loop's
//! gain below the feedback amount at every cutoff.

use std::f32::consts::PI;

/// Lowest cutoff accepted by [`OnePoleFilter::set_cutoff`].
const MIN_CUTOFF_HZ: f32 = 20.0;

/// A one-pole (6 dB/octave) lowpass filter.
#[derive(Debug, Clone, Copy)]
pub struct OnePoleFilter {
    /// Feed-in coefficient, `1 - b1`.
    a0: f32,

    /// Feedback coefficient. Higher values = more filtering (lower cutoff).
    /// Range: 0.0 (no filtering) to ~0.997 (20 Hz).
    b1: f32,

    /// The previous output sample, the filter's only state variable.
    state: f32,
}

impl OnePoleFilter {
    /// Create a new filter initialized to passthrough (no filtering).
    pub fn new() -> Self {
        Self {
            a0: 1.0,
            b1: 0.0,
            state: 0.0,
        }
    }

    /// Update the coefficients for a given cutoff frequency.
    ///
    /// Takes effect on the next sample. The state is left alone, so a
    /// cutoff change never produces a step of its own; the filter just
    /// starts converging at the new rate.
    ///
    /// Example at 44100 Hz:
    /// - cutoff = 16000 Hz → b1 ≈ 0.10 (barely filtering)
    /// - cutoff = 1000 Hz  → b1 ≈ 0.87 (noticeable filtering)
    pub fn set_cutoff(&mut self, cutoff_hz: f32, sample_rate: f32) {
        // Stay below Nyquist; the exponential mapping stops meaning
        // anything past it.
        let safe_cutoff = cutoff_hz.clamp(MIN_CUTOFF_HZ, sample_rate * 0.49);

        self.b1 = (-2.0 * PI * safe_cutoff / sample_rate).exp();
        self.a0 = 1.0 - self.b1;
    }

    /// Process one sample through the filter.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.state = input * self.a0 + self.state * self.b1;
        self.state
    }

    /// Reset the filter state to zero.
    pub fn reset(&mut self) {
        self.state = 0.0;
    }
}

impl Default for OnePoleFilter {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// A fresh filter passes input through unchanged.
    #[test]
    fn test_passthrough_by_default() {
        let mut filter = OnePoleFilter::new();

        assert!((filter.process(1.0) - 1.0).abs() < 1e-6);
        assert!((filter.process(0.5) - 0.5).abs() < 1e-6);
        assert!((filter.process(-0.3) - (-0.3)).abs() < 1e-6);
    }

    /// A very low cutoff should heavily attenuate a Nyquist-rate signal
    /// (alternating +1, -1 every sample).
    #[test]
    fn test_filter_attenuates_high_freq() {
        let mut filter = OnePoleFilter::new();
        filter.set_cutoff(100.0, 44100.0);

        let mut max_output = 0.0_f32;
        for i in 0..1000 {
            let input = if i % 2 == 0 { 1.0 } else { -1.0 };
            let output = filter.process(input);
            max_output = max_output.max(output.abs());
        }

        assert!(
            max_output < 0.05,
            "Expected heavy attenuation, got max output {max_output}"
        );
    }

    /// Coefficients follow b1 = exp(-2π f / fs) and always sum to one.
    #[test]
    fn test_coefficients() {
        let mut filter = OnePoleFilter::new();

        filter.set_cutoff(1000.0, 44100.0);
        let expected = (-2.0 * PI * 1000.0 / 44100.0).exp();
        assert!((filter.b1 - expected).abs() < 1e-6);
        assert!((filter.a0 + filter.b1 - 1.0).abs() < 1e-6);

        filter.set_cutoff(16000.0, 44100.0);
        assert!(filter.b1 < 0.11, "High cutoff gave b1 = {}", filter.b1);

        filter.set_cutoff(20.0, 44100.0);
        assert!(filter.b1 > 0.99, "Low cutoff gave b1 = {}", filter.b1);
    }

    /// Cutoffs above Nyquist are clamped rather than producing a
    /// meaningless coefficient.
    #[test]
    fn test_cutoff_clamped_below_nyquist() {
        let mut filter = OnePoleFilter::new();
        filter.set_cutoff(30000.0, 44100.0);
        let clamped = (-2.0 * PI * 0.49).exp();
        assert!((filter.b1 - clamped).abs() < 1e-6);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut filter = OnePoleFilter::new();
        filter.set_cutoff(1000.0, 44100.0);

        filter.process(1.0);
        assert!(filter.state.abs() > 0.0);

        filter.reset();
        assert!(filter.state.abs() < 1e-6);
    }

    /// A DC signal should converge to unity gain regardless of cutoff.
    #[test]
    fn test_dc_passes_through() {
        let mut filter = OnePoleFilter::new();
        filter.set_cutoff(100.0, 44100.0);

        let mut output = 0.0;
        for _ in 0..10000 {
            output = filter.process(1.0);
        }

        assert!(
            (output - 1.0).abs() < 1e-4,
            "DC signal should pass through lowpass, got {output}"
        );
    }

    /// The output never overshoots the input range, whatever the cutoff.
    #[test]
    fn test_output_bounded_by_input() {
        let mut filter = OnePoleFilter::new();
        for cutoff in [20.0, 1000.0, 8000.0, 20000.0] {
            filter.set_cutoff(cutoff, 44100.0);
            for i in 0..500 {
                let input = if (i / 7) % 2 == 0 { 0.8 } else { -0.8 };
                let out = filter.process(input);
                assert!(out.abs() <= 0.8 + 1e-6, "cutoff {cutoff}: {out}");
            }
        }
    }
}
