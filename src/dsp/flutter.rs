//! # Flutter Oscillator
//!
//! A tape transport never runs at perfectly constant speed. The capstan
//! and pinch roller wobble a few times per second, which stretches and
//! squeezes the distance between record and playback head. Audibly this is
//! a slight pitch warble on the repeats.
//!
//! We model it with a sine LFO whose output (in samples) is added to the
//! base delay time before each delay-line read:
//!
//! ```text
//! delay = base_delay + sin(2π * phase) * depth
//! ```

use std::f32::consts::TAU;

/// Flutter rate of a worn tape transport.
pub const FLUTTER_RATE_HZ: f32 = 5.0;

/// Sine LFO with phase kept in `[0, 1)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlutterOscillator {
    phase: f32,
}

impl FlutterOscillator {
    pub fn new() -> Self {
        Self { phase: 0.0 }
    }

    /// Move the phase forward by one sample at `frequency_hz`.
    #[inline]
    pub fn advance(&mut self, frequency_hz: f32, sample_rate: f32) {
        self.phase += frequency_hz / sample_rate;
        while self.phase >= 1.0 {
            self.phase -= 1.0;
        }
    }

    /// Current delay offset in samples for a modulation depth in samples.
    #[inline]
    pub fn sample(&self, depth: f32) -> f32 {
        (self.phase * TAU).sin() * depth
    }

    /// Like [`sample()`](Self::sample), but read `offset` cycles ahead of
    /// the shared phase. Lets the right channel wobble out of step with
    /// the left without a second oscillator.
    #[inline]
    pub fn sample_offset(&self, depth: f32, offset: f32) -> f32 {
        ((self.phase + offset) * TAU).sin() * depth
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_quarter_cycle_steps() {
        // 1 Hz at 4 samples/sec: four samples per cycle.
        let mut lfo = FlutterOscillator::new();

        assert_abs_diff_eq!(lfo.sample(2.0), 0.0, epsilon = 1e-6);
        lfo.advance(1.0, 4.0);
        assert_abs_diff_eq!(lfo.sample(2.0), 2.0, epsilon = 1e-6);
        lfo.advance(1.0, 4.0);
        assert_abs_diff_eq!(lfo.sample(2.0), 0.0, epsilon = 1e-5);
        lfo.advance(1.0, 4.0);
        assert_abs_diff_eq!(lfo.sample(2.0), -2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_phase_wraps_into_unit_interval() {
        let mut lfo = FlutterOscillator::new();
        for _ in 0..100_000 {
            lfo.advance(FLUTTER_RATE_HZ, 44100.0);
            assert!((0.0..1.0).contains(&lfo.phase()), "phase {}", lfo.phase());
        }
    }

    /// After a whole number of cycles the phase is back near zero.
    #[test]
    fn test_whole_cycles_return_to_start() {
        let mut lfo = FlutterOscillator::new();
        // 2 cycles of 5 Hz at 44.1 kHz.
        for _ in 0..17640 {
            lfo.advance(FLUTTER_RATE_HZ, 44100.0);
        }
        let distance = lfo.phase().min(1.0 - lfo.phase());
        assert!(distance < 1e-3, "phase drifted to {}", lfo.phase());
    }

    #[test]
    fn test_zero_depth_is_silent() {
        let mut lfo = FlutterOscillator::new();
        for _ in 0..100 {
            lfo.advance(FLUTTER_RATE_HZ, 1000.0);
            assert_eq!(lfo.sample(0.0), 0.0);
        }
    }

    #[test]
    fn test_offset_reads_ahead() {
        let lfo = FlutterOscillator::new();
        assert_abs_diff_eq!(lfo.sample_offset(1.0, 0.25), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(lfo.sample_offset(1.0, 0.0), lfo.sample(1.0));
    }

    #[test]
    fn test_reset() {
        let mut lfo = FlutterOscillator::new();
        lfo.advance(3.0, 10.0);
        lfo.reset();
        assert_eq!(lfo.phase(), 0.0);
    }
}
