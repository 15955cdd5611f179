//! # Linear Parameter Smoother
//!
//! When a control jumps (a knob is turned, a host sends automation), using
//! the new value immediately produces a step in the audio: an audible click
//! or "zipper noise". A smoother turns that step into a short straight ramp.
//!
//! ```text
//! target ─────────────────────────┐            ┌───────────
//!                                 │         ╱
//!                                 │      ╱
//! current ────────────────────────┘   ╱   (ramp_samples steps)
//! ```
//!
//! The ramp is linear and has a fixed length in samples, so it always
//! finishes on time no matter how far the value has to travel. On the last
//! step the value is snapped to the target so accumulated floating-point
//! error can't leave it a few ULPs short.

/// A control value that glides linearly to a new target.
///
/// Two states: *idle* (`steps_remaining == 0`, `current == target`) and
/// *ramping*. A new target supersedes any ramp in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedParam {
    current: f32,
    target: f32,
    step: f32,
    steps_remaining: u32,
}

impl SmoothedParam {
    /// Create an idle smoother sitting at `value`.
    pub fn new(value: f32) -> Self {
        Self {
            current: value,
            target: value,
            step: 0.0,
            steps_remaining: 0,
        }
    }

    /// Start a ramp from the current value to `target`.
    ///
    /// After exactly `ramp_samples` calls to [`advance()`](Self::advance)
    /// the value equals `target`. A ramp of 0 samples jumps immediately.
    pub fn set_target(&mut self, target: f32, ramp_samples: u32) {
        self.target = target;
        if ramp_samples == 0 {
            self.snap_to_target();
            return;
        }
        self.step = (target - self.current) / ramp_samples as f32;
        self.steps_remaining = ramp_samples;
    }

    /// Move one sample along the ramp and return the new value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        if self.steps_remaining > 0 {
            self.steps_remaining -= 1;
            if self.steps_remaining == 0 {
                self.current = self.target;
            } else {
                self.current += self.step;
            }
        }
        self.current
    }

    /// End any ramp and jump straight to the target.
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
        self.step = 0.0;
        self.steps_remaining = 0;
    }

    /// The value as of the last `advance()`.
    pub fn value(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_ramping(&self) -> bool {
        self.steps_remaining > 0
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_idle() {
        let mut p = SmoothedParam::new(0.3);
        assert!(!p.is_ramping());
        assert_eq!(p.advance(), 0.3);
        assert_eq!(p.target(), 0.3);
    }

    /// After exactly N advances the value must be bit-identical to the
    /// target, even for awkward step sizes that don't divide evenly.
    #[test]
    fn test_ramp_lands_exactly_on_target() {
        let mut p = SmoothedParam::new(0.1);
        p.set_target(0.7, 882);

        for _ in 0..882 {
            p.advance();
        }
        assert_eq!(p.value(), 0.7);
        assert!(!p.is_ramping());

        // Further advances stay put: no drift once idle.
        for _ in 0..1000 {
            assert_eq!(p.advance(), 0.7);
        }
    }

    /// Part-way through the ramp the value is strictly between the old
    /// and new values.
    #[test]
    fn test_partial_ramp_is_strictly_between() {
        let mut p = SmoothedParam::new(1.0);
        p.set_target(0.0, 100);

        for _ in 0..99 {
            let v = p.advance();
            assert!(v > 0.0 && v < 1.0, "expected mid-ramp value, got {v}");
        }
        assert!(p.is_ramping());
        assert_eq!(p.advance(), 0.0);
    }

    #[test]
    fn test_ramp_is_linear() {
        let mut p = SmoothedParam::new(0.0);
        p.set_target(1.0, 4);

        assert!((p.advance() - 0.25).abs() < 1e-6);
        assert!((p.advance() - 0.5).abs() < 1e-6);
        assert!((p.advance() - 0.75).abs() < 1e-6);
        assert_eq!(p.advance(), 1.0);
    }

    #[test]
    fn test_zero_length_ramp_jumps() {
        let mut p = SmoothedParam::new(0.2);
        p.set_target(0.9, 0);

        assert!(!p.is_ramping());
        assert_eq!(p.value(), 0.9);
        assert_eq!(p.advance(), 0.9);
    }

    /// A new target mid-ramp discards the old ramp and heads for the new
    /// target from wherever the value currently is.
    #[test]
    fn test_retarget_supersedes_ramp() {
        let mut p = SmoothedParam::new(0.0);
        p.set_target(1.0, 10);
        for _ in 0..5 {
            p.advance();
        }
        let midway = p.value();

        p.set_target(-1.0, 10);
        let next = p.advance();
        assert!(next < midway, "should now be heading down from {midway}");

        for _ in 0..9 {
            p.advance();
        }
        assert_eq!(p.value(), -1.0);
    }

    #[test]
    fn test_snap_to_target() {
        let mut p = SmoothedParam::new(0.0);
        p.set_target(0.5, 1000);
        p.advance();
        p.snap_to_target();

        assert_eq!(p.value(), 0.5);
        assert!(!p.is_ramping());
    }
}
