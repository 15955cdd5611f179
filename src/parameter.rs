//! # Parameters
//!
//! Every control is set as a normalized value in `[0, 1]` and mapped to
//! its working range here. The engine only ever sees [`ParamId`]; string
//! names are resolved once at the host boundary so the audio path never
//! compares strings.
//!
//! | Control      | Mapping                                  | Smoothed |
//! |--------------|------------------------------------------|----------|
//! | time         | quadratic ease-out, 50–800 ms             | yes      |
//! | feedback     | linear, 0–0.95                            | yes      |
//! | mix          | identity                                  | yes      |
//! | tone         | exponential, 1–16 kHz                     | no       |
//! | saturation   | identity (drive amount)                   | no       |
//! | flutter      | linear, 0–2 ms depth                      | no       |
//! | stereo_width | linear, 0 (mono) – 1 (ping-pong)          | yes      |

use std::fmt;
use std::str::FromStr;

use crate::error::{EchoError, Result};

/// Shortest delay the time control reaches.
pub const MIN_DELAY_SECONDS: f32 = 0.05;
/// Longest delay the time control reaches.
pub const MAX_DELAY_SECONDS: f32 = 0.8;
/// Delay time of a freshly created instance.
pub const DEFAULT_DELAY_SECONDS: f32 = 0.4;

/// Feedback ceiling. At 1.0 repeats would never decay.
pub const MAX_FEEDBACK: f32 = 0.95;

pub const MIN_TONE_HZ: f32 = 1000.0;
pub const MAX_TONE_HZ: f32 = 16000.0;

/// Flutter depth at full intensity: 2 ms of delay modulation.
pub const MAX_FLUTTER_SECONDS: f32 = 0.002;

/// The closed set of user controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    Time,
    Feedback,
    Mix,
    Tone,
    Saturation,
    Flutter,
    StereoWidth,
}

impl ParamId {
    pub const COUNT: usize = 7;

    pub const ALL: [ParamId; Self::COUNT] = [
        ParamId::Time,
        ParamId::Feedback,
        ParamId::Mix,
        ParamId::Tone,
        ParamId::Saturation,
        ParamId::Flutter,
        ParamId::StereoWidth,
    ];

    /// External name, as used by hosts and configuration.
    pub const fn name(self) -> &'static str {
        match self {
            ParamId::Time => "time",
            ParamId::Feedback => "feedback",
            ParamId::Mix => "mix",
            ParamId::Tone => "tone",
            ParamId::Saturation => "saturation",
            ParamId::Flutter => "flutter",
            ParamId::StereoWidth => "stereo_width",
        }
    }

    /// Whether changes glide over a ramp instead of applying at once.
    pub const fn is_smoothed(self) -> bool {
        matches!(
            self,
            ParamId::Time | ParamId::Feedback | ParamId::Mix | ParamId::StereoWidth
        )
    }

    /// Human-readable value in the control's working units.
    pub fn display(self, normalized: f32) -> String {
        let t = normalized.clamp(0.0, 1.0);
        match self {
            ParamId::Time => format!("{:.0} ms", time_to_seconds(t) * 1000.0),
            ParamId::Feedback => format!("{:.0}%", feedback_amount(t) * 100.0),
            ParamId::Tone => {
                let hz = tone_to_hz(t);
                if hz < 1000.0 {
                    format!("{hz:.0} Hz")
                } else {
                    format!("{:.1} kHz", hz / 1000.0)
                }
            }
            ParamId::Flutter => format!("{:.1} ms", flutter_depth_seconds(t) * 1000.0),
            ParamId::Mix | ParamId::Saturation | ParamId::StereoWidth => {
                format!("{:.0}%", t * 100.0)
            }
        }
    }

    /// Parse a textual value into a clamped normalized value.
    ///
    /// Out-of-range numbers are clamped (continuous hardware controls
    /// overshoot); text that isn't a finite number is rejected.
    pub fn parse_value(self, text: &str) -> Result<f32> {
        let invalid = || EchoError::InvalidValue {
            param: self.name(),
            value: text.to_owned(),
        };
        let value: f32 = text.trim().parse().map_err(|_| invalid())?;
        if !value.is_finite() {
            return Err(invalid());
        }
        Ok(value.clamp(0.0, 1.0))
    }
}

impl FromStr for ParamId {
    type Err = EchoError;

    fn from_str(name: &str) -> Result<Self> {
        ParamId::ALL
            .into_iter()
            .find(|id| id.name() == name)
            .ok_or_else(|| EchoError::unknown_parameter(name))
    }
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Delay time for a normalized time control.
///
/// Quadratic ease-out: the first third of the knob covers roughly the
/// first half of the range, where slapback and short echoes live.
pub fn time_to_seconds(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    let eased = 1.0 - inv * inv;
    MIN_DELAY_SECONDS + (MAX_DELAY_SECONDS - MIN_DELAY_SECONDS) * eased
}

/// Inverse of [`time_to_seconds`].
pub fn seconds_to_time(seconds: f32) -> f32 {
    let eased = ((seconds - MIN_DELAY_SECONDS) / (MAX_DELAY_SECONDS - MIN_DELAY_SECONDS))
        .clamp(0.0, 1.0);
    1.0 - (1.0 - eased).sqrt()
}

pub fn feedback_amount(t: f32) -> f32 {
    t.clamp(0.0, 1.0) * MAX_FEEDBACK
}

/// Tone cutoff, exponential so equal knob travel is equal musical
/// interval.
pub fn tone_to_hz(t: f32) -> f32 {
    MIN_TONE_HZ * (MAX_TONE_HZ / MIN_TONE_HZ).powf(t.clamp(0.0, 1.0))
}

pub fn flutter_depth_seconds(t: f32) -> f32 {
    t.clamp(0.0, 1.0) * MAX_FLUTTER_SECONDS
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_names_round_trip() {
        for id in ParamId::ALL {
            assert_eq!(id.name().parse::<ParamId>(), Ok(id));
        }
    }

    #[test]
    fn test_unknown_names_rejected() {
        for name in ["", "Time", "width", "name", "stereo-width", "mix "] {
            assert_eq!(
                name.parse::<ParamId>(),
                Err(EchoError::unknown_parameter(name)),
                "'{name}' should not resolve"
            );
        }
    }

    #[test]
    fn test_time_mapping_endpoints() {
        assert_relative_eq!(time_to_seconds(0.0), MIN_DELAY_SECONDS);
        assert_relative_eq!(time_to_seconds(1.0), MAX_DELAY_SECONDS);
        assert_relative_eq!(time_to_seconds(-1.0), MIN_DELAY_SECONDS);
        assert_relative_eq!(time_to_seconds(2.0), MAX_DELAY_SECONDS);
    }

    /// The default delay sits around 0.3 on the knob and maps back to
    /// 400 ms.
    #[test]
    fn test_default_time_position() {
        let t = seconds_to_time(DEFAULT_DELAY_SECONDS);
        assert!((0.25..0.32).contains(&t), "default time knob at {t}");
        assert_relative_eq!(time_to_seconds(t), DEFAULT_DELAY_SECONDS, max_relative = 1e-5);
    }

    #[test]
    fn test_time_mapping_is_monotonic() {
        let mut prev = time_to_seconds(0.0);
        for i in 1..=100 {
            let next = time_to_seconds(i as f32 / 100.0);
            assert!(next > prev);
            prev = next;
        }
    }

    #[test]
    fn test_feedback_mapping() {
        assert_eq!(feedback_amount(0.0), 0.0);
        assert_relative_eq!(feedback_amount(1.0), 0.95);
        assert_relative_eq!(feedback_amount(0.5), 0.475);
    }

    #[test]
    fn test_tone_mapping_is_exponential() {
        assert_relative_eq!(tone_to_hz(0.0), MIN_TONE_HZ);
        assert_relative_eq!(tone_to_hz(1.0), MAX_TONE_HZ, max_relative = 1e-6);
        // Halfway on the knob is the geometric mean: 4 kHz.
        assert_relative_eq!(tone_to_hz(0.5), 4000.0, max_relative = 1e-5);
    }

    #[test]
    fn test_parse_value_clamps() {
        assert_eq!(ParamId::Feedback.parse_value("0.4"), Ok(0.4));
        assert_eq!(ParamId::Mix.parse_value(" 1.0 "), Ok(1.0));
        assert_eq!(ParamId::StereoWidth.parse_value("100"), Ok(1.0));
        assert_eq!(ParamId::Tone.parse_value("-0.5"), Ok(0.0));
    }

    #[test]
    fn test_parse_value_rejects_garbage() {
        for text in ["", "abc", "0.4x", "NaN", "inf", "-inf"] {
            assert!(
                matches!(
                    ParamId::Time.parse_value(text),
                    Err(EchoError::InvalidValue { param: "time", .. })
                ),
                "'{text}' should be rejected"
            );
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(ParamId::Time.display(1.0), "800 ms");
        assert_eq!(ParamId::Time.display(0.0), "50 ms");
        assert_eq!(ParamId::Feedback.display(1.0), "95%");
        assert_eq!(ParamId::Mix.display(0.35), "35%");
        assert_eq!(ParamId::Tone.display(1.0), "16.0 kHz");
        assert_eq!(ParamId::Tone.display(0.0), "1.0 kHz");
        assert_eq!(ParamId::Flutter.display(1.0), "2.0 ms");
        assert_eq!(ParamId::StereoWidth.display(0.5), "50%");
    }

    #[test]
    fn test_smoothed_set() {
        let smoothed: Vec<_> = ParamId::ALL.into_iter().filter(|id| id.is_smoothed()).collect();
        assert_eq!(
            smoothed,
            [ParamId::Time, ParamId::Feedback, ParamId::Mix, ParamId::StereoWidth]
        );
    }
}
