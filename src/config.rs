//! Initial configuration for a new echo instance.
//!
//! Hosts hand the configuration over as JSON text. Every field is an
//! optional normalized control value; anything missing keeps its default.
//!
//! ```json
//! { "time": 0.5, "feedback": 0.6, "stereo_width": 1.0, "flutter_mode": "independent" }
//! ```

use serde::Deserialize;

use crate::error::Result;
use crate::parameter::{seconds_to_time, ParamId, DEFAULT_DELAY_SECONDS};

/// How the flutter LFO drives the two channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlutterMode {
    /// Both channels wobble together.
    #[default]
    Shared,
    /// The right channel runs a quarter cycle ahead of the left.
    Independent,
}

impl FlutterMode {
    /// Phase offset (in cycles) of the right channel's flutter.
    pub fn right_phase_offset(self) -> f32 {
        match self {
            FlutterMode::Shared => 0.0,
            FlutterMode::Independent => 0.25,
        }
    }
}

/// Normalized control values an instance starts with.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub time: f32,
    pub feedback: f32,
    pub mix: f32,
    pub tone: f32,
    pub saturation: f32,
    pub flutter: f32,
    pub stereo_width: f32,
    pub flutter_mode: FlutterMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            time: seconds_to_time(DEFAULT_DELAY_SECONDS),
            feedback: 0.4,
            mix: 0.35,
            tone: 0.6,
            saturation: 0.25,
            flutter: 0.15,
            stereo_width: 0.0,
            flutter_mode: FlutterMode::Shared,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON configuration. Blank text means all defaults.
    ///
    /// # Errors
    /// [`EchoError::Config`](crate::EchoError::Config) for malformed JSON,
    /// unknown keys, or values of the wrong type.
    pub fn from_json(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_str(text)?;
        Ok(config.clamped())
    }

    /// Normalized value of one control.
    pub fn get(&self, id: ParamId) -> f32 {
        match id {
            ParamId::Time => self.time,
            ParamId::Feedback => self.feedback,
            ParamId::Mix => self.mix,
            ParamId::Tone => self.tone,
            ParamId::Saturation => self.saturation,
            ParamId::Flutter => self.flutter,
            ParamId::StereoWidth => self.stereo_width,
        }
    }

    pub fn set(&mut self, id: ParamId, value: f32) {
        let slot = match id {
            ParamId::Time => &mut self.time,
            ParamId::Feedback => &mut self.feedback,
            ParamId::Mix => &mut self.mix,
            ParamId::Tone => &mut self.tone,
            ParamId::Saturation => &mut self.saturation,
            ParamId::Flutter => &mut self.flutter,
            ParamId::StereoWidth => &mut self.stereo_width,
        };
        *slot = value;
    }

    /// Copy with every control clamped to `[0, 1]`. Non-finite values fall
    /// back to the default.
    pub fn clamped(mut self) -> Self {
        let defaults = Self::default();
        for id in ParamId::ALL {
            let value = self.get(id);
            let value = if value.is_finite() {
                value.clamp(0.0, 1.0)
            } else {
                defaults.get(id)
            };
            self.set(id, value);
        }
        self
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EchoError;

    #[test]
    fn test_blank_and_empty_object_are_defaults() {
        assert_eq!(EngineConfig::from_json(""), Ok(EngineConfig::default()));
        assert_eq!(EngineConfig::from_json("  \n"), Ok(EngineConfig::default()));
        assert_eq!(EngineConfig::from_json("{}"), Ok(EngineConfig::default()));
    }

    #[test]
    fn test_partial_override() {
        let config = EngineConfig::from_json(r#"{"feedback": 0.7, "stereo_width": 1}"#).unwrap();
        assert_eq!(config.feedback, 0.7);
        assert_eq!(config.stereo_width, 1.0);
        assert_eq!(config.mix, EngineConfig::default().mix);
    }

    #[test]
    fn test_values_are_clamped() {
        let config = EngineConfig::from_json(r#"{"mix": 3.5, "tone": -2}"#).unwrap();
        assert_eq!(config.mix, 1.0);
        assert_eq!(config.tone, 0.0);
    }

    #[test]
    fn test_flutter_mode() {
        let config = EngineConfig::from_json(r#"{"flutter_mode": "independent"}"#).unwrap();
        assert_eq!(config.flutter_mode, FlutterMode::Independent);
        assert_eq!(config.flutter_mode.right_phase_offset(), 0.25);
        assert_eq!(FlutterMode::default().right_phase_offset(), 0.0);
    }

    #[test]
    fn test_rejects_unknown_keys_and_bad_json() {
        for text in [r#"{"volume": 1}"#, r#"{"mix": "loud"}"#, "{", "null"] {
            assert!(
                matches!(EngineConfig::from_json(text), Err(EchoError::Config(_))),
                "'{text}' should be rejected"
            );
        }
    }

    #[test]
    fn test_get_set_cover_every_control() {
        let mut config = EngineConfig::default();
        for (i, id) in ParamId::ALL.into_iter().enumerate() {
            config.set(id, i as f32 / 10.0);
        }
        for (i, id) in ParamId::ALL.into_iter().enumerate() {
            assert_eq!(config.get(id), i as f32 / 10.0);
        }
    }

    #[test]
    fn test_clamped_replaces_non_finite() {
        let mut config = EngineConfig::default();
        config.feedback = f32::NAN;
        config.mix = f32::INFINITY;
        let clamped = config.clamped();
        assert_eq!(clamped.feedback, EngineConfig::default().feedback);
        assert_eq!(clamped.mix, EngineConfig::default().mix);
    }
}
