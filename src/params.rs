//! # Plugin Parameters
//!
//! The seven echo controls as host-visible parameters. Each one is a
//! plain normalized `0..1` value, exactly what the engine takes, with a
//! display string in real units ("400 ms", "5.3 kHz") so the DAW shows
//! something meaningful.
//!
//! The IDs (`#[id = "..."]`) are the same names the instance API uses.
//! Hosts save presets under these IDs, so they must never change.
//!
//! ## No smoothing here
//!
//! nih-plug can smooth parameters itself, but the engine already ramps
//! delay time, feedback, mix and width with its own smoothers (and
//! deliberately does *not* ramp tone or saturation). So every parameter
//! here is unsmoothed and the plugin simply hands new values to the
//! engine at the start of each block.

use std::sync::Arc;

use nih_plug::prelude::*;

use crate::config::EngineConfig;
use crate::engine::TapeEcho;
use crate::parameter::ParamId;

/// All user-facing parameters for the Space Echo plugin.
#[derive(Params)]
pub struct PluginParams {
    /// **Time**: 50 ms slapback to 800 ms echoes, eased so the short end
    /// gets more knob travel.
    #[id = "time"]
    pub time: FloatParam,

    /// **Feedback**: how many repeats. Tops out at 95% so the loop always
    /// dies away eventually.
    #[id = "feedback"]
    pub feedback: FloatParam,

    /// **Mix**: dry/wet balance.
    #[id = "mix"]
    pub mix: FloatParam,

    /// **Tone**: lowpass on the repeats, 1 kHz (dark) to 16 kHz (bright).
    #[id = "tone"]
    pub tone: FloatParam,

    /// **Saturation**: tape drive on the recirculating signal.
    #[id = "saturation"]
    pub saturation: FloatParam,

    /// **Flutter**: depth of the 5 Hz transport wobble, up to 2 ms.
    #[id = "flutter"]
    pub flutter: FloatParam,

    /// **Width**: mono echo at 0, full ping-pong at 100%.
    #[id = "stereo_width"]
    pub stereo_width: FloatParam,
}

impl Default for PluginParams {
    fn default() -> Self {
        let defaults = EngineConfig::default();
        Self {
            time: control(ParamId::Time, "Time", &defaults),
            feedback: control(ParamId::Feedback, "Feedback", &defaults),
            mix: control(ParamId::Mix, "Mix", &defaults),
            tone: control(ParamId::Tone, "Tone", &defaults),
            saturation: control(ParamId::Saturation, "Saturation", &defaults),
            flutter: control(ParamId::Flutter, "Flutter", &defaults),
            stereo_width: control(ParamId::StereoWidth, "Width", &defaults),
        }
    }
}

/// A normalized parameter that displays in the control's real units.
fn control(id: ParamId, name: &'static str, defaults: &EngineConfig) -> FloatParam {
    FloatParam::new(name, defaults.get(id), FloatRange::Linear { min: 0.0, max: 1.0 })
        .with_value_to_string(Arc::new(move |value| id.display(value)))
}

impl PluginParams {
    pub fn get(&self, id: ParamId) -> &FloatParam {
        match id {
            ParamId::Time => &self.time,
            ParamId::Feedback => &self.feedback,
            ParamId::Mix => &self.mix,
            ParamId::Tone => &self.tone,
            ParamId::Saturation => &self.saturation,
            ParamId::Flutter => &self.flutter,
            ParamId::StereoWidth => &self.stereo_width,
        }
    }

    /// Snapshot of the current parameter values, used to build a fresh
    /// engine in `initialize()`.
    pub fn engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig::default();
        for id in ParamId::ALL {
            config.set(id, self.get(id).value());
        }
        config
    }

    /// Hand every parameter that moved since the last block to the
    /// engine. Unchanged values are skipped so a ramp in progress isn't
    /// restarted.
    pub fn sync(&self, engine: &mut TapeEcho) {
        for id in ParamId::ALL {
            let value = self.get(id).value();
            if value != engine.param(id) {
                engine.set_param(id, value);
            }
        }
    }
}
