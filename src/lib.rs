//! # Space Echo: A Tape Echo Engine and AU/VST3/CLAP Plugin
//!
//! A stereo tape-style echo built on [nih-plug](https://github.com/robbert-vdh/nih-plug).
//! The repeats darken, saturate and wobble the way they do on a
//! worn tape loop, and a width control morphs the echo from plain mono
//! into ping-pong.
//!
//! The DSP lives in [`engine::TapeEcho`] and knows nothing about plugin
//! hosting. Two front ends drive it:
//!
//! - [`EchoInstance`]: create / destroy / process 16-bit PCM blocks /
//!   set and get parameters by name. For hosts that embed the engine
//!   directly.
//! - `SpaceEcho`: the nih-plug plugin, exported as CLAP and VST3 (and
//!   AUv2 on macOS).
//!
//! ## Signal Flow
//!
//! ```text
//! Input ──┬───────────────────────────────────────────── × (1 - mix) ───┐
//!         │                                                              │
//!         │   (L+R)/2 × inject                                           │
//!         └──────►(+)──► [Delay Line] ──► [Tone LP] ──┬──► × mix ──────►(+)──► Output
//!                  ▲          ▲                       │
//!                  │    [Flutter LFO]                 ▼
//!                  │                          [Width matrix]
//!                  │                        (mono ↔ ping-pong)
//!                  │                                  │
//!                  └──── × feedback ◄── [Saturate] ◄──┘
//! ```
//!
//! Everything inside the loop runs once per channel; the width matrix is
//! where the two channels meet.

pub mod config;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod instance;
pub mod parameter;
mod params;

use std::num::NonZeroU32;
use std::sync::Arc;

use nih_plug::prelude::*;

pub use config::{EngineConfig, FlutterMode};
pub use engine::TapeEcho;
pub use error::EchoError;
pub use instance::EchoInstance;
pub use parameter::ParamId;

use params::PluginParams;

/// The plugin: shared parameters plus the engine the audio thread owns.
///
/// The engine is only built once the host reports its sample rate in
/// `initialize()`, so it starts out as `None`.
struct SpaceEcho {
    params: Arc<PluginParams>,
    engine: Option<TapeEcho>,
}

impl Default for SpaceEcho {
    fn default() -> Self {
        Self {
            params: Arc::new(PluginParams::default()),
            engine: None,
        }
    }
}

impl Plugin for SpaceEcho {
    const NAME: &'static str = "Space Echo";
    const VENDOR: &'static str = "Loveless Audio";
    const URL: &'static str = "";
    const EMAIL: &'static str = "steve.loveless@gmail.com";
    const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    // Stereo first; most DAW tracks are stereo. Mono tracks still get the
    // full engine, with the two outputs folded back to one.
    const AUDIO_IO_LAYOUTS: &'static [AudioIOLayout] = &[
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(2),
            main_output_channels: NonZeroU32::new(2),
            aux_input_ports: &[],
            aux_output_ports: &[],
            names: PortNames::const_default(),
        },
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(1),
            main_output_channels: NonZeroU32::new(1),
            aux_input_ports: &[],
            aux_output_ports: &[],
            names: PortNames::const_default(),
        },
    ];

    const MIDI_INPUT: MidiConfig = MidiConfig::None;

    // Blocks are split at automation points, so pushing parameter values
    // at block start is sample accurate.
    const SAMPLE_ACCURATE_AUTOMATION: bool = true;

    type SysExMessage = ();
    type BackgroundTask = ();

    fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    /// Build the engine for the host's sample rate. Buffers are sized
    /// here, once, for the longest delay.
    fn initialize(
        &mut self,
        _audio_io_layout: &AudioIOLayout,
        buffer_config: &BufferConfig,
        _context: &mut impl InitContext<Self>,
    ) -> bool {
        match TapeEcho::new(buffer_config.sample_rate, &self.params.engine_config()) {
            Ok(engine) => {
                self.engine = Some(engine);
                true
            }
            Err(err) => {
                nih_error!("failed to initialize space echo: {}", err);
                self.engine = None;
                false
            }
        }
    }

    /// Playback stopped: no stale echoes on the next play.
    fn reset(&mut self) {
        if let Some(engine) = &mut self.engine {
            engine.reset();
        }
    }

    fn process(
        &mut self,
        buffer: &mut Buffer,
        _aux: &mut AuxiliaryBuffers,
        _context: &mut impl ProcessContext<Self>,
    ) -> ProcessStatus {
        let Some(engine) = self.engine.as_mut() else {
            return ProcessStatus::Normal;
        };

        self.params.sync(engine);

        for mut channel_samples in buffer.iter_samples() {
            let mut channels = channel_samples.iter_mut();
            let (Some(left), right) = (channels.next(), channels.next()) else {
                continue;
            };

            match right {
                Some(right) => {
                    let (l, r) = engine.process_frame(*left, *right);
                    *left = l;
                    *right = r;
                }
                // Mono: at full width the echo only comes back on the right
                // line, so both lines are folded into the one output.
                None => {
                    let (l, r) = engine.process_frame(*left, *left);
                    *left = 0.5 * (l + r);
                }
            }
        }

        // Keep the host calling process() until the repeats have died
        // away below -60 dB.
        ProcessStatus::Tail(engine.tail_samples())
    }
}

// ─────────────────────────────────────────────────────────────────────
// Plugin format trait implementations
// ─────────────────────────────────────────────────────────────────────

impl ClapPlugin for SpaceEcho {
    const CLAP_ID: &'static str = "com.loveless-audio.space-echo-v1";
    const CLAP_DESCRIPTION: Option<&'static str> =
        Some("A tape echo with flutter, saturation and ping-pong width");
    const CLAP_MANUAL_URL: Option<&'static str> = None;
    const CLAP_SUPPORT_URL: Option<&'static str> = None;
    const CLAP_FEATURES: &'static [ClapFeature] = &[
        ClapFeature::AudioEffect,
        ClapFeature::Stereo,
        ClapFeature::Delay,
    ];
}

impl Vst3Plugin for SpaceEcho {
    const VST3_CLASS_ID: [u8; 16] = *b"LvlssSpcEcho_v01";
    const VST3_SUBCATEGORIES: &'static [Vst3SubCategory] =
        &[Vst3SubCategory::Fx, Vst3SubCategory::Delay];
}

// ─────────────────────────────────────────────────────────────────────
// Export macros
// ─────────────────────────────────────────────────────────────────────
//
// nih_export_clap! exports the `clap_entry` symbol for CLAP hosts.
// nih_export_vst3! exports `GetPluginFactory` for VST3 hosts.

nih_export_clap!(SpaceEcho);
nih_export_vst3!(SpaceEcho);

// AUv2 wrapper around the CLAP entry point, for Logic Pro.
#[cfg(target_os = "macos")]
clap_wrapper::export_auv2!();
