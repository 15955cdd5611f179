//! # Host Instance API
//!
//! The four operations a host drives an echo through: create, destroy,
//! process a block, and set/get a parameter by name. An [`EchoInstance`]
//! owns its engine outright, so any number of instances can run side by
//! side without sharing state.
//!
//! Destroying an instance frees its delay buffers but keeps the handle.
//! Every later call on it fails with [`EchoError::Destroyed`] instead of
//! touching freed state, and destroying twice is a no-op.

use crate::config::EngineConfig;
use crate::engine::TapeEcho;
use crate::error::{EchoError, Result};
use crate::parameter::ParamId;

/// One echo, as seen by a host.
#[derive(Debug)]
pub struct EchoInstance {
    engine: Option<TapeEcho>,
}

impl EchoInstance {
    /// Create an instance at `sample_rate` from JSON configuration text.
    /// Blank text gives the defaults.
    ///
    /// # Errors
    /// - [`EchoError::Config`] if the configuration can't be parsed.
    /// - [`EchoError::InvalidSampleRate`] for a non-positive rate.
    /// - [`EchoError::Allocation`] if the delay buffers can't be allocated.
    pub fn create(sample_rate: f32, config_json: &str) -> Result<Self> {
        let config = EngineConfig::from_json(config_json)?;
        Self::with_config(sample_rate, &config)
    }

    /// Create an instance from an already-built configuration.
    pub fn with_config(sample_rate: f32, config: &EngineConfig) -> Result<Self> {
        let engine = TapeEcho::new(sample_rate, config)?;
        Ok(Self {
            engine: Some(engine),
        })
    }

    /// Release the delay buffers. Safe to call more than once.
    pub fn destroy(&mut self) {
        if self.engine.take().is_some() {
            nih_plug::nih_log!("space echo destroyed");
        }
    }

    pub fn is_active(&self) -> bool {
        self.engine.is_some()
    }

    /// Process interleaved stereo 16-bit PCM in place.
    ///
    /// At most `frames` frames are processed, and never more than the
    /// buffer holds. Returns the number of frames processed.
    pub fn process_block(&mut self, samples: &mut [i16], frames: usize) -> Result<usize> {
        let engine = self.engine_mut()?;
        let frames = frames.min(samples.len() / 2);
        engine.process_interleaved(&mut samples[..frames * 2]);
        Ok(frames)
    }

    /// Set a control by name from decimal text, e.g. `("feedback", "0.4")`.
    ///
    /// Values outside `[0, 1]` are clamped. On error nothing changes.
    ///
    /// # Errors
    /// - [`EchoError::UnknownParameter`] if `name` isn't a control.
    /// - [`EchoError::InvalidValue`] if `value` isn't a finite number.
    /// - [`EchoError::Destroyed`] after [`destroy`](Self::destroy).
    pub fn set_parameter(&mut self, name: &str, value: &str) -> Result<()> {
        let engine = self.engine_mut()?;
        let parsed = name
            .parse::<ParamId>()
            .and_then(|id| id.parse_value(value).map(|v| (id, v)));

        match parsed {
            Ok((id, normalized)) => {
                engine.set_param(id, normalized);
                Ok(())
            }
            Err(err) => {
                nih_plug::nih_warn!("rejected parameter change: {}", err);
                Err(err)
            }
        }
    }

    /// Last value set for a control, as normalized text with two
    /// decimals (`"0.40"`).
    pub fn get_parameter(&self, name: &str) -> Result<String> {
        let engine = self.engine.as_ref().ok_or(EchoError::Destroyed)?;
        let id = name.parse::<ParamId>()?;
        Ok(format!("{:.2}", engine.param(id)))
    }

    /// The engine, while the instance is alive.
    pub fn engine(&self) -> Option<&TapeEcho> {
        self.engine.as_ref()
    }

    fn engine_mut(&mut self) -> Result<&mut TapeEcho> {
        self.engine.as_mut().ok_or(EchoError::Destroyed)
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
