//! # Tape Echo Engine
//!
//! [`TapeEcho`] owns one instance's complete DSP state: two delay lines,
//! two tone filters, the flutter LFO, the stereo field and the smoothed
//! controls. Everything is allocated in [`TapeEcho::new`]; processing
//! never allocates, locks or fails.
//!
//! ## Per-frame algorithm
//!
//! 1. Advance the smoothed controls (delay time, feedback, mix, width).
//! 2. Read the flutter LFO, add it to the delay time, advance the LFO.
//! 3. Read each delay line at its delay and run it through the tone filter.
//! 4. Cross-mix the filtered echoes according to the stereo width.
//! 5. Saturate, scale by feedback, add the dry injection, write back.
//! 6. Mix dry and wet, clamp to `[-1, 1]`.

use crate::config::EngineConfig;
use crate::dsp::delay_line::DelayLine;
use crate::dsp::filter::OnePoleFilter;
use crate::dsp::flutter::{FlutterOscillator, FLUTTER_RATE_HZ};
use crate::dsp::saturator::saturate;
use crate::dsp::smoother::SmoothedParam;
use crate::dsp::stereo_field::{StereoField, CROSSFADE_LAW};
use crate::error::{EchoError, Result};
use crate::parameter::{
    feedback_amount, flutter_depth_seconds, time_to_seconds, tone_to_hz, ParamId,
    MAX_DELAY_SECONDS, MAX_FLUTTER_SECONDS,
};

/// Length of a parameter glide. Long enough not to click, short enough
/// to feel immediate under a hand on the knob.
pub const RAMP_SECONDS: f32 = 0.02;

/// Stereo tape echo.
#[derive(Debug)]
pub struct TapeEcho {
    sample_rate: f32,
    ramp_samples: u32,

    /// Last value *set* for every control, as opposed to where its ramp
    /// currently is. This is what readback reports.
    controls: EngineConfig,

    /// Base delay in samples.
    delay_samples: SmoothedParam,
    feedback: SmoothedParam,
    mix: SmoothedParam,
    stereo: StereoField,

    saturation: f32,
    /// Flutter depth in samples.
    flutter_depth: f32,
    flutter: FlutterOscillator,
    /// Right channel's flutter phase offset in cycles.
    flutter_offset: f32,

    lines: [DelayLine; 2],
    filters: [OnePoleFilter; 2],

    /// Longest delay any read may request.
    max_delay_samples: f32,
}

impl TapeEcho {
    /// Allocate and initialize an echo at `sample_rate`.
    ///
    /// The delay buffers are sized for the longest delay time plus the
    /// deepest flutter excursion, so no later setting can outgrow them.
    ///
    /// # Errors
    /// - [`EchoError::InvalidSampleRate`] unless the rate is finite and
    ///   positive.
    /// - [`EchoError::Allocation`] if a delay buffer can't be allocated.
    pub fn new(sample_rate: f32, config: &EngineConfig) -> Result<Self> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(EchoError::InvalidSampleRate(sample_rate));
        }

        // Two spare samples: one for the slot being written, one for the
        // interpolation neighbour of the longest read.
        let capacity = (((MAX_DELAY_SECONDS + MAX_FLUTTER_SECONDS) * sample_rate).ceil() as usize)
            .checked_add(2)
            .ok_or(EchoError::Allocation {
                samples: usize::MAX,
            })?;
        let lines = [
            DelayLine::new(capacity, sample_rate)?,
            DelayLine::new(capacity, sample_rate)?,
        ];
        let max_delay_samples = (lines[0].capacity() - 1) as f32;

        let config = config.clamped();
        let mut engine = Self {
            sample_rate,
            ramp_samples: (RAMP_SECONDS * sample_rate).round() as u32,
            controls: config,
            delay_samples: SmoothedParam::new(0.0),
            feedback: SmoothedParam::new(0.0),
            mix: SmoothedParam::new(0.0),
            stereo: StereoField::new(0.0, CROSSFADE_LAW),
            saturation: 0.0,
            flutter_depth: 0.0,
            flutter: FlutterOscillator::new(),
            flutter_offset: config.flutter_mode.right_phase_offset(),
            lines,
            filters: [OnePoleFilter::new(); 2],
            max_delay_samples,
        };

        // Start every control at its configured value, no ramps.
        for id in ParamId::ALL {
            engine.apply(id, config.get(id), 0);
        }

        nih_plug::nih_log!(
            "space echo created at {} Hz, {} sample delay lines",
            sample_rate,
            capacity
        );

        Ok(engine)
    }

    /// Set a control from a normalized value.
    ///
    /// Out-of-range values are clamped to `[0, 1]`; non-finite values are
    /// ignored. Smoothed controls glide over [`RAMP_SECONDS`], superseding
    /// any glide in progress; the rest apply on the next sample.
    pub fn set_param(&mut self, id: ParamId, normalized: f32) {
        if !normalized.is_finite() {
            return;
        }
        let value = normalized.clamp(0.0, 1.0);
        self.controls.set(id, value);
        let ramp = if id.is_smoothed() { self.ramp_samples } else { 0 };
        self.apply(id, value, ramp);
    }

    /// Last normalized value set for a control.
    pub fn param(&self, id: ParamId) -> f32 {
        self.controls.get(id)
    }

    /// Where a control is right now, in working units: seconds for time
    /// and flutter depth, Hz for tone, plain amounts for the rest.
    ///
    /// For smoothed controls this is the instantaneous ramp position.
    pub fn current(&self, id: ParamId) -> f32 {
        match id {
            ParamId::Time => self.delay_samples.value() / self.sample_rate,
            ParamId::Feedback => self.feedback.value(),
            ParamId::Mix => self.mix.value(),
            ParamId::Tone => tone_to_hz(self.controls.tone),
            ParamId::Saturation => self.saturation,
            ParamId::Flutter => self.flutter_depth / self.sample_rate,
            ParamId::StereoWidth => self.stereo.width(),
        }
    }

    fn apply(&mut self, id: ParamId, value: f32, ramp_samples: u32) {
        match id {
            ParamId::Time => {
                let samples = time_to_seconds(value) * self.sample_rate;
                self.delay_samples.set_target(samples, ramp_samples);
            }
            ParamId::Feedback => self.feedback.set_target(feedback_amount(value), ramp_samples),
            ParamId::Mix => self.mix.set_target(value, ramp_samples),
            ParamId::Tone => {
                let cutoff = tone_to_hz(value);
                for filter in &mut self.filters {
                    filter.set_cutoff(cutoff, self.sample_rate);
                }
            }
            ParamId::Saturation => self.saturation = value,
            ParamId::Flutter => {
                self.flutter_depth = flutter_depth_seconds(value) * self.sample_rate;
            }
            ParamId::StereoWidth => self.stereo.set_width(value, ramp_samples),
        }
    }

    /// Process one stereo frame of normalized samples.
    #[inline]
    pub fn process_frame(&mut self, left: f32, right: f32) -> (f32, f32) {
        let left = sanitize(left);
        let right = sanitize(right);

        let base_delay = self.delay_samples.advance();
        let feedback = self.feedback.advance();
        let mix = self.mix.advance();
        let matrix = self.stereo.advance();

        // Flutter is read before the phase moves, so frame 0 of a fresh
        // instance sits exactly on the base delay.
        let wobble_l = self.flutter.sample(self.flutter_depth);
        let wobble_r = self
            .flutter
            .sample_offset(self.flutter_depth, self.flutter_offset);
        self.flutter.advance(FLUTTER_RATE_HZ, self.sample_rate);

        let delay_l = (base_delay + wobble_l).clamp(1.0, self.max_delay_samples);
        let delay_r = (base_delay + wobble_r).clamp(1.0, self.max_delay_samples);

        let [line_l, line_r] = &mut self.lines;
        let [filter_l, filter_r] = &mut self.filters;

        let wet_l = filter_l.process(line_l.read_samples(delay_l));
        let wet_r = filter_r.process(line_r.read_samples(delay_r));

        let (route_l, route_r) = matrix.route(wet_l, wet_r);
        let (inject_l, inject_r) = matrix.inject(left, right);

        line_l.write(sanitize(inject_l + saturate(route_l, self.saturation) * feedback));
        line_r.write(sanitize(inject_r + saturate(route_r, self.saturation) * feedback));

        (
            clamp_output(left * (1.0 - mix) + wet_l * mix),
            clamp_output(right * (1.0 - mix) + wet_r * mix),
        )
    }

    /// Process interleaved 16-bit stereo PCM in place.
    ///
    /// Conversion to and from floating point happens here and nowhere
    /// else. A trailing half frame is left untouched.
    pub fn process_interleaved(&mut self, samples: &mut [i16]) {
        for frame in samples.chunks_exact_mut(2) {
            let (left, right) = self.process_frame(pcm_to_float(frame[0]), pcm_to_float(frame[1]));
            frame[0] = float_to_pcm(left);
            frame[1] = float_to_pcm(right);
        }
    }

    /// Silence the tape, zero the filters, rewind the flutter and finish
    /// any parameter glides.
    pub fn reset(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
        for filter in &mut self.filters {
            filter.reset();
        }
        self.flutter.reset();
        self.delay_samples.snap_to_target();
        self.feedback.snap_to_target();
        self.mix.snap_to_target();
        self.stereo.snap();
    }

    /// How long the echoes ring on after the input goes silent: the
    /// number of repeats needed to decay by 60 dB times the delay length.
    pub fn tail_samples(&self) -> u32 {
        let delay = self.delay_samples.target() + self.flutter_depth;
        let feedback = self.feedback.target();

        if feedback > 0.001 {
            let repeats = -3.0 / feedback.log10(); // log10(0.001) = -3
            (repeats.max(1.0) * delay) as u32
        } else {
            delay as u32
        }
    }

    /// Length of a parameter glide in samples.
    pub fn ramp_samples(&self) -> u32 {
        self.ramp_samples
    }

    /// Size of each delay buffer in samples.
    pub fn capacity(&self) -> usize {
        self.lines[0].capacity()
    }
}

/// 16-bit PCM to normalized float.
#[inline]
pub fn pcm_to_float(sample: i16) -> f32 {
    sample as f32 / 32768.0
}

/// Normalized float to 16-bit PCM, clamped and rounded.
#[inline]
pub fn float_to_pcm(sample: f32) -> i16 {
    (clamp_output(sample) * 32767.0).round() as i16
}

/// Non-finite values and denormals become exact zero.
#[inline]
fn sanitize(x: f32) -> f32 {
    if x.is_finite() && x.abs() >= 1.0e-20 {
        x
    } else {
        0.0
    }
}

#[inline]
fn clamp_output(x: f32) -> f32 {
    if x.is_finite() {
        x.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
