//! # Stereo Field (Mono ↔ Ping-Pong)
//!
//! The width control morphs the echo between two topologies:
//!
//! ```text
//!   width = 0 (mono)                    width = 1 (ping-pong)
//!
//!   (L+R)/2 ──► [L line] ─┐             (L+R)/2 ─┐    [L line] ─┐
//!          │       ▲      │                      │       ▲      │
//!          │       └──────┘ fb                   │       │      │ fb
//!          └──► [R line] ─┐                      └──► [R line] ◄┘
//!                  ▲      │                              │
//!                  └──────┘ fb                           └──► to L line
//! ```
//!
//! At 0 both delay lines receive the mono sum and feed back into
//! themselves, so both outputs carry the same echo. At 1 the dry signal
//! only enters the right line and each line feeds the *other*, so the
//! first echo is heard on the right, the second on the left, and so on.
//!
//! Two pieces of per-sample routing come out of the width:
//!
//! - **Injection gains**: how much of the mono sum enters each line. A pan
//!   law from "centre" to "hard right", scaled so the centre gives unity
//!   to both lines. The hard-right end then carries more than unity into
//!   one line, which keeps the perceived wet level constant while the echo
//!   collapses onto a single side.
//! - **Feedback matrix**: `[[direct, cross], [cross, direct]]` applied to
//!   the two filtered echoes before they're written back. Each row sums to
//!   one, so cross-feeding never adds loop gain.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, SQRT_2};

use super::smoother::SmoothedParam;

/// Curve used to crossfade between the two topologies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossfadeLaw {
    /// Straight-line gains between the same endpoints.
    Linear,
    /// Sine/cosine gains; holds summed power constant through the sweep.
    EqualPower,
}

/// Law used by the engine. Intermediate widths are the only place the
/// two laws differ.
pub const CROSSFADE_LAW: CrossfadeLaw = CrossfadeLaw::EqualPower;

/// Per-sample routing derived from one width value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StereoMatrix {
    /// Feedback weight a line gives its own echo.
    pub direct: f32,
    /// Feedback weight a line gives the other line's echo.
    pub cross: f32,
    /// Gain of the mono input sum into the left line.
    pub inject_left: f32,
    /// Gain of the mono input sum into the right line.
    pub inject_right: f32,
}

impl StereoMatrix {
    pub fn for_width(width: f32, law: CrossfadeLaw) -> Self {
        let width = width.clamp(0.0, 1.0);

        match law {
            CrossfadeLaw::Linear => Self {
                direct: 1.0 - width,
                cross: width,
                inject_left: 1.0 - width,
                inject_right: 1.0 + (SQRT_2 - 1.0) * width,
            },
            CrossfadeLaw::EqualPower => {
                // Feedback: the equal-power pair, renormalised so the row
                // sums to one.
                let (sin, cos) = (width * FRAC_PI_2).sin_cos();
                let sum = sin + cos;

                // Injection: pan from centre (π/4) to hard right (π/2),
                // scaled by √2 so centre is unity to both lines. Expanded as
                // √2·sin(π/4 + a) = cos a + sin a, which keeps width 0
                // exactly symmetric.
                let (pan_sin, pan_cos) = (width * FRAC_PI_4).sin_cos();

                Self {
                    direct: cos / sum,
                    cross: sin / sum,
                    inject_left: (pan_cos - pan_sin).max(0.0),
                    inject_right: pan_cos + pan_sin,
                }
            }
        }
    }

    /// Feedback contribution for each line from the two filtered echoes.
    #[inline]
    pub fn route(&self, wet_left: f32, wet_right: f32) -> (f32, f32) {
        (
            self.direct * wet_left + self.cross * wet_right,
            self.cross * wet_left + self.direct * wet_right,
        )
    }

    /// Dry contribution for each line from the stereo input.
    #[inline]
    pub fn inject(&self, dry_left: f32, dry_right: f32) -> (f32, f32) {
        let mono = 0.5 * (dry_left + dry_right);
        (self.inject_left * mono, self.inject_right * mono)
    }
}

/// Smoothed width plus the routing it implies.
///
/// The matrix costs a handful of trig calls, so it's only rebuilt while
/// the width is actually moving.
#[derive(Debug, Clone)]
pub struct StereoField {
    width: SmoothedParam,
    law: CrossfadeLaw,
    matrix: StereoMatrix,
}

impl StereoField {
    pub fn new(width: f32, law: CrossfadeLaw) -> Self {
        let width = width.clamp(0.0, 1.0);
        Self {
            width: SmoothedParam::new(width),
            law,
            matrix: StereoMatrix::for_width(width, law),
        }
    }

    /// Glide to a new width over `ramp_samples`.
    pub fn set_width(&mut self, width: f32, ramp_samples: u32) {
        self.width.set_target(width.clamp(0.0, 1.0), ramp_samples);
        if !self.width.is_ramping() {
            self.matrix = StereoMatrix::for_width(self.width.value(), self.law);
        }
    }

    /// Advance the width smoother one sample and return this sample's
    /// routing.
    #[inline]
    pub fn advance(&mut self) -> StereoMatrix {
        if self.width.is_ramping() {
            let width = self.width.advance();
            self.matrix = StereoMatrix::for_width(width, self.law);
        }
        self.matrix
    }

    /// Finish any width ramp immediately.
    pub fn snap(&mut self) {
        self.width.snap_to_target();
        self.matrix = StereoMatrix::for_width(self.width.value(), self.law);
    }

    /// Instantaneous (smoothed) width.
    pub fn width(&self) -> f32 {
        self.width.value()
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
