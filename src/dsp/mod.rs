//! # DSP (Digital Signal Processing) Primitives
//!
//! The building blocks of the tape echo, each usable on its own:
//!
//! - **`delay_line`**: A ring buffer of past samples with fractional,
//!   linearly interpolated reads. One per channel; this is the "tape".
//!
//! - **`filter`**: A one-pole lowpass in the feedback path, so every
//!   repeat comes back a little darker than the one before.
//!
//! - **`saturator`**: Soft clipping on the recirculating signal, the
//!   tape's gentle compression when driven.
//!
//! - **`flutter`**: A slow sine LFO that wobbles the delay time like an
//!   uneven tape transport.
//!
//! - **`smoother`**: Linear parameter ramps, so knob moves don't click.
//!
//! - **`stereo_field`**: Routing between the two delay lines, from plain
//!   mono echo to full ping-pong.

pub mod delay_line;
pub mod filter;
pub mod flutter;
pub mod saturator;
pub mod smoother;
pub mod stereo_field;
