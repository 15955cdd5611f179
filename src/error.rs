//! Error types for the echo engine and its host-facing instance API.

use thiserror::Error;

/// Result type alias using [`EchoError`].
pub type Result<T> = std::result::Result<T, EchoError>;

/// Everything that can go wrong outside the audio path.
///
/// Processing itself never fails: bad numbers are clamped or silenced
/// instead of reported.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EchoError {
    /// Parameter name isn't one of the seven controls.
    #[error("unknown parameter '{name}'")]
    UnknownParameter { name: String },

    /// Parameter text isn't a finite number.
    #[error("invalid value '{value}' for parameter '{param}'")]
    InvalidValue { param: &'static str, value: String },

    /// Sample rate must be finite and positive.
    #[error("invalid sample rate {0} Hz")]
    InvalidSampleRate(f32),

    /// Delay buffer couldn't be allocated.
    #[error("failed to allocate delay buffer of {samples} samples")]
    Allocation { samples: usize },

    /// Initial configuration text couldn't be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The instance was already destroyed.
    #[error("instance has been destroyed")]
    Destroyed,
}

impl EchoError {
    /// Create an unknown parameter error
    pub fn unknown_parameter(name: impl Into<String>) -> Self {
        Self::UnknownParameter { name: name.into() }
    }
}

impl From<serde_json::Error> for EchoError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
