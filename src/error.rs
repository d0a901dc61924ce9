//! Error types for the speech synthesis and playback pipeline.

use thiserror::Error;

/// Errors that can occur in the synthesis/decode/playback pipeline.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// Caller passed text that is empty after trimming
    #[error("text input is empty")]
    EmptyInput,

    /// The synthesis provider rejected or failed a request.
    ///
    /// Carries the provider's own description (HTTP status plus body, or a
    /// transport failure). Whether a provider error is worth retrying is
    /// decided by [`classify_error`](crate::synthesis::classify_error), not
    /// by the variant itself.
    #[error("provider error: {0}")]
    Provider(String),

    /// The retry budget ran out without the provider ever returning audio
    #[error("no audio after {attempts} attempts (last failure: {last_failure})")]
    SynthesisExhausted {
        /// Total attempts made
        attempts: u32,
        /// Human-readable description of the final failure
        last_failure: String,
    },

    /// Malformed base64 or corrupt audio payload
    #[error("audio decoding failed: {0}")]
    Decoding(String),

    /// The provider answered, but the body did not match the expected schema
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    /// The shared audio output device could not be opened or has shut down
    #[error("audio output unavailable: {0}")]
    OutputUnavailable(String),
}

/// Result type for pipeline operations.
pub type SpeechResult<T> = Result<T, SpeechError>;
