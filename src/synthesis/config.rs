//! Configuration for the speech request engine.

use serde::{Deserialize, Serialize};

/// Gemini model used for audio synthesis.
pub const DEFAULT_SPEECH_MODEL: &str = "gemini-2.5-flash-preview-tts";

/// Configuration for the speech synthesis engine.
#[derive(Debug, Clone)]
pub struct SynthesisConfig {
    /// API key for the Gemini API
    pub api_key: String,

    /// Model identifier for audio generation
    pub model: String,

    /// Retry behavior for transient failures and audio-less responses
    pub retry: RetryPolicy,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_SPEECH_MODEL.to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

impl SynthesisConfig {
    /// Create a config with the default model and retry policy.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }
}

/// Retry behavior for one synthesize call.
///
/// Two failure triggers grow the same base delay at different rates: a
/// structurally valid response that carries no audio (the model declined), and
/// a provider error classified as transient. There is deliberately no
/// wall-clock ceiling; the budget is bounded only by `max_attempts` and the
/// growing delays. If a total-duration cap is ever needed, this is the type it
/// belongs on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts before giving up.
    /// Default: 8
    pub max_attempts: u32,

    /// Base delay before the first retry (milliseconds).
    /// Default: 1000ms
    pub initial_delay_ms: u64,

    /// Multiplier applied after a response with no audio payload.
    /// Default: 1.5
    pub no_audio_multiplier: f32,

    /// Multiplier applied after a transient provider error.
    /// Default: 2.0
    pub transient_multiplier: f32,

    /// Maximum random jitter added after a no-audio response (milliseconds).
    /// Default: 2000ms
    pub no_audio_jitter_ms: u64,

    /// Maximum random jitter added after a transient error (milliseconds).
    /// Default: 3000ms
    pub transient_jitter_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 8,
            initial_delay_ms: 1000,
            no_audio_multiplier: 1.5,
            transient_multiplier: 2.0,
            no_audio_jitter_ms: 2000,
            transient_jitter_ms: 3000,
        }
    }
}

impl RetryPolicy {
    /// A policy with all delays zeroed, for tests that count attempts.
    pub fn immediate() -> Self {
        Self {
            initial_delay_ms: 0,
            no_audio_jitter_ms: 0,
            transient_jitter_ms: 0,
            ..Default::default()
        }
    }

    /// Check if another attempt is allowed after `attempt` (zero-based) failed.
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt + 1 < self.max_attempts
    }
}

/// Generate a pseudo-random jitter in `0..=max_ms` using a simple LCG.
/// This avoids pulling in the rand crate for a simple use case.
pub(crate) fn rand_jitter_ms(max_ms: u64) -> u64 {
    use std::time::SystemTime;
    if max_ms == 0 {
        return 0;
    }
    let seed = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64;
    // Simple LCG: (a * seed + c) mod m
    let random = (seed.wrapping_mul(1103515245).wrapping_add(12345)) % (1 << 31);
    let normalized = random as f64 / (1u64 << 31) as f64; // 0.0 to 1.0
    (normalized * max_ms as f64) as u64
}
