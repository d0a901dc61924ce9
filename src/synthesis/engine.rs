//! Speech request engine: retry loop with prompt variation.
//!
//! The synthesis model occasionally declines a prompt it would happily accept
//! phrased differently, so consecutive attempts cycle through a small set of
//! prompt templates rather than hammering the same string. Two failure shapes
//! are retried: a structurally valid response with no audio in it, and a
//! provider error that looks transient. Everything else propagates.

use std::sync::Arc;
use std::time::Duration;

use crate::audio::EncodedAudio;
use crate::error::{SpeechError, SpeechResult};
use crate::language::LanguageCode;
use crate::sanitize::sanitize;

use super::client::{GeminiClient, SpeechBackend};
use super::config::{RetryPolicy, SynthesisConfig, rand_jitter_ms};

/// Number of prompt phrasings cycled across retries.
pub const PROMPT_TEMPLATE_COUNT: u32 = 3;

/// Markers in an error's textual rendering that suggest a transient fault.
const TRANSIENT_MARKERS: [&str; 3] = ["500", "internal", "overloaded"];

/// Classification of a provider failure for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Likely to succeed on retry (server overload, internal fault)
    Transient,
    /// Permanent; retrying would not help
    Terminal,
}

/// Classify a provider failure by inspecting its textual rendering.
///
/// This is a heuristic carried over from the provider's observed failure
/// modes. It lives behind this one function so it can be tested and swapped
/// without touching the retry control flow.
pub fn classify_error(err: &SpeechError) -> ErrorClass {
    let text = err.to_string().to_lowercase();
    if TRANSIENT_MARKERS.iter().any(|marker| text.contains(marker)) {
        ErrorClass::Transient
    } else {
        ErrorClass::Terminal
    }
}

/// Render the prompt for a given zero-based attempt index.
///
/// Templates are tried in order `attempt mod 3`: direct instruction, bare
/// text, polite instruction.
pub fn prompt_for_attempt(attempt: u32, text: &str) -> String {
    match attempt % PROMPT_TEMPLATE_COUNT {
        0 => format!("Say: {text}"),
        1 => text.to_string(),
        _ => format!("Please read this aloud: {text}"),
    }
}

/// Speech synthesis engine with bounded retry.
pub struct SpeechSynthesizer {
    backend: Arc<dyn SpeechBackend>,
    retry: RetryPolicy,
}

impl SpeechSynthesizer {
    /// Create an engine backed by the Gemini API.
    pub fn new(config: SynthesisConfig) -> Self {
        let retry = config.retry.clone();
        Self {
            backend: Arc::new(GeminiClient::new(config)),
            retry,
        }
    }

    /// Create an engine over an arbitrary backend (used by tests).
    pub fn with_backend(backend: Arc<dyn SpeechBackend>, retry: RetryPolicy) -> Self {
        Self { backend, retry }
    }

    /// Synthesize speech for `text` in the voice mapped to `language`.
    ///
    /// Sanitizes the input first, so empty text fails before any remote call.
    /// Makes up to `retry.max_attempts` strictly sequential attempts; each
    /// attempt observes the previous outcome before deciding to continue.
    pub async fn synthesize(
        &self,
        text: &str,
        language: LanguageCode,
    ) -> SpeechResult<EncodedAudio> {
        let clean = sanitize(text)?;
        let voice = language.voice();

        // One delay variable shared by both retry triggers; each trigger
        // grows it at its own rate.
        let mut delay_ms = self.retry.initial_delay_ms as f64;
        let mut last_failure = String::from("unknown");

        for attempt in 0..self.retry.max_attempts {
            let prompt = prompt_for_attempt(attempt, &clean);

            match self.backend.generate_speech(&prompt, voice).await {
                Ok(response) => {
                    if let Some(data) = response.inline_audio() {
                        return Ok(EncodedAudio::new(data.to_owned()));
                    }

                    // Model answered but declined to produce audio.
                    last_failure = format!(
                        "finish reason {}",
                        response.finish_reason().unwrap_or("UNKNOWN")
                    );
                    if self.retry.should_retry(attempt) {
                        let jitter = rand_jitter_ms(self.retry.no_audio_jitter_ms);
                        tokio::time::sleep(Duration::from_millis(delay_ms as u64 + jitter)).await;
                        delay_ms *= self.retry.no_audio_multiplier as f64;
                    }
                }
                Err(err) => {
                    if classify_error(&err) == ErrorClass::Terminal
                        || !self.retry.should_retry(attempt)
                    {
                        return Err(err);
                    }

                    tracing::warn!(
                        attempt = attempt + 1,
                        error = %err,
                        "transient synthesis failure, retrying"
                    );
                    last_failure = err.to_string();
                    let jitter = rand_jitter_ms(self.retry.transient_jitter_ms);
                    tokio::time::sleep(Duration::from_millis(delay_ms as u64 + jitter)).await;
                    delay_ms *= self.retry.transient_multiplier as f64;
                }
            }
        }

        Err(SpeechError::SynthesisExhausted {
            attempts: self.retry.max_attempts,
            last_failure,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_templates_cycle() {
        assert_eq!(prompt_for_attempt(0, "hola"), "Say: hola");
        assert_eq!(prompt_for_attempt(1, "hola"), "hola");
        assert_eq!(prompt_for_attempt(2, "hola"), "Please read this aloud: hola");
        assert_eq!(prompt_for_attempt(3, "hola"), "Say: hola");
        assert_eq!(prompt_for_attempt(7, "hola"), "hola");
    }

    #[test]
    fn test_classify_transient_markers() {
        let err = SpeechError::Provider("HTTP 500 Internal Server Error: boom".into());
        assert_eq!(classify_error(&err), ErrorClass::Transient);

        let err = SpeechError::Provider("model overloaded, try later".into());
        assert_eq!(classify_error(&err), ErrorClass::Transient);

        let err = SpeechError::Provider("The server had an INTERNAL fault".into());
        assert_eq!(classify_error(&err), ErrorClass::Transient);
    }

    #[test]
    fn test_classify_terminal() {
        let err = SpeechError::Provider("HTTP 400 Bad Request: invalid voice".into());
        assert_eq!(classify_error(&err), ErrorClass::Terminal);

        let err = SpeechError::Decoding("invalid base64".into());
        assert_eq!(classify_error(&err), ErrorClass::Terminal);
    }
}
