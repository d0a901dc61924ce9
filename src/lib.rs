//! Speech synthesis and playback core for AI-generated language lessons.
//!
//! The pipeline: lesson text is sanitized into a bounded prompt, synthesized
//! through the Gemini `generateContent` API (audio modality) with prompt
//! variation and backoff retry, decoded from base64/PCM16 into a normalized
//! 24 kHz mono buffer, and scheduled on one shared output device by a
//! per-request playback state machine.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use lingua_speech::{
//!     LanguageCode, PlaybackController, SpeechSynthesizer, SynthesisConfig,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let synthesizer = Arc::new(SpeechSynthesizer::new(SynthesisConfig::new(
//!         std::env::var("GEMINI_API_KEY").unwrap_or_default(),
//!     )));
//!     let controller = PlaybackController::with_shared_output(synthesizer);
//!
//!     let handle = controller.handle();
//!     handle.play("¿Cuánto cuesta un café?", LanguageCode::Es);
//! }
//! ```

pub mod audio;
pub mod error;
pub mod language;
pub mod lesson;
pub mod sanitize;
pub mod synthesis;

// Re-export commonly used items for convenience
pub use audio::{
    AudioBuffer, AudioOutput, EncodedAudio, PlaybackController, PlaybackHandle, PlaybackStatus,
    RodioOutput, SAMPLE_RATE, decode, shared_output,
};
pub use error::{SpeechError, SpeechResult};
pub use language::{DEFAULT_VOICE, LanguageCode};
pub use lesson::{
    GrammarTip, LessonBackend, LessonContent, LessonGenerator, Phrase, SavedVocabulary,
    VocabularyItem,
};
pub use sanitize::{MAX_TEXT_LEN, sanitize};
pub use synthesis::{
    ErrorClass, GeminiClient, RetryPolicy, SpeechBackend, SpeechSynthesizer, SynthesisConfig,
    classify_error,
};
