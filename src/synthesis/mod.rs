//! Speech synthesis: configuration, wire types, client, and retry engine.

mod client;
mod config;
mod engine;
pub mod messages;

pub use client::{GeminiClient, SpeechBackend};
pub use config::{DEFAULT_SPEECH_MODEL, RetryPolicy, SynthesisConfig};
pub use engine::{
    ErrorClass, PROMPT_TEMPLATE_COUNT, SpeechSynthesizer, classify_error, prompt_for_attempt,
};
