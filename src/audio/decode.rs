//! Base64/PCM16 decoding into playable audio buffers.
//!
//! The provider returns raw PCM as base64 text: signed 16-bit little-endian
//! samples, one channel, 24 kHz. Decoding is pure and deterministic; no
//! resampling and no channel mixing happens anywhere in this crate.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::{SpeechError, SpeechResult};

/// Sample rate of every buffer produced and played by this crate.
pub const SAMPLE_RATE: u32 = 24_000;

/// Channel count of every buffer produced and played by this crate.
pub const CHANNEL_COUNT: u16 = 1;

const PCM_TO_FLOAT_SCALE: f32 = 1.0 / 32768.0;

/// Opaque base64-encoded PCM payload as returned by the provider.
///
/// Consumed immediately by [`decode`]; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedAudio(String);

impl EncodedAudio {
    /// Wrap a provider payload.
    pub fn new(data: impl Into<String>) -> Self {
        Self(data.into())
    }

    /// The raw base64 text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A decoded, normalized audio buffer.
///
/// Samples are floats in [-1.0, 1.0), mono, fixed at [`SAMPLE_RATE`].
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Samples per second
    pub sample_rate: u32,
    /// Number of interleaved channels (always 1 here)
    pub channels: u16,
    /// Normalized amplitudes
    pub samples: Vec<f32>,
}

impl AudioBuffer {
    /// Number of frames (equals sample count for mono audio).
    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Playback duration of the buffer.
    pub fn duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(self.frame_count() as f64 / self.sample_rate as f64)
    }
}

/// Decode a provider payload into a playable buffer.
pub fn decode(payload: &EncodedAudio) -> SpeechResult<AudioBuffer> {
    let bytes = decode_base64(payload.as_str())?;
    Ok(pcm16_to_buffer(&bytes))
}

/// Decode base64 text into raw bytes.
pub fn decode_base64(data: &str) -> SpeechResult<Vec<u8>> {
    BASE64
        .decode(data)
        .map_err(|e| SpeechError::Decoding(format!("invalid base64: {e}")))
}

/// Interpret raw bytes as PCM16 little-endian mono samples at 24 kHz.
///
/// A trailing odd byte is dropped; the frame count is always byte length / 2.
pub fn pcm16_to_buffer(bytes: &[u8]) -> AudioBuffer {
    let samples = bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 * PCM_TO_FLOAT_SCALE)
        .collect();

    AudioBuffer {
        sample_rate: SAMPLE_RATE,
        channels: CHANNEL_COUNT,
        samples,
    }
}
