//! Audio decoding and playback.

mod decode;
mod playback;

pub use decode::{
    AudioBuffer, CHANNEL_COUNT, EncodedAudio, SAMPLE_RATE, decode, decode_base64, pcm16_to_buffer,
};
pub use playback::{
    AudioOutput, PlaybackController, PlaybackHandle, PlaybackStatus, RodioOutput, shared_output,
};
