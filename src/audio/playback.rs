//! Playback controller: shared output device and per-request state machine.
//!
//! One lazily-initialized output device is shared by every playback request
//! for the lifetime of the process. Each play surface (one button in the UI)
//! owns a [`PlaybackHandle`] whose status walks `Idle -> Loading -> Playing ->
//! Idle`, with any failure short-circuiting straight back to `Idle`. Failures
//! are logged, never surfaced to the caller: a failed preview is low-stakes
//! and the user can simply press again.

use std::sync::Arc;
use std::sync::mpsc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, Sink};
use tokio::sync::oneshot;

use crate::error::{SpeechError, SpeechResult};
use crate::language::LanguageCode;
use crate::synthesis::SpeechSynthesizer;

use super::decode::{AudioBuffer, decode};

// =============================================================================
// Output Device
// =============================================================================

/// An audio output device that can schedule decoded buffers.
///
/// The production implementation is [`RodioOutput`]; tests substitute their
/// own to observe scheduling without real hardware.
#[async_trait]
pub trait AudioOutput: Send + Sync {
    /// Wake the device if it is suspended. Awaited before any scheduling.
    async fn resume(&self) -> SpeechResult<()>;

    /// Hand a buffer to the device for playback.
    ///
    /// The returned receiver fires when the device itself reports that output
    /// finished; completion is never inferred from a timer.
    async fn schedule(&self, buffer: AudioBuffer) -> SpeechResult<oneshot::Receiver<()>>;
}

struct PlayRequest {
    buffer: AudioBuffer,
    done: oneshot::Sender<()>,
}

/// Output device backed by the default system audio device via rodio.
///
/// `OutputStream` is not `Send`, so the device lives on a dedicated thread
/// that is started on first use and kept for the rest of the session. The
/// thread plays one buffer at a time, which is what serializes actual sound
/// output across independent playback handles.
pub struct RodioOutput {
    sender: Mutex<Option<mpsc::Sender<PlayRequest>>>,
}

impl RodioOutput {
    /// Create an output whose device thread starts on first use.
    pub fn new() -> Self {
        Self {
            sender: Mutex::new(None),
        }
    }

    fn ensure_device(&self) -> SpeechResult<mpsc::Sender<PlayRequest>> {
        let mut guard = self.sender.lock();
        if let Some(tx) = guard.as_ref() {
            return Ok(tx.clone());
        }

        let (tx, rx) = mpsc::channel::<PlayRequest>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), String>>();
        std::thread::Builder::new()
            .name("lingua-audio-output".into())
            .spawn(move || run_device_thread(rx, ready_tx))
            .map_err(|e| SpeechError::OutputUnavailable(e.to_string()))?;

        match ready_rx.recv() {
            Ok(Ok(())) => {
                *guard = Some(tx.clone());
                Ok(tx)
            }
            Ok(Err(e)) => Err(SpeechError::OutputUnavailable(e)),
            Err(_) => Err(SpeechError::OutputUnavailable(
                "device thread exited before becoming ready".into(),
            )),
        }
    }
}

impl Default for RodioOutput {
    fn default() -> Self {
        Self::new()
    }
}

fn run_device_thread(requests: mpsc::Receiver<PlayRequest>, ready: mpsc::Sender<Result<(), String>>) {
    let (_stream, handle) = match OutputStream::try_default() {
        Ok(pair) => pair,
        Err(e) => {
            let _ = ready.send(Err(e.to_string()));
            return;
        }
    };
    let _ = ready.send(Ok(()));

    while let Ok(request) = requests.recv() {
        let sink = match Sink::try_new(&handle) {
            Ok(sink) => sink,
            Err(e) => {
                // Dropping `done` unblocks the waiting handle, which resets.
                tracing::error!(error = %e, "failed to open playback sink");
                continue;
            }
        };

        let AudioBuffer {
            sample_rate,
            channels,
            samples,
        } = request.buffer;
        sink.append(SamplesBuffer::new(channels, sample_rate, samples));
        sink.sleep_until_end();
        let _ = request.done.send(());
    }
}

#[async_trait]
impl AudioOutput for RodioOutput {
    async fn resume(&self) -> SpeechResult<()> {
        self.ensure_device().map(|_| ())
    }

    async fn schedule(&self, buffer: AudioBuffer) -> SpeechResult<oneshot::Receiver<()>> {
        let tx = self.ensure_device()?;
        let (done_tx, done_rx) = oneshot::channel();
        tx.send(PlayRequest {
            buffer,
            done: done_tx,
        })
        .map_err(|_| SpeechError::OutputUnavailable("device thread has shut down".into()))?;
        Ok(done_rx)
    }
}

static SHARED_OUTPUT: Lazy<Arc<RodioOutput>> = Lazy::new(|| Arc::new(RodioOutput::new()));

/// Process-wide shared output device.
///
/// Created on first access, never torn down during the session. Exposed
/// behind this accessor rather than as a bare global so callers can also
/// construct a [`PlaybackController`] over a substitute [`AudioOutput`].
pub fn shared_output() -> Arc<dyn AudioOutput> {
    SHARED_OUTPUT.clone()
}

// =============================================================================
// Playback State Machine
// =============================================================================

/// Observable state of one playback handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    /// Nothing in flight; a play request is accepted
    #[default]
    Idle,
    /// Synthesizing and decoding; further play requests are ignored
    Loading,
    /// Buffer handed to the device; waiting for its completion signal
    Playing,
}

/// Factory for playback handles sharing one synthesizer and output device.
pub struct PlaybackController {
    synthesizer: Arc<SpeechSynthesizer>,
    output: Arc<dyn AudioOutput>,
}

impl PlaybackController {
    /// Create a controller over an explicit output device.
    pub fn new(synthesizer: Arc<SpeechSynthesizer>, output: Arc<dyn AudioOutput>) -> Self {
        Self {
            synthesizer,
            output,
        }
    }

    /// Create a controller over the process-wide shared device.
    pub fn with_shared_output(synthesizer: Arc<SpeechSynthesizer>) -> Self {
        Self::new(synthesizer, shared_output())
    }

    /// Create a handle for one play surface.
    pub fn handle(&self) -> PlaybackHandle {
        PlaybackHandle {
            synthesizer: Arc::clone(&self.synthesizer),
            output: Arc::clone(&self.output),
            status: Arc::new(Mutex::new(PlaybackStatus::Idle)),
        }
    }
}

/// Per-request playback state machine.
///
/// Cloning shares the underlying state; clones observe and gate on the same
/// status.
#[derive(Clone)]
pub struct PlaybackHandle {
    synthesizer: Arc<SpeechSynthesizer>,
    output: Arc<dyn AudioOutput>,
    status: Arc<Mutex<PlaybackStatus>>,
}

impl PlaybackHandle {
    /// Current state of this handle.
    pub fn status(&self) -> PlaybackStatus {
        *self.status.lock()
    }

    /// Request playback of `text` in `language`. Fire-and-forget.
    ///
    /// A request while this handle is already `Loading` or `Playing` is a
    /// silent no-op: not queued, not an error. At most one playback is in
    /// flight per handle. Must be called from within a tokio runtime.
    pub fn play(&self, text: impl Into<String>, language: LanguageCode) {
        {
            let mut status = self.status.lock();
            if *status != PlaybackStatus::Idle {
                return;
            }
            *status = PlaybackStatus::Loading;
        }

        let this = self.clone();
        let text = text.into();
        tokio::spawn(async move {
            if let Err(err) = this.run(&text, language).await {
                tracing::error!(error = %err, "playback failed");
            }
            this.set_status(PlaybackStatus::Idle);
        });
    }

    async fn run(&self, text: &str, language: LanguageCode) -> SpeechResult<()> {
        self.output.resume().await?;
        let payload = self.synthesizer.synthesize(text, language).await?;
        let buffer = decode(&payload)?;
        let done = self.output.schedule(buffer).await?;
        self.set_status(PlaybackStatus::Playing);
        // A dropped sender counts as completion; the handle resets either way.
        let _ = done.await;
        Ok(())
    }

    fn set_status(&self, status: PlaybackStatus) {
        *self.status.lock() = status;
    }
}
