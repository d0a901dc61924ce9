//! Integration tests for the playback state machine.
//!
//! A scripted backend and a mock output device drive a handle through its
//! `Idle -> Loading -> Playing -> Idle` lifecycle without touching hardware
//! or the network.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{Semaphore, oneshot};

use lingua_speech::synthesis::messages::GenerateContentResponse;
use lingua_speech::{
    AudioBuffer, AudioOutput, LanguageCode, PlaybackController, PlaybackHandle, PlaybackStatus,
    RetryPolicy, SpeechBackend, SpeechError, SpeechResult, SpeechSynthesizer,
};

/// Base64 of four PCM16 LE bytes: 0x4000 (0.5) and 0xC000 (-0.5).
const TWO_SAMPLE_PAYLOAD: &str = "AEAAwA==";

fn audio_response(data: &str) -> GenerateContentResponse {
    serde_json::from_value(serde_json::json!({
        "candidates": [{"content": {"parts": [{"inlineData": {"data": data}}]}}]
    }))
    .unwrap()
}

/// Backend that waits for a release permit before answering.
struct GatedBackend {
    gate: Semaphore,
    calls: AtomicU32,
    fail: bool,
}

impl GatedBackend {
    fn new(fail: bool) -> Arc<Self> {
        Arc::new(Self {
            gate: Semaphore::new(0),
            calls: AtomicU32::new(0),
            fail,
        })
    }

    /// Allow one pending (or future) call to proceed.
    fn release(&self, calls: usize) {
        self.gate.add_permits(calls);
    }
}

#[async_trait]
impl SpeechBackend for GatedBackend {
    async fn generate_speech(
        &self,
        _prompt: &str,
        _voice: &str,
    ) -> SpeechResult<GenerateContentResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate
            .acquire()
            .await
            .expect("gate semaphore closed")
            .forget();
        if self.fail {
            Err(SpeechError::Provider("HTTP 403 Forbidden: bad key".into()))
        } else {
            Ok(audio_response(TWO_SAMPLE_PAYLOAD))
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum OutputEvent {
    Resumed,
    Scheduled,
}

/// Output device that records calls and completes on demand.
struct MockOutput {
    events: Mutex<Vec<OutputEvent>>,
    buffers: Mutex<Vec<AudioBuffer>>,
    pending: Mutex<Vec<oneshot::Sender<()>>>,
}

impl MockOutput {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(Vec::new()),
            buffers: Mutex::new(Vec::new()),
            pending: Mutex::new(Vec::new()),
        })
    }

    /// Signal device completion for every scheduled buffer.
    fn complete_all(&self) {
        for done in self.pending.lock().drain(..) {
            let _ = done.send(());
        }
    }
}

#[async_trait]
impl AudioOutput for MockOutput {
    async fn resume(&self) -> SpeechResult<()> {
        self.events.lock().push(OutputEvent::Resumed);
        Ok(())
    }

    async fn schedule(&self, buffer: AudioBuffer) -> SpeechResult<oneshot::Receiver<()>> {
        self.events.lock().push(OutputEvent::Scheduled);
        self.buffers.lock().push(buffer);
        let (tx, rx) = oneshot::channel();
        self.pending.lock().push(tx);
        Ok(rx)
    }
}

/// Route playback error logs through the test harness's captured output.
fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn handle_over(backend: Arc<GatedBackend>, output: Arc<MockOutput>) -> PlaybackHandle {
    let synthesizer = Arc::new(SpeechSynthesizer::with_backend(
        backend,
        RetryPolicy::immediate(),
    ));
    PlaybackController::new(synthesizer, output).handle()
}

async fn wait_for_status(handle: &PlaybackHandle, status: PlaybackStatus) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while handle.status() != status {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for {status:?}"));
}

#[tokio::test]
async fn test_full_lifecycle_idle_loading_playing_idle() {
    let backend = GatedBackend::new(false);
    let output = MockOutput::new();
    let handle = handle_over(backend.clone(), output.clone());

    assert_eq!(handle.status(), PlaybackStatus::Idle);

    handle.play("hola", LanguageCode::Es);
    assert_eq!(handle.status(), PlaybackStatus::Loading);

    backend.release(1);
    wait_for_status(&handle, PlaybackStatus::Playing).await;

    output.complete_all();
    wait_for_status(&handle, PlaybackStatus::Idle).await;
}

#[tokio::test]
async fn test_play_while_loading_is_a_no_op() {
    let backend = GatedBackend::new(false);
    let output = MockOutput::new();
    let handle = handle_over(backend.clone(), output.clone());

    handle.play("hola", LanguageCode::Es);
    wait_for_status(&handle, PlaybackStatus::Loading).await;

    // Second request while loading: ignored, not queued.
    handle.play("hola", LanguageCode::Es);
    handle.play("hola", LanguageCode::Es);

    backend.release(1);
    wait_for_status(&handle, PlaybackStatus::Playing).await;
    output.complete_all();
    wait_for_status(&handle, PlaybackStatus::Idle).await;

    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    assert_eq!(output.buffers.lock().len(), 1);
}

#[tokio::test]
async fn test_failure_resets_to_idle_without_scheduling() {
    init_tracing();
    let backend = GatedBackend::new(true);
    let output = MockOutput::new();
    let handle = handle_over(backend.clone(), output.clone());

    handle.play("hola", LanguageCode::Es);
    backend.release(1);
    wait_for_status(&handle, PlaybackStatus::Idle).await;

    // The error was swallowed and nothing reached the device.
    let events = output.events.lock().clone();
    assert!(!events.contains(&OutputEvent::Scheduled));
    // A fresh request is accepted again after the reset.
    handle.play("hola", LanguageCode::Es);
    assert_eq!(handle.status(), PlaybackStatus::Loading);
    backend.release(1);
    wait_for_status(&handle, PlaybackStatus::Idle).await;
    assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_device_resumed_before_scheduling() {
    let backend = GatedBackend::new(false);
    let output = MockOutput::new();
    let handle = handle_over(backend.clone(), output.clone());

    handle.play("hola", LanguageCode::Es);
    backend.release(1);
    wait_for_status(&handle, PlaybackStatus::Playing).await;
    output.complete_all();
    wait_for_status(&handle, PlaybackStatus::Idle).await;

    let events = output.events.lock().clone();
    assert_eq!(events, vec![OutputEvent::Resumed, OutputEvent::Scheduled]);
}

#[tokio::test]
async fn test_scheduled_buffer_is_decoded_pcm() {
    let backend = GatedBackend::new(false);
    let output = MockOutput::new();
    let handle = handle_over(backend.clone(), output.clone());

    handle.play("hola", LanguageCode::Es);
    backend.release(1);
    wait_for_status(&handle, PlaybackStatus::Playing).await;
    output.complete_all();
    wait_for_status(&handle, PlaybackStatus::Idle).await;

    let buffers = output.buffers.lock();
    assert_eq!(buffers.len(), 1);
    assert_eq!(buffers[0].sample_rate, 24_000);
    assert_eq!(buffers[0].channels, 1);
    assert_eq!(buffers[0].samples, vec![0.5, -0.5]);
}

#[tokio::test]
async fn test_independent_handles_do_not_gate_each_other() {
    let backend = GatedBackend::new(false);
    let output = MockOutput::new();
    let synthesizer = Arc::new(SpeechSynthesizer::with_backend(
        backend.clone(),
        RetryPolicy::immediate(),
    ));
    let controller = PlaybackController::new(synthesizer, output.clone());

    let first = controller.handle();
    let second = controller.handle();

    first.play("uno", LanguageCode::Es);
    second.play("dos", LanguageCode::Es);
    assert_eq!(first.status(), PlaybackStatus::Loading);
    assert_eq!(second.status(), PlaybackStatus::Loading);

    backend.release(2);
    wait_for_status(&first, PlaybackStatus::Playing).await;
    wait_for_status(&second, PlaybackStatus::Playing).await;

    output.complete_all();
    wait_for_status(&first, PlaybackStatus::Idle).await;
    wait_for_status(&second, PlaybackStatus::Idle).await;
    assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
}
