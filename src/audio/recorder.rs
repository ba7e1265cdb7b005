use super::backend::{AudioBackendConfig, AudioBackendFactory, CaptureSource};
use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Recorder lifecycle. Transitions only forward: idle → recording → processing →
/// complete, with reset back to idle. No retry or backoff anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderPhase {
    Idle,
    Recording,
    Processing,
    Complete,
}

/// One assembled in-memory recording, handed to the transcription pipeline on stop.
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
    pub channels: u16,
    /// Whole seconds counted by the recording timer
    pub duration_secs: u64,
}

/// Captures audio into an in-memory buffer with a once-per-second count-up timer.
///
/// On start it requests the capture permission from the backend; a denial surfaces
/// as a status string and an error, with no retry. On stop the buffered frames are
/// assembled into a single [`AudioClip`] and the recorder enters Processing.
pub struct Recorder {
    config: AudioBackendConfig,
    source: CaptureSource,

    /// Whether capture is currently active
    is_recording: Arc<AtomicBool>,

    /// Seconds elapsed since the recording started
    elapsed_secs: Arc<AtomicU64>,

    /// Buffered samples from all received frames
    samples: Arc<Mutex<Vec<i16>>>,

    /// Current lifecycle phase
    phase: Arc<std::sync::Mutex<RecorderPhase>>,

    /// User-visible status line
    status: Arc<std::sync::Mutex<String>>,

    /// Handle for the frame-buffering task
    capture_task: Arc<Mutex<Option<JoinHandle<()>>>>,

    /// Handle for the count-up timer task
    timer_task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl Recorder {
    pub fn new(source: CaptureSource, config: AudioBackendConfig) -> Self {
        Self {
            config,
            source,
            is_recording: Arc::new(AtomicBool::new(false)),
            elapsed_secs: Arc::new(AtomicU64::new(0)),
            samples: Arc::new(Mutex::new(Vec::new())),
            phase: Arc::new(std::sync::Mutex::new(RecorderPhase::Idle)),
            status: Arc::new(std::sync::Mutex::new(String::new())),
            capture_task: Arc::new(Mutex::new(None)),
            timer_task: Arc::new(Mutex::new(None)),
        }
    }

    /// Start recording
    pub async fn start(&self) -> Result<()> {
        if self.is_recording.load(Ordering::SeqCst) {
            warn!("Recording already started");
            return Ok(());
        }

        let mut backend =
            AudioBackendFactory::create(self.source.clone(), self.config.clone())
                .context("Failed to create audio backend")?;

        // Permission request happens here; denial is surfaced and not retried
        let mut audio_rx = match backend.start().await {
            Ok(rx) => rx,
            Err(e) => {
                self.set_status("Microphone access denied or not available");
                return Err(e.context("Failed to start audio capture"));
            }
        };

        info!(backend = backend.name(), "Starting recording");

        self.is_recording.store(true, Ordering::SeqCst);
        self.elapsed_secs.store(0, Ordering::SeqCst);
        self.samples.lock().await.clear();
        self.set_phase(RecorderPhase::Recording);
        self.set_status("Recording in progress...");

        // Frame-buffering task: append every received frame to the clip buffer
        let samples = Arc::clone(&self.samples);
        let is_recording = Arc::clone(&self.is_recording);

        let capture_task = tokio::spawn(async move {
            while let Some(frame) = audio_rx.recv().await {
                if !is_recording.load(Ordering::SeqCst) {
                    break;
                }

                let mut buffer = samples.lock().await;
                buffer.extend_from_slice(&frame.samples);
            }

            if let Err(e) = backend.stop().await {
                error!("Failed to stop audio backend: {}", e);
            }
        });

        {
            let mut handle = self.capture_task.lock().await;
            *handle = Some(capture_task);
        }

        // Count-up timer: one increment per second, like the demo's recording clock
        let elapsed = Arc::clone(&self.elapsed_secs);
        let is_recording = Arc::clone(&self.is_recording);

        let timer_task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.tick().await; // first tick completes immediately

            loop {
                interval.tick().await;

                if !is_recording.load(Ordering::SeqCst) {
                    break;
                }

                elapsed.fetch_add(1, Ordering::SeqCst);
            }
        });

        {
            let mut handle = self.timer_task.lock().await;
            *handle = Some(timer_task);
        }

        info!("Recording started");

        Ok(())
    }

    /// Stop recording and assemble the buffered frames into one clip.
    pub async fn stop(&self) -> Result<AudioClip> {
        if !self.is_recording.load(Ordering::SeqCst) {
            anyhow::bail!("No active recording to stop");
        }

        info!("Stopping recording");

        // Signal tasks to finish
        self.is_recording.store(false, Ordering::SeqCst);

        {
            let mut handle = self.capture_task.lock().await;
            if let Some(task) = handle.take() {
                if let Err(e) = task.await {
                    error!("Capture task panicked: {}", e);
                }
            }
        }

        {
            let mut handle = self.timer_task.lock().await;
            if let Some(task) = handle.take() {
                if let Err(e) = task.await {
                    error!("Timer task panicked: {}", e);
                }
            }
        }

        let samples = {
            let mut buffer = self.samples.lock().await;
            std::mem::take(&mut *buffer)
        };

        let duration_secs = self.elapsed_secs.load(Ordering::SeqCst);

        self.set_phase(RecorderPhase::Processing);
        self.set_status("Processing recording...");

        info!(
            duration_secs,
            sample_count = samples.len(),
            "Recording stopped"
        );

        Ok(AudioClip {
            samples,
            sample_rate: self.config.sample_rate,
            channels: self.config.channels,
            duration_secs,
        })
    }

    /// Mark the pipeline hand-off as finished.
    pub fn mark_complete(&self) {
        self.set_phase(RecorderPhase::Complete);
        self.set_status("Transcription complete!");
    }

    /// Abort any in-flight tasks and return to idle. The only cancellation path.
    pub async fn reset(&self) {
        self.is_recording.store(false, Ordering::SeqCst);

        if let Some(task) = self.capture_task.lock().await.take() {
            task.abort();
        }
        if let Some(task) = self.timer_task.lock().await.take() {
            task.abort();
        }

        self.elapsed_secs.store(0, Ordering::SeqCst);
        self.samples.lock().await.clear();
        self.set_phase(RecorderPhase::Idle);
        self.set_status("");
    }

    pub fn is_recording(&self) -> bool {
        self.is_recording.load(Ordering::SeqCst)
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs.load(Ordering::SeqCst)
    }

    pub fn phase(&self) -> RecorderPhase {
        *self.phase.lock().expect("phase lock poisoned")
    }

    pub fn status(&self) -> String {
        self.status.lock().expect("status lock poisoned").clone()
    }

    fn set_phase(&self, phase: RecorderPhase) {
        *self.phase.lock().expect("phase lock poisoned") = phase;
    }

    fn set_status(&self, status: &str) {
        *self.status.lock().expect("status lock poisoned") = status.to_string();
    }
}
