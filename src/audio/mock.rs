use super::backend::{AudioBackend, AudioBackendConfig, AudioFrame};
use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

/// Simulated microphone backend.
///
/// Emits silence frames at the configured buffer cadence until stopped. Stands in
/// for real device capture: the frames carry correct format metadata and
/// timestamps, but no signal.
pub struct MockMicrophone {
    config: AudioBackendConfig,
    capturing: Arc<AtomicBool>,
    emit_task: Option<JoinHandle<()>>,
}

impl MockMicrophone {
    pub fn new(config: AudioBackendConfig) -> Self {
        Self {
            config,
            capturing: Arc::new(AtomicBool::new(false)),
            emit_task: None,
        }
    }
}

#[async_trait::async_trait]
impl AudioBackend for MockMicrophone {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>> {
        if !self.config.allow_capture {
            anyhow::bail!("Microphone permission denied");
        }

        let (tx, rx) = mpsc::channel(64);

        self.capturing.store(true, Ordering::SeqCst);

        let capturing = Arc::clone(&self.capturing);
        let config = self.config.clone();
        let samples_per_frame = (config.sample_rate as u64 * config.channels as u64
            * config.buffer_duration_ms
            / 1000) as usize;

        self.emit_task = Some(tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_millis(config.buffer_duration_ms));
            interval.tick().await; // first tick completes immediately

            let mut timestamp_ms = 0u64;

            loop {
                interval.tick().await;

                if !capturing.load(Ordering::SeqCst) {
                    break;
                }

                let frame = AudioFrame {
                    samples: vec![0i16; samples_per_frame],
                    sample_rate: config.sample_rate,
                    channels: config.channels,
                    timestamp_ms,
                };
                timestamp_ms += config.buffer_duration_ms;

                if tx.send(frame).await.is_err() {
                    break; // receiver dropped
                }
            }
        }));

        info!(
            sample_rate = self.config.sample_rate,
            channels = self.config.channels,
            "Mock microphone capture started"
        );

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        self.capturing.store(false, Ordering::SeqCst);

        if let Some(task) = self.emit_task.take() {
            task.await.ok();
        }

        info!("Mock microphone capture stopped");
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "mock-microphone"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn emits_frames_with_advancing_timestamps() -> Result<()> {
        let mut backend = MockMicrophone::new(AudioBackendConfig::default());
        let mut rx = backend.start().await?;

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();

        assert_eq!(first.timestamp_ms, 0);
        assert_eq!(second.timestamp_ms, 100);
        assert_eq!(first.samples.len(), 1600); // 100ms at 16kHz mono
        assert_eq!(first.sample_rate, 16000);

        backend.stop().await?;
        assert!(!backend.is_capturing());
        Ok(())
    }

    #[tokio::test]
    async fn denied_permission_fails_to_start() {
        let config = AudioBackendConfig {
            allow_capture: false,
            ..Default::default()
        };
        let mut backend = MockMicrophone::new(config);

        let result = backend.start().await;
        assert!(result.is_err(), "Start should fail without the permission");
        assert!(!backend.is_capturing());
    }
}
