use anyhow::Result;
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Audio sample data (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Timestamp in milliseconds since capture started
    pub timestamp_ms: u64,
}

/// Configuration for audio backends
#[derive(Debug, Clone)]
pub struct AudioBackendConfig {
    /// Capture sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels (1 = mono, 2 = stereo)
    pub channels: u16,
    /// Buffer size in milliseconds (one frame per buffer)
    pub buffer_duration_ms: u64,
    /// Whether the capture permission is granted. The simulated microphone refuses
    /// to start when this is false, standing in for a denied permission prompt.
    pub allow_capture: bool,
}

impl Default for AudioBackendConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            channels: 1,
            buffer_duration_ms: 100,
            allow_capture: true,
        }
    }
}

/// Audio capture backend trait
///
/// Implementations:
/// - Mock: simulated microphone emitting silence frames on a fixed cadence
/// - File: replays a WAV file (for batch processing and tests)
#[async_trait::async_trait]
pub trait AudioBackend: Send + Sync {
    /// Start capturing audio
    ///
    /// Returns a channel receiver that will receive audio frames. Fails when the
    /// capture permission is not granted.
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>>;

    /// Stop capturing audio
    async fn stop(&mut self) -> Result<()>;

    /// Check if backend is currently capturing
    fn is_capturing(&self) -> bool;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Audio capture source
#[derive(Debug, Clone)]
pub enum CaptureSource {
    /// Simulated microphone input
    Microphone,
    /// Replay an audio file
    File(PathBuf),
}

/// Audio backend factory
pub struct AudioBackendFactory;

impl AudioBackendFactory {
    pub fn create(source: CaptureSource, config: AudioBackendConfig) -> Result<Box<dyn AudioBackend>> {
        match source {
            CaptureSource::Microphone => {
                let backend = super::mock::MockMicrophone::new(config);
                Ok(Box::new(backend))
            }
            CaptureSource::File(path) => {
                let backend = super::file::FileBackend::new(path, config);
                Ok(Box::new(backend))
            }
        }
    }
}
