pub mod backend;
pub mod file;
pub mod mock;
pub mod recorder;

pub use backend::{AudioBackend, AudioBackendConfig, AudioBackendFactory, AudioFrame, CaptureSource};
pub use file::{probe_duration_secs, AudioFile};
pub use mock::MockMicrophone;
pub use recorder::{AudioClip, Recorder, RecorderPhase};
