pub mod audio;
pub mod browser;
pub mod config;
pub mod export;
pub mod pipeline;
pub mod session;
pub mod store;

pub use audio::{
    AudioBackend, AudioBackendConfig, AudioBackendFactory, AudioClip, AudioFile, AudioFrame,
    CaptureSource, Recorder, RecorderPhase,
};
pub use browser::{format_time, Playback, SessionBrowser, TranscriptSync};
pub use config::Config;
pub use pipeline::{MockTranscriber, PipelineInput};
pub use session::{SessionRecord, UserProfile};
pub use store::{KvStore, SessionStore};
