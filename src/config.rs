use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub audio: AudioConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// JSON key-value store file (sessions, user profile, current-session marker)
    pub store_path: String,
    /// Directory for recorded/uploaded audio blobs; contents are not durable
    pub media_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub channels: u16,
    /// Capture buffer size in milliseconds (one frame per buffer)
    pub buffer_duration_ms: u64,
    /// Whether the simulated microphone grants the capture permission
    pub allow_capture: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Fixed simulated-backend delay before the transcript is "ready"
    pub processing_delay_ms: u64,
    /// Interval between fake upload-progress increments
    pub progress_tick_ms: u64,
}

impl Config {
    /// Load configuration from an optional file layered over built-in defaults.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("service.name", "lectern")?
            .set_default("storage.store_path", "data/lectern-store.json")?
            .set_default("storage.media_dir", "data/media")?
            .set_default("audio.sample_rate", 16000)?
            .set_default("audio.channels", 1)?
            .set_default("audio.buffer_duration_ms", 100)?
            .set_default("audio.allow_capture", true)?
            .set_default("pipeline.processing_delay_ms", 3000)?
            .set_default("pipeline.progress_tick_ms", 200)?
            .add_source(config::File::with_name(path).required(false))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_a_config_file() {
        let cfg = Config::load("does/not/exist").unwrap();
        assert_eq!(cfg.service.name, "lectern");
        assert_eq!(cfg.audio.sample_rate, 16000);
        assert_eq!(cfg.audio.channels, 1);
        assert!(cfg.audio.allow_capture);
        assert_eq!(cfg.pipeline.processing_delay_ms, 3000);
        assert_eq!(cfg.pipeline.progress_tick_ms, 200);
    }
}
