use crate::audio::{probe_duration_secs, AudioClip};
use crate::config::PipelineConfig;
use crate::session::SessionRecord;
use crate::store::SessionStore;
use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};
use uuid::Uuid;

/// Extensions the upload path accepts as audio-typed. Typing is name-based only;
/// the payload is never decoded to decide acceptance.
const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "wav", "webm", "ogg", "oga", "m4a", "aac", "flac", "opus", "wma",
];

/// Input handed to the mock pipeline: a just-recorded clip or an uploaded file.
pub enum PipelineInput {
    Clip(AudioClip),
    Upload(PathBuf),
}

/// Simulated transcription backend.
///
/// Fakes progress with a fixed-increment counter (+10 per tick, capped at 90 until
/// the fixed processing delay elapses, then 100) and fabricates a title-templated
/// transcript and summary. Exactly one session record is appended per accepted
/// input; the only rejection is a non-audio-typed upload.
pub struct MockTranscriber {
    config: PipelineConfig,
    media_dir: PathBuf,
    progress: watch::Sender<u8>,
}

impl MockTranscriber {
    pub fn new(config: PipelineConfig, media_dir: impl Into<PathBuf>) -> Self {
        let (progress, _) = watch::channel(0);
        Self {
            config,
            media_dir: media_dir.into(),
            progress,
        }
    }

    /// Observe the fake upload-progress counter (0..=100).
    pub fn progress(&self) -> watch::Receiver<u8> {
        self.progress.subscribe()
    }

    /// Run the simulated transcription and persist the resulting session.
    pub async fn process(
        &self,
        input: PipelineInput,
        title: &str,
        store: &mut SessionStore,
    ) -> Result<SessionRecord> {
        // Input-type validation is the pipeline's only error path
        if let PipelineInput::Upload(path) = &input {
            if !is_audio_file(path) {
                warn!(path = %path.display(), "Rejected non-audio upload");
                anyhow::bail!(
                    "Please select an audio file (.mp3, .wav, .webm, etc.): {}",
                    path.display()
                );
            }
        }

        info!(title, "Transcription started");
        self.progress.send_replace(0);

        // Fixed-increment progress, not linked to bytes processed: +10 per tick,
        // held at 90 until the simulated backend "finishes"
        let mut tick =
            tokio::time::interval(Duration::from_millis(self.config.progress_tick_ms));
        tick.tick().await; // first tick completes immediately

        let done = tokio::time::sleep(Duration::from_millis(self.config.processing_delay_ms));
        tokio::pin!(done);

        loop {
            tokio::select! {
                _ = &mut done => break,
                _ = tick.tick() => {
                    let current = *self.progress.borrow();
                    if current < 90 {
                        self.progress.send_replace(current + 10);
                    }
                }
            }
        }

        let (duration, audio_path) = match input {
            PipelineInput::Clip(clip) => {
                let path = self.save_clip(&clip)?;
                (clip.duration_secs, Some(path))
            }
            PipelineInput::Upload(path) => {
                let duration = probe_duration_secs(&path).ok().flatten().unwrap_or(0);
                let stored = self.import_upload(&path)?;
                (duration, Some(stored))
            }
        };

        let record = SessionRecord {
            id: store.next_session_id()?,
            title: title.to_string(),
            date: Utc::now().to_rfc3339(),
            duration,
            transcript: mock_transcript(title),
            summary: mock_summary(title),
            audio_path: audio_path.map(|p| p.display().to_string()),
        };

        store.append_session(record.clone())?;

        self.progress.send_replace(100);
        info!(id = record.id, title, "Transcription complete");

        Ok(record)
    }

    /// Write a recorded clip into the media directory as WAV.
    fn save_clip(&self, clip: &AudioClip) -> Result<PathBuf> {
        fs::create_dir_all(&self.media_dir).context("Failed to create media directory")?;

        let path = self.media_dir.join(format!("{}.wav", Uuid::new_v4()));

        let spec = hound::WavSpec {
            channels: clip.channels,
            sample_rate: clip.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut writer = hound::WavWriter::create(&path, spec)
            .with_context(|| format!("Failed to create WAV file: {}", path.display()))?;

        for &sample in &clip.samples {
            writer
                .write_sample(sample)
                .context("Failed to write sample to WAV")?;
        }

        writer.finalize().context("Failed to finalize WAV file")?;

        info!(path = %path.display(), "Clip saved to media directory");
        Ok(path)
    }

    /// Copy an accepted upload into the media directory under a fresh name,
    /// the filesystem analog of the original's transient blob URL.
    fn import_upload(&self, source: &Path) -> Result<PathBuf> {
        fs::create_dir_all(&self.media_dir).context("Failed to create media directory")?;

        let ext = source
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin");
        let path = self.media_dir.join(format!("{}.{}", Uuid::new_v4(), ext));

        fs::copy(source, &path)
            .with_context(|| format!("Failed to import upload: {}", source.display()))?;

        info!(path = %path.display(), "Upload imported to media directory");
        Ok(path)
    }
}

/// Extension-based audio typing check for uploads.
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let ext = e.to_ascii_lowercase();
            AUDIO_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

fn mock_transcript(title: &str) -> String {
    format!(
        "This is a mock transcript for \"{title}\". In this lecture, we discussed \
         various important concepts and methodologies. The session covered theoretical \
         foundations as well as practical applications. Students were engaged \
         throughout the discussion, asking pertinent questions and contributing \
         valuable insights. Key topics included advanced problem-solving techniques, \
         critical thinking approaches, and real-world applications of the subject \
         matter. The lecture concluded with a comprehensive review of the main points \
         and assignments for the next session."
    )
}

fn mock_summary(title: &str) -> String {
    format!(
        "Summary of \"{title}\": This lecture provided a comprehensive overview of key \
         concepts with emphasis on practical applications and theoretical \
         understanding. Main topics covered included advanced methodologies and \
         critical thinking approaches relevant to the subject matter."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_extensions_are_accepted_case_insensitively() {
        assert!(is_audio_file(Path::new("lecture.mp3")));
        assert!(is_audio_file(Path::new("lecture.WAV")));
        assert!(is_audio_file(Path::new("notes/deep/lecture.webm")));
    }

    #[test]
    fn non_audio_files_are_rejected() {
        assert!(!is_audio_file(Path::new("syllabus.pdf")));
        assert!(!is_audio_file(Path::new("lecture.txt")));
        assert!(!is_audio_file(Path::new("no_extension")));
    }

    #[test]
    fn canned_text_is_templated_with_the_title() {
        let transcript = mock_transcript("Compilers 101");
        let summary = mock_summary("Compilers 101");
        assert!(transcript.contains("\"Compilers 101\""));
        assert!(summary.starts_with("Summary of \"Compilers 101\""));
    }
}
