use anyhow::Result;
use clap::{Parser, Subcommand};
use lectern::{
    export, format_time, AudioBackendConfig, CaptureSource, Config, MockTranscriber,
    PipelineInput, Recorder, SessionBrowser, SessionStore, TranscriptSync, UserProfile,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "lectern",
    about = "Record or upload a lecture, get a simulated transcript, browse past sessions"
)]
struct Cli {
    /// Config file (optional; built-in defaults apply without one)
    #[arg(long, default_value = "config/lectern")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store the user profile the dashboard requires
    Login { name: String, email: String },
    /// Clear the user profile and every stored session
    Logout,
    /// Record a lecture from the (simulated) microphone
    Record {
        title: String,
        /// How long to record before stopping
        #[arg(long, default_value_t = 5)]
        seconds: u64,
        /// Capture from a WAV file instead of the microphone
        #[arg(long)]
        from_file: Option<PathBuf>,
    },
    /// Upload an existing audio file
    Upload { file: PathBuf, title: String },
    /// List stored sessions, newest first
    List,
    /// Show a session's summary and transcript
    Show {
        /// Session id; defaults to the dashboard's selected session
        id: Option<i64>,
        /// Playback position in seconds: prints the live-highlight window
        #[arg(long)]
        at: Option<f64>,
    },
    /// Export a session as a plain text document
    Export {
        id: i64,
        #[arg(long, default_value = "exports")]
        out_dir: PathBuf,
    },
    /// Add a canned sample session to the dashboard
    Sample,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));

    let mut store = SessionStore::open(&cfg.storage.store_path)?;

    match cli.command {
        Command::Login { name, email } => {
            store.set_user(&UserProfile {
                name: name.clone(),
                email,
            })?;
            println!("Welcome back, {}", name);
        }

        Command::Logout => {
            store.logout()?;
            println!("Logged out; all sessions cleared");
        }

        Command::Record {
            title,
            seconds,
            from_file,
        } => {
            let source = match from_file {
                Some(path) => CaptureSource::File(path),
                None => CaptureSource::Microphone,
            };
            let backend_config = AudioBackendConfig {
                sample_rate: cfg.audio.sample_rate,
                channels: cfg.audio.channels,
                buffer_duration_ms: cfg.audio.buffer_duration_ms,
                allow_capture: cfg.audio.allow_capture,
            };

            let recorder = Recorder::new(source, backend_config);

            if let Err(e) = recorder.start().await {
                println!("{}", recorder.status());
                return Err(e);
            }

            println!("{}", recorder.status());
            tokio::time::sleep(std::time::Duration::from_secs(seconds)).await;

            let clip = recorder.stop().await?;
            println!("{} ({} recorded)", recorder.status(), format_time(clip.duration_secs));

            let transcriber = MockTranscriber::new(cfg.pipeline.clone(), &cfg.storage.media_dir);

            let mut progress = transcriber.progress();
            let progress_task = tokio::spawn(async move {
                while progress.changed().await.is_ok() {
                    info!("Upload progress: {}%", *progress.borrow_and_update());
                }
            });

            let record = transcriber
                .process(PipelineInput::Clip(clip), &title, &mut store)
                .await?;

            recorder.mark_complete();
            progress_task.abort();

            println!("{}", recorder.status());
            println!(
                "\"{}\" saved (id {}, {})",
                record.title,
                record.id,
                format_time(record.duration)
            );
        }

        Command::Upload { file, title } => {
            let transcriber = MockTranscriber::new(cfg.pipeline.clone(), &cfg.storage.media_dir);

            let record = transcriber
                .process(PipelineInput::Upload(file), &title, &mut store)
                .await?;

            println!(
                "\"{}\" saved (id {}, {})",
                record.title,
                record.id,
                format_time(record.duration)
            );
        }

        Command::List => {
            let browser = SessionBrowser::load(&mut store)?;
            println!(
                "{}: {} total recordings",
                browser.user().name,
                browser.sessions().len()
            );

            for session in browser.sessions() {
                let marker = match browser.selected() {
                    Some(selected) if selected.id == session.id => "*",
                    _ => " ",
                };
                println!(
                    "{} {}  {}  {}  {}",
                    marker,
                    session.id,
                    format_time(session.duration),
                    session.date,
                    session.title
                );
            }
        }

        Command::Show { id, at } => {
            let mut browser = SessionBrowser::load(&mut store)?;

            let session = match id {
                Some(id) => browser.select(id)?,
                None => browser
                    .selected()
                    .ok_or_else(|| anyhow::anyhow!("No sessions recorded yet"))?,
            }
            .clone();

            println!("{}", session.title);
            println!("{} | {}", session.date, format_time(session.duration));

            println!("\nSummary\n-------\n{}", session.summary);
            println!("\nTranscript\n----------\n{}", session.transcript);

            if let Some(path) = &session.audio_path {
                println!("\nAudio: {}", path);
            }

            if let Some(at) = at {
                let sync = TranscriptSync::new(&session.transcript, session.duration);
                let window = sync.highlight_window(at);
                let words = &sync.words()[window];
                println!(
                    "\nAt {}: {}",
                    format_time(at.max(0.0) as u64),
                    words.join(" ")
                );
            }
        }

        Command::Export { id, out_dir } => {
            let mut browser = SessionBrowser::load(&mut store)?;
            let session = browser.select(id)?.clone();
            let path = export::export_session(&session, out_dir)?;
            println!("Exported to {}", path.display());
        }

        Command::Sample => {
            let id = store.next_session_id()?;
            let sequence = store.sessions()?.len() + 1;
            let sample = lectern::SessionRecord::sample(id, sequence);
            let title = sample.title.clone();
            store.append_session(sample)?;
            println!("\"{}\" added to the dashboard", title);
        }
    }

    Ok(())
}
