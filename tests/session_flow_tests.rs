// End-to-end flow: login, record, process, browse, export, logout.

use anyhow::Result;
use lectern::config::PipelineConfig;
use lectern::{
    export, AudioBackendConfig, CaptureSource, MockTranscriber, PipelineInput, Recorder,
    SessionBrowser, SessionStore, TranscriptSync, UserProfile,
};
use std::time::Duration;
use tempfile::TempDir;

#[tokio::test(start_paused = true)]
async fn record_to_dashboard_round_trip() -> Result<()> {
    let dir = TempDir::new()?;
    let mut store = SessionStore::open(dir.path().join("store.json"))?;

    store.set_user(&UserProfile {
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
    })?;

    // Record two seconds from the simulated microphone
    let recorder = Recorder::new(CaptureSource::Microphone, AudioBackendConfig::default());
    recorder.start().await?;
    tokio::time::sleep(Duration::from_millis(2500)).await;
    let clip = recorder.stop().await?;

    // Run the mock pipeline
    let transcriber = MockTranscriber::new(
        PipelineConfig {
            processing_delay_ms: 3000,
            progress_tick_ms: 200,
        },
        dir.path().join("media"),
    );
    let record = transcriber
        .process(PipelineInput::Clip(clip), "Graph Theory", &mut store)
        .await?;
    recorder.mark_complete();

    // The dashboard opens with the fresh session selected
    let browser = SessionBrowser::load(&mut store)?;
    assert_eq!(browser.sessions().len(), 1);
    let selected = browser.selected().expect("Fresh session should be selected");
    assert_eq!(selected.id, record.id);
    assert_eq!(selected.duration, 2);

    // The live highlight tracks playback over the canned transcript
    let sync = TranscriptSync::new(&selected.transcript, selected.duration);
    let mut last_index = 0;
    for tenths in 0..=30 {
        let index = sync.word_index(tenths as f64 / 10.0);
        assert!(index >= last_index, "Highlight index must never move backwards");
        last_index = index;
    }

    // Export produces the text-layout document
    let path = export::export_session(selected, dir.path().join("exports"))?;
    assert!(path.ends_with("Graph_Theory.txt"));
    let doc = std::fs::read_to_string(&path)?;
    assert!(doc.contains("Graph Theory"));
    assert!(doc.contains("Duration: 00:02"));

    // Logout wipes everything
    store.logout()?;
    assert!(store.sessions()?.is_empty());
    assert!(SessionBrowser::load(&mut store).is_err());

    Ok(())
}
