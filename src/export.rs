use crate::browser::format_time;
use crate::session::SessionRecord;
use anyhow::{Context, Result};
use chrono::DateTime;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const WRAP_WIDTH: usize = 80;

/// Render a session as a plain text-layout document: title, metadata, summary,
/// transcript. No structural guarantees beyond line wrapping.
pub fn render_session_text(session: &SessionRecord) -> String {
    let mut out = String::new();

    out.push_str(&session.title);
    out.push('\n');
    out.push_str(&"=".repeat(session.title.chars().count().max(1)));
    out.push_str("\n\n");

    out.push_str(&format!("Date: {}\n", format_date(&session.date)));
    out.push_str(&format!("Duration: {}\n\n", format_time(session.duration)));

    out.push_str("Summary\n-------\n");
    for line in wrap(&session.summary, WRAP_WIDTH) {
        out.push_str(&line);
        out.push('\n');
    }
    out.push('\n');

    out.push_str("Transcript\n----------\n");
    for line in wrap(&session.transcript, WRAP_WIDTH) {
        out.push_str(&line);
        out.push('\n');
    }

    out
}

/// Write the rendered document next to the given directory, deriving the file
/// name from the title (whitespace becomes underscores).
pub fn export_session(session: &SessionRecord, out_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create export directory: {}", out_dir.display()))?;

    let file_name: String = session
        .title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    let path = out_dir.join(format!("{}.txt", file_name));

    fs::write(&path, render_session_text(session))
        .with_context(|| format!("Failed to write export: {}", path.display()))?;

    info!(path = %path.display(), "Session exported");
    Ok(path)
}

fn format_date(iso: &str) -> String {
    match DateTime::parse_from_rfc3339(iso) {
        Ok(date) => date.format("%B %e, %Y %H:%M").to_string(),
        Err(_) => iso.to_string(),
    }
}

/// Greedy word wrap; words longer than the width get their own line.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }

    if !line.is_empty() {
        lines.push(line);
    }

    lines
}
