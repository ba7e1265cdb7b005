pub mod playback;

pub use playback::{format_time, Playback, TranscriptSync};

use crate::session::{SessionRecord, UserProfile};
use crate::store::SessionStore;
use anyhow::{Context, Result};
use tracing::info;

/// The dashboard's session list: stored sessions newest-first plus a selection.
///
/// Loading consumes the `currentSession` marker, so a session saved moments ago
/// comes up selected exactly once; afterwards the newest stored session wins.
pub struct SessionBrowser {
    user: UserProfile,
    sessions: Vec<SessionRecord>,
    selected: Option<i64>,
}

impl SessionBrowser {
    /// Load the browser state. Requires a logged-in user.
    pub fn load(store: &mut SessionStore) -> Result<Self> {
        let user = store
            .user()?
            .context("No user logged in; log in before opening the dashboard")?;

        let sessions = store.sessions()?;

        let selected = match store.take_current_session()? {
            Some(current) => Some(current.id),
            None => sessions.first().map(|s| s.id),
        };

        info!(
            user = %user.name,
            session_count = sessions.len(),
            "Dashboard loaded"
        );

        Ok(Self {
            user,
            sessions,
            selected,
        })
    }

    pub fn user(&self) -> &UserProfile {
        &self.user
    }

    /// Stored sessions, newest-first.
    pub fn sessions(&self) -> &[SessionRecord] {
        &self.sessions
    }

    pub fn selected(&self) -> Option<&SessionRecord> {
        let id = self.selected?;
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn select(&mut self, id: i64) -> Result<&SessionRecord> {
        let session = self
            .sessions
            .iter()
            .find(|s| s.id == id)
            .with_context(|| format!("No session with id {}", id))?;
        self.selected = Some(session.id);
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with_user(dir: &TempDir) -> SessionStore {
        let mut store = SessionStore::open(dir.path().join("store.json")).unwrap();
        store
            .set_user(&UserProfile {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
            })
            .unwrap();
        store
    }

    #[test]
    fn load_without_user_fails() {
        let dir = TempDir::new().unwrap();
        let mut store = SessionStore::open(dir.path().join("store.json")).unwrap();
        assert!(SessionBrowser::load(&mut store).is_err());
    }

    #[test]
    fn fresh_session_is_selected_once_then_newest_wins() {
        let dir = TempDir::new().unwrap();
        let mut store = store_with_user(&dir);

        store.append_session(SessionRecord::sample(100, 1)).unwrap();
        store.append_session(SessionRecord::sample(200, 2)).unwrap();

        // First load consumes the currentSession marker (the id-200 record)
        let browser = SessionBrowser::load(&mut store).unwrap();
        assert_eq!(browser.selected().unwrap().id, 200);

        // Marker is gone; selection falls back to the newest stored session
        let browser = SessionBrowser::load(&mut store).unwrap();
        assert_eq!(browser.selected().unwrap().id, 200);
        assert_eq!(browser.sessions().len(), 2);
    }

    #[test]
    fn select_unknown_id_fails() {
        let dir = TempDir::new().unwrap();
        let mut store = store_with_user(&dir);
        store.append_session(SessionRecord::sample(100, 1)).unwrap();

        let mut browser = SessionBrowser::load(&mut store).unwrap();
        assert!(browser.select(42).is_err());
        assert!(browser.select(100).is_ok());
    }
}
