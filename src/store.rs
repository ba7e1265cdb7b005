use crate::session::{SessionRecord, UserProfile};
use anyhow::{Context, Result};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const USER_KEY: &str = "user";
pub const SESSIONS_KEY: &str = "lectureSessions";
pub const CURRENT_SESSION_KEY: &str = "currentSession";

/// Key-value persistence shim over a single JSON file.
///
/// A flat string-keyed map, read fully on open and written back synchronously on
/// every mutation. No versioning, no migration.
pub struct KvStore {
    path: PathBuf,
    entries: Map<String, Value>,
}

impl KvStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let entries = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read store file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse store file: {}", path.display()))?
        } else {
            Map::new()
        };

        Ok(Self { path, entries })
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.entries.get(key) {
            Some(value) => {
                let parsed = serde_json::from_value(value.clone())
                    .with_context(|| format!("Failed to decode store key '{}'", key))?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let encoded = serde_json::to_value(value)
            .with_context(|| format!("Failed to encode store key '{}'", key))?;
        self.entries.insert(key.to_string(), encoded);
        self.save()
    }

    pub fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }

    /// Remove every key. Used by logout only.
    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.save()
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create store directory: {}", parent.display()))?;
        }

        let contents = serde_json::to_string_pretty(&self.entries)
            .context("Failed to serialize store")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write store file: {}", self.path.display()))?;

        Ok(())
    }
}

/// Session-level operations over the key-value shim.
pub struct SessionStore {
    kv: KvStore,
}

impl SessionStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let kv = KvStore::open(path)?;
        Ok(Self { kv })
    }

    /// All stored sessions, newest-first.
    pub fn sessions(&self) -> Result<Vec<SessionRecord>> {
        Ok(self.kv.get(SESSIONS_KEY)?.unwrap_or_default())
    }

    /// Append a finished session at the front of the list and mark it as the
    /// session the browser should select next.
    pub fn append_session(&mut self, record: SessionRecord) -> Result<()> {
        let mut sessions = self.sessions()?;
        sessions.insert(0, record.clone());
        self.kv.set(SESSIONS_KEY, &sessions)?;
        self.kv.set(CURRENT_SESSION_KEY, &record)?;

        info!(id = record.id, title = %record.title, "Session saved");
        Ok(())
    }

    /// Take the newly-created session marker, clearing it in the same call.
    pub fn take_current_session(&mut self) -> Result<Option<SessionRecord>> {
        let current: Option<SessionRecord> = self.kv.get(CURRENT_SESSION_KEY)?;
        if current.is_some() {
            self.kv.remove(CURRENT_SESSION_KEY)?;
        }
        Ok(current)
    }

    pub fn user(&self) -> Result<Option<UserProfile>> {
        self.kv.get(USER_KEY)
    }

    pub fn set_user(&mut self, user: &UserProfile) -> Result<()> {
        self.kv.set(USER_KEY, user)
    }

    /// Bulk logout: drops the user profile and every stored session.
    pub fn logout(&mut self) -> Result<()> {
        warn!("Logging out: clearing all store keys");
        self.kv.clear()
    }

    /// Next session id: wall-clock milliseconds, bumped past the newest stored id
    /// so two saves in the same millisecond still order strictly newest-first.
    pub fn next_session_id(&self) -> Result<i64> {
        let now = Utc::now().timestamp_millis();
        let newest = self.sessions()?.first().map(|s| s.id).unwrap_or(i64::MIN);
        Ok(now.max(newest + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_store(dir: &TempDir) -> SessionStore {
        SessionStore::open(dir.path().join("store.json")).unwrap()
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        assert!(store.sessions().unwrap().is_empty());
        assert!(store.user().unwrap().is_none());
    }

    #[test]
    fn append_prepends_and_sets_current() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        store.append_session(SessionRecord::sample(100, 1)).unwrap();
        store.append_session(SessionRecord::sample(200, 2)).unwrap();

        let sessions = store.sessions().unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].id, 200, "Newest session should be first");
        assert_eq!(sessions[1].id, 100);

        let current = store.take_current_session().unwrap().unwrap();
        assert_eq!(current.id, 200);
    }

    #[test]
    fn current_session_is_consumed_on_read() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        store.append_session(SessionRecord::sample(100, 1)).unwrap();
        assert!(store.take_current_session().unwrap().is_some());
        assert!(store.take_current_session().unwrap().is_none());
    }

    #[test]
    fn ids_strictly_increase_even_within_one_millisecond() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        let first = store.next_session_id().unwrap();
        store.append_session(SessionRecord::sample(first, 1)).unwrap();
        let second = store.next_session_id().unwrap();
        assert!(second > first);
    }

    #[test]
    fn logout_clears_every_key() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        store
            .set_user(&UserProfile {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
            })
            .unwrap();
        store.append_session(SessionRecord::sample(100, 1)).unwrap();

        store.logout().unwrap();

        assert!(store.user().unwrap().is_none());
        assert!(store.sessions().unwrap().is_empty());
        assert!(store.take_current_session().unwrap().is_none());
    }

    #[test]
    fn store_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        {
            let mut store = SessionStore::open(&path).unwrap();
            store.append_session(SessionRecord::sample(100, 1)).unwrap();
        }

        let store = SessionStore::open(&path).unwrap();
        assert_eq!(store.sessions().unwrap().len(), 1);
    }
}
