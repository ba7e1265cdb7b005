use chrono::Utc;
use serde::{Deserialize, Serialize};

/// One stored lecture: metadata plus the mock transcript and summary.
///
/// Records are append-only. They are created when a recording or upload finishes
/// processing and removed only by the bulk logout that clears the whole store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Millisecond timestamp, strictly increasing across records; newest-first order key
    pub id: i64,

    /// User-supplied session name
    pub title: String,

    /// ISO-8601 creation time
    pub date: String,

    /// Recording length in whole seconds (0 when unknown, e.g. undecodable uploads)
    pub duration: u64,

    /// Canned transcript text
    pub transcript: String,

    /// Canned summary text
    pub summary: String,

    /// Path of the audio blob in the media directory. Transient: nothing guarantees
    /// the file outlives the media dir, so readers must tolerate a dangling path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_path: Option<String>,
}

impl SessionRecord {
    /// Canned record used by the dashboard's "add sample session" action.
    pub fn sample(id: i64, sequence: usize) -> Self {
        Self {
            id,
            title: format!("Sample Lecture {}", sequence),
            date: Utc::now().to_rfc3339(),
            // 30-40 minutes, varied by id so repeated samples differ
            duration: 1800 + (id % 600).unsigned_abs(),
            transcript: "This is a sample lecture transcript. In today's session, we \
                explored advanced concepts in computer science, including algorithm \
                optimization, data structure efficiency, and practical applications in \
                real-world scenarios. We discussed the importance of time complexity \
                analysis and how different approaches can significantly impact \
                performance. The session also covered best practices for code \
                implementation and debugging strategies that can help developers write \
                more efficient and maintainable code."
                .to_string(),
            summary: "Sample lecture covering advanced computer science concepts, \
                algorithm optimization, and practical development strategies with focus \
                on performance and maintainability."
                .to_string(),
            audio_path: None,
        }
    }
}

/// Minimal profile kept under the `user` store key; presence gates the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_duration_is_30_to_40_minutes() {
        let record = SessionRecord::sample(1_700_000_000_123, 1);
        assert!(record.duration >= 1800 && record.duration < 2400);
    }

    #[test]
    fn audio_path_is_omitted_when_absent() {
        let record = SessionRecord::sample(1, 1);
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("audio_path"));
    }
}
