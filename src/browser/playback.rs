use std::ops::Range;

/// How many words the live highlight spans (current word plus lookahead).
const HIGHLIGHT_RANGE: usize = 5;

/// Format whole seconds as mm:ss.
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Maps a playback position to an approximate word index in the transcript.
///
/// This is a coarse linear estimate, `floor(t * word_count / duration)`, with no
/// real alignment to speech timing. Cosmetic only: the estimate assumes words are
/// spoken at a uniform rate across the whole clip.
pub struct TranscriptSync {
    words: Vec<String>,
    duration_secs: f64,
}

impl TranscriptSync {
    pub fn new(transcript: &str, duration_secs: u64) -> Self {
        let words = transcript
            .split_whitespace()
            .map(|w| w.to_string())
            .collect();

        Self {
            words,
            duration_secs: duration_secs as f64,
        }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Approximate index of the word being spoken at `current_time` seconds.
    ///
    /// Monotonically non-decreasing in `current_time`; clamps to `word_count()`
    /// when playback runs past the nominal duration.
    pub fn word_index(&self, current_time: f64) -> usize {
        if self.words.is_empty() {
            return 0;
        }

        // Zero-duration clips degrade to a 1-second estimate
        let duration = if self.duration_secs > 0.0 {
            self.duration_secs
        } else {
            1.0
        };

        let index = (current_time.max(0.0) * self.words.len() as f64 / duration) as usize;
        index.min(self.words.len())
    }

    /// The highlighted span: the current word plus a few upcoming words.
    pub fn highlight_window(&self, current_time: f64) -> Range<usize> {
        let start = self.word_index(current_time);
        let end = (start + HIGHLIGHT_RANGE).min(self.words.len());
        start..end
    }

    /// Whether `index` is the word currently being spoken.
    pub fn is_current_word(&self, index: usize, current_time: f64) -> bool {
        index == self.word_index(current_time)
    }
}

/// Playback position state for a session's audio. Purely cosmetic bookkeeping;
/// no real audio output.
#[derive(Debug, Clone)]
pub struct Playback {
    current_time: f64,
    duration_secs: f64,
    playing: bool,
    volume: f64,
}

impl Playback {
    pub fn new(duration_secs: u64) -> Self {
        Self {
            current_time: 0.0,
            duration_secs: duration_secs as f64,
            playing: false,
            volume: 1.0,
        }
    }

    pub fn toggle(&mut self) {
        self.playing = !self.playing;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn seek(&mut self, time: f64) {
        self.current_time = time.clamp(0.0, self.duration_secs);
    }

    pub fn set_volume(&mut self, volume: f64) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    /// Advance the position by `dt` seconds while playing; stops at the end.
    pub fn advance(&mut self, dt: f64) {
        if !self.playing {
            return;
        }

        self.current_time += dt.max(0.0);

        if self.current_time >= self.duration_secs {
            self.current_time = self.duration_secs;
            self.playing = false; // ended
        }
    }

    /// Rewind to the start and pause.
    pub fn reset(&mut self) {
        self.current_time = 0.0;
        self.playing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_time_pads_minutes_and_seconds() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(65), "01:05");
        assert_eq!(format_time(3599), "59:59");
    }

    #[test]
    fn word_index_is_a_linear_estimate() {
        // 10 words over 10 seconds: one word per second
        let sync = TranscriptSync::new("a b c d e f g h i j", 10);
        assert_eq!(sync.word_index(0.0), 0);
        assert_eq!(sync.word_index(4.9), 4);
        assert_eq!(sync.word_index(5.0), 5);
        assert_eq!(sync.word_index(9.9), 9);
    }

    #[test]
    fn word_index_clamps_past_the_end() {
        let sync = TranscriptSync::new("a b c", 3);
        assert_eq!(sync.word_index(100.0), 3);
        assert!(sync.highlight_window(100.0).is_empty());
    }

    #[test]
    fn zero_duration_does_not_divide_by_zero() {
        let sync = TranscriptSync::new("a b c", 0);
        assert_eq!(sync.word_index(0.0), 0);
        assert_eq!(sync.word_index(1.0), 3);
    }

    #[test]
    fn empty_transcript_always_indexes_zero() {
        let sync = TranscriptSync::new("", 30);
        assert_eq!(sync.word_index(10.0), 0);
        assert!(sync.highlight_window(10.0).is_empty());
    }

    #[test]
    fn highlight_window_spans_five_words() {
        let sync = TranscriptSync::new("a b c d e f g h i j", 10);
        assert_eq!(sync.highlight_window(0.0), 0..5);
        assert_eq!(sync.highlight_window(8.0), 8..10);
        assert!(sync.is_current_word(8, 8.0));
        assert!(!sync.is_current_word(9, 8.0));
    }

    #[test]
    fn playback_advance_stops_at_the_end() {
        let mut playback = Playback::new(10);
        playback.toggle();
        playback.advance(4.0);
        assert_eq!(playback.current_time(), 4.0);

        playback.advance(20.0);
        assert_eq!(playback.current_time(), 10.0);
        assert!(!playback.is_playing(), "Playback should stop at the end");
    }

    #[test]
    fn seek_and_volume_are_clamped() {
        let mut playback = Playback::new(10);
        playback.seek(-5.0);
        assert_eq!(playback.current_time(), 0.0);
        playback.seek(50.0);
        assert_eq!(playback.current_time(), 10.0);

        playback.set_volume(2.0);
        assert_eq!(playback.volume(), 1.0);
    }

    #[test]
    fn reset_rewinds_and_pauses() {
        let mut playback = Playback::new(10);
        playback.toggle();
        playback.advance(3.0);
        playback.reset();
        assert_eq!(playback.current_time(), 0.0);
        assert!(!playback.is_playing());
    }
}
