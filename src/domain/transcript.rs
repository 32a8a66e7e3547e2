use serde::Serialize;

/// A single word with its timing, local to the parent segment until rebased.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordTimestamp {
    pub word: String,
    pub start: f64,
    pub end: f64,
}

/// A unit of transcribed speech with timing.
///
/// Times are clip-local (starting at 0) as produced by an engine; the
/// coordinator rebases them into recording-global time before merging.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
    pub words: Vec<WordTimestamp>,
}

impl TranscriptSegment {
    pub fn rebase(&mut self, offset: f64) {
        self.start += offset;
        self.end += offset;
        for word in &mut self.words {
            word.start += offset;
            word.end += offset;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TranscriptionResult {
    pub text: String,
    pub language: Option<String>,
    pub segments: Vec<TranscriptSegment>,
    pub duration: f64,
}

impl TranscriptionResult {
    /// Builds a clip-local result: full text is the space-joined segment
    /// texts, duration is the end of the last segment (0 when empty).
    pub fn from_segments(language: Option<String>, segments: Vec<TranscriptSegment>) -> Self {
        let text = segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let duration = segments.last().map(|s| s.end).unwrap_or(0.0);
        Self {
            text,
            language,
            segments,
            duration,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Appends another clip's segments shifted by `offset` seconds.
    ///
    /// Text is joined with exactly one separating space when both sides are
    /// non-empty. `language` and `duration` are left to the caller: the
    /// merge policy for those lives in the coordinator.
    pub fn append_rebased(&mut self, other: TranscriptionResult, offset: f64) {
        if !other.text.is_empty() {
            if !self.text.is_empty() {
                self.text.push(' ');
            }
            self.text.push_str(&other.text);
        }
        for mut segment in other.segments {
            segment.rebase(offset);
            self.segments.push(segment);
        }
    }
}
