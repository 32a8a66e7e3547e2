use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{AudioProcessor, TranscriptionEngine, TranscriptionError};
use crate::domain::{AudioClip, TranscriptionResult};

/// Recordings no longer than this go to the engine in a single call.
const DIRECT_THRESHOLD_SECS: f64 = 30.0 * 60.0;
/// Per-segment cap applied to longer recordings.
const SEGMENT_CAP_SECS: f64 = 25.0 * 60.0;

/// Coordinates transcription of recordings of arbitrary length.
///
/// Short input is delegated straight to the engine. Long input is sliced
/// into capped sub-clips which are transcribed strictly in order; each
/// sub-clip's timestamps are rebased by the running offset before merging,
/// so later offsets depend on earlier slice lengths.
pub struct TranscriptionService {
    engine: Arc<dyn TranscriptionEngine>,
    audio: Arc<dyn AudioProcessor>,
    direct_threshold_secs: f64,
    segment_cap_secs: f64,
}

impl TranscriptionService {
    pub fn new(engine: Arc<dyn TranscriptionEngine>, audio: Arc<dyn AudioProcessor>) -> Self {
        Self::with_limits(engine, audio, DIRECT_THRESHOLD_SECS, SEGMENT_CAP_SECS)
    }

    pub fn with_limits(
        engine: Arc<dyn TranscriptionEngine>,
        audio: Arc<dyn AudioProcessor>,
        direct_threshold_secs: f64,
        segment_cap_secs: f64,
    ) -> Self {
        Self {
            engine,
            audio,
            direct_threshold_secs,
            segment_cap_secs,
        }
    }

    pub fn model_id(&self) -> &str {
        self.engine.model_id()
    }

    pub async fn transcribe(
        &self,
        path: &Path,
        language: Option<&str>,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        let info = self.audio.probe(path).await?;

        tracing::info!(
            duration_secs = info.duration_secs,
            sample_rate = info.sample_rate,
            channels = info.channels,
            "Measured input audio"
        );

        if info.duration_secs <= self.direct_threshold_secs {
            let clip = AudioClip::borrowed(path, info.duration_secs);
            return self.engine.transcribe(&clip, language).await;
        }

        let clips = self.audio.segment(path, self.segment_cap_secs).await?;
        let total = clips.len();

        tracing::info!(
            segments = total,
            cap_secs = self.segment_cap_secs,
            "Transcribing long audio in segments"
        );

        let mut merged = TranscriptionResult::default();
        let mut time_offset = 0.0_f64;

        // A failed sub-clip aborts the whole run; the current clip and the
        // not-yet-processed ones drop here, removing their temporary files.
        for (index, clip) in clips.into_iter().enumerate() {
            tracing::info!(segment = index + 1, total, "Transcribing segment");

            let clip_result = self.engine.transcribe(&clip, language).await?;

            // Detected language comes from the first sub-clip only.
            if index == 0 {
                merged.language = clip_result.language.clone();
            }

            merged.append_rebased(clip_result, time_offset);

            // Advance by the slice's true length so an empty transcript
            // still moves the offset forward.
            time_offset += clip.duration_secs();
        }

        merged.duration = time_offset;

        tracing::info!(
            duration_secs = merged.duration,
            chars = merged.text.len(),
            "Long audio transcription completed"
        );

        Ok(merged)
    }
}
