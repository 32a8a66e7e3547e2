use std::path::Path;

use async_trait::async_trait;

use super::TranscriptionError;
use crate::domain::AudioClip;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioInfo {
    pub duration_secs: f64,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Decode, normalize and slice audio files.
///
/// All derived clips are materialized as fresh temporary files owned by the
/// returned `AudioClip`s; the caller controls their lifetime.
#[async_trait]
pub trait AudioProcessor: Send + Sync {
    /// Measures the file without producing any derived clips.
    async fn probe(&self, path: &Path) -> Result<AudioInfo, TranscriptionError>;

    /// Converts the file to a 16 kHz mono WAV written to a new temporary
    /// location.
    async fn normalize(&self, path: &Path) -> Result<AudioClip, TranscriptionError>;

    /// Splits the file into contiguous sub-clips of at most `cap_secs`
    /// each. Files no longer than the cap come back as a single borrowed
    /// clip over the original path.
    async fn segment(
        &self,
        path: &Path,
        cap_secs: f64,
    ) -> Result<Vec<AudioClip>, TranscriptionError>;
}
