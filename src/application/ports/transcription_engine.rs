use async_trait::async_trait;

use crate::domain::{AudioClip, TranscriptionResult};

/// Single-clip speech-to-text inference.
///
/// Implementations receive one clip at most one segment-cap long and return
/// a result whose timestamps are clip-local (starting at 0). Engines are
/// constructed once at startup and shared read-only across requests.
#[async_trait]
pub trait TranscriptionEngine: Send + Sync {
    async fn transcribe(
        &self,
        clip: &AudioClip,
        language: Option<&str>,
    ) -> Result<TranscriptionResult, TranscriptionError>;

    /// Label surfaced in health reports and API responses.
    fn model_id(&self) -> &str;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("audio decoding failed: {0}")]
    DecodingFailed(String),
    #[error("transcription failed: {0}")]
    TranscriptionFailed(String),
    #[error("model loading failed: {0}")]
    ModelLoadFailed(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
}
