use std::sync::Arc;

use crate::application::ports::{AudioProcessor, TranscriptionEngine, TranscriptionError};

use super::candle_whisper_engine::CandleWhisperEngine;
use super::openai_whisper_engine::OpenAiWhisperEngine;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TranscriptionProvider {
    Local,
    OpenAi,
}

/// Builds the configured engine once at startup; the instance is injected
/// into the coordinator and reused for the life of the process.
pub struct TranscriptionEngineFactory;

impl TranscriptionEngineFactory {
    pub fn create(
        provider: TranscriptionProvider,
        model: &str,
        api_key: Option<String>,
        base_url: Option<String>,
        audio: Arc<dyn AudioProcessor>,
    ) -> Result<Arc<dyn TranscriptionEngine>, TranscriptionError> {
        match provider {
            TranscriptionProvider::Local => {
                let engine = CandleWhisperEngine::new(model)?;
                Ok(Arc::new(engine))
            }
            TranscriptionProvider::OpenAi => {
                let key = api_key.ok_or_else(|| {
                    TranscriptionError::ModelLoadFailed(
                        "API key required for OpenAI whisper".to_string(),
                    )
                })?;
                let engine =
                    OpenAiWhisperEngine::new(key, base_url, Some(model.to_string()), audio);
                Ok(Arc::new(engine))
            }
        }
    }
}
