use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;

use crate::application::ports::{
    AudioProcessor, TranscriptionEngine, TranscriptionError,
};
use crate::domain::{
    AudioClip, AudioFormat, TranscriptSegment, TranscriptionResult, WordTimestamp,
};

/// Remote whisper inference over the OpenAI audio transcriptions API.
///
/// Requests `verbose_json` with segment and word granularity, so results
/// carry word-level timing the local engine cannot produce.
pub struct OpenAiWhisperEngine {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    audio: Arc<dyn AudioProcessor>,
}

impl OpenAiWhisperEngine {
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        model: Option<String>,
        audio: Arc<dyn AudioProcessor>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            model: model.unwrap_or_else(|| "whisper-1".to_string()),
            audio,
        }
    }
}

#[async_trait]
impl TranscriptionEngine for OpenAiWhisperEngine {
    async fn transcribe(
        &self,
        clip: &AudioClip,
        language: Option<&str>,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        // The API prefers WAV; convert other containers first. The converted
        // copy lives only for the duration of this call and its file is
        // removed on every exit path.
        let converted = match AudioFormat::from_path(clip.path()) {
            Some(format) if format.is_wav() => None,
            Some(_) => Some(self.audio.normalize(clip.path()).await?),
            None => {
                return Err(TranscriptionError::UnsupportedFormat(
                    clip.path().display().to_string(),
                ));
            }
        };

        let send_path = converted
            .as_ref()
            .map(|c| c.path())
            .unwrap_or_else(|| clip.path());
        let audio_data = tokio::fs::read(send_path).await?;

        let url = format!("{}/audio/transcriptions", self.base_url);

        let file_part = multipart::Part::bytes(audio_data)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("mime: {}", e)))?;

        let mut form = multipart::Form::new()
            .text("model", self.model.clone())
            .text("response_format", "verbose_json")
            .text("timestamp_granularities[]", "segment")
            .text("timestamp_granularities[]", "word")
            .part("file", file_part);

        if let Some(language) = language {
            form = form.text("language", language.to_string());
        }

        tracing::debug!(model = %self.model, "Sending audio to OpenAI whisper API");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(TranscriptionError::ApiRequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let body: VerboseTranscription = response
            .json()
            .await
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("body: {}", e)))?;

        let result = body.into_result();

        tracing::info!(
            segments = result.segments.len(),
            chars = result.text.len(),
            "OpenAI whisper transcription completed"
        );

        Ok(result)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

#[derive(Deserialize)]
struct VerboseTranscription {
    text: String,
    language: Option<String>,
    duration: Option<f64>,
    #[serde(default)]
    segments: Vec<ApiSegment>,
    #[serde(default)]
    words: Vec<ApiWord>,
}

#[derive(Deserialize)]
struct ApiSegment {
    start: f64,
    end: f64,
    text: String,
}

#[derive(Deserialize)]
struct ApiWord {
    word: String,
    start: f64,
    end: f64,
}

impl VerboseTranscription {
    fn into_result(self) -> TranscriptionResult {
        let words: Vec<WordTimestamp> = self
            .words
            .into_iter()
            .map(|w| WordTimestamp {
                word: w.word,
                start: w.start,
                end: w.end,
            })
            .collect();

        let segments: Vec<TranscriptSegment> = self
            .segments
            .into_iter()
            .map(|s| {
                // Words arrive as one flat list; attach each by start time.
                let segment_words = words
                    .iter()
                    .filter(|w| w.start >= s.start && w.start < s.end)
                    .cloned()
                    .collect();
                TranscriptSegment {
                    start: s.start,
                    end: s.end,
                    text: s.text.trim().to_string(),
                    words: segment_words,
                }
            })
            .collect();

        let duration = self
            .duration
            .or_else(|| segments.last().map(|s| s.end))
            .unwrap_or(0.0);

        TranscriptionResult {
            text: self.text.trim().to_string(),
            language: self.language,
            segments,
            duration,
        }
    }
}
