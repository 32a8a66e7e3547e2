use std::sync::LazyLock;

use async_trait::async_trait;
use candle_core::{Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::whisper::{self as m, Config};
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};
use regex::Regex;
use tokenizers::Tokenizer;
use tokio::sync::Mutex;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};
use crate::domain::{AudioClip, TranscriptSegment, TranscriptionResult};

use super::audio_decoder::{TARGET_SAMPLE_RATE, decode_file};

const MAX_DECODE_TOKENS: usize = 224;
/// Whisper timestamp tokens tick in 20 ms steps.
const TIMESTAMP_STEP_SECS: f64 = 0.02;

static LANGUAGE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<\|([a-z]{2,3})\|>$").unwrap());

/// Local whisper inference on CPU via candle.
///
/// Greedy decoding with timestamp tokens enabled, so each 30 s window
/// yields timed transcript segments. Word-level alignment is not produced;
/// segment word lists stay empty.
pub struct CandleWhisperEngine {
    model: Mutex<m::model::Whisper>,
    tokenizer: Tokenizer,
    config: Config,
    device: Device,
    mel_filters: Vec<f32>,
    /// `(language code, token id)` pairs; empty for English-only models.
    language_tokens: Vec<(String, u32)>,
    sot_token: u32,
    transcribe_token: u32,
    eot_token: u32,
    /// First timestamp token; everything at or above encodes a time.
    timestamp_begin: u32,
    model_id: String,
}

impl CandleWhisperEngine {
    pub fn new(model_id: &str) -> Result<Self, TranscriptionError> {
        let device = Device::Cpu;

        tracing::info!(
            device = ?device,
            model = model_id,
            "Initializing candle whisper transcription engine"
        );

        let api = Api::new().map_err(|e| TranscriptionError::ModelLoadFailed(e.to_string()))?;
        let repo = api.repo(Repo::new(model_id.to_string(), RepoType::Model));

        let config_path = repo
            .get("config.json")
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("config.json: {}", e)))?;
        let tokenizer_path = repo
            .get("tokenizer.json")
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("tokenizer.json: {}", e)))?;
        let weights_path = repo.get("model.safetensors").map_err(|e| {
            TranscriptionError::ModelLoadFailed(format!("model.safetensors: {}", e))
        })?;

        let mel_repo = api.repo(Repo::new(
            "FL33TW00D-HF/whisper-base".to_string(),
            RepoType::Model,
        ));
        let mel_bytes_path = mel_repo
            .get("melfilters.bytes")
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("melfilters.bytes: {}", e)))?;

        let config_contents = std::fs::read_to_string(&config_path)
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("read config: {}", e)))?;
        let config: Config = serde_json::from_str(&config_contents)
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("parse config: {}", e)))?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("tokenizer: {}", e)))?;

        let mel_bytes = std::fs::read(&mel_bytes_path)
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("mel filters: {}", e)))?;
        let mel_filters = read_mel_filters(&mel_bytes, &config)?;

        // SAFETY: safetensors files are memory-mapped read-only
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], m::DTYPE, &device)
                .map_err(|e| TranscriptionError::ModelLoadFailed(format!("weights: {}", e)))?
        };

        let model = m::model::Whisper::load(&vb, config.clone())
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("model: {}", e)))?;

        let sot_token = token_id(&tokenizer, m::SOT_TOKEN)?;
        let transcribe_token = token_id(&tokenizer, m::TRANSCRIBE_TOKEN)?;
        let eot_token = token_id(&tokenizer, m::EOT_TOKEN)?;
        let no_timestamps_token = token_id(&tokenizer, m::NO_TIMESTAMPS_TOKEN)?;
        let language_tokens = collect_language_tokens(&tokenizer);

        tracing::info!(
            languages = language_tokens.len(),
            "Candle whisper engine loaded successfully"
        );

        Ok(Self {
            model: Mutex::new(model),
            tokenizer,
            config,
            device,
            mel_filters,
            language_tokens,
            sot_token,
            transcribe_token,
            eot_token,
            timestamp_begin: no_timestamps_token + 1,
            model_id: model_id.to_string(),
        })
    }

    fn language_token_for(&self, code: &str) -> Option<u32> {
        self.language_tokens
            .iter()
            .find(|(lang, _)| lang == code)
            .map(|(_, id)| *id)
    }

    /// Picks the most probable language token from the first decoder step.
    fn detect_language(
        &self,
        model: &mut m::model::Whisper,
        mel: &Tensor,
    ) -> Option<(String, u32)> {
        if self.language_tokens.is_empty() {
            return None;
        }

        let audio_features = model.encoder.forward(mel, true).ok()?;
        let tokens = Tensor::new(&[self.sot_token], &self.device)
            .ok()?
            .unsqueeze(0)
            .ok()?;
        let decoder_output = model.decoder.forward(&tokens, &audio_features, true).ok()?;
        let logits = model
            .decoder
            .final_linear(&decoder_output.squeeze(0).ok()?)
            .ok()?;
        let last = logits.get(0).ok()?;
        let scores = last.to_vec1::<f32>().ok()?;
        model.reset_kv_cache();

        self.language_tokens
            .iter()
            .filter(|(_, id)| (*id as usize) < scores.len())
            .max_by(|a, b| scores[a.1 as usize].total_cmp(&scores[b.1 as usize]))
            .map(|(code, id)| (code.clone(), *id))
    }

    /// Greedy decode of one 30 s window; returns only the generated ids.
    fn decode_window(
        &self,
        model: &mut m::model::Whisper,
        audio_features: &Tensor,
        language_token: Option<u32>,
    ) -> Result<Vec<u32>, TranscriptionError> {
        let mut tokens = vec![self.sot_token];
        if let Some(language) = language_token {
            tokens.push(language);
        }
        tokens.push(self.transcribe_token);
        let prefix_len = tokens.len();

        for _ in 0..MAX_DECODE_TOKENS {
            let token_tensor = Tensor::new(tokens.as_slice(), &self.device)
                .map_err(inference_error)?
                .unsqueeze(0)
                .map_err(inference_error)?;

            let decoder_output = model
                .decoder
                .forward(&token_tensor, audio_features, tokens.len() == prefix_len)
                .map_err(|e| TranscriptionError::TranscriptionFailed(format!("decoder: {}", e)))?;

            let logits = model
                .decoder
                .final_linear(&decoder_output.squeeze(0).map_err(inference_error)?)
                .map_err(|e| TranscriptionError::TranscriptionFailed(format!("linear: {}", e)))?;

            let seq_len = logits.dim(0).map_err(inference_error)?;
            let last_logits = logits.get(seq_len - 1).map_err(inference_error)?;

            let next_token = last_logits
                .argmax(0)
                .map_err(inference_error)?
                .to_scalar::<u32>()
                .map_err(inference_error)?;

            if next_token == self.eot_token {
                break;
            }

            tokens.push(next_token);
        }

        Ok(tokens.split_off(prefix_len))
    }

    /// Turns a generated token stream into timed segments.
    ///
    /// Every timestamp token closes any pending text span and opens the
    /// next one; trailing text without a closing timestamp is clamped to
    /// the window length.
    fn parse_segments(
        &self,
        token_ids: &[u32],
        window_offset: f64,
        window_secs: f64,
    ) -> Result<Vec<TranscriptSegment>, TranscriptionError> {
        let mut segments = Vec::new();
        let mut span_start: Option<f64> = None;
        let mut last_time = 0.0_f64;
        let mut text_ids: Vec<u32> = Vec::new();

        for &id in token_ids {
            if id >= self.timestamp_begin {
                let time = (id - self.timestamp_begin) as f64 * TIMESTAMP_STEP_SECS;
                if !text_ids.is_empty() {
                    let start = span_start.unwrap_or(last_time);
                    self.push_span(&mut segments, window_offset, start, time.max(start), &text_ids)?;
                    text_ids.clear();
                }
                span_start = Some(time);
                last_time = time;
            } else {
                text_ids.push(id);
            }
        }

        if !text_ids.is_empty() {
            let start = span_start.unwrap_or(last_time);
            self.push_span(
                &mut segments,
                window_offset,
                start,
                window_secs.max(start),
                &text_ids,
            )?;
        }

        Ok(segments)
    }

    fn push_span(
        &self,
        segments: &mut Vec<TranscriptSegment>,
        window_offset: f64,
        start: f64,
        end: f64,
        text_ids: &[u32],
    ) -> Result<(), TranscriptionError> {
        let text = self
            .tokenizer
            .decode(text_ids, true)
            .map_err(|e| TranscriptionError::TranscriptionFailed(format!("detokenize: {}", e)))?;
        let text = text.trim().to_string();

        if !text.is_empty() {
            segments.push(TranscriptSegment {
                start: window_offset + start,
                end: window_offset + end,
                text,
                words: Vec::new(),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl TranscriptionEngine for CandleWhisperEngine {
    async fn transcribe(
        &self,
        clip: &AudioClip,
        language: Option<&str>,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        let decoded = decode_file(clip.path())?;
        let pcm = decoded.samples;

        let window_samples = m::N_SAMPLES;
        let window_secs = window_samples as f64 / TARGET_SAMPLE_RATE as f64;

        let mut windows = Vec::new();
        for (index, chunk) in pcm.chunks(window_samples).enumerate() {
            let samples = if chunk.len() < window_samples {
                let mut padded = chunk.to_vec();
                padded.resize(window_samples, 0.0);
                padded
            } else {
                chunk.to_vec()
            };

            let mel_data = m::audio::pcm_to_mel(&self.config, &samples, &self.mel_filters);
            let n_mel = self.config.num_mel_bins;
            let n_frames = mel_data.len() / n_mel;

            let mel = Tensor::from_vec(mel_data, (1, n_mel, n_frames), &self.device)
                .map_err(|e| TranscriptionError::TranscriptionFailed(format!("mel: {}", e)))?;

            let audible_secs = chunk.len() as f64 / TARGET_SAMPLE_RATE as f64;
            windows.push((index, audible_secs, mel));
        }

        let mut model = self.model.lock().await;

        let (detected_language, language_token) = match language {
            Some(hint) => {
                let token = self.language_token_for(hint);
                if token.is_none() && !self.language_tokens.is_empty() {
                    tracing::warn!(language = hint, "Unknown language hint, auto-detecting");
                }
                (Some(hint.to_string()), token)
            }
            None => match windows
                .first()
                .and_then(|(_, _, mel)| self.detect_language(&mut model, mel))
            {
                Some((code, token)) => (Some(code), Some(token)),
                None => (None, None),
            },
        };

        let mut segments: Vec<TranscriptSegment> = Vec::new();

        for (index, audible_secs, mel) in &windows {
            tracing::debug!(window = index, "Transcribing audio window");

            let window_offset = *index as f64 * window_secs;
            let audio_features = model
                .encoder
                .forward(mel, true)
                .map_err(|e| TranscriptionError::TranscriptionFailed(format!("encoder: {}", e)))?;

            let token_ids = self.decode_window(&mut model, &audio_features, language_token)?;
            let mut parsed = self.parse_segments(&token_ids, window_offset, *audible_secs)?;
            segments.append(&mut parsed);

            model.reset_kv_cache();
        }

        drop(model);

        let result = TranscriptionResult::from_segments(detected_language, segments);

        tracing::info!(
            segments = result.segments.len(),
            chars = result.text.len(),
            language = result.language.as_deref().unwrap_or("unknown"),
            "Audio transcription completed"
        );

        Ok(result)
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

fn inference_error(e: candle_core::Error) -> TranscriptionError {
    TranscriptionError::TranscriptionFailed(e.to_string())
}

fn token_id(tokenizer: &Tokenizer, token: &str) -> Result<u32, TranscriptionError> {
    tokenizer.token_to_id(token).ok_or_else(|| {
        TranscriptionError::ModelLoadFailed(format!("token not found: {}", token))
    })
}

fn collect_language_tokens(tokenizer: &Tokenizer) -> Vec<(String, u32)> {
    let mut tokens: Vec<(String, u32)> = tokenizer
        .get_vocab(true)
        .into_iter()
        .filter_map(|(token, id)| {
            LANGUAGE_TOKEN
                .captures(&token)
                .map(|captures| (captures[1].to_string(), id))
        })
        .collect();
    tokens.sort_by_key(|(_, id)| *id);
    tokens
}

fn read_mel_filters(bytes: &[u8], config: &Config) -> Result<Vec<f32>, TranscriptionError> {
    let expected_len = config.num_mel_bins * (m::N_FFT / 2 + 1);
    if bytes.len() < expected_len * 4 {
        return Err(TranscriptionError::ModelLoadFailed(format!(
            "mel filters file too small: {} bytes, expected at least {}",
            bytes.len(),
            expected_len * 4
        )));
    }

    let filters: Vec<f32> = bytes
        .chunks_exact(4)
        .take(expected_len)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();

    Ok(filters)
}
