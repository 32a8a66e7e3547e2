use std::path::Path;

use async_trait::async_trait;

use crate::application::ports::{AudioInfo, AudioProcessor, TranscriptionError};
use crate::domain::AudioClip;

use super::audio_decoder::{TARGET_SAMPLE_RATE, decode_file};

/// Decodes, normalizes and slices audio files via symphonia.
///
/// Every derived clip is written as a 16 kHz mono PCM WAV to a fresh
/// temporary file owned by the returned `AudioClip`.
pub struct SymphoniaAudioProcessor;

impl SymphoniaAudioProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SymphoniaAudioProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioProcessor for SymphoniaAudioProcessor {
    async fn probe(&self, path: &Path) -> Result<AudioInfo, TranscriptionError> {
        let decoded = decode_file(path)?;
        Ok(AudioInfo {
            duration_secs: decoded.duration_secs(),
            sample_rate: decoded.source_rate,
            channels: decoded.source_channels,
        })
    }

    async fn normalize(&self, path: &Path) -> Result<AudioClip, TranscriptionError> {
        let decoded = decode_file(path)?;

        tracing::debug!(
            source = %path.display(),
            duration_secs = decoded.duration_secs(),
            "Converting audio to 16kHz mono WAV"
        );

        write_temp_wav(&decoded.samples)
    }

    async fn segment(
        &self,
        path: &Path,
        cap_secs: f64,
    ) -> Result<Vec<AudioClip>, TranscriptionError> {
        let decoded = decode_file(path)?;
        let duration = decoded.duration_secs();

        if duration <= cap_secs {
            return Ok(vec![AudioClip::borrowed(path, duration)]);
        }

        let cap_samples = ((cap_secs * TARGET_SAMPLE_RATE as f64) as usize).max(1);
        let mut clips = Vec::with_capacity(decoded.samples.len().div_ceil(cap_samples));

        // Contiguous, non-overlapping slices; the last one carries the
        // remainder. If a later write fails, the clips built so far drop
        // and remove their files.
        for chunk in decoded.samples.chunks(cap_samples) {
            clips.push(write_temp_wav(chunk)?);
        }

        tracing::info!(
            source = %path.display(),
            segments = clips.len(),
            cap_secs,
            duration_secs = duration,
            "Split long audio into segments"
        );

        Ok(clips)
    }
}

/// Materializes 16 kHz mono samples as a temporary WAV file owned by the
/// returned clip.
fn write_temp_wav(samples: &[f32]) -> Result<AudioClip, TranscriptionError> {
    let temp_path = tempfile::Builder::new()
        .prefix("cardsmith-audio-")
        .suffix(".wav")
        .tempfile()?
        .into_temp_path();

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: TARGET_SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(&temp_path, spec).map_err(wav_error)?;
    for &sample in samples {
        let quantized = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer.write_sample(quantized).map_err(wav_error)?;
    }
    writer.finalize().map_err(wav_error)?;

    let duration_secs = samples.len() as f64 / TARGET_SAMPLE_RATE as f64;

    // Detach from tempfile's own cleanup; the AudioClip owns deletion now.
    let path = temp_path.keep().map_err(|e| TranscriptionError::Io(e.error))?;

    Ok(AudioClip::owned_temp(path, duration_secs))
}

fn wav_error(e: hound::Error) -> TranscriptionError {
    match e {
        hound::Error::IoError(io) => TranscriptionError::Io(io),
        other => TranscriptionError::DecodingFailed(format!("wav write: {}", other)),
    }
}
