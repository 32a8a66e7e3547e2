use std::f32::consts::TAU;
use std::path::Path;

use cardsmith::application::ports::{AudioProcessor, TranscriptionError};
use cardsmith::infrastructure::audio::SymphoniaAudioProcessor;

fn write_test_wav(path: &Path, secs: f64, sample_rate: u32, channels: u16) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();

    let frames = (secs * sample_rate as f64) as usize;
    for i in 0..frames {
        let t = i as f32 / sample_rate as f32;
        let sample = ((t * 440.0 * TAU).sin() * 0.5 * i16::MAX as f32) as i16;
        for _ in 0..channels {
            writer.write_sample(sample).unwrap();
        }
    }
    writer.finalize().unwrap();
}

fn temp_wav(secs: f64, sample_rate: u32, channels: u16) -> tempfile::TempPath {
    let temp = tempfile::Builder::new()
        .suffix(".wav")
        .tempfile()
        .unwrap()
        .into_temp_path();
    write_test_wav(&temp, secs, sample_rate, channels);
    temp
}

#[tokio::test]
async fn given_stereo_wav_when_probing_then_reports_duration_and_source_params() {
    let wav = temp_wav(2.0, 44_100, 2);
    let processor = SymphoniaAudioProcessor::new();

    let info = processor.probe(&wav).await.unwrap();

    assert!((info.duration_secs - 2.0).abs() < 0.05, "duration was {}", info.duration_secs);
    assert_eq!(info.sample_rate, 44_100);
    assert_eq!(info.channels, 2);
}

#[tokio::test]
async fn given_unknown_extension_when_probing_then_returns_unsupported_format() {
    let temp = tempfile::Builder::new()
        .suffix(".xyz")
        .tempfile()
        .unwrap()
        .into_temp_path();
    std::fs::write(&temp, b"not audio").unwrap();

    let processor = SymphoniaAudioProcessor::new();
    let result = processor.probe(&temp).await;

    assert!(matches!(
        result,
        Err(TranscriptionError::UnsupportedFormat(_))
    ));
}

#[tokio::test]
async fn given_corrupted_bytes_when_probing_then_returns_decoding_error() {
    let temp = tempfile::Builder::new()
        .suffix(".mp3")
        .tempfile()
        .unwrap()
        .into_temp_path();
    std::fs::write(&temp, vec![0xFFu8; 256]).unwrap();

    let processor = SymphoniaAudioProcessor::new();
    let result = processor.probe(&temp).await;

    assert!(matches!(result, Err(TranscriptionError::DecodingFailed(_))));
}

#[tokio::test]
async fn given_high_rate_stereo_when_normalizing_then_produces_16khz_mono_wav() {
    let wav = temp_wav(0.5, 44_100, 2);
    let processor = SymphoniaAudioProcessor::new();

    let clip = processor.normalize(&wav).await.unwrap();

    assert!(clip.is_owned());
    assert!(clip.path().exists());
    assert!((clip.duration_secs() - 0.5).abs() < 0.05);

    let reader = hound::WavReader::open(clip.path()).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 16_000);

    let path = clip.path().to_path_buf();
    drop(clip);
    assert!(!path.exists(), "normalized temp file must be removed on drop");
}

#[tokio::test]
async fn given_clip_under_cap_when_segmenting_then_returns_original_unchanged() {
    let wav = temp_wav(1.0, 16_000, 1);
    let processor = SymphoniaAudioProcessor::new();

    let clips = processor.segment(&wav, 5.0).await.unwrap();

    assert_eq!(clips.len(), 1);
    assert_eq!(clips[0].path(), &*wav);
    assert!(!clips[0].is_owned());

    drop(clips);
    assert!(wav.exists(), "borrowed clip must not delete the original");
}

#[tokio::test]
async fn given_clip_over_cap_when_segmenting_then_ceil_count_covering_full_duration() {
    let wav = temp_wav(3.2, 16_000, 1);
    let processor = SymphoniaAudioProcessor::new();

    let clips = processor.segment(&wav, 1.0).await.unwrap();

    // ceil(3.2 / 1.0) = 4 segments, last one carries the remainder
    assert_eq!(clips.len(), 4);

    let total: f64 = clips.iter().map(|c| c.duration_secs()).sum();
    assert!((total - 3.2).abs() < 0.05, "durations summed to {}", total);

    for clip in &clips[..3] {
        assert!((clip.duration_secs() - 1.0).abs() < 1e-6);
    }
    assert!(clips[3].duration_secs() <= 1.0);
    assert!(clips[3].duration_secs() > 0.0);

    for clip in &clips {
        assert!(clip.is_owned());
        assert!(clip.path().exists());
    }

    let paths: Vec<_> = clips.iter().map(|c| c.path().to_path_buf()).collect();
    drop(clips);
    for path in paths {
        assert!(!path.exists(), "segment temp file must be removed on drop");
    }
}
