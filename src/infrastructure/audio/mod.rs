pub mod audio_decoder;
mod candle_whisper_engine;
mod openai_whisper_engine;
mod symphonia_processor;
mod transcription_engine_factory;

pub use candle_whisper_engine::CandleWhisperEngine;
pub use openai_whisper_engine::OpenAiWhisperEngine;
pub use symphonia_processor::SymphoniaAudioProcessor;
pub use transcription_engine_factory::{TranscriptionEngineFactory, TranscriptionProvider};
