mod audio_processor;
mod card_generator;
mod deck_exporter;
mod transcription_engine;

pub use audio_processor::{AudioInfo, AudioProcessor};
pub use card_generator::{CardGenerator, CardGeneratorError};
pub use deck_exporter::{DeckExportError, DeckExporter};
pub use transcription_engine::{TranscriptionEngine, TranscriptionError};
