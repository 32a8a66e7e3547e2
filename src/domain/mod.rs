mod audio_clip;
mod audio_format;
mod flashcard;
mod transcript;

pub use audio_clip::AudioClip;
pub use audio_format::AudioFormat;
pub use flashcard::{CardType, Difficulty, Flashcard};
pub use transcript::{TranscriptSegment, TranscriptionResult, WordTimestamp};
