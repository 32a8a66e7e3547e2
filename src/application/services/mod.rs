mod card_service;
mod transcription_service;

pub use card_service::{CardService, CardServiceError, GeneratedCards};
pub use transcription_service::TranscriptionService;
