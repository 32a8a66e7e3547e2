mod export;
mod health;
mod process;
mod process_audio;

use serde::Serialize;

pub use export::export_anki_handler;
pub use health::health_handler;
pub use process::process_text_handler;
pub use process_audio::process_audio_handler;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
