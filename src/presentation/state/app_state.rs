use std::sync::Arc;

use crate::application::ports::DeckExporter;
use crate::application::services::{CardService, TranscriptionService};
use crate::presentation::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub transcription_service: Arc<TranscriptionService>,
    pub card_service: Arc<CardService>,
    pub deck_exporter: Arc<dyn DeckExporter>,
    pub settings: Settings,
}
