use crate::domain::Flashcard;

/// Packages flashcards into a deck file ready for download.
pub trait DeckExporter: Send + Sync {
    fn export(&self, deck_name: &str, cards: &[Flashcard]) -> Result<Vec<u8>, DeckExportError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DeckExportError {
    #[error("no cards to export")]
    EmptyDeck,
    #[error("deck packaging failed: {0}")]
    PackagingFailed(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
