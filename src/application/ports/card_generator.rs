use async_trait::async_trait;

use crate::domain::Flashcard;

/// Turns source text into flashcards.
#[async_trait]
pub trait CardGenerator: Send + Sync {
    async fn generate(
        &self,
        text: &str,
        num_cards: usize,
    ) -> Result<Vec<Flashcard>, CardGeneratorError>;

    /// Label surfaced in health reports and API responses.
    fn model_id(&self) -> &str;
}

#[derive(Debug, thiserror::Error)]
pub enum CardGeneratorError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
