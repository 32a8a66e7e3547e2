use std::sync::Arc;

use crate::application::ports::{CardGenerator, CardGeneratorError};
use crate::domain::Flashcard;

pub struct GeneratedCards {
    pub cards: Vec<Flashcard>,
    /// Which generator produced the cards.
    pub model: String,
}

/// Two-stage generation pipeline: the primary generator returns cards or an
/// error; only an error sends the text through the fallback generator. An
/// empty-but-successful primary result is returned as-is.
pub struct CardService {
    primary: Arc<dyn CardGenerator>,
    fallback: Arc<dyn CardGenerator>,
}

impl CardService {
    pub fn new(primary: Arc<dyn CardGenerator>, fallback: Arc<dyn CardGenerator>) -> Self {
        Self { primary, fallback }
    }

    pub fn model_id(&self) -> &str {
        self.primary.model_id()
    }

    pub async fn generate(
        &self,
        text: &str,
        num_cards: usize,
    ) -> Result<GeneratedCards, CardServiceError> {
        match self.primary.generate(text, num_cards).await {
            Ok(cards) => {
                tracing::info!(
                    count = cards.len(),
                    model = self.primary.model_id(),
                    "Generated flashcards"
                );
                Ok(GeneratedCards {
                    cards,
                    model: self.primary.model_id().to_string(),
                })
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    fallback = self.fallback.model_id(),
                    "Primary card generator failed, invoking fallback"
                );
                let cards = self.fallback.generate(text, num_cards).await?;
                tracing::info!(count = cards.len(), "Generated fallback flashcards");
                Ok(GeneratedCards {
                    cards,
                    model: self.fallback.model_id().to_string(),
                })
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CardServiceError {
    #[error("card generation failed: {0}")]
    Generation(#[from] CardGeneratorError),
}
