use async_trait::async_trait;

use crate::application::ports::{CardGenerator, CardGeneratorError};
use crate::domain::{CardType, Difficulty, Flashcard};

const MIN_SENTENCE_CHARS: usize = 20;
const MIN_SENTENCE_WORDS: usize = 6;
const QUESTION_PREVIEW_CHARS: usize = 100;

/// Fallback generator used when the model-backed one fails: splits the text
/// on periods and turns each substantial sentence into a plain Q&A card.
pub struct SentenceSplitGenerator;

impl SentenceSplitGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SentenceSplitGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CardGenerator for SentenceSplitGenerator {
    async fn generate(
        &self,
        text: &str,
        num_cards: usize,
    ) -> Result<Vec<Flashcard>, CardGeneratorError> {
        let sentences: Vec<&str> = text
            .split('.')
            .map(str::trim)
            .filter(|s| s.chars().count() > MIN_SENTENCE_CHARS)
            .take(num_cards)
            .collect();

        let mut cards = Vec::new();

        for sentence in sentences {
            if sentence.split_whitespace().count() < MIN_SENTENCE_WORDS {
                continue;
            }

            let question = if sentence.chars().count() > QUESTION_PREVIEW_CHARS {
                let preview: String = sentence.chars().take(QUESTION_PREVIEW_CHARS).collect();
                format!("What does this statement mean: '{}...'", preview)
            } else {
                format!("What does this statement mean: '{}'", sentence)
            };

            cards.push(Flashcard {
                id: format!("fallback_card_{}", cards.len() + 1),
                card_type: CardType::Qa,
                question,
                answer: sentence.to_string(),
                difficulty: Difficulty::Medium,
                source_text: Some(sentence.to_string()),
            });
        }

        tracing::info!(count = cards.len(), "Generated fallback flashcards");

        Ok(cards)
    }

    fn model_id(&self) -> &str {
        "sentence-split"
    }
}
