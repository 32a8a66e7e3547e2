use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use genanki_rs::{Deck, Field, Model, ModelType, Note, Template};

use crate::application::ports::{DeckExportError, DeckExporter};
use crate::domain::{CardType, Flashcard};

const BASIC_MODEL_ID: i64 = 1_607_392_319;
const CLOZE_MODEL_ID: i64 = 1_607_392_320;

/// The blank marker the generators place in cloze questions.
const BLANK: &str = "______";

/// Packages flashcards as an Anki `.apkg` archive.
///
/// Q&A and definition cards share a basic front/back model; cloze cards are
/// rewritten into Anki's native `{{c1::…}}` deletion syntax.
pub struct AnkiExporter;

impl AnkiExporter {
    pub fn new() -> Self {
        Self
    }

    fn basic_model() -> Model {
        Model::new(
            BASIC_MODEL_ID,
            "Cardsmith Basic",
            vec![Field::new("Question"), Field::new("Answer")],
            vec![
                Template::new("Card 1")
                    .qfmt("{{Question}}")
                    .afmt(r#"{{FrontSide}}<hr id="answer">{{Answer}}"#),
            ],
        )
    }

    fn cloze_model() -> Model {
        Model::new_with_options(
            CLOZE_MODEL_ID,
            "Cardsmith Cloze",
            vec![Field::new("Text"), Field::new("Extra")],
            vec![
                Template::new("Cloze")
                    .qfmt("{{cloze:Text}}")
                    .afmt("{{cloze:Text}}<br>{{Extra}}"),
            ],
            None,
            Some(ModelType::Cloze),
            None,
            None,
            None,
        )
    }
}

impl Default for AnkiExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DeckExporter for AnkiExporter {
    fn export(&self, deck_name: &str, cards: &[Flashcard]) -> Result<Vec<u8>, DeckExportError> {
        if cards.is_empty() {
            return Err(DeckExportError::EmptyDeck);
        }

        let mut deck = Deck::new(deck_id_for(deck_name), deck_name, "Generated by Cardsmith");
        let basic = Self::basic_model();
        let cloze = Self::cloze_model();

        for card in cards {
            let note = match card.card_type {
                CardType::Cloze if card.question.contains(BLANK) => {
                    let text = card.question.replacen(
                        BLANK,
                        &format!("{{{{c1::{}}}}}", card.answer),
                        1,
                    );
                    let extra = card.source_text.as_deref().unwrap_or("");
                    Note::new(cloze.clone(), vec![&text, extra])
                }
                _ => Note::new(basic.clone(), vec![&card.question, &card.answer]),
            }
            .map_err(|e| DeckExportError::PackagingFailed(e.to_string()))?;

            deck.add_note(note);
        }

        let temp_path = tempfile::Builder::new()
            .prefix("cardsmith-deck-")
            .suffix(".apkg")
            .tempfile()?
            .into_temp_path();

        let path_str = temp_path
            .to_str()
            .ok_or_else(|| DeckExportError::PackagingFailed("non-utf8 temp path".to_string()))?;

        deck.write_to_file(path_str)
            .map_err(|e| DeckExportError::PackagingFailed(e.to_string()))?;

        let bytes = std::fs::read(&temp_path)?;

        tracing::info!(
            deck = deck_name,
            cards = cards.len(),
            bytes = bytes.len(),
            "Exported Anki deck"
        );

        // temp_path drops here, removing the packaged archive
        Ok(bytes)
    }
}

/// Stable positive deck id derived from the deck name, so re-exports of the
/// same deck update rather than duplicate it in Anki.
fn deck_id_for(name: &str) -> i64 {
    let mut hasher = DefaultHasher::new();
    name.hash(&mut hasher);
    (hasher.finish() & 0x7FFF_FFFF) as i64
}
