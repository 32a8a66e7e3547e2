use cardsmith::application::ports::{DeckExportError, DeckExporter};
use cardsmith::domain::{CardType, Difficulty, Flashcard};
use cardsmith::infrastructure::export::AnkiExporter;

fn qa_card() -> Flashcard {
    Flashcard {
        id: "card_1".to_string(),
        card_type: CardType::Qa,
        question: "What organelle produces ATP?".to_string(),
        answer: "The mitochondrion".to_string(),
        difficulty: Difficulty::Easy,
        source_text: Some("Mitochondria produce ATP.".to_string()),
    }
}

fn cloze_card() -> Flashcard {
    Flashcard {
        id: "card_2".to_string(),
        card_type: CardType::Cloze,
        question: "Proteins are assembled by ______ in the cytoplasm".to_string(),
        answer: "ribosomes".to_string(),
        difficulty: Difficulty::Medium,
        source_text: None,
    }
}

#[test]
fn given_cards_when_exporting_then_produces_apkg_archive() {
    let exporter = AnkiExporter::new();

    let bytes = exporter
        .export("Biology 101", &[qa_card(), cloze_card()])
        .unwrap();

    // .apkg files are zip archives
    assert!(bytes.len() > 4);
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn given_no_cards_when_exporting_then_returns_empty_deck_error() {
    let exporter = AnkiExporter::new();

    let result = exporter.export("Empty Deck", &[]);

    assert!(matches!(result, Err(DeckExportError::EmptyDeck)));
}

#[test]
fn given_same_deck_name_when_exporting_twice_then_archives_are_produced_both_times() {
    let exporter = AnkiExporter::new();
    let cards = [qa_card()];

    let first = exporter.export("Stable Deck", &cards).unwrap();
    let second = exporter.export("Stable Deck", &cards).unwrap();

    assert_eq!(&first[..2], b"PK");
    assert_eq!(&second[..2], b"PK");
}
