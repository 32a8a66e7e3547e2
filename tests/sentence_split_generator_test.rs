use cardsmith::application::ports::CardGenerator;
use cardsmith::domain::CardType;
use cardsmith::infrastructure::llm::SentenceSplitGenerator;

const LECTURE: &str = "Mitochondria convert nutrients into usable chemical energy for the cell. \
    Too short. \
    Ribosomes assemble proteins by translating messenger RNA sequences. \
    The endoplasmic reticulum folds and transports newly made proteins.";

#[tokio::test]
async fn given_prose_when_generating_then_each_long_sentence_becomes_a_qa_card() {
    let generator = SentenceSplitGenerator::new();

    let cards = generator.generate(LECTURE, 10).await.unwrap();

    assert_eq!(cards.len(), 3);
    for (index, card) in cards.iter().enumerate() {
        assert_eq!(card.id, format!("fallback_card_{}", index + 1));
        assert_eq!(card.card_type, CardType::Qa);
        assert!(card.question.starts_with("What does this statement mean:"));
        assert!(!card.answer.is_empty());
        assert_eq!(card.source_text.as_deref(), Some(card.answer.as_str()));
    }
}

#[tokio::test]
async fn given_num_cards_cap_when_generating_then_extra_sentences_dropped() {
    let generator = SentenceSplitGenerator::new();

    let cards = generator.generate(LECTURE, 2).await.unwrap();

    assert_eq!(cards.len(), 2);
}

#[tokio::test]
async fn given_very_long_sentence_when_generating_then_question_is_truncated_preview() {
    let sentence = format!(
        "The quick brown fox repeatedly {} jumps over the lazy dog near the river",
        "and very deliberately ".repeat(10)
    );
    let generator = SentenceSplitGenerator::new();

    let cards = generator.generate(&sentence, 5).await.unwrap();

    assert_eq!(cards.len(), 1);
    assert!(cards[0].question.ends_with("...'"));
    assert!(cards[0].question.len() < sentence.len());
}

#[tokio::test]
async fn given_only_short_fragments_when_generating_then_no_cards() {
    let generator = SentenceSplitGenerator::new();

    let cards = generator.generate("Yes. No. Maybe so.", 5).await.unwrap();

    assert!(cards.is_empty());
}
