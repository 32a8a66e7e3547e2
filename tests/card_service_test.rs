use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use cardsmith::application::ports::{CardGenerator, CardGeneratorError};
use cardsmith::application::services::CardService;
use cardsmith::domain::{CardType, Difficulty, Flashcard};

fn card(id: &str) -> Flashcard {
    Flashcard {
        id: id.to_string(),
        card_type: CardType::Qa,
        question: "What is spaced repetition?".to_string(),
        answer: "A review schedule that spaces recalls over growing intervals".to_string(),
        difficulty: Difficulty::Medium,
        source_text: None,
    }
}

struct StubGenerator {
    name: &'static str,
    result: Result<Vec<Flashcard>, CardGeneratorError>,
    calls: AtomicUsize,
}

impl StubGenerator {
    fn ok(name: &'static str, cards: Vec<Flashcard>) -> Self {
        Self {
            name,
            result: Ok(cards),
            calls: AtomicUsize::new(0),
        }
    }

    fn failing(name: &'static str) -> Self {
        Self {
            name,
            result: Err(CardGeneratorError::InvalidResponse("bad json".to_string())),
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CardGenerator for StubGenerator {
    async fn generate(
        &self,
        _text: &str,
        _num_cards: usize,
    ) -> Result<Vec<Flashcard>, CardGeneratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.result {
            Ok(cards) => Ok(cards.clone()),
            Err(CardGeneratorError::InvalidResponse(msg)) => {
                Err(CardGeneratorError::InvalidResponse(msg.clone()))
            }
            Err(CardGeneratorError::ApiRequestFailed(msg)) => {
                Err(CardGeneratorError::ApiRequestFailed(msg.clone()))
            }
            Err(CardGeneratorError::RateLimited) => Err(CardGeneratorError::RateLimited),
        }
    }

    fn model_id(&self) -> &str {
        self.name
    }
}

#[tokio::test]
async fn given_healthy_primary_when_generating_then_fallback_not_invoked() {
    let primary = Arc::new(StubGenerator::ok("mock-primary", vec![card("card_1")]));
    let fallback = Arc::new(StubGenerator::ok("mock-fallback", vec![card("fallback_card_1")]));
    let service = CardService::new(
        Arc::clone(&primary) as Arc<dyn CardGenerator>,
        Arc::clone(&fallback) as Arc<dyn CardGenerator>,
    );

    let generated = service.generate("some text", 5).await.unwrap();

    assert_eq!(generated.cards.len(), 1);
    assert_eq!(generated.cards[0].id, "card_1");
    assert_eq!(generated.model, "mock-primary");
    assert_eq!(primary.call_count(), 1);
    assert_eq!(fallback.call_count(), 0);
}

#[tokio::test]
async fn given_failing_primary_when_generating_then_fallback_produces_cards() {
    let primary = Arc::new(StubGenerator::failing("mock-primary"));
    let fallback = Arc::new(StubGenerator::ok("mock-fallback", vec![card("fallback_card_1")]));
    let service = CardService::new(
        Arc::clone(&primary) as Arc<dyn CardGenerator>,
        Arc::clone(&fallback) as Arc<dyn CardGenerator>,
    );

    let generated = service.generate("some text", 5).await.unwrap();

    assert_eq!(generated.cards.len(), 1);
    assert_eq!(generated.model, "mock-fallback");
    assert_eq!(primary.call_count(), 1);
    assert_eq!(fallback.call_count(), 1);
}

#[tokio::test]
async fn given_both_generators_failing_when_generating_then_error_surfaces() {
    let primary = Arc::new(StubGenerator::failing("mock-primary"));
    let fallback = Arc::new(StubGenerator::failing("mock-fallback"));
    let service = CardService::new(
        Arc::clone(&primary) as Arc<dyn CardGenerator>,
        Arc::clone(&fallback) as Arc<dyn CardGenerator>,
    );

    let result = service.generate("some text", 5).await;

    assert!(result.is_err());
    assert_eq!(fallback.call_count(), 1);
}

#[tokio::test]
async fn given_empty_primary_result_when_generating_then_returned_without_fallback() {
    let primary = Arc::new(StubGenerator::ok("mock-primary", vec![]));
    let fallback = Arc::new(StubGenerator::ok("mock-fallback", vec![card("fallback_card_1")]));
    let service = CardService::new(
        Arc::clone(&primary) as Arc<dyn CardGenerator>,
        Arc::clone(&fallback) as Arc<dyn CardGenerator>,
    );

    let generated = service.generate("some text", 5).await.unwrap();

    assert!(generated.cards.is_empty());
    assert_eq!(fallback.call_count(), 0);
}
