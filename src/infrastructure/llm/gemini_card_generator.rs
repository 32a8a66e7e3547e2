use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{CardGenerator, CardGeneratorError};
use crate::domain::{CardType, Difficulty, Flashcard};
use crate::infrastructure::text_processing::sanitize_source_text;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Shorter inputs do not carry enough material for meaningful cards.
const MIN_SOURCE_CHARS: usize = 50;

/// Flashcard generation backed by the Gemini `generateContent` API.
pub struct GeminiCardGenerator {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiCardGenerator {
    pub fn new(api_key: String, model: String, base_url: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}

#[async_trait]
impl CardGenerator for GeminiCardGenerator {
    async fn generate(
        &self,
        text: &str,
        num_cards: usize,
    ) -> Result<Vec<Flashcard>, CardGeneratorError> {
        let cleaned = sanitize_source_text(text);

        if cleaned.chars().count() < MIN_SOURCE_CHARS {
            tracing::warn!(
                chars = cleaned.chars().count(),
                "Text too short for meaningful flashcard generation"
            );
            return Ok(Vec::new());
        }

        let request = GenerateContentRequest::for_prompt(build_prompt(&cleaned, num_cards));
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        tracing::debug!(model = %self.model, chars = cleaned.len(), "Requesting flashcards from Gemini");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&request)
            .send()
            .await
            .map_err(|e| CardGeneratorError::ApiRequestFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(CardGeneratorError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CardGeneratorError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| CardGeneratorError::InvalidResponse(e.to_string()))?;

        let raw_text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| {
                CardGeneratorError::InvalidResponse("no candidates in response".to_string())
            })?;

        let payload: CardsPayload = serde_json::from_str(strip_code_fences(&raw_text))
            .map_err(|e| CardGeneratorError::InvalidResponse(format!("flashcard json: {}", e)))?;

        let mut cards = Vec::new();
        for raw_card in payload.flashcards {
            match validate_card(raw_card, cards.len() + 1) {
                Some(card) => cards.push(card),
                None => tracing::warn!("Skipping invalid flashcard from model response"),
            }
        }

        tracing::info!(count = cards.len(), "Parsed flashcards from Gemini response");

        Ok(cards)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

/// Drops the Markdown code fence Gemini often wraps JSON output in.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let without_prefix = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_prefix
        .strip_suffix("```")
        .unwrap_or(without_prefix)
        .trim()
}

fn validate_card(raw: RawCard, index: usize) -> Option<Flashcard> {
    let card_type = match raw.card_type.as_str() {
        "qa" => CardType::Qa,
        "cloze" => CardType::Cloze,
        "definition" => CardType::Definition,
        _ => return None,
    };

    let question = raw.question.trim();
    let answer = raw.answer.trim();
    if question.is_empty() || answer.is_empty() {
        return None;
    }

    let difficulty = match raw.difficulty.as_deref() {
        Some("easy") => Difficulty::Easy,
        Some("hard") => Difficulty::Hard,
        _ => Difficulty::Medium,
    };

    Some(Flashcard {
        id: format!("card_{}", index),
        card_type,
        question: question.to_string(),
        answer: answer.to_string(),
        difficulty,
        source_text: raw.source_text,
    })
}

fn build_prompt(text: &str, num_cards: usize) -> String {
    format!(
        r#"You are an expert educational content creator specializing in creating effective flashcards for spaced repetition learning.

Analyze the following educational content and generate exactly {num_cards} high-quality flashcards.

CONTENT:
{text}

REQUIREMENTS:
1. Generate exactly {num_cards} flashcards
2. Mix different card types:
   - 60% Q&A cards (question -> answer)
   - 25% Cloze deletion cards (fill in the blank)
   - 15% Definition cards (term -> definition)
3. Focus on the most important concepts, facts, and relationships
4. Questions should test understanding, not just memorization
5. Vary difficulty levels (easy, medium, hard)
6. Ensure answers are concise but complete
7. For cloze cards, replace key terms with "______"

OUTPUT FORMAT:
Return ONLY a valid JSON object with this exact structure:

{{
  "flashcards": [
    {{
      "type": "qa",
      "question": "Clear, specific question",
      "answer": "Accurate, concise answer",
      "difficulty": "easy|medium|hard",
      "source_text": "Original text segment this card is based on"
    }}
  ]
}}

Card objects may use type "qa", "cloze" or "definition". IMPORTANT: Return ONLY the JSON object, no additional text or formatting."#
    )
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

impl GenerateContentRequest {
    fn for_prompt(prompt: String) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.7,
                top_p: 0.8,
                top_k: 40,
                max_output_tokens: 4096,
            },
            safety_settings: [
                "HARM_CATEGORY_HARASSMENT",
                "HARM_CATEGORY_HATE_SPEECH",
                "HARM_CATEGORY_SEXUALLY_EXPLICIT",
                "HARM_CATEGORY_DANGEROUS_CONTENT",
            ]
            .into_iter()
            .map(|category| SafetySetting {
                category: category.to_string(),
                threshold: "BLOCK_MEDIUM_AND_ABOVE".to_string(),
            })
            .collect(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

#[derive(Serialize)]
struct SafetySetting {
    category: String,
    threshold: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Deserialize)]
struct CardsPayload {
    flashcards: Vec<RawCard>,
}

#[derive(Deserialize)]
struct RawCard {
    #[serde(rename = "type")]
    card_type: String,
    question: String,
    answer: String,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    source_text: Option<String>,
}
