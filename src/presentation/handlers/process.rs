use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::domain::Flashcard;
use crate::infrastructure::observability::sanitize_log_text;
use crate::presentation::state::AppState;

use super::ErrorResponse;

#[derive(Deserialize)]
pub struct ProcessRequest {
    pub text: String,
    #[serde(default)]
    pub num_cards: Option<usize>,
}

#[derive(Serialize)]
pub struct ProcessResponse {
    pub success: bool,
    pub flashcards: Vec<Flashcard>,
    pub count: usize,
    pub model: String,
}

#[tracing::instrument(skip(state, request))]
pub async fn process_text_handler(
    State(state): State<AppState>,
    Json(request): Json<ProcessRequest>,
) -> impl IntoResponse {
    if request.text.trim().is_empty() {
        tracing::warn!("Empty text provided");
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Text cannot be empty".to_string(),
            }),
        )
            .into_response();
    }

    let num_cards = request
        .num_cards
        .unwrap_or(state.settings.cards.default_num_cards);

    tracing::info!(
        chars = request.text.len(),
        num_cards,
        preview = %sanitize_log_text(&request.text),
        "Processing text"
    );

    match state.card_service.generate(&request.text, num_cards).await {
        Ok(generated) if generated.cards.is_empty() => {
            tracing::warn!("No flashcards generated from text");
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Could not generate flashcards from the provided text".to_string(),
                }),
            )
                .into_response()
        }
        Ok(generated) => (
            StatusCode::OK,
            Json(ProcessResponse {
                success: true,
                count: generated.cards.len(),
                flashcards: generated.cards,
                model: generated.model,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Text processing failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error during text processing".to_string(),
                }),
            )
                .into_response()
        }
    }
}
