use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use crate::application::ports::DeckExportError;
use crate::domain::Flashcard;
use crate::presentation::state::AppState;

use super::ErrorResponse;

#[derive(Deserialize)]
pub struct ExportRequest {
    pub flashcards: Vec<Flashcard>,
    #[serde(default)]
    pub deck_name: Option<String>,
}

#[derive(Serialize)]
pub struct ExportResponse {
    pub success: bool,
    pub filename: String,
    /// Base64-encoded `.apkg` archive for the frontend to download.
    pub data: String,
    pub size: usize,
    pub cards_exported: usize,
}

#[tracing::instrument(skip(state, request))]
pub async fn export_anki_handler(
    State(state): State<AppState>,
    Json(request): Json<ExportRequest>,
) -> impl IntoResponse {
    if request.flashcards.is_empty() {
        tracing::warn!("Export request with no flashcards");
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Flashcards list cannot be empty".to_string(),
            }),
        )
            .into_response();
    }

    let deck_name = request
        .deck_name
        .unwrap_or_else(|| state.settings.export.default_deck_name.clone());

    tracing::info!(
        deck = %deck_name,
        cards = request.flashcards.len(),
        "Exporting flashcards to Anki deck"
    );

    match state.deck_exporter.export(&deck_name, &request.flashcards) {
        Ok(bytes) => (
            StatusCode::OK,
            Json(ExportResponse {
                success: true,
                filename: format!("{}.apkg", deck_name),
                size: bytes.len(),
                data: BASE64.encode(&bytes),
                cards_exported: request.flashcards.len(),
            }),
        )
            .into_response(),
        Err(DeckExportError::EmptyDeck) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Flashcards list cannot be empty".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Anki export failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error during Anki export".to_string(),
                }),
            )
                .into_response()
        }
    }
}
