use std::path::Path;

use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::application::ports::TranscriptionError;
use crate::domain::{AudioFormat, Flashcard, TranscriptionResult};
use crate::presentation::state::AppState;

use super::ErrorResponse;

const ALLOWED_EXTENSIONS: &str = "mp3, wav, m4a, flac, aac, ogg, wma";

#[derive(Serialize)]
pub struct ProcessAudioResponse {
    pub success: bool,
    pub flashcards: Vec<Flashcard>,
    pub count: usize,
    pub transcription: TranscriptionResult,
    pub model: String,
}

#[tracing::instrument(skip(state, multipart))]
pub async fn process_audio_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut upload: Option<(String, axum::body::Bytes)> = None;
    let mut language: Option<String> = None;
    let mut num_cards: Option<usize> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read multipart");
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Failed to read multipart: {}", e),
                    }),
                )
                    .into_response();
            }
        };

        match field.name() {
            Some("audio") => {
                let filename = field.file_name().unwrap_or("audio").to_string();
                match field.bytes().await {
                    Ok(data) => upload = Some((filename, data)),
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to read audio bytes");
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(ErrorResponse {
                                error: format!("Failed to read file: {}", e),
                            }),
                        )
                            .into_response();
                    }
                }
            }
            Some("language") => {
                language = field.text().await.ok().filter(|s| !s.trim().is_empty());
            }
            Some("num_cards") => {
                num_cards = field.text().await.ok().and_then(|s| s.trim().parse().ok());
            }
            _ => {}
        }
    }

    let Some((filename, data)) = upload else {
        tracing::warn!("Audio request with no file");
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "No audio file provided".to_string(),
            }),
        )
            .into_response();
    };

    let Some(format) = AudioFormat::from_path(Path::new(&filename)) else {
        tracing::warn!(filename = %filename, "Unsupported audio format");
        return (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Json(ErrorResponse {
                error: format!("Unsupported audio format. Allowed: {}", ALLOWED_EXTENSIONS),
            }),
        )
            .into_response();
    };

    tracing::info!(filename = %filename, bytes = data.len(), "Processing audio file");

    // Stage the upload with its original extension so the pipeline can
    // probe it; the temp file is removed when this handler returns.
    let staged = match stage_upload(&data, format).await {
        Ok(staged) => staged,
        Err(e) => {
            tracing::error!(error = %e, "Failed to stage uploaded audio");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error during audio processing".to_string(),
                }),
            )
                .into_response();
        }
    };

    let transcription = match state
        .transcription_service
        .transcribe(&staged, language.as_deref())
        .await
    {
        Ok(result) => result,
        Err(TranscriptionError::UnsupportedFormat(source)) => {
            tracing::warn!(source = %source, "Undecodable audio upload");
            return (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                Json(ErrorResponse {
                    error: format!("Unsupported audio format. Allowed: {}", ALLOWED_EXTENSIONS),
                }),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "Audio transcription failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error during audio processing".to_string(),
                }),
            )
                .into_response();
        }
    };

    if transcription.is_empty() {
        tracing::warn!("No speech detected in audio file");
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "No speech detected in audio file".to_string(),
            }),
        )
            .into_response();
    }

    tracing::info!(
        chars = transcription.text.len(),
        language = transcription.language.as_deref().unwrap_or("unknown"),
        duration_secs = transcription.duration,
        "Transcription completed, generating flashcards"
    );

    let num_cards = num_cards.unwrap_or(state.settings.cards.default_num_cards);

    match state
        .card_service
        .generate(&transcription.text, num_cards)
        .await
    {
        Ok(generated) if generated.cards.is_empty() => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Could not generate flashcards from the transcribed audio".to_string(),
            }),
        )
            .into_response(),
        Ok(generated) => {
            let model = format!(
                "{} + {}",
                generated.model,
                state.transcription_service.model_id()
            );
            (
                StatusCode::OK,
                Json(ProcessAudioResponse {
                    success: true,
                    count: generated.cards.len(),
                    flashcards: generated.cards,
                    transcription,
                    model,
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Card generation from transcript failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error during audio processing".to_string(),
                }),
            )
                .into_response()
        }
    }
}

async fn stage_upload(
    data: &[u8],
    format: AudioFormat,
) -> std::io::Result<tempfile::TempPath> {
    let temp_path = tempfile::Builder::new()
        .prefix("cardsmith-upload-")
        .suffix(&format!(".{}", format.extension()))
        .tempfile()?
        .into_temp_path();

    tokio::fs::write(&temp_path, data).await?;

    Ok(temp_path)
}
