use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub service: String,
    pub status: String,
    pub components: ComponentsHealth,
}

#[derive(Serialize)]
pub struct ComponentsHealth {
    pub transcription: ComponentHealth,
    pub cards: ComponentHealth,
    pub export: ComponentHealth,
}

#[derive(Serialize)]
pub struct ComponentHealth {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            service: "cardsmith".to_string(),
            status: "healthy".to_string(),
            components: ComponentsHealth {
                transcription: ComponentHealth {
                    status: "healthy".to_string(),
                    model: Some(state.transcription_service.model_id().to_string()),
                },
                cards: ComponentHealth {
                    status: "healthy".to_string(),
                    model: Some(state.card_service.model_id().to_string()),
                },
                export: ComponentHealth {
                    status: "healthy".to_string(),
                    model: None,
                },
            },
        }),
    )
}
