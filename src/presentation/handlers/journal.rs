use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::services::ProcessError;
use crate::domain::{AiMode, Tone, UserId};
use crate::infrastructure::observability::sanitize_transcript;
use crate::presentation::state::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Deserialize)]
pub struct JournalRequest {
    pub transcription: String,
    #[serde(rename = "aiMode")]
    pub ai_mode: AiMode,
    #[serde(rename = "audioUrl")]
    pub audio_url: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalResponse {
    pub entry_id: Uuid,
    pub response_text: String,
    pub tone: Tone,
    pub sentiment_score: f32,
    pub energy_score: f32,
    pub emotion_tags: Vec<String>,
    pub referenced_count: usize,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(skip(state, headers, request))]
pub async fn journal_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<JournalRequest>,
) -> impl IntoResponse {
    let Some(user_id) = user_from_headers(&headers) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "Unauthorized".to_string(),
            }),
        )
            .into_response();
    };

    if request.transcription.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Missing required fields".to_string(),
            }),
        )
            .into_response();
    }

    tracing::debug!(
        mode = %request.ai_mode,
        transcription = %sanitize_transcript(&request.transcription),
        "Processing journal entry"
    );

    match state
        .journal_service
        .process(
            user_id,
            &request.transcription,
            request.ai_mode,
            request.audio_url.as_deref(),
        )
        .await
    {
        Ok(processed) => {
            tracing::info!(
                entry_id = %processed.entry_id,
                referenced_count = processed.referenced_count,
                "Journal entry processed"
            );
            (
                StatusCode::OK,
                Json(JournalResponse {
                    entry_id: processed.entry_id.as_uuid(),
                    response_text: processed.response_text,
                    tone: processed.tone,
                    sentiment_score: processed.sentiment_score,
                    energy_score: processed.energy_score,
                    emotion_tags: processed.emotion_tags,
                    referenced_count: processed.referenced_count,
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Journal processing failed");
            let status = match &e {
                ProcessError::ProviderUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                ProcessError::ToneClassification(_) | ProcessError::ResponseGeneration(_) => {
                    StatusCode::BAD_GATEWAY
                }
                ProcessError::Persistence(_) | ProcessError::Configuration(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            (
                status,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

fn user_from_headers(headers: &HeaderMap) -> Option<UserId> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v).ok())
        .map(UserId::from_uuid)
}
