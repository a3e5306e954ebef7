use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use serde::Serialize;

use crate::application::ports::TranscriberError;
use crate::presentation::handlers::journal::{ErrorResponse, USER_ID_HEADER};
use crate::presentation::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscribeResponse {
    pub text: String,
    pub language: Option<String>,
    pub duration_seconds: Option<f64>,
}

#[tracing::instrument(skip(state, headers, audio))]
pub async fn transcribe_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    audio: Bytes,
) -> impl IntoResponse {
    if !headers.contains_key(USER_ID_HEADER) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "Unauthorized".to_string(),
            }),
        )
            .into_response();
    }

    if audio.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Missing audio data".to_string(),
            }),
        )
            .into_response();
    }

    match state.capabilities.transcribe(&audio).await {
        Ok(transcription) => (
            StatusCode::OK,
            Json(TranscribeResponse {
                text: transcription.text,
                language: transcription.language,
                duration_seconds: transcription.duration_seconds,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Transcription failed");
            let status = match &e {
                TranscriberError::TemporarilyUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                TranscriberError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_GATEWAY,
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
