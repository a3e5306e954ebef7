use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;

use crate::application::ports::{Transcriber, TranscriberError, Transcription};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(120);

pub struct OpenAiWhisperEngine {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Deserialize)]
struct WhisperResponse {
    text: String,
    language: Option<String>,
    duration: Option<f64>,
}

impl OpenAiWhisperEngine {
    pub fn new(api_key: String, base_url: Option<String>, model: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: model.unwrap_or_else(|| "whisper-1".to_string()),
        }
    }
}

#[async_trait]
impl Transcriber for OpenAiWhisperEngine {
    async fn transcribe(&self, audio_data: &[u8]) -> Result<Transcription, TranscriberError> {
        let url = format!(
            "{}/audio/transcriptions",
            self.base_url.trim_end_matches('/')
        );

        let file_part = multipart::Part::bytes(audio_data.to_vec())
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| TranscriberError::RequestFailed(format!("mime: {}", e)))?;

        let form = multipart::Form::new()
            .text("model", self.model.clone())
            .text("response_format", "verbose_json")
            .part("file", file_part);

        tracing::debug!(model = %self.model, "Sending audio to OpenAI Whisper API");

        let response = self
            .client
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriberError::RequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(TranscriberError::RequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let result: WhisperResponse = response
            .json()
            .await
            .map_err(|e| TranscriberError::InvalidResponse(format!("parse response: {}", e)))?;

        tracing::info!(
            chars = result.text.len(),
            "OpenAI Whisper transcription completed"
        );

        Ok(Transcription {
            text: result.text.trim().to_string(),
            language: result.language,
            duration_seconds: result.duration,
        })
    }

    fn name(&self) -> &'static str {
        "OpenAI Whisper"
    }
}
