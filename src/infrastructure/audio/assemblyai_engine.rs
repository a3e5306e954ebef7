use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::application::ports::{Transcriber, TranscriberError, Transcription};

const DEFAULT_BASE_URL: &str = "https://api.assemblyai.com/v2";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
const DEFAULT_MAX_POLLS: u32 = 60;
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(120);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// AssemblyAI transcription adapter.
///
/// The vendor flow is asynchronous: upload the audio, submit a
/// transcription job, then poll its status. Polling is bounded; a job
/// that never completes inside the budget surfaces as temporary
/// unavailability, not as a hang.
pub struct AssemblyAiEngine {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    poll_interval: Duration,
    max_polls: u32,
}

#[derive(Deserialize)]
struct UploadResponse {
    upload_url: String,
}

#[derive(Deserialize)]
struct SubmitResponse {
    id: String,
}

#[derive(Deserialize)]
struct StatusResponse {
    status: String,
    text: Option<String>,
    language_code: Option<String>,
    audio_duration: Option<f64>,
    error: Option<String>,
}

impl AssemblyAiEngine {
    pub fn new(api_key: String, base_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }

    /// Override the poll cadence; tests shrink both values.
    pub fn with_polling(mut self, poll_interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = poll_interval;
        self.max_polls = max_polls;
        self
    }

    async fn upload(&self, audio_data: &[u8]) -> Result<String, TranscriberError> {
        let url = format!("{}/upload", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .timeout(UPLOAD_TIMEOUT)
            .header("authorization", &self.api_key)
            .body(audio_data.to_vec())
            .send()
            .await
            .map_err(|e| TranscriberError::RequestFailed(format!("upload: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TranscriberError::RequestFailed(format!(
                "upload status {}: {}",
                status, body
            )));
        }

        let upload: UploadResponse = response
            .json()
            .await
            .map_err(|e| TranscriberError::InvalidResponse(format!("upload response: {}", e)))?;
        Ok(upload.upload_url)
    }

    async fn submit(&self, audio_url: &str) -> Result<String, TranscriberError> {
        let url = format!("{}/transcript", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .header("authorization", &self.api_key)
            .json(&serde_json::json!({ "audio_url": audio_url }))
            .send()
            .await
            .map_err(|e| TranscriberError::RequestFailed(format!("submit: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TranscriberError::RequestFailed(format!(
                "submit status {}: {}",
                status, body
            )));
        }

        let submit: SubmitResponse = response
            .json()
            .await
            .map_err(|e| TranscriberError::InvalidResponse(format!("submit response: {}", e)))?;
        Ok(submit.id)
    }

    async fn poll(&self, transcript_id: &str) -> Result<Transcription, TranscriberError> {
        let url = format!(
            "{}/transcript/{}",
            self.base_url.trim_end_matches('/'),
            transcript_id
        );

        for _ in 0..self.max_polls {
            let response = self
                .client
                .get(&url)
                .timeout(REQUEST_TIMEOUT)
                .header("authorization", &self.api_key)
                .send()
                .await
                .map_err(|e| TranscriberError::RequestFailed(format!("status: {}", e)))?;

            if !response.status().is_success() {
                return Err(TranscriberError::RequestFailed(format!(
                    "status check failed: {}",
                    response.status()
                )));
            }

            let status: StatusResponse = response
                .json()
                .await
                .map_err(|e| TranscriberError::InvalidResponse(format!("status response: {}", e)))?;

            match status.status.as_str() {
                "completed" => {
                    let text = status.text.unwrap_or_default();
                    tracing::info!(chars = text.len(), "AssemblyAI transcription completed");
                    return Ok(Transcription {
                        text,
                        language: status.language_code,
                        duration_seconds: status.audio_duration,
                    });
                }
                "error" => {
                    return Err(TranscriberError::RequestFailed(format!(
                        "transcription error: {}",
                        status.error.unwrap_or_else(|| "unknown".to_string())
                    )));
                }
                _ => tokio::time::sleep(self.poll_interval).await,
            }
        }

        Err(TranscriberError::TemporarilyUnavailable(format!(
            "transcription still processing after {} polls",
            self.max_polls
        )))
    }
}

#[async_trait]
impl Transcriber for AssemblyAiEngine {
    async fn transcribe(&self, audio_data: &[u8]) -> Result<Transcription, TranscriberError> {
        let upload_url = self.upload(audio_data).await?;
        let transcript_id = self.submit(&upload_url).await?;
        self.poll(&transcript_id).await
    }

    fn name(&self) -> &'static str {
        "AssemblyAI"
    }
}
