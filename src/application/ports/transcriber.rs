use async_trait::async_trait;

/// Result of a speech-to-text call.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcription {
    pub text: String,
    pub language: Option<String>,
    pub duration_seconds: Option<f64>,
}

#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio_data: &[u8]) -> Result<Transcription, TranscriberError>;

    fn name(&self) -> &'static str;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriberError {
    #[error("transcription api request failed: {0}")]
    RequestFailed(String),
    #[error("transcription temporarily unavailable: {0}")]
    TemporarilyUnavailable(String),
    #[error("invalid transcription response: {0}")]
    InvalidResponse(String),
    #[error("transcription misconfigured: {0}")]
    Configuration(String),
}
