use std::sync::Arc;

use crate::application::ports::{
    ChatOptions, Embedder, EmbedderError, Responder, ResponderError, Transcriber,
    TranscriberError, Transcription,
};
use crate::domain::{ChatMessage, Embedding, ToneClassification};

/// Facade over the three configured AI capabilities.
///
/// Built once at startup from configuration and shared read-only behind an
/// `Arc`; provider selection never changes after construction.
pub struct CapabilityManager {
    transcriber: Arc<dyn Transcriber>,
    embedder: Arc<dyn Embedder>,
    responder: Arc<dyn Responder>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderInfo {
    pub transcription: String,
    pub llm: String,
    pub embedding: String,
}

impl CapabilityManager {
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        embedder: Arc<dyn Embedder>,
        responder: Arc<dyn Responder>,
    ) -> Self {
        Self {
            transcriber,
            embedder,
            responder,
        }
    }

    pub async fn transcribe(&self, audio_data: &[u8]) -> Result<Transcription, TranscriberError> {
        self.transcriber.transcribe(audio_data).await
    }

    pub async fn embed(&self, text: &str) -> Result<Embedding, EmbedderError> {
        self.embedder.embed(text).await
    }

    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<String, ResponderError> {
        self.responder.chat(messages, options).await
    }

    pub async fn classify_tone(&self, text: &str) -> Result<ToneClassification, ResponderError> {
        self.responder.classify_tone(text).await
    }

    pub fn embedder_dimensions(&self) -> usize {
        self.embedder.dimensions()
    }

    pub fn responder_name(&self) -> &'static str {
        self.responder.name()
    }

    pub fn provider_info(&self) -> ProviderInfo {
        ProviderInfo {
            transcription: self.transcriber.name().to_string(),
            llm: format!(
                "{} ({})",
                self.responder.name(),
                self.responder.default_model()
            ),
            embedding: format!(
                "{} ({}D)",
                self.embedder.name(),
                self.embedder.dimensions()
            ),
        }
    }
}
