use std::sync::Arc;

use crate::application::ports::{
    ChatOptions, EntryCompletion, EntryStore, ResponderError,
};
use crate::domain::{
    AiMode, ChatMessage, Embedding, EntryId, Tone, ToneAnalysis, UsageRecord, UserId,
};

use super::{
    CapabilityManager, PromptComposer, RetrievalService, estimate_cost,
    estimate_tokens, normalize_embedding,
};

/// Response model and length routing, resolved per entry.
///
/// Coaching, and smart mode when the entry reads distressed, route the
/// deeper (more capable, more expensive) chat model; everything else uses
/// the standard one. Response length caps differ per mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseRouting {
    pub chat_model: String,
    pub deep_chat_model: String,
    pub temperature: f32,
    pub listening_max_tokens: u32,
    pub coaching_max_tokens: u32,
    pub smart_max_tokens: u32,
    pub distress_threshold: f32,
}

impl Default for ResponseRouting {
    fn default() -> Self {
        Self {
            chat_model: "llama-3.1-8b-instant".to_string(),
            deep_chat_model: "llama-3.1-70b-versatile".to_string(),
            temperature: 0.7,
            listening_max_tokens: 120,
            coaching_max_tokens: 400,
            smart_max_tokens: 300,
            distress_threshold: 0.3,
        }
    }
}

/// What the caller gets back from one completed pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedEntry {
    pub entry_id: EntryId,
    pub response_text: String,
    pub tone: Tone,
    pub sentiment_score: f32,
    pub energy_score: f32,
    pub emotion_tags: Vec<String>,
    pub referenced_count: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("tone classification failed: {0}")]
    ToneClassification(String),
    #[error("response generation failed: {0}")]
    ResponseGeneration(String),
    #[error("persistence failed: {0}")]
    Persistence(String),
    #[error("provider temporarily unavailable: {0}")]
    ProviderUnavailable(String),
    #[error("configuration: {0}")]
    Configuration(String),
}

const FEATURE_NAME: &str = "journal_entry";

/// Orchestrates one journal submission end to end.
///
/// The entry is persisted provisionally up front, then enriched step by
/// step: embedding and retrieval degrade gracefully, tone classification
/// and response generation are fatal. Any fatal failure after creation
/// deletes the provisional entry so a half-finished entry is never left
/// visible.
pub struct JournalService {
    capabilities: Arc<CapabilityManager>,
    store: Arc<dyn EntryStore>,
    retrieval: RetrievalService,
    composer: PromptComposer,
    routing: ResponseRouting,
    index_dimension: usize,
}

impl JournalService {
    pub fn new(
        capabilities: Arc<CapabilityManager>,
        store: Arc<dyn EntryStore>,
        retrieval: RetrievalService,
        composer: PromptComposer,
        routing: ResponseRouting,
        index_dimension: usize,
    ) -> Self {
        Self {
            capabilities,
            store,
            retrieval,
            composer,
            routing,
            index_dimension,
        }
    }

    pub async fn process(
        &self,
        user_id: UserId,
        transcription: &str,
        mode: AiMode,
        audio_url: Option<&str>,
    ) -> Result<ProcessedEntry, ProcessError> {
        let entry_id = self
            .store
            .create_entry(user_id, transcription, mode, audio_url)
            .await
            .map_err(|e| ProcessError::Persistence(e.to_string()))?;

        tracing::debug!(entry_id = %entry_id, mode = %mode, "Provisional entry created");

        // Embedding and tone classification are independent of each other;
        // issue them concurrently. Embedding is best-effort, tone is not.
        let (embedding, classification) = tokio::join!(
            self.embed_entry(user_id, entry_id, transcription),
            self.capabilities.classify_tone(transcription),
        );

        let classification = match classification {
            Ok(classification) => classification,
            Err(e) => {
                self.rollback(entry_id, "tone classification", &e).await;
                self.record_usage(user_id, None, transcription, "").await;
                return Err(map_responder_error(e, ProcessError::ToneClassification));
            }
        };
        let analysis = classification.analysis().clone();

        tracing::info!(
            entry_id = %entry_id,
            tone = %analysis.tone,
            sentiment = analysis.sentiment_score,
            defaulted = classification.is_defaulted(),
            "Tone classified"
        );

        let related = self
            .retrieval
            .find_related(user_id, embedding.as_ref(), entry_id)
            .await;

        let (model, max_tokens) = self.route(mode, &analysis);
        let system_prompt = self.composer.compose(mode, analysis.sentiment_score, &related);
        let messages = [
            ChatMessage::system(system_prompt.as_str()),
            ChatMessage::user(transcription),
        ];
        let options = ChatOptions {
            temperature: self.routing.temperature,
            max_tokens,
            model: Some(model.clone()),
        };

        let response_text = match self.capabilities.chat(&messages, &options).await {
            Ok(text) => text,
            Err(e) => {
                self.rollback(entry_id, "response generation", &e).await;
                self.record_usage(user_id, Some(&model), &system_prompt, "")
                    .await;
                return Err(map_responder_error(e, ProcessError::ResponseGeneration));
            }
        };

        let referenced_entry_ids: Vec<EntryId> = related.iter().map(|r| r.entry_id).collect();
        let referenced_count = referenced_entry_ids.len();

        let completion = EntryCompletion {
            ai_response: response_text.clone(),
            detected_tone: analysis.tone,
            emotion_tags: analysis.emotion_tags.clone(),
            sentiment_score: analysis.sentiment_score,
            energy_score: analysis.energy_score,
            referenced_entry_ids,
        };

        // The response was generated; a failed finalize keeps the entry
        // with its provisional content rather than discarding the run.
        if let Err(e) = self.store.update_entry(entry_id, completion).await {
            tracing::error!(entry_id = %entry_id, error = %e, "Finalizing entry failed");
        } else {
            tracing::info!(entry_id = %entry_id, referenced_count, "Entry finalized");
        }

        self.record_usage(user_id, Some(&model), &system_prompt, &response_text)
            .await;

        Ok(ProcessedEntry {
            entry_id,
            response_text,
            tone: analysis.tone,
            sentiment_score: analysis.sentiment_score,
            energy_score: analysis.energy_score,
            emotion_tags: analysis.emotion_tags,
            referenced_count,
        })
    }

    /// Embed, normalize and persist the entry vector. Any failure is
    /// logged and swallowed; the pipeline then runs without retrieval
    /// context.
    async fn embed_entry(
        &self,
        user_id: UserId,
        entry_id: EntryId,
        transcription: &str,
    ) -> Option<Embedding> {
        let raw = match self.capabilities.embed(transcription).await {
            Ok(embedding) => embedding,
            Err(e) => {
                tracing::warn!(entry_id = %entry_id, error = %e, "Embedding failed, continuing without retrieval");
                return None;
            }
        };

        let normalized = match normalize_embedding(&raw, self.index_dimension) {
            Ok(normalized) => normalized,
            Err(e) => {
                tracing::warn!(entry_id = %entry_id, error = %e, "Embedding not normalizable, continuing without retrieval");
                return None;
            }
        };

        if !self
            .store
            .supported_dimensions()
            .contains(&normalized.dimensions())
        {
            tracing::warn!(
                entry_id = %entry_id,
                dimensions = normalized.dimensions(),
                "Index does not support normalized dimension, continuing without retrieval"
            );
            return None;
        }

        match self
            .store
            .store_embedding(entry_id, user_id, &normalized)
            .await
        {
            Ok(()) => Some(normalized),
            Err(e) => {
                tracing::warn!(entry_id = %entry_id, error = %e, "Storing embedding failed, continuing without retrieval");
                None
            }
        }
    }

    fn route(&self, mode: AiMode, analysis: &ToneAnalysis) -> (String, u32) {
        let distressed = analysis.sentiment_score < self.routing.distress_threshold;
        match mode {
            AiMode::Listening => (self.routing.chat_model.clone(), self.routing.listening_max_tokens),
            AiMode::Coaching => (
                self.routing.deep_chat_model.clone(),
                self.routing.coaching_max_tokens,
            ),
            AiMode::Smart if distressed => (
                self.routing.deep_chat_model.clone(),
                self.routing.smart_max_tokens,
            ),
            AiMode::Smart => (self.routing.chat_model.clone(), self.routing.smart_max_tokens),
        }
    }

    async fn rollback(
        &self,
        entry_id: EntryId,
        stage: &str,
        cause: &(dyn std::error::Error + Send + Sync),
    ) {
        tracing::error!(entry_id = %entry_id, stage, error = %cause, "Pipeline failed, rolling back provisional entry");
        if let Err(e) = self.store.delete_entry(entry_id).await {
            tracing::error!(entry_id = %entry_id, error = %e, "Rollback delete failed");
        }
    }

    /// One usage record per run, completed or failed. Best-effort: losing
    /// a usage row never affects the pipeline outcome.
    async fn record_usage(
        &self,
        user_id: UserId,
        model: Option<&str>,
        input_text: &str,
        output_text: &str,
    ) {
        let model = model.unwrap_or_else(|| self.capabilities.responder_name());
        let input_tokens = estimate_tokens(input_text);
        let output_tokens = if output_text.is_empty() {
            0
        } else {
            estimate_tokens(output_text)
        };
        let record = UsageRecord::new(
            user_id,
            FEATURE_NAME,
            self.capabilities.responder_name(),
            model,
            input_tokens,
            output_tokens,
            estimate_cost(model, input_tokens, output_tokens),
        );

        if let Err(e) = self.store.append_usage(record).await {
            tracing::warn!(error = %e, "Appending usage record failed");
        }
    }
}

fn map_responder_error(
    error: ResponderError,
    fatal: impl Fn(String) -> ProcessError,
) -> ProcessError {
    match error {
        ResponderError::Configuration(msg) => ProcessError::Configuration(msg),
        ResponderError::TemporarilyUnavailable(msg) => ProcessError::ProviderUnavailable(msg),
        other => fatal(other.to_string()),
    }
}
