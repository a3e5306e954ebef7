use async_trait::async_trait;

use crate::domain::{AiMode, Embedding, EntryId, JournalEntry, Tone, UsageRecord, UserId};

/// AI-derived fields written when an entry is finalized. Always set as one
/// unit; a finalized entry never carries a subset of them.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryCompletion {
    pub ai_response: String,
    pub detected_tone: Tone,
    pub emotion_tags: Vec<String>,
    pub sentiment_score: f32,
    pub energy_score: f32,
    pub referenced_entry_ids: Vec<EntryId>,
}

/// One vector-search hit, before the candidate entry itself is loaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarEntry {
    pub entry_id: EntryId,
    pub similarity: f32,
}

/// Contract against the external entry store and its vector index.
///
/// Every query is scoped to the owning user; that scoping is an
/// authorization requirement of the storage layer, not an optimization.
#[async_trait]
pub trait EntryStore: Send + Sync {
    async fn create_entry(
        &self,
        user_id: UserId,
        transcription: &str,
        mode: AiMode,
        audio_url: Option<&str>,
    ) -> Result<EntryId, EntryStoreError>;

    async fn update_entry(
        &self,
        entry_id: EntryId,
        completion: EntryCompletion,
    ) -> Result<(), EntryStoreError>;

    async fn delete_entry(&self, entry_id: EntryId) -> Result<(), EntryStoreError>;

    async fn store_embedding(
        &self,
        entry_id: EntryId,
        user_id: UserId,
        embedding: &Embedding,
    ) -> Result<(), EntryStoreError>;

    async fn search_similar(
        &self,
        user_id: UserId,
        query: &Embedding,
        exclude: EntryId,
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<SimilarEntry>, EntryStoreError>;

    async fn get_entries(
        &self,
        user_id: UserId,
        entry_ids: &[EntryId],
    ) -> Result<Vec<JournalEntry>, EntryStoreError>;

    async fn append_usage(&self, record: UsageRecord) -> Result<(), EntryStoreError>;

    /// Vector dimensionalities the index is provisioned for.
    fn supported_dimensions(&self) -> &[usize];
}

#[derive(Debug, thiserror::Error)]
pub enum EntryStoreError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("query failed: {0}")]
    QueryFailed(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unsupported vector dimension: {0}")]
    UnsupportedDimension(usize),
}
