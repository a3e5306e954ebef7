use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::{
    EntryCompletion, EntryStore, EntryStoreError, SimilarEntry,
};
use crate::domain::{AiMode, Embedding, EntryId, JournalEntry, UsageRecord, UserId};

/// Entry store backed by process memory.
///
/// The production store is an external system reached through the
/// `EntryStore` port; this implementation backs tests and local runs with
/// the same contract, including owner scoping on every query and
/// cosine-similarity search over stored vectors.
pub struct InMemoryEntryStore {
    entries: RwLock<HashMap<EntryId, JournalEntry>>,
    vectors: RwLock<HashMap<EntryId, (UserId, Embedding)>>,
    usage: RwLock<Vec<UsageRecord>>,
    supported_dimensions: Vec<usize>,
}

impl InMemoryEntryStore {
    pub fn new(supported_dimensions: Vec<usize>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            vectors: RwLock::new(HashMap::new()),
            usage: RwLock::new(Vec::new()),
            supported_dimensions,
        }
    }

    pub async fn entry(&self, entry_id: EntryId) -> Option<JournalEntry> {
        self.entries.read().await.get(&entry_id).cloned()
    }

    pub async fn entry_count(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn usage_records(&self) -> Vec<UsageRecord> {
        self.usage.read().await.clone()
    }

    /// Seed a pre-existing entry, optionally with its vector.
    pub async fn insert_entry(&self, entry: JournalEntry, embedding: Option<Embedding>) {
        if let Some(embedding) = embedding {
            self.vectors
                .write()
                .await
                .insert(entry.id, (entry.user_id, embedding));
        }
        self.entries.write().await.insert(entry.id, entry);
    }
}

impl Default for InMemoryEntryStore {
    fn default() -> Self {
        Self::new(vec![384, 768, 1536])
    }
}

#[async_trait]
impl EntryStore for InMemoryEntryStore {
    async fn create_entry(
        &self,
        user_id: UserId,
        transcription: &str,
        mode: AiMode,
        audio_url: Option<&str>,
    ) -> Result<EntryId, EntryStoreError> {
        let entry = JournalEntry::provisional(
            user_id,
            transcription.to_string(),
            mode,
            audio_url.map(String::from),
        );
        let entry_id = entry.id;
        self.entries.write().await.insert(entry_id, entry);
        Ok(entry_id)
    }

    async fn update_entry(
        &self,
        entry_id: EntryId,
        completion: EntryCompletion,
    ) -> Result<(), EntryStoreError> {
        let mut entries = self.entries.write().await;
        let entry = entries
            .get_mut(&entry_id)
            .ok_or_else(|| EntryStoreError::NotFound(entry_id.to_string()))?;

        entry.ai_response = Some(completion.ai_response);
        entry.detected_tone = Some(completion.detected_tone);
        entry.emotion_tags = completion.emotion_tags;
        entry.sentiment_score = Some(completion.sentiment_score);
        entry.energy_score = Some(completion.energy_score);
        entry.referenced_entry_ids = completion.referenced_entry_ids;
        Ok(())
    }

    async fn delete_entry(&self, entry_id: EntryId) -> Result<(), EntryStoreError> {
        self.vectors.write().await.remove(&entry_id);
        self.entries
            .write()
            .await
            .remove(&entry_id)
            .map(|_| ())
            .ok_or_else(|| EntryStoreError::NotFound(entry_id.to_string()))
    }

    async fn store_embedding(
        &self,
        entry_id: EntryId,
        user_id: UserId,
        embedding: &Embedding,
    ) -> Result<(), EntryStoreError> {
        if !self.supported_dimensions.contains(&embedding.dimensions()) {
            return Err(EntryStoreError::UnsupportedDimension(embedding.dimensions()));
        }

        let entries = self.entries.read().await;
        let owned = entries
            .get(&entry_id)
            .map(|e| e.user_id == user_id)
            .unwrap_or(false);
        drop(entries);
        if !owned {
            return Err(EntryStoreError::NotFound(entry_id.to_string()));
        }

        self.vectors
            .write()
            .await
            .insert(entry_id, (user_id, embedding.clone()));
        Ok(())
    }

    async fn search_similar(
        &self,
        user_id: UserId,
        query: &Embedding,
        exclude: EntryId,
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<SimilarEntry>, EntryStoreError> {
        let vectors = self.vectors.read().await;
        let mut hits: Vec<SimilarEntry> = vectors
            .iter()
            .filter(|(entry_id, (owner, _))| **entry_id != exclude && *owner == user_id)
            .map(|(entry_id, (_, vector))| SimilarEntry {
                entry_id: *entry_id,
                similarity: query.cosine_similarity(vector),
            })
            .filter(|hit| hit.similarity >= threshold)
            .collect();

        hits.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        hits.truncate(limit);
        Ok(hits)
    }

    async fn get_entries(
        &self,
        user_id: UserId,
        entry_ids: &[EntryId],
    ) -> Result<Vec<JournalEntry>, EntryStoreError> {
        let entries = self.entries.read().await;
        Ok(entry_ids
            .iter()
            .filter_map(|id| entries.get(id))
            .filter(|entry| entry.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn append_usage(&self, record: UsageRecord) -> Result<(), EntryStoreError> {
        self.usage.write().await.push(record);
        Ok(())
    }

    fn supported_dimensions(&self) -> &[usize] {
        &self.supported_dimensions
    }
}
