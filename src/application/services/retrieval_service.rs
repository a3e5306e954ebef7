use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::ports::EntryStore;
use crate::domain::{Embedding, EntryId, Tone, UserId};

/// A prior entry judged similar to the one being processed, carrying the
/// fields the prompt composer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct RelatedEntry {
    pub entry_id: EntryId,
    pub similarity: f32,
    pub transcription: String,
    pub detected_tone: Option<Tone>,
    pub created_at: DateTime<Utc>,
}

/// Similarity retrieval over the user's prior entries.
///
/// Retrieval is strictly best-effort: the user-facing response must still
/// be produced when the vector index is down, so every failure path
/// degrades to "no related entries found".
pub struct RetrievalService {
    store: Arc<dyn EntryStore>,
    similarity_threshold: f32,
    fetch_limit: usize,
}

impl RetrievalService {
    pub fn new(store: Arc<dyn EntryStore>, similarity_threshold: f32, fetch_limit: usize) -> Self {
        Self {
            store,
            similarity_threshold,
            fetch_limit,
        }
    }

    /// Find prior entries of the same user similar to `query`, excluding
    /// the entry being processed. `None` means the embedding step did not
    /// produce a vector; that is an empty result, not an error.
    pub async fn find_related(
        &self,
        user_id: UserId,
        query: Option<&Embedding>,
        exclude: EntryId,
    ) -> Vec<RelatedEntry> {
        let Some(query) = query else {
            return Vec::new();
        };

        let hits = match self
            .store
            .search_similar(
                user_id,
                query,
                exclude,
                self.similarity_threshold,
                self.fetch_limit,
            )
            .await
        {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!(error = %e, "Similarity search failed, continuing without related entries");
                return Vec::new();
            }
        };

        if hits.is_empty() {
            return Vec::new();
        }

        let entry_ids: Vec<EntryId> = hits.iter().map(|h| h.entry_id).collect();
        let entries = match self.store.get_entries(user_id, &entry_ids).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "Loading similar entries failed, continuing without related entries");
                return Vec::new();
            }
        };

        // Keep the index's similarity ordering; drop hits whose entry row
        // is gone (deleted between search and load).
        let related: Vec<RelatedEntry> = hits
            .iter()
            .filter_map(|hit| {
                entries
                    .iter()
                    .find(|entry| entry.id == hit.entry_id)
                    .map(|entry| RelatedEntry {
                        entry_id: entry.id,
                        similarity: hit.similarity,
                        transcription: entry.transcription.clone(),
                        detected_tone: entry.detected_tone,
                        created_at: entry.created_at,
                    })
            })
            .collect();

        tracing::debug!(
            count = related.len(),
            threshold = self.similarity_threshold,
            "Related entries retrieved"
        );

        related
    }
}
