use async_trait::async_trait;

use crate::domain::Embedding;

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbedderError>;

    /// Providers with a native batch endpoint override this; the default
    /// falls back to repeated single calls.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbedderError> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }

    /// Output dimensionality of this provider's vectors. Never assumed
    /// globally; the normalizer reconciles it with the index dimension.
    fn dimensions(&self) -> usize;

    fn name(&self) -> &'static str;
}

#[derive(Debug, thiserror::Error)]
pub enum EmbedderError {
    #[error("embedding api request failed: {0}")]
    RequestFailed(String),
    #[error("embedding rate limited")]
    RateLimited,
    #[error("embedding temporarily unavailable: {0}")]
    TemporarilyUnavailable(String),
    #[error("invalid embedding response: {0}")]
    InvalidResponse(String),
    #[error("embedding misconfigured: {0}")]
    Configuration(String),
}
