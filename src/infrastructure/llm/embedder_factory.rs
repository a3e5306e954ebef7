use std::sync::Arc;

use crate::application::ports::Embedder;
use crate::presentation::config::EmbeddingProvider;

use super::{HuggingFaceEmbedder, OpenAiEmbedder, RetryPolicy};

pub struct EmbedderFactory;

#[derive(Debug, thiserror::Error)]
pub enum EmbedderFactoryError {
    #[error("missing API key: the OpenAI embedder requires OPENAI_API_KEY")]
    MissingApiKey,
}

impl EmbedderFactory {
    pub fn create(
        provider: EmbeddingProvider,
        model: String,
        dimensions: usize,
        api_key: Option<String>,
    ) -> Result<Arc<dyn Embedder>, EmbedderFactoryError> {
        match provider {
            EmbeddingProvider::HuggingFace => {
                tracing::info!(model = %model, dimensions, "Using Hugging Face embeddings");
                Ok(Arc::new(HuggingFaceEmbedder::new(
                    model,
                    dimensions,
                    api_key,
                    None,
                    RetryPolicy::default(),
                )))
            }
            EmbeddingProvider::OpenAi => {
                let key = api_key
                    .filter(|k| !k.is_empty())
                    .ok_or(EmbedderFactoryError::MissingApiKey)?;
                tracing::info!(model = %model, dimensions, "Using OpenAI embeddings");
                Ok(Arc::new(OpenAiEmbedder::new(key, model, dimensions, None)))
            }
        }
    }
}
