use std::sync::Arc;

use crate::application::ports::Transcriber;
use crate::presentation::config::TranscriptionProvider;

use super::{AssemblyAiEngine, OpenAiWhisperEngine};

pub struct TranscriptionEngineFactory;

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionFactoryError {
    #[error("missing API key: {0} is required for the selected transcription provider")]
    MissingApiKey(&'static str),
}

impl TranscriptionEngineFactory {
    pub fn create(
        provider: TranscriptionProvider,
        api_key: Option<String>,
    ) -> Result<Arc<dyn Transcriber>, TranscriptionFactoryError> {
        match provider {
            TranscriptionProvider::AssemblyAi => {
                let key = api_key
                    .filter(|k| !k.is_empty())
                    .ok_or(TranscriptionFactoryError::MissingApiKey("ASSEMBLYAI_API_KEY"))?;
                tracing::info!("Using AssemblyAI transcription");
                Ok(Arc::new(AssemblyAiEngine::new(key, None)))
            }
            TranscriptionProvider::OpenAi => {
                let key = api_key
                    .filter(|k| !k.is_empty())
                    .ok_or(TranscriptionFactoryError::MissingApiKey("OPENAI_API_KEY"))?;
                tracing::info!("Using OpenAI Whisper transcription");
                Ok(Arc::new(OpenAiWhisperEngine::new(key, None, None)))
            }
        }
    }
}
