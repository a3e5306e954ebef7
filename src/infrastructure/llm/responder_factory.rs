use std::sync::Arc;

use crate::application::ports::Responder;
use crate::presentation::config::LlmProvider;

use super::{GroqResponder, OpenAiResponder};

pub struct ResponderFactory;

#[derive(Debug, thiserror::Error)]
pub enum ResponderFactoryError {
    #[error("missing API key: {0} is required for the selected chat provider")]
    MissingApiKey(&'static str),
}

impl ResponderFactory {
    pub fn create(
        provider: LlmProvider,
        default_model: String,
        api_key: Option<String>,
    ) -> Result<Arc<dyn Responder>, ResponderFactoryError> {
        match provider {
            LlmProvider::Groq => {
                let key = api_key
                    .filter(|k| !k.is_empty())
                    .ok_or(ResponderFactoryError::MissingApiKey("GROQ_API_KEY"))?;
                tracing::info!(model = %default_model, "Using Groq chat completions");
                Ok(Arc::new(GroqResponder::new(key, default_model, None)))
            }
            LlmProvider::OpenAi => {
                let key = api_key
                    .filter(|k| !k.is_empty())
                    .ok_or(ResponderFactoryError::MissingApiKey("OPENAI_API_KEY"))?;
                tracing::info!(model = %default_model, "Using OpenAI chat completions");
                Ok(Arc::new(OpenAiResponder::new(key, default_model, None)))
            }
        }
    }
}
