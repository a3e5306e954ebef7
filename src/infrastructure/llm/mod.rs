mod embedder_factory;
mod groq_responder;
mod huggingface_embedder;
mod openai_embedder;
mod openai_responder;
mod responder_factory;
mod retry;

pub use embedder_factory::{EmbedderFactory, EmbedderFactoryError};
pub use groq_responder::GroqResponder;
pub use huggingface_embedder::HuggingFaceEmbedder;
pub use openai_embedder::OpenAiEmbedder;
pub use openai_responder::OpenAiResponder;
pub use responder_factory::{ResponderFactory, ResponderFactoryError};
pub use retry::RetryPolicy;
