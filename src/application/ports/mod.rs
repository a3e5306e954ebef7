mod embedder;
mod entry_store;
mod responder;
mod transcriber;

pub use embedder::{Embedder, EmbedderError};
pub use entry_store::{EntryCompletion, EntryStore, EntryStoreError, SimilarEntry};
pub use responder::{ChatOptions, Responder, ResponderError, extract_tone_analysis};
pub use transcriber::{Transcriber, TranscriberError, Transcription};
