mod capability_manager;
mod embedding_normalizer;
mod journal_service;
mod prompt_composer;
mod retrieval_service;
mod token_estimate;

pub use capability_manager::{CapabilityManager, ProviderInfo};
pub use embedding_normalizer::{NormalizeError, normalize_embedding};
pub use journal_service::{JournalService, ProcessError, ProcessedEntry, ResponseRouting};
pub use prompt_composer::PromptComposer;
pub use retrieval_service::{RelatedEntry, RetrievalService};
pub use token_estimate::{estimate_cost, estimate_tokens};
