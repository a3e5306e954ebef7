mod embedding;
mod entry;
mod message;
mod tone;
mod usage;

pub use embedding::Embedding;
pub use entry::{AiMode, EntryId, JournalEntry, UserId};
pub use message::{ChatMessage, MessageRole};
pub use tone::{Tone, ToneAnalysis, ToneClassification};
pub use usage::UsageRecord;
