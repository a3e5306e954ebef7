use chrono::{DateTime, Utc};

use super::UserId;

/// Append-only record of one pipeline execution's provider usage.
///
/// Token counts are heuristic estimates, not billing figures. Records are
/// written once per run, completed or failed, and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageRecord {
    pub user_id: UserId,
    pub feature: String,
    pub provider: String,
    pub model: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub estimated_cost: f64,
    pub created_at: DateTime<Utc>,
}

impl UsageRecord {
    pub fn new(
        user_id: UserId,
        feature: impl Into<String>,
        provider: impl Into<String>,
        model: impl Into<String>,
        input_tokens: u32,
        output_tokens: u32,
        estimated_cost: f64,
    ) -> Self {
        Self {
            user_id,
            feature: feature.into(),
            provider: provider.into(),
            model: model.into(),
            input_tokens,
            output_tokens,
            estimated_cost,
            created_at: Utc::now(),
        }
    }
}
