use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::Tone;

/// How the assistant should respond to a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiMode {
    Listening,
    Coaching,
    Smart,
}

impl AiMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AiMode::Listening => "listening",
            AiMode::Coaching => "coaching",
            AiMode::Smart => "smart",
        }
    }
}

impl std::str::FromStr for AiMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "listening" => Ok(AiMode::Listening),
            "coaching" => Ok(AiMode::Coaching),
            "smart" => Ok(AiMode::Smart),
            other => Err(format!("Invalid AI mode: {}", other)),
        }
    }
}

impl std::fmt::Display for AiMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One voice-journal submission.
///
/// An entry is created in a provisional state carrying only the
/// transcription and requested mode. The processing pipeline later either
/// finalizes it in place (response, tone, scores and references set
/// together) or deletes it. A non-null `ai_response` therefore implies
/// non-null tone, sentiment and energy.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalEntry {
    pub id: EntryId,
    pub user_id: UserId,
    pub transcription: String,
    pub audio_url: Option<String>,
    pub ai_mode: AiMode,
    pub ai_response: Option<String>,
    pub detected_tone: Option<Tone>,
    pub sentiment_score: Option<f32>,
    pub energy_score: Option<f32>,
    pub emotion_tags: Vec<String>,
    pub referenced_entry_ids: Vec<EntryId>,
    pub created_at: DateTime<Utc>,
}

impl JournalEntry {
    pub fn provisional(
        user_id: UserId,
        transcription: String,
        ai_mode: AiMode,
        audio_url: Option<String>,
    ) -> Self {
        Self {
            id: EntryId::new(),
            user_id,
            transcription,
            audio_url,
            ai_mode,
            ai_response: None,
            detected_tone: None,
            sentiment_score: None,
            energy_score: None,
            emotion_tags: Vec::new(),
            referenced_entry_ids: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.ai_response.is_some()
    }
}
