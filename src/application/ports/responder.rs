use async_trait::async_trait;

use crate::domain::{ChatMessage, Tone, ToneAnalysis, ToneClassification};

/// Pass-through generation parameters. Anything vendor-specific beyond
/// these stays inside the adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatOptions {
    pub temperature: f32,
    pub max_tokens: u32,
    pub model: Option<String>,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 1000,
            model: None,
        }
    }
}

const TONE_INSTRUCTION: &str = r#"Analyze the user's journal entry. Return ONLY valid JSON, no other text:
{
  "tone": "positive" | "negative" | "neutral" | "seeking_help",
  "emotionTags": ["tag1", "tag2"],
  "sentiment_score": 0.0 to 1.0,
  "energy_score": 0.0 to 1.0
}"#;

#[async_trait]
pub trait Responder: Send + Sync {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<String, ResponderError>;

    /// Classify tone with a fixed four-field JSON instruction.
    ///
    /// Transport failures propagate. An undecodable reply does not: it
    /// yields the tagged neutral default instead, so classification never
    /// fails on model sloppiness alone.
    async fn classify_tone(&self, text: &str) -> Result<ToneClassification, ResponderError> {
        let messages = [
            ChatMessage::system(TONE_INSTRUCTION),
            ChatMessage::user(text),
        ];
        let options = ChatOptions {
            temperature: 0.3,
            max_tokens: 200,
            model: None,
        };

        let reply = self.chat(&messages, &options).await?;

        match extract_tone_analysis(&reply) {
            Some(analysis) => Ok(ToneClassification::Parsed(analysis)),
            None => {
                tracing::warn!(
                    provider = self.name(),
                    "Tone reply not decodable, falling back to neutral"
                );
                Ok(ToneClassification::defaulted())
            }
        }
    }

    fn name(&self) -> &'static str;

    fn default_model(&self) -> &str;
}

#[derive(Debug, thiserror::Error)]
pub enum ResponderError {
    #[error("chat api request failed: {0}")]
    RequestFailed(String),
    #[error("chat rate limited")]
    RateLimited,
    #[error("chat temporarily unavailable: {0}")]
    TemporarilyUnavailable(String),
    #[error("invalid chat response: {0}")]
    InvalidResponse(String),
    #[error("chat misconfigured: {0}")]
    Configuration(String),
}

#[derive(serde::Deserialize)]
struct ToneReply {
    tone: Tone,
    #[serde(default, alias = "emotion_tags")]
    #[serde(rename = "emotionTags")]
    emotion_tags: Vec<String>,
    #[serde(default = "default_score")]
    sentiment_score: f32,
    #[serde(default = "default_score")]
    energy_score: f32,
}

fn default_score() -> f32 {
    0.5
}

/// Decode a tone reply: strict parse first, then the first brace-matched
/// substring (models often wrap the JSON in prose or code fences).
pub fn extract_tone_analysis(raw: &str) -> Option<ToneAnalysis> {
    if let Some(analysis) = decode_tone(raw.trim()) {
        return Some(analysis);
    }
    first_json_object(raw).and_then(decode_tone)
}

fn decode_tone(candidate: &str) -> Option<ToneAnalysis> {
    serde_json::from_str::<ToneReply>(candidate)
        .ok()
        .map(|reply| {
            ToneAnalysis::new(
                reply.tone,
                reply.emotion_tags,
                reply.sentiment_score,
                reply.energy_score,
            )
        })
}

fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}
