use crate::domain::AiMode;

use super::RelatedEntry;

const DEFAULT_PROMPT_LIMIT: usize = 3;
const DEFAULT_EXCERPT_CHARS: usize = 200;

/// Builds the system instruction for response generation.
///
/// Retrieval injection and mode instruction are composed as independent
/// blocks, and only the best few retrieved entries make it into the
/// prompt, so token cost stays bounded no matter how many candidates the
/// retrieval step returned.
pub struct PromptComposer {
    prompt_limit: usize,
    excerpt_chars: usize,
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self {
            prompt_limit: DEFAULT_PROMPT_LIMIT,
            excerpt_chars: DEFAULT_EXCERPT_CHARS,
        }
    }
}

impl PromptComposer {
    pub fn new(prompt_limit: usize, excerpt_chars: usize) -> Self {
        Self {
            prompt_limit,
            excerpt_chars,
        }
    }

    pub fn compose(&self, mode: AiMode, sentiment_score: f32, related: &[RelatedEntry]) -> String {
        let mut prompt = String::from(
            "You are the reflective companion inside a voice journaling app. \
             The user has just spoken a journal entry aloud and you reply in writing.",
        );

        if !related.is_empty() {
            prompt.push_str("\n\nEarlier entries from this user that relate to today's:\n");
            for entry in related.iter().take(self.prompt_limit) {
                let tone = entry
                    .detected_tone
                    .map(|t| t.as_str())
                    .unwrap_or("unrecorded");
                prompt.push_str(&format!(
                    "- {} ({}): {}\n",
                    entry.created_at.format("%Y-%m-%d"),
                    tone,
                    excerpt(&entry.transcription, self.excerpt_chars)
                ));
            }
        }

        prompt.push_str("\n\n");
        prompt.push_str(&mode_instruction(mode, sentiment_score));
        prompt
    }
}

fn mode_instruction(mode: AiMode, sentiment_score: f32) -> String {
    match mode {
        AiMode::Listening => String::from(
            "Listening mode: validate the user's feelings and mirror the emotion \
             you hear in their words. Keep your response under 50 words. Do not \
             give advice, suggestions or action items of any kind.",
        ),
        AiMode::Coaching => String::from(
            "Coaching mode: start by validating what the user is feeling. Where \
             the earlier entries above show a recurring pattern, name it gently. \
             Ask exactly one reflective question. Keep your response under 150 \
             words.",
        ),
        AiMode::Smart => {
            let depth = if sentiment_score < 0.3 {
                "The user sounds like they are struggling right now. Respond with \
                 warmth and depth, sit with the difficulty before anything else, \
                 and make clear they are not alone."
            } else if sentiment_score < 0.6 {
                "The user sounds somewhere in the middle today. Acknowledge what \
                 they shared and offer one gentle observation."
            } else {
                "The user sounds like they are doing well. Celebrate with them \
                 briefly and reflect back what is working."
            };
            format!(
                "Smart mode: {} Reference the earlier entries above when they fit \
                 naturally; never force a connection.",
                depth
            )
        }
    }
}

fn excerpt(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}
