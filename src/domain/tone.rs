use std::fmt;
use std::str::FromStr;

/// Overall emotional tone detected in a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
    SeekingHelp,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Positive => "positive",
            Tone::Negative => "negative",
            Tone::Neutral => "neutral",
            Tone::SeekingHelp => "seeking_help",
        }
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Tone::Positive),
            "negative" => Ok(Tone::Negative),
            "neutral" => Ok(Tone::Neutral),
            "seeking_help" => Ok(Tone::SeekingHelp),
            other => Err(format!("Invalid tone: {}", other)),
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tone, emotion tags and scores extracted from one entry.
///
/// Scores are clamped to [0.0, 1.0] on construction; model output is not
/// trusted to stay inside the range.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ToneAnalysis {
    pub tone: Tone,
    pub emotion_tags: Vec<String>,
    pub sentiment_score: f32,
    pub energy_score: f32,
}

impl ToneAnalysis {
    pub fn new(
        tone: Tone,
        emotion_tags: Vec<String>,
        sentiment_score: f32,
        energy_score: f32,
    ) -> Self {
        Self {
            tone,
            emotion_tags,
            sentiment_score: sentiment_score.clamp(0.0, 1.0),
            energy_score: energy_score.clamp(0.0, 1.0),
        }
    }

    /// Fallback used when the model reply cannot be decoded.
    pub fn neutral() -> Self {
        Self {
            tone: Tone::Neutral,
            emotion_tags: Vec::new(),
            sentiment_score: 0.5,
            energy_score: 0.5,
        }
    }
}

/// Result of a tone-classification call.
///
/// A transport failure propagates as an error; an undecodable reply does
/// not. The caller can tell a real classification from the neutral
/// fallback without either aborting the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum ToneClassification {
    Parsed(ToneAnalysis),
    Defaulted(ToneAnalysis),
}

impl ToneClassification {
    pub fn defaulted() -> Self {
        Self::Defaulted(ToneAnalysis::neutral())
    }

    pub fn analysis(&self) -> &ToneAnalysis {
        match self {
            ToneClassification::Parsed(analysis) => analysis,
            ToneClassification::Defaulted(analysis) => analysis,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, ToneClassification::Defaulted(_))
    }
}
