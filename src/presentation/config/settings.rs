use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub providers: ProviderSettings,
    pub credentials: Credentials,
    pub chat: ChatSettings,
    pub modes: ModeSettings,
    pub retrieval: RetrievalSettings,
    pub embeddings: EmbeddingsSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy)]
pub struct ProviderSettings {
    pub transcription: TranscriptionProvider,
    pub llm: LlmProvider,
    pub embedding: EmbeddingProvider,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptionProvider {
    AssemblyAi,
    OpenAi,
}

impl FromStr for TranscriptionProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assemblyai" => Ok(Self::AssemblyAi),
            "openai" => Ok(Self::OpenAi),
            other => Err(format!("Invalid transcription provider: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    Groq,
    OpenAi,
}

impl FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "groq" => Ok(Self::Groq),
            "openai" => Ok(Self::OpenAi),
            other => Err(format!("Invalid LLM provider: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingProvider {
    HuggingFace,
    OpenAi,
}

impl FromStr for EmbeddingProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "huggingface" => Ok(Self::HuggingFace),
            "openai" => Ok(Self::OpenAi),
            other => Err(format!("Invalid embedding provider: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub openai_api_key: Option<String>,
    pub groq_api_key: Option<String>,
    pub assemblyai_api_key: Option<String>,
    pub huggingface_api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub model: String,
    pub deep_model: String,
    pub temperature: f32,
}

#[derive(Debug, Clone)]
pub struct ModeSettings {
    pub listening_max_tokens: u32,
    pub coaching_max_tokens: u32,
    pub smart_max_tokens: u32,
    pub distress_threshold: f32,
}

#[derive(Debug, Clone)]
pub struct RetrievalSettings {
    pub similarity_threshold: f32,
    pub fetch_limit: usize,
    pub prompt_limit: usize,
    pub excerpt_chars: usize,
}

#[derive(Debug, Clone)]
pub struct EmbeddingsSettings {
    pub model: String,
    pub dimensions: usize,
    pub index_dimension: usize,
    pub supported_dimensions: Vec<usize>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing credentials: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),
    #[error("invalid setting {name}: {detail}")]
    InvalidSetting { name: &'static str, detail: String },
}

impl Settings {
    /// Read configuration from the environment, falling back to the
    /// free-tier provider stack (AssemblyAI / Groq / Hugging Face).
    pub fn from_env() -> Result<Self, ConfigError> {
        let transcription = parse_provider("AI_TRANSCRIPTION_PROVIDER", "assemblyai")?;
        let llm = parse_provider("AI_LLM_PROVIDER", "groq")?;
        let embedding = parse_provider("AI_EMBEDDING_PROVIDER", "huggingface")?;

        let (default_model, default_deep_model) = match llm {
            LlmProvider::Groq => ("llama-3.1-8b-instant", "llama-3.1-70b-versatile"),
            LlmProvider::OpenAi => ("gpt-4o-mini", "gpt-4o"),
        };
        let (default_embedding_model, default_dimensions) = match embedding {
            EmbeddingProvider::HuggingFace => ("sentence-transformers/all-MiniLM-L6-v2", 384),
            EmbeddingProvider::OpenAi => ("text-embedding-3-small", 1536),
        };

        Ok(Self {
            server: ServerSettings {
                host: env_or("SERVER_HOST", "0.0.0.0"),
                port: std::env::var("SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(3000),
            },
            providers: ProviderSettings {
                transcription,
                llm,
                embedding,
            },
            credentials: Credentials {
                openai_api_key: env_opt("OPENAI_API_KEY"),
                groq_api_key: env_opt("GROQ_API_KEY"),
                assemblyai_api_key: env_opt("ASSEMBLYAI_API_KEY"),
                huggingface_api_key: env_opt("HUGGINGFACE_API_KEY"),
            },
            chat: ChatSettings {
                model: env_or("CHAT_MODEL", default_model),
                deep_model: env_or("DEEP_CHAT_MODEL", default_deep_model),
                temperature: 0.7,
            },
            modes: ModeSettings {
                listening_max_tokens: 120,
                coaching_max_tokens: 400,
                smart_max_tokens: 300,
                distress_threshold: 0.3,
            },
            retrieval: RetrievalSettings {
                similarity_threshold: 0.5,
                fetch_limit: 5,
                prompt_limit: 3,
                excerpt_chars: 200,
            },
            embeddings: EmbeddingsSettings {
                model: env_or("EMBEDDING_MODEL", default_embedding_model),
                dimensions: std::env::var("EMBEDDING_DIMENSIONS")
                    .ok()
                    .and_then(|d| d.parse().ok())
                    .unwrap_or(default_dimensions),
                index_dimension: 1536,
                supported_dimensions: vec![384, 768, 1536],
            },
        })
    }

    /// Check that every selected provider has its credential, listing all
    /// missing ones at once. The Hugging Face key is optional: the free
    /// tier works without it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut missing: Vec<&'static str> = Vec::new();

        let required = [
            (
                match self.providers.transcription {
                    TranscriptionProvider::AssemblyAi => "ASSEMBLYAI_API_KEY",
                    TranscriptionProvider::OpenAi => "OPENAI_API_KEY",
                },
                self.transcription_api_key().is_none(),
            ),
            (
                match self.providers.llm {
                    LlmProvider::Groq => "GROQ_API_KEY",
                    LlmProvider::OpenAi => "OPENAI_API_KEY",
                },
                self.llm_api_key().is_none(),
            ),
            (
                "OPENAI_API_KEY",
                self.providers.embedding == EmbeddingProvider::OpenAi
                    && self.credentials.openai_api_key.is_none(),
            ),
        ];

        for (key, absent) in required {
            if absent && !missing.contains(&key) {
                missing.push(key);
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::MissingCredentials(missing))
        }
    }

    pub fn transcription_api_key(&self) -> Option<String> {
        match self.providers.transcription {
            TranscriptionProvider::AssemblyAi => self.credentials.assemblyai_api_key.clone(),
            TranscriptionProvider::OpenAi => self.credentials.openai_api_key.clone(),
        }
    }

    pub fn llm_api_key(&self) -> Option<String> {
        match self.providers.llm {
            LlmProvider::Groq => self.credentials.groq_api_key.clone(),
            LlmProvider::OpenAi => self.credentials.openai_api_key.clone(),
        }
    }

    pub fn embedding_api_key(&self) -> Option<String> {
        match self.providers.embedding {
            EmbeddingProvider::HuggingFace => self.credentials.huggingface_api_key.clone(),
            EmbeddingProvider::OpenAi => self.credentials.openai_api_key.clone(),
        }
    }
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn env_or(name: &str, default: &str) -> String {
    env_opt(name).unwrap_or_else(|| default.to_string())
}

fn parse_provider<P: FromStr<Err = String>>(
    name: &'static str,
    default: &str,
) -> Result<P, ConfigError> {
    env_or(name, default)
        .parse()
        .map_err(|detail| ConfigError::InvalidSetting { name, detail })
}
