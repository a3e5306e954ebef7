use reverie::presentation::config::{
    ChatSettings, ConfigError, Credentials, EmbeddingProvider, EmbeddingsSettings, LlmProvider,
    ModeSettings, ProviderSettings, RetrievalSettings, ServerSettings, Settings,
    TranscriptionProvider,
};

fn settings_with(providers: ProviderSettings, credentials: Credentials) -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 3000,
        },
        providers,
        credentials,
        chat: ChatSettings {
            model: "llama-3.1-8b-instant".to_string(),
            deep_model: "llama-3.1-70b-versatile".to_string(),
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
            model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            dimensions: 384,
            index_dimension: 1536,
            supported_dimensions: vec![384, 768, 1536],
        },
    }
}

fn no_credentials() -> Credentials {
    Credentials {
        openai_api_key: None,
        groq_api_key: None,
        assemblyai_api_key: None,
        huggingface_api_key: None,
    }
}

#[test]
fn given_all_credentials_present_when_validating_then_ok() {
    let settings = settings_with(
        ProviderSettings {
            transcription: TranscriptionProvider::AssemblyAi,
            llm: LlmProvider::Groq,
            embedding: EmbeddingProvider::HuggingFace,
        },
        Credentials {
            assemblyai_api_key: Some("a-key".to_string()),
            groq_api_key: Some("g-key".to_string()),
            ..no_credentials()
        },
    );

    assert!(settings.validate().is_ok());
}

#[test]
fn given_missing_credentials_when_validating_then_every_missing_key_listed() {
    let settings = settings_with(
        ProviderSettings {
            transcription: TranscriptionProvider::AssemblyAi,
            llm: LlmProvider::Groq,
            embedding: EmbeddingProvider::HuggingFace,
        },
        no_credentials(),
    );

    match settings.validate() {
        Err(ConfigError::MissingCredentials(missing)) => {
            assert_eq!(missing, vec!["ASSEMBLYAI_API_KEY", "GROQ_API_KEY"]);
        }
        other => panic!("expected missing credentials, got {:?}", other),
    }
}

#[test]
fn given_openai_selected_everywhere_when_validating_then_key_reported_once() {
    let settings = settings_with(
        ProviderSettings {
            transcription: TranscriptionProvider::OpenAi,
            llm: LlmProvider::OpenAi,
            embedding: EmbeddingProvider::OpenAi,
        },
        no_credentials(),
    );

    match settings.validate() {
        Err(ConfigError::MissingCredentials(missing)) => {
            assert_eq!(missing, vec!["OPENAI_API_KEY"]);
        }
        other => panic!("expected missing credentials, got {:?}", other),
    }
}

#[test]
fn given_huggingface_without_key_when_validating_then_still_ok() {
    // The Hugging Face free tier needs no key at all.
    let settings = settings_with(
        ProviderSettings {
            transcription: TranscriptionProvider::OpenAi,
            llm: LlmProvider::OpenAi,
            embedding: EmbeddingProvider::HuggingFace,
        },
        Credentials {
            openai_api_key: Some("o-key".to_string()),
            ..no_credentials()
        },
    );

    assert!(settings.validate().is_ok());
}
