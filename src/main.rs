use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use reverie::application::ports::EntryStore;
use reverie::application::services::{
    CapabilityManager, JournalService, PromptComposer, ResponseRouting, RetrievalService,
};
use reverie::infrastructure::audio::TranscriptionEngineFactory;
use reverie::infrastructure::llm::{EmbedderFactory, ResponderFactory};
use reverie::infrastructure::observability::{TracingConfig, init_tracing};
use reverie::infrastructure::persistence::InMemoryEntryStore;
use reverie::presentation::{AppState, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    init_tracing(TracingConfig::default(), settings.server.port);

    // Fail fast on absent credentials, before anything is served.
    settings.validate()?;

    let transcriber = TranscriptionEngineFactory::create(
        settings.providers.transcription,
        settings.transcription_api_key(),
    )?;
    let embedder = EmbedderFactory::create(
        settings.providers.embedding,
        settings.embeddings.model.clone(),
        settings.embeddings.dimensions,
        settings.embedding_api_key(),
    )?;
    let responder = ResponderFactory::create(
        settings.providers.llm,
        settings.chat.model.clone(),
        settings.llm_api_key(),
    )?;

    let capabilities = Arc::new(CapabilityManager::new(transcriber, embedder, responder));
    let info = capabilities.provider_info();
    tracing::info!(
        transcription = %info.transcription,
        llm = %info.llm,
        embedding = %info.embedding,
        "AI capabilities configured"
    );

    let store: Arc<dyn EntryStore> = Arc::new(InMemoryEntryStore::new(
        settings.embeddings.supported_dimensions.clone(),
    ));

    let retrieval = RetrievalService::new(
        Arc::clone(&store),
        settings.retrieval.similarity_threshold,
        settings.retrieval.fetch_limit,
    );
    let composer = PromptComposer::new(
        settings.retrieval.prompt_limit,
        settings.retrieval.excerpt_chars,
    );
    let routing = ResponseRouting {
        chat_model: settings.chat.model.clone(),
        deep_chat_model: settings.chat.deep_model.clone(),
        temperature: settings.chat.temperature,
        listening_max_tokens: settings.modes.listening_max_tokens,
        coaching_max_tokens: settings.modes.coaching_max_tokens,
        smart_max_tokens: settings.modes.smart_max_tokens,
        distress_threshold: settings.modes.distress_threshold,
    };

    let journal_service = Arc::new(JournalService::new(
        Arc::clone(&capabilities),
        store,
        retrieval,
        composer,
        routing,
        settings.embeddings.index_dimension,
    ));

    let state = AppState {
        journal_service,
        capabilities,
    };

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
