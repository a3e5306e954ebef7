use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;

use reverie::application::ports::{
    ChatOptions, Embedder, EmbedderError, EntryStore, Responder, ResponderError, Transcriber,
    TranscriberError, Transcription,
};
use reverie::application::services::{
    CapabilityManager, JournalService, PromptComposer, ResponseRouting, RetrievalService,
};
use reverie::domain::{ChatMessage, Embedding};
use reverie::infrastructure::persistence::InMemoryEntryStore;
use reverie::presentation::{AppState, create_router};

const TEST_SIMILARITY_THRESHOLD: f32 = 0.5;
const TEST_FETCH_LIMIT: usize = 5;
const TEST_INDEX_DIMENSION: usize = 384;
const TEST_USER_ID: &str = "4f6cfe9a-9010-44e9-b2bb-edbe85ac38a2";

struct MockTranscriber;

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, _audio_data: &[u8]) -> Result<Transcription, TranscriberError> {
        Ok(Transcription {
            text: "I had a wonderful day at the park".to_string(),
            language: Some("en".to_string()),
            duration_seconds: Some(4.2),
        })
    }

    fn name(&self) -> &'static str {
        "Mock"
    }
}

struct MockEmbedder;

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, _text: &str) -> Result<Embedding, EmbedderError> {
        Ok(Embedding::new(vec![0.1; TEST_INDEX_DIMENSION]))
    }

    fn dimensions(&self) -> usize {
        TEST_INDEX_DIMENSION
    }

    fn name(&self) -> &'static str {
        "Mock"
    }
}

struct MockResponder;

#[async_trait]
impl Responder for MockResponder {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        _options: &ChatOptions,
    ) -> Result<String, ResponderError> {
        let is_tone_call = messages
            .first()
            .map(|m| m.content.starts_with("Analyze the user's journal entry"))
            .unwrap_or(false);
        if is_tone_call {
            return Ok(r#"{"tone": "positive", "emotionTags": ["joy"], "sentiment_score": 0.8, "energy_score": 0.7}"#.to_string());
        }
        Ok("That sounds like a really good day.".to_string())
    }

    fn name(&self) -> &'static str {
        "Mock"
    }

    fn default_model(&self) -> &str {
        "llama-3.1-8b-instant"
    }
}

fn test_state() -> AppState {
    let capabilities = Arc::new(CapabilityManager::new(
        Arc::new(MockTranscriber),
        Arc::new(MockEmbedder),
        Arc::new(MockResponder),
    ));
    let store: Arc<dyn EntryStore> =
        Arc::new(InMemoryEntryStore::new(vec![TEST_INDEX_DIMENSION]));
    let retrieval = RetrievalService::new(
        Arc::clone(&store),
        TEST_SIMILARITY_THRESHOLD,
        TEST_FETCH_LIMIT,
    );
    let journal_service = Arc::new(JournalService::new(
        Arc::clone(&capabilities),
        store,
        retrieval,
        PromptComposer::default(),
        ResponseRouting::default(),
        TEST_INDEX_DIMENSION,
    ));

    AppState {
        journal_service,
        capabilities,
    }
}

#[tokio::test]
async fn given_running_service_when_checking_health_then_healthy() {
    let router = create_router(test_state());

    let response = router
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn given_no_user_header_when_posting_journal_then_unauthorized() {
    let router = create_router(test_state());

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/journal")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"transcription": "hello", "aiMode": "listening"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn given_empty_transcription_when_posting_journal_then_bad_request() {
    let router = create_router(test_state());

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/journal")
                .header("x-user-id", TEST_USER_ID)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"transcription": "  ", "aiMode": "smart"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn given_valid_entry_when_posting_journal_then_processed_entry_returned() {
    let router = create_router(test_state());

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/journal")
                .header("x-user-id", TEST_USER_ID)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"transcription": "I had a wonderful day at the park", "aiMode": "listening"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(
        body["responseText"].as_str(),
        Some("That sounds like a really good day.")
    );
    assert_eq!(body["tone"].as_str(), Some("positive"));
    assert_eq!(body["referencedCount"].as_u64(), Some(0));
    assert!(body["sentimentScore"].as_f64().unwrap() > 0.5);
    assert!(body["entryId"].as_str().is_some());
}

#[tokio::test]
async fn given_audio_bytes_when_posting_transcribe_then_text_returned() {
    let router = create_router(test_state());

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/transcribe")
                .header("x-user-id", TEST_USER_ID)
                .body(Body::from(vec![0u8; 64]))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(
        body["text"].as_str(),
        Some("I had a wonderful day at the park")
    );
    assert_eq!(body["language"].as_str(), Some("en"));
}

#[tokio::test]
async fn given_no_user_header_when_posting_transcribe_then_unauthorized() {
    let router = create_router(test_state());

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/transcribe")
                .body(Body::from(vec![0u8; 64]))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
