use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use axum::Router;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use reverie::application::ports::{Embedder, EmbedderError};
use reverie::infrastructure::llm::{HuggingFaceEmbedder, RetryPolicy};

const MODEL_PATH: &str = "/pipeline/feature-extraction/test-model";

async fn start_mock_hf_server(
    responses: impl Fn(u32) -> (StatusCode, String) + Clone + Send + Sync + 'static,
) -> (String, Arc<AtomicU32>, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let calls = Arc::new(AtomicU32::new(0));
    let calls_for_handler = Arc::clone(&calls);

    let app = Router::new().route(
        MODEL_PATH,
        post(move || {
            let calls = Arc::clone(&calls_for_handler);
            let responses = responses.clone();
            async move {
                let attempt = calls.fetch_add(1, Ordering::SeqCst);
                let (status, body) = responses(attempt);
                (status, body).into_response()
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (base_url, calls, shutdown_tx)
}

fn embedder(base_url: &str, retry: RetryPolicy) -> HuggingFaceEmbedder {
    HuggingFaceEmbedder::new(
        "test-model".to_string(),
        4,
        None,
        Some(base_url.to_string()),
        retry,
    )
}

#[tokio::test]
async fn given_model_loading_once_when_embedding_then_retry_succeeds() {
    let (base_url, calls, shutdown_tx) = start_mock_hf_server(|attempt| {
        if attempt == 0 {
            (StatusCode::SERVICE_UNAVAILABLE, "loading".to_string())
        } else {
            (StatusCode::OK, "[[0.1, 0.2, 0.3, 0.4]]".to_string())
        }
    })
    .await;

    let result = embedder(&base_url, RetryPolicy::immediate(3))
        .embed("hello")
        .await;

    let embedding = result.unwrap();
    assert_eq!(embedding.dimensions(), 4);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_model_never_loading_when_embedding_then_unavailable_after_retry_budget() {
    let (base_url, calls, shutdown_tx) = start_mock_hf_server(|_| {
        (StatusCode::SERVICE_UNAVAILABLE, "loading".to_string())
    })
    .await;

    let result = embedder(&base_url, RetryPolicy::immediate(3))
        .embed("hello")
        .await;

    assert!(matches!(
        result,
        Err(EmbedderError::TemporarilyUnavailable(_))
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_endpoint_gone_when_embedding_then_configuration_error_names_the_fix() {
    let (base_url, calls, shutdown_tx) =
        start_mock_hf_server(|_| (StatusCode::GONE, "gone".to_string())).await;

    let result = embedder(&base_url, RetryPolicy::immediate(3))
        .embed("hello")
        .await;

    match result {
        Err(EmbedderError::Configuration(detail)) => {
            assert!(detail.contains("AI_EMBEDDING_PROVIDER"));
        }
        other => panic!("expected configuration error, got {:?}", other),
    }
    // Deprecation is not retried.
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_rate_limit_when_embedding_then_rate_limited_error() {
    let (base_url, _calls, shutdown_tx) =
        start_mock_hf_server(|_| (StatusCode::TOO_MANY_REQUESTS, "slow down".to_string())).await;

    let result = embedder(&base_url, RetryPolicy::immediate(3))
        .embed("hello")
        .await;

    assert!(matches!(result, Err(EmbedderError::RateLimited)));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_flat_vector_response_when_embedding_then_parsed() {
    let (base_url, _calls, shutdown_tx) =
        start_mock_hf_server(|_| (StatusCode::OK, "[0.5, 0.5, 0.5, 0.5]".to_string())).await;

    let embedding = embedder(&base_url, RetryPolicy::immediate(3))
        .embed("hello")
        .await
        .unwrap();

    assert_eq!(embedding.values, vec![0.5, 0.5, 0.5, 0.5]);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_batch_input_when_embedding_then_one_vector_per_text() {
    let (base_url, _calls, shutdown_tx) = start_mock_hf_server(|_| {
        (
            StatusCode::OK,
            "[[0.1, 0.2, 0.3, 0.4], [0.5, 0.6, 0.7, 0.8]]".to_string(),
        )
    })
    .await;

    let embeddings = embedder(&base_url, RetryPolicy::immediate(3))
        .embed_batch(&["one", "two"])
        .await
        .unwrap();

    assert_eq!(embeddings.len(), 2);
    assert_eq!(embeddings[1].values, vec![0.5, 0.6, 0.7, 0.8]);
    shutdown_tx.send(()).ok();
}
