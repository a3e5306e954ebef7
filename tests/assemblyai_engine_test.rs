use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use axum::Router;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use reverie::application::ports::{Transcriber, TranscriberError};
use reverie::infrastructure::audio::AssemblyAiEngine;

/// Mock of the three-step AssemblyAI flow: upload, submit, poll. The poll
/// endpoint serves `pending_polls` "processing" answers before the final
/// status.
async fn start_mock_assemblyai_server(
    pending_polls: u32,
    final_status: &'static str,
) -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let polls = Arc::new(AtomicU32::new(0));

    let app = Router::new()
        .route(
            "/upload",
            post(|| async { r#"{"upload_url": "https://cdn.example/audio"}"# }),
        )
        .route("/transcript", post(|| async { r#"{"id": "t-1"}"# }))
        .route(
            "/transcript/{id}",
            get(move || {
                let polls = Arc::clone(&polls);
                async move {
                    let seen = polls.fetch_add(1, Ordering::SeqCst);
                    if seen < pending_polls {
                        return r#"{"status": "processing"}"#.into_response();
                    }
                    match final_status {
                        "completed" => {
                            r#"{"status": "completed", "text": "I had a wonderful day", "language_code": "en", "audio_duration": 12.5}"#
                                .into_response()
                        }
                        _ => r#"{"status": "error", "error": "audio unreadable"}"#.into_response(),
                    }
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

    (base_url, shutdown_tx)
}

fn engine(base_url: &str, max_polls: u32) -> AssemblyAiEngine {
    AssemblyAiEngine::new("test-key".to_string(), Some(base_url.to_string()))
        .with_polling(Duration::ZERO, max_polls)
}

#[tokio::test]
async fn given_job_completing_after_polls_when_transcribing_then_text_returned() {
    let (base_url, shutdown_tx) = start_mock_assemblyai_server(2, "completed").await;

    let transcription = engine(&base_url, 5).transcribe(b"fake audio").await.unwrap();

    assert_eq!(transcription.text, "I had a wonderful day");
    assert_eq!(transcription.language.as_deref(), Some("en"));
    assert_eq!(transcription.duration_seconds, Some(12.5));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_vendor_error_status_when_transcribing_then_request_failed() {
    let (base_url, shutdown_tx) = start_mock_assemblyai_server(0, "error").await;

    let result = engine(&base_url, 5).transcribe(b"bad audio").await;

    match result {
        Err(TranscriberError::RequestFailed(detail)) => {
            assert!(detail.contains("audio unreadable"));
        }
        other => panic!("expected request failure, got {:?}", other),
    }
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_job_never_completing_when_transcribing_then_unavailable_after_poll_budget() {
    let (base_url, shutdown_tx) = start_mock_assemblyai_server(u32::MAX, "completed").await;

    let result = engine(&base_url, 3).transcribe(b"slow audio").await;

    assert!(matches!(
        result,
        Err(TranscriberError::TemporarilyUnavailable(_))
    ));
    shutdown_tx.send(()).ok();
}
