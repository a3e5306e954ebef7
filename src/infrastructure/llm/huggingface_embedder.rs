use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::application::ports::{Embedder, EmbedderError};
use crate::domain::Embedding;

use super::RetryPolicy;

const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Hugging Face hosted inference embedder.
///
/// The hosted API answers 503 while a cold model is loading; those are
/// retried against a bounded budget, honoring the Retry-After header when
/// one is sent. A 404/410 on the inference endpoint means the hosted
/// pipeline for the model is gone, which no amount of retrying fixes.
pub struct HuggingFaceEmbedder {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    dimensions: usize,
    base_url: String,
    retry: RetryPolicy,
}

impl HuggingFaceEmbedder {
    pub fn new(
        model: String,
        dimensions: usize,
        api_key: Option<String>,
        base_url: Option<String>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            // The API key is optional: the free tier works without one,
            // just with tighter rate limits.
            api_key: api_key.filter(|k| !k.is_empty()),
            model,
            dimensions,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            retry,
        }
    }

    async fn request(&self, inputs: serde_json::Value) -> Result<serde_json::Value, EmbedderError> {
        let url = format!(
            "{}/pipeline/feature-extraction/{}",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        let body = serde_json::json!({
            "inputs": inputs,
            "options": { "wait_for_model": true },
        });

        let mut attempt = 0u32;
        loop {
            attempt += 1;

            let mut request = self.client.post(&url).timeout(REQUEST_TIMEOUT).json(&body);
            if let Some(key) = &self.api_key {
                request = request.bearer_auth(key);
            }

            let response = request
                .send()
                .await
                .map_err(|e| EmbedderError::RequestFailed(e.to_string()))?;
            let status = response.status();

            if status == StatusCode::SERVICE_UNAVAILABLE {
                if attempt >= self.retry.max_attempts {
                    return Err(EmbedderError::TemporarilyUnavailable(format!(
                        "model '{}' still loading after {} attempts",
                        self.model, attempt
                    )));
                }
                let retry_after = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .map(Duration::from_secs);
                let delay = self.retry.delay(retry_after);
                tracing::warn!(
                    model = %self.model,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Hugging Face model loading, retrying"
                );
                tokio::time::sleep(delay).await;
                continue;
            }

            if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
                return Err(EmbedderError::Configuration(format!(
                    "hosted inference endpoint for '{}' is no longer served (HTTP {}); \
                     switch AI_EMBEDDING_PROVIDER=openai or configure a model that is still hosted",
                    self.model, status
                )));
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(EmbedderError::RateLimited);
            }

            if !status.is_success() {
                let detail = response.text().await.unwrap_or_default();
                return Err(EmbedderError::RequestFailed(format!(
                    "HTTP {}: {}",
                    status, detail
                )));
            }

            return response
                .json()
                .await
                .map_err(|e| EmbedderError::InvalidResponse(e.to_string()));
        }
    }
}

#[async_trait]
impl Embedder for HuggingFaceEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbedderError> {
        let value = self.request(serde_json::json!(text)).await?;
        let values = vector_from_value(&value)?;
        Ok(Embedding::new(values))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbedderError> {
        let value = self.request(serde_json::json!(texts)).await?;
        let rows = value
            .as_array()
            .ok_or_else(|| EmbedderError::InvalidResponse("expected a batch array".to_string()))?;
        rows.iter()
            .map(|row| vector_from_value(row).map(Embedding::new))
            .collect()
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &'static str {
        "Hugging Face"
    }
}

/// The feature-extraction pipeline answers either a flat vector or a
/// single-row batch depending on the input shape.
fn vector_from_value(value: &serde_json::Value) -> Result<Vec<f32>, EmbedderError> {
    let row = match value.as_array() {
        Some(array) if array.first().map(|v| v.is_array()).unwrap_or(false) => array[0]
            .as_array()
            .ok_or_else(|| EmbedderError::InvalidResponse("malformed batch row".to_string()))?,
        Some(array) => array,
        None => {
            return Err(EmbedderError::InvalidResponse(
                "expected an embedding array".to_string(),
            ));
        }
    };

    row.iter()
        .map(|v| {
            v.as_f64()
                .map(|f| f as f32)
                .ok_or_else(|| EmbedderError::InvalidResponse("non-numeric component".to_string()))
        })
        .collect()
}
