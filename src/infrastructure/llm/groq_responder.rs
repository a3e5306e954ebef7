use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::application::ports::{ChatOptions, Responder, ResponderError};
use crate::domain::{ChatMessage, MessageRole};

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(60);

/// Groq chat-completions adapter (OpenAI-compatible wire format).
pub struct GroqResponder {
    client: Client,
    api_key: String,
    default_model: String,
    base_url: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: MessageRole,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: Option<String>,
    code: Option<String>,
}

impl GroqResponder {
    pub fn new(api_key: String, default_model: String, base_url: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            default_model,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}

#[async_trait]
impl Responder for GroqResponder {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<String, ResponderError> {
        let model = options.model.as_deref().unwrap_or(&self.default_model);
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let request_body = ChatRequest {
            model,
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role,
                    content: &m.content,
                })
                .collect(),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        tracing::debug!(model, messages = messages.len(), "Sending chat request to Groq");

        let response = self
            .client
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| ResponderError::RequestFailed(e.to_string()))?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ResponderError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if let Some(detail) = decode_error(&body) {
                // Groq retires models aggressively; surface what to change
                // instead of a bare HTTP failure.
                if detail.code.as_deref() == Some("model_decommissioned")
                    || detail
                        .message
                        .as_deref()
                        .is_some_and(|m| m.contains("decommissioned"))
                {
                    return Err(ResponderError::Configuration(format!(
                        "model '{}' has been decommissioned by Groq; configure a current \
                         model via CHAT_MODEL/DEEP_CHAT_MODEL or switch AI_LLM_PROVIDER=openai",
                        model
                    )));
                }
                return Err(ResponderError::RequestFailed(format!(
                    "HTTP {}: {}",
                    status,
                    detail.message.unwrap_or_default()
                )));
            }
            return Err(ResponderError::RequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| ResponderError::InvalidResponse(e.to_string()))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ResponderError::InvalidResponse("no choices in response".to_string()))
    }

    fn name(&self) -> &'static str {
        "Groq"
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }
}

fn decode_error(body: &str) -> Option<ErrorDetail> {
    serde_json::from_str::<ErrorBody>(body).ok()?.error
}
