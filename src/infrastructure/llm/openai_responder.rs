use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::application::ports::{ChatOptions, Responder, ResponderError};
use crate::domain::{ChatMessage, MessageRole};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(60);

/// OpenAI chat-completions adapter.
pub struct OpenAiResponder {
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

impl OpenAiResponder {
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
impl Responder for OpenAiResponder {
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

        tracing::debug!(model, messages = messages.len(), "Sending chat request to OpenAI");

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

        if status == StatusCode::NOT_FOUND {
            return Err(ResponderError::Configuration(format!(
                "model '{}' is not available on this OpenAI account; configure a \
                 current model via CHAT_MODEL/DEEP_CHAT_MODEL",
                model
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
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
        "OpenAI"
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }
}
