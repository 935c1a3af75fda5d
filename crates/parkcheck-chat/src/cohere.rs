//! Cohere v2 chat transport.
//!
//! Posts the whole transcript to `/v2/chat` and joins the text blocks of
//! the reply. Transcript entries already serialize as
//! `{"role": ..., "content": ...}`, which is the message shape the endpoint
//! accepts, so they are sent as-is.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use parkcheck_core::models::transcript::ChatEntry;

use crate::ChatBackend;
use crate::error::ChatError;

pub const COHERE_CHAT_URL: &str = "https://api.cohere.com/v2/chat";
pub const DEFAULT_MODEL: &str = "command-r-08-2024";
pub const DEFAULT_TEMPERATURE: f32 = 0.4;
/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "COHERE_API_KEY";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatEntry],
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

pub struct CohereClient {
    agent: ureq::Agent,
    api_key: Option<String>,
    endpoint: String,
    model: String,
    temperature: f32,
}

impl CohereClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            endpoint: COHERE_CHAT_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Client keyed from [`API_KEY_VAR`]. A missing key is not an error here;
    /// every request then fails with [`ChatError::NotConfigured`].
    pub fn from_env() -> Self {
        Self::new(std::env::var(API_KEY_VAR).ok())
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl ChatBackend for CohereClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn complete(&self, messages: &[ChatEntry]) -> Result<String, ChatError> {
        let api_key = self.api_key.as_deref().ok_or(ChatError::NotConfigured)?;

        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
        };

        debug!(model = %self.model, messages = messages.len(), "sending chat request");

        let mut response = self
            .agent
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Accept", "application/json")
            .send_json(&request)
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        let reply = parse_reply(&body)?;
        info!(model = %self.model, reply_len = reply.len(), "chat response received");
        Ok(reply)
    }
}

/// Join the text blocks of a reply. `None` when there are none.
fn extract_text(body: ChatResponse) -> Option<String> {
    let texts: Vec<String> = body
        .message
        .content
        .into_iter()
        .filter_map(|block| match block {
            ContentBlock::Text { text } => Some(text),
            ContentBlock::Other => None,
        })
        .collect();
    (!texts.is_empty()).then(|| texts.concat())
}

/// Parse a raw `/v2/chat` response body into the reply text.
///
/// A reply without any text block is a failed exchange.
pub fn parse_reply(body: &str) -> Result<String, ChatError> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| ChatError::Transport(format!("invalid response body: {e}")))?;
    extract_text(parsed).ok_or_else(|| ChatError::Transport("reply contained no text".to_string()))
}
