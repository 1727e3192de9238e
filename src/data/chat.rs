use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::client::{ApiError, RetryPolicy, build_http_client, send_json};
use crate::domain::chat::{ASSISTANT_ACK, ChatRole};

pub const CHAT_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const CHAT_MODEL: &str = "gemini-2.5-flash";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const CHAT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("The weather assistant is not configured. Set {API_KEY_ENV} to enable it.")]
    MissingApiKey,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("The weather assistant returned an empty reply.")]
    EmptyResponse,
}

/// A remote completion endpoint. Implemented by [`ChatClient`] and by test doubles.
pub trait ChatBackend {
    fn complete(
        &self,
        system_prompt: &str,
        history: &[(ChatRole, &str)],
        message: &str,
    ) -> impl Future<Output = Result<String, ChatError>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 1024,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    generation: GenerationConfig,
}

impl ChatClient {
    /// A blank key counts as missing.
    pub fn with_base_url(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: build_http_client(CHAT_TIMEOUT),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: CHAT_MODEL.to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            generation: GenerationConfig::default(),
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_http_client(timeout);
        self
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

impl ChatBackend for ChatClient {
    async fn complete(
        &self,
        system_prompt: &str,
        history: &[(ChatRole, &str)],
        message: &str,
    ) -> Result<String, ChatError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(ChatError::MissingApiKey);
        };

        let body = GenerateRequest {
            contents: build_contents(system_prompt, history, message),
            generation_config: self.generation,
        };
        let url = self.endpoint();
        debug!(model = %self.model, turns = body.contents.len(), "sending chat turn");

        let response: GenerateResponse = send_json(RetryPolicy::none(), || {
            self.client
                .post(&url)
                .query(&[("key", api_key)])
                .json(&body)
        })
        .await?;

        let text = response.text();
        if text.trim().is_empty() {
            return Err(ChatError::EmptyResponse);
        }
        Ok(text)
    }
}

/// System prime as a user turn, the fixed acknowledgement, prior turns, then the new message.
fn build_contents(
    system_prompt: &str,
    history: &[(ChatRole, &str)],
    message: &str,
) -> Vec<Content> {
    let mut contents = Vec::with_capacity(history.len() + 3);
    contents.push(Content::new(ChatRole::User, system_prompt));
    contents.push(Content::new(ChatRole::Assistant, ASSISTANT_ACK));
    contents.extend(
        history
            .iter()
            .map(|(role, text)| Content::new(*role, text)),
    );
    contents.push(Content::new(ChatRole::User, message));
    contents
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Content {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn new(role: ChatRole, text: &str) -> Self {
        let role = match role {
            ChatRole::User => "user",
            ChatRole::Assistant => "model",
        };
        Self {
            role: role.to_string(),
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateResponse {
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}
