//! `OpenRouter` chat-completions backend.

use std::time::Duration;

use async_trait::async_trait;
use mediaintel_core::AiProvider;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::EnrichError;
use crate::port::{bounded, Enrichment, EnrichmentPort, EnrichmentRequest};
use crate::{build_http_client, parse_base_url};

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1/";
const APP_TITLE: &str = "mediaintel";

/// Client for the `OpenRouter` OpenAI-compatible API.
pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: Url,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    error: Option<ApiErrorBody>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl OpenRouterClient {
    /// # Errors
    ///
    /// Returns [`EnrichError::Http`] if the HTTP client cannot be built.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, EnrichError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Point the client at another host (used with wiremock in tests).
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError::Http`] if the HTTP client cannot be built, or
    /// [`EnrichError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, EnrichError> {
        let endpoint = parse_base_url(base_url)?
            .join("chat/completions")
            .map_err(|e| EnrichError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            client: build_http_client(timeout_secs)?,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            endpoint,
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one prompt and return the first choice's text.
    ///
    /// # Errors
    ///
    /// - [`EnrichError::Http`] on network failure or non-2xx status.
    /// - [`EnrichError::Provider`] when the body carries an `error` object.
    /// - [`EnrichError::Deserialize`] if the body is not the expected shape.
    /// - [`EnrichError::EmptyResponse`] when no choice has content.
    pub async fn complete(&self, prompt: &str) -> Result<String, EnrichError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.3,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .header("X-Title", APP_TITLE)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        let text = response.text().await?;

        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|e| EnrichError::Deserialize {
                context: format!("openrouter chat completion ({})", self.model),
                source: e,
            })?;
        if let Some(err) = parsed.error {
            return Err(EnrichError::Provider(err.message));
        }

        parsed
            .choices
            .into_iter()
            .find_map(|c| c.message.content.filter(|t| !t.trim().is_empty()))
            .ok_or(EnrichError::EmptyResponse)
    }
}

#[async_trait]
impl EnrichmentPort for OpenRouterClient {
    async fn elaborate(&self, request: &EnrichmentRequest) -> Enrichment {
        let prompt = request.prompt();
        bounded(
            AiProvider::OpenRouter,
            request.timeout.max(Duration::from_millis(1)),
            self.complete(&prompt),
        )
        .await
    }
}
