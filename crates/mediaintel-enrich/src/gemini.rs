//! Google Gemini `generateContent` backend.

use std::time::Duration;

use async_trait::async_trait;
use mediaintel_core::AiProvider;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::EnrichError;
use crate::port::{bounded, Enrichment, EnrichmentPort, EnrichmentRequest};
use crate::{build_http_client, parse_base_url};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";

pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: Url,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiClient {
    /// # Errors
    ///
    /// Returns [`EnrichError::Http`] if the HTTP client cannot be built.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, EnrichError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

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
            .join(&format!("models/{model}:generateContent"))
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

    /// Send one prompt and return the concatenated text parts of the first
    /// candidate that has any.
    ///
    /// # Errors
    ///
    /// - [`EnrichError::Http`] on network failure or non-2xx status.
    /// - [`EnrichError::Deserialize`] if the body is not the expected shape.
    /// - [`EnrichError::EmptyResponse`] when no candidate carries text.
    pub async fn complete(&self, prompt: &str) -> Result<String, EnrichError> {
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
            generation_config: GenerationConfig { temperature: 0.3 },
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        let text = response.text().await?;

        let parsed: GenerateResponse =
            serde_json::from_str(&text).map_err(|e| EnrichError::Deserialize {
                context: format!("gemini generateContent ({})", self.model),
                source: e,
            })?;

        parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .find(|t| !t.trim().is_empty())
            .ok_or(EnrichError::EmptyResponse)
    }
}

#[async_trait]
impl EnrichmentPort for GeminiClient {
    async fn elaborate(&self, request: &EnrichmentRequest) -> Enrichment {
        let prompt = request.prompt();
        bounded(
            AiProvider::Gemini,
            request.timeout.max(Duration::from_millis(1)),
            self.complete(&prompt),
        )
        .await
    }
}
