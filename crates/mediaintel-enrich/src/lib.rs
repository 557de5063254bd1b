//! AI enrichment port for mediaintel.
//!
//! The pipeline only ever sees [`EnrichmentPort`]: one async method that
//! returns either elaborated text or an explicit unavailable outcome. Two
//! backends implement it, selected from configuration at session start.

pub mod error;
pub mod gemini;
pub mod openrouter;
pub mod port;

use std::sync::Arc;
use std::time::Duration;

use mediaintel_core::{AiConfig, AiProvider};
use reqwest::{Client, Url};

pub use error::EnrichError;
pub use gemini::GeminiClient;
pub use openrouter::OpenRouterClient;
pub use port::{bounded, Enrichment, EnrichmentPort, EnrichmentRequest, EnrichmentTask};

const USER_AGENT: &str = "mediaintel/0.1 (campaign-analytics)";
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Build the configured backend, or `None` when enrichment is disabled.
///
/// # Errors
///
/// Returns [`EnrichError::MissingApiKey`] if the selected provider has no
/// key, or [`EnrichError::Http`] if the HTTP client cannot be built.
pub fn from_config(config: &AiConfig) -> Result<Option<Arc<dyn EnrichmentPort>>, EnrichError> {
    let port: Arc<dyn EnrichmentPort> = match config.provider {
        AiProvider::Disabled => return Ok(None),
        AiProvider::OpenRouter => {
            let key = config
                .openrouter_api_key
                .as_deref()
                .ok_or(EnrichError::MissingApiKey("openrouter"))?;
            Arc::new(OpenRouterClient::new(
                key,
                &config.openrouter_model,
                config.timeout_secs,
            )?)
        }
        AiProvider::Gemini => {
            let key = config
                .gemini_api_key
                .as_deref()
                .ok_or(EnrichError::MissingApiKey("gemini"))?;
            Arc::new(GeminiClient::new(key, &config.gemini_model, config.timeout_secs)?)
        }
    };
    tracing::info!(provider = %config.provider, timeout_secs = config.timeout_secs, "AI enrichment enabled");
    Ok(Some(port))
}

fn build_http_client(timeout_secs: u64) -> Result<Client, EnrichError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS.min(timeout_secs.max(1))))
        .user_agent(USER_AGENT)
        .build()?)
}

/// Parse a base URL, forcing exactly one trailing slash so relative joins
/// append to the path instead of replacing its last segment.
fn parse_base_url(base_url: &str) -> Result<Url, EnrichError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| EnrichError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })
}
