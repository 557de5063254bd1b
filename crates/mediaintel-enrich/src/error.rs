use thiserror::Error;

/// Failures talking to an AI provider. Never surfaced past the port: every
/// variant is turned into [`crate::Enrichment::Unavailable`].
#[derive(Debug, Error)]
pub enum EnrichError {
    /// Network or TLS failure, or a non-2xx status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("provider returned an error: {0}")]
    Provider(String),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("provider returned no text")]
    EmptyResponse,

    #[error("timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("provider {0} selected but no API key is configured")]
    MissingApiKey(&'static str),
}
