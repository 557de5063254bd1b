use std::path::PathBuf;

use crate::record::EngagementWeights;

/// Which AI backend, if any, elaborates insight wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProvider {
    Disabled,
    OpenRouter,
    Gemini,
}

impl std::fmt::Display for AiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AiProvider::Disabled => write!(f, "none"),
            AiProvider::OpenRouter => write!(f, "openrouter"),
            AiProvider::Gemini => write!(f, "gemini"),
        }
    }
}

/// Score cut-offs for bucketing numeric sentiment.
///
/// A score strictly above `positive` is positive, strictly below `negative`
/// is negative, anything else neutral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentThresholds {
    pub positive: f64,
    pub negative: f64,
}

impl SentimentThresholds {
    pub const DEFAULT_POSITIVE: f64 = 0.2;
    pub const DEFAULT_NEGATIVE: f64 = -0.2;
}

impl Default for SentimentThresholds {
    fn default() -> Self {
        Self {
            positive: Self::DEFAULT_POSITIVE,
            negative: Self::DEFAULT_NEGATIVE,
        }
    }
}

#[derive(Clone)]
pub struct AiConfig {
    pub provider: AiProvider,
    pub timeout_secs: u64,
    pub openrouter_api_key: Option<String>,
    pub openrouter_model: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
}

impl std::fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiConfig")
            .field("provider", &self.provider)
            .field("timeout_secs", &self.timeout_secs)
            .field(
                "openrouter_api_key",
                &self.openrouter_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("openrouter_model", &self.openrouter_model)
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("gemini_model", &self.gemini_model)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub normalize_path: Option<PathBuf>,
    pub sentiment_thresholds: SentimentThresholds,
    pub top_n: usize,
    pub weights: EngagementWeights,
    pub ai: AiConfig,
}
