//! Shared types and configuration for the mediaintel pipeline.
//!
//! Every other crate speaks in terms of the types defined here: the
//! canonical record shape, the filter query, chart datasets, and insights.

pub mod app_config;
pub mod chart;
pub mod config;
pub mod filter_spec;
pub mod overrides;
pub mod record;

use thiserror::Error;

pub use app_config::{AiConfig, AiProvider, AppConfig, SentimentThresholds};
pub use chart::{
    format_count, ChartDataset, ChartKind, ChartSet, DataPoint, Insight, LocationEngagement,
    MetricUnit, MetricValue,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use filter_spec::{location_key, DateRange, FilterError, FilterSpec};
pub use overrides::{
    load_overrides, parse_overrides, CanonicalField, KeywordOverrides, NormalizeOverrides,
};
pub use record::{
    CanonicalRecord, EngagementMetrics, EngagementTotals, EngagementWeights, MediaType, Metric,
    Platform, Sentiment,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read normalization overrides at {path}: {source}")]
    OverridesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse normalization overrides: {0}")]
    OverridesFileParse(#[from] serde_yaml::Error),

    #[error("invalid normalization overrides: {0}")]
    Validation(String),
}

/// Returned when a label does not name a canonical enumeration value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
