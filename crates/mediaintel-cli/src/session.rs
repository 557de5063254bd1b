//! Per-file session state threaded through the pipeline stages.

use std::path::Path;

use anyhow::Context;
use mediaintel_analytics::AggregateConfig;
use mediaintel_core::{AppConfig, CanonicalRecord};
use mediaintel_ingest::{ColumnMapping, NormalizeConfig, RejectionReport};
use mediaintel_insight::Synthesizer;

/// One loaded file and the settings every later stage reads.
///
/// Owns the canonical records; filtering and aggregation only borrow them.
pub(crate) struct Session {
    pub records: Vec<CanonicalRecord>,
    pub rejections: RejectionReport,
    pub columns: ColumnMapping,
    pub aggregate: AggregateConfig,
    pub synthesizer: Synthesizer,
}

impl Session {
    /// Read and normalize `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the normalization overrides cannot be loaded, the
    /// file cannot be read or normalized, or `enable_ai` is set and the
    /// configured provider cannot be built.
    pub fn open(path: &Path, config: AppConfig, enable_ai: bool) -> anyhow::Result<Self> {
        let normalize_config = NormalizeConfig::from_app_config(&config)?;
        let table = mediaintel_ingest::read_path(path).with_context(|| {
            format!("could not load {}", path.display())
        })?;
        let normalized = mediaintel_ingest::normalize(&table, &normalize_config)
            .with_context(|| format!("could not normalize {}", path.display()))?;

        let synthesizer = if enable_ai {
            Synthesizer::from_config(&config.ai)?
        } else {
            Synthesizer::deterministic()
        };

        tracing::info!(
            file = %path.display(),
            records = normalized.records.len(),
            dropped = normalized.rejections.dropped(),
            ai = synthesizer.is_enriching(),
            "session ready"
        );

        Ok(Self {
            records: normalized.records,
            rejections: normalized.rejections,
            columns: normalized.columns,
            aggregate: AggregateConfig::from_app_config(&config),
            synthesizer,
        })
    }
}
