//! Rule drafts with optional AI rewording.

use std::sync::Arc;
use std::time::Duration;

use mediaintel_core::{AiConfig, AiProvider, ChartDataset, ChartSet, Insight};
use mediaintel_enrich::{EnrichError, EnrichmentPort, EnrichmentRequest, EnrichmentTask};

use crate::narrative::{self, Narrative, NarrativeSource};
use crate::rules::{describe, draft_insights};

/// Produces the insight sets and narrative for a report.
///
/// Without a port every output is rule text. With one, each chart's three
/// drafts are sent for rewording; the reply replaces the statements only when
/// it has exactly three usable lines. Supporting metrics never change.
#[derive(Clone)]
pub struct Synthesizer {
    port: Option<Arc<dyn EnrichmentPort>>,
    provider: AiProvider,
    timeout: Duration,
}

impl Synthesizer {
    #[must_use]
    pub fn deterministic() -> Self {
        Self {
            port: None,
            provider: AiProvider::Disabled,
            timeout: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn with_port(port: Arc<dyn EnrichmentPort>, provider: AiProvider, timeout: Duration) -> Self {
        Self {
            port: Some(port),
            provider,
            timeout,
        }
    }

    /// Build from the `ai` section of the app config.
    ///
    /// # Errors
    ///
    /// Propagates [`mediaintel_enrich::from_config`] failures, such as a
    /// selected provider with no API key.
    pub fn from_config(config: &AiConfig) -> Result<Self, EnrichError> {
        Ok(match mediaintel_enrich::from_config(config)? {
            Some(port) => Self::with_port(
                port,
                config.provider,
                Duration::from_secs(config.timeout_secs),
            ),
            None => Self::deterministic(),
        })
    }

    #[must_use]
    pub fn is_enriching(&self) -> bool {
        self.port.is_some()
    }

    /// Three ranked insights for one chart.
    pub async fn synthesize(
        &self,
        dataset: &ChartDataset,
        baseline: Option<&ChartDataset>,
    ) -> [Insight; 3] {
        let mut insights = draft_insights(dataset, baseline);
        self.reword(dataset, &mut insights).await;
        insights
    }

    /// Insight sets for all five charts in canonical order. Provider calls
    /// run one chart at a time.
    pub async fn synthesize_all(
        &self,
        charts: &ChartSet,
        baseline: Option<&ChartSet>,
    ) -> [[Insight; 3]; 5] {
        let datasets = charts.iter();
        let mut sets = datasets.map(|d| draft_insights(d, baseline.map(|b| b.get(d.kind()))));
        for (dataset, insights) in datasets.iter().zip(sets.iter_mut()) {
            self.reword(dataset, insights).await;
        }
        sets
    }

    /// Report-level summary and recommendations.
    pub async fn narrate(
        &self,
        charts: &ChartSet,
        insights: &[[Insight; 3]; 5],
    ) -> Narrative {
        let rules = narrative::compose(charts);
        let Some(port) = &self.port else {
            return rules;
        };
        if charts.record_count() == 0 {
            return rules;
        }

        let chart_summary = charts
            .iter()
            .iter()
            .map(|d| describe(d))
            .collect::<Vec<_>>()
            .join("\n");
        let drafts = insights
            .iter()
            .flatten()
            .map(|i| i.statement.clone())
            .collect();
        let request = EnrichmentRequest {
            task: EnrichmentTask::Narrative,
            chart_summary,
            drafts,
            provider: self.provider,
            timeout: self.timeout,
        };

        match port.elaborate(&request).await.text() {
            Some(text) => narrative::parse_sections(text, rules),
            None => rules,
        }
    }

    async fn reword(&self, dataset: &ChartDataset, insights: &mut [Insight; 3]) {
        let Some(port) = &self.port else {
            return;
        };
        if dataset.is_empty() {
            return;
        }

        let request = EnrichmentRequest {
            task: EnrichmentTask::ChartInsights,
            chart_summary: describe(dataset),
            drafts: insights.iter().map(|i| i.statement.clone()).collect(),
            provider: self.provider,
            timeout: self.timeout,
        };
        let Some(text) = port.elaborate(&request).await.text().map(str::to_owned) else {
            return;
        };

        let lines = reply_lines(&text);
        if lines.len() != insights.len() {
            tracing::warn!(
                chart = %dataset.kind(),
                expected = insights.len(),
                received = lines.len(),
                "enrichment reply has wrong line count, keeping rule text"
            );
            return;
        }
        for (insight, line) in insights.iter_mut().zip(lines) {
            insight.statement = line;
            insight.enriched = true;
        }
        tracing::debug!(chart = %dataset.kind(), "insights reworded");
    }
}

impl std::fmt::Debug for Synthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Synthesizer")
            .field("provider", &self.provider)
            .field("timeout", &self.timeout)
            .field("enriching", &self.port.is_some())
            .finish()
    }
}

/// Non-empty reply lines with list markers removed.
pub(crate) fn reply_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(strip_list_marker)
        .filter(|l| !l.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Remove a leading bullet (`-`, `*`, `•`) or number (`1.`, `2)`).
pub(crate) fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();
    if let Some(rest) = line.strip_prefix(['-', '*', '•']) {
        return rest.trim();
    }
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix(['.', ')']) {
            return rest.trim();
        }
    }
    line
}
