//! The enrichment capability and its request/response types.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use mediaintel_core::AiProvider;

use crate::error::EnrichError;

/// What the provider is asked to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentTask {
    /// Reword each draft finding for one chart; one line out per draft in.
    ChartInsights,
    /// Executive summary plus recommendations for the whole report.
    Narrative,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentRequest {
    pub task: EnrichmentTask,
    /// Compact description of the data the drafts were computed from.
    pub chart_summary: String,
    /// Rule-derived statements, most significant first.
    pub drafts: Vec<String>,
    pub provider: AiProvider,
    pub timeout: Duration,
}

impl EnrichmentRequest {
    /// Prompt text sent to the provider.
    #[must_use]
    pub fn prompt(&self) -> String {
        let numbered: Vec<String> = self
            .drafts
            .iter()
            .enumerate()
            .map(|(i, d)| format!("{}. {d}", i + 1))
            .collect();

        match self.task {
            EnrichmentTask::ChartInsights => format!(
                "You are a media intelligence analyst. The findings below were computed from this chart:\n\
                 {summary}\n\n\
                 Rewrite each finding as one clear sentence for a marketing audience. \
                 Keep every number exactly as written and do not introduce new figures. \
                 Return exactly {n} lines, one per finding, in the same order, with no numbering or bullets.\n\n\
                 {findings}",
                summary = self.chart_summary,
                n = self.drafts.len(),
                findings = numbered.join("\n"),
            ),
            EnrichmentTask::Narrative => format!(
                "Analyze the following media intelligence data points and provide a concise \
                 executive summary and actionable recommendations for future strategies.\n\n\
                 Data points:\n{summary}\n\n\
                 Findings:\n{findings}\n\n\
                 Use only the figures given. Start with a line 'Summary:' followed by one paragraph, \
                 then a line 'Recommendations:' followed by a bulleted list of practical actions.",
                summary = self.chart_summary,
                findings = numbered.join("\n"),
            ),
        }
    }
}

/// Outcome of one enrichment attempt. There is no partial result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enrichment {
    Elaborated(String),
    Unavailable(String),
}

impl Enrichment {
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Enrichment::Elaborated(text) => Some(text),
            Enrichment::Unavailable(_) => None,
        }
    }
}

/// An interchangeable AI backend.
///
/// Implementations make one attempt, enforce `request.timeout`, and report
/// every failure as [`Enrichment::Unavailable`] instead of an error.
#[async_trait]
pub trait EnrichmentPort: Send + Sync {
    async fn elaborate(&self, request: &EnrichmentRequest) -> Enrichment;
}

/// Run one provider call under a hard deadline and fold the result into an
/// [`Enrichment`]. Failures are logged at `warn`.
pub async fn bounded<F>(provider: AiProvider, timeout: Duration, call: F) -> Enrichment
where
    F: Future<Output = Result<String, EnrichError>> + Send,
{
    let result = match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(EnrichError::Timeout(timeout)),
    };

    match result {
        Ok(text) if !text.trim().is_empty() => {
            tracing::debug!(provider = %provider, chars = text.len(), "enrichment received");
            Enrichment::Elaborated(text.trim().to_string())
        }
        Ok(_) => unavailable(provider, &EnrichError::EmptyResponse),
        Err(e) => unavailable(provider, &e),
    }
}

fn unavailable(provider: AiProvider, error: &EnrichError) -> Enrichment {
    tracing::warn!(provider = %provider, error = %error, "enrichment unavailable, using rule text");
    Enrichment::Unavailable(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(task: EnrichmentTask) -> EnrichmentRequest {
        EnrichmentRequest {
            task,
            chart_summary: "Platform share, 30 records".to_string(),
            drafts: vec![
                "instagram accounts for 60.0% of posts".to_string(),
                "twitter follows with 40.0%".to_string(),
            ],
            provider: AiProvider::OpenRouter,
            timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn chart_prompt_lists_drafts_and_line_count() {
        let prompt = request(EnrichmentTask::ChartInsights).prompt();
        assert!(prompt.contains("Platform share, 30 records"));
        assert!(prompt.contains("1. instagram accounts for 60.0% of posts"));
        assert!(prompt.contains("2. twitter follows with 40.0%"));
        assert!(prompt.contains("Return exactly 2 lines"));
    }

    #[test]
    fn narrative_prompt_asks_for_sections() {
        let prompt = request(EnrichmentTask::Narrative).prompt();
        assert!(prompt.contains("Summary:"));
        assert!(prompt.contains("Recommendations:"));
    }

    #[tokio::test]
    async fn bounded_passes_through_text() {
        let out = bounded(AiProvider::Gemini, Duration::from_secs(1), async {
            Ok("  rewritten  ".to_string())
        })
        .await;
        assert_eq!(out, Enrichment::Elaborated("rewritten".to_string()));
    }

    #[tokio::test]
    async fn bounded_turns_errors_into_unavailable() {
        let out = bounded(AiProvider::Gemini, Duration::from_secs(1), async {
            Err(EnrichError::Provider("quota exceeded".to_string()))
        })
        .await;
        assert!(matches!(out, Enrichment::Unavailable(ref m) if m.contains("quota exceeded")));

        let empty = bounded(AiProvider::Gemini, Duration::from_secs(1), async {
            Ok("   ".to_string())
        })
        .await;
        assert!(empty.text().is_none());
    }

    #[tokio::test]
    async fn bounded_enforces_timeout() {
        let out = bounded(AiProvider::OpenRouter, Duration::from_millis(20), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("too late".to_string())
        })
        .await;
        assert!(matches!(out, Enrichment::Unavailable(ref m) if m.contains("timed out")));
    }
}
