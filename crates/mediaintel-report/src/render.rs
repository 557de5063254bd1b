//! Markdown rendering and fingerprinting.
//!
//! Output depends only on the report contents: no clock, no hash-map order.

use mediaintel_core::{format_count, ChartKind, MetricValue};
use mediaintel_insight::NarrativeSource;
use sha2::{Digest, Sha256};

use crate::report::{Report, ReportSection};

const TITLE: &str = "# Campaign Media Intelligence Report";

impl Report {
    /// Markdown body of the report.
    #[must_use]
    pub fn render_markdown(&self) -> String {
        let mut lines: Vec<String> = vec![TITLE.to_string(), String::new()];

        lines.push(format!("- Filter: {}", self.filter()));
        if let Some(baseline) = self.baseline() {
            lines.push(format!("- Compared with: {baseline}"));
        }
        lines.push(format!("- Records: {}", format_count(as_value(self.record_count()))));
        lines.push(match self.date_span() {
            Some((first, last)) if first == last => format!("- Period: {first}"),
            Some((first, last)) => format!("- Period: {first} to {last}"),
            None => "- Period: n/a".to_string(),
        });
        lines.push(String::new());

        let narrative = self.narrative();
        lines.push("## Executive Summary".to_string());
        lines.push(String::new());
        lines.push(narrative.summary.clone());
        lines.push(String::new());
        lines.push(format!(
            "_Source: {}_",
            match narrative.source {
                NarrativeSource::Rules => "rule-based analysis",
                NarrativeSource::Ai => "AI-assisted analysis",
            }
        ));
        lines.push(String::new());

        lines.push("## Recommendations".to_string());
        lines.push(String::new());
        for rec in &narrative.recommendations {
            lines.push(format!("- {}", one_line(rec)));
        }
        lines.push(String::new());

        for (i, section) in self.sections().iter().enumerate() {
            render_section(&mut lines, i + 1, section);
        }

        let mut body = lines.join("\n");
        while body.ends_with("\n\n") {
            body.pop();
        }
        if !body.ends_with('\n') {
            body.push('\n');
        }
        body
    }

    /// Hex SHA-256 of [`Report::render_markdown`].
    #[must_use]
    pub fn fingerprint(&self) -> String {
        format!("{:x}", Sha256::digest(self.render_markdown().as_bytes()))
    }
}

fn render_section(lines: &mut Vec<String>, number: usize, section: &ReportSection) {
    let chart = &section.chart;
    let kind = chart.kind();
    lines.push(format!("## {number}. {}", kind.title()));
    lines.push(String::new());

    if let Some(image) = &section.image {
        lines.push(format!("![{}]({})", kind.title(), image.as_str()));
        lines.push(String::new());
    }

    if chart.is_empty() || chart.points().is_empty() {
        lines.push("_No data for the current filters._".to_string());
    } else {
        let (label, value) = column_names(kind);
        let with_engagement = chart.engagement_total() > 0.0;
        if with_engagement {
            lines.push(format!("| {label} | {value} | Share | Engagement |"));
            lines.push("|---|---:|---:|---:|".to_string());
        } else {
            lines.push(format!("| {label} | {value} | Share |"));
            lines.push("|---|---:|---:|".to_string());
        }
        for point in chart.points() {
            let mut row = format!(
                "| {} | {} | {} |",
                cell(&point.label),
                format_count(point.value),
                MetricValue::percent(chart.percent_of_total(point.value))
            );
            if with_engagement {
                let engagement = chart
                    .engagement()
                    .iter()
                    .find(|p| p.label == point.label)
                    .map_or(0.0, |p| p.value);
                row.push_str(&format!(" {} |", format_count(engagement)));
            }
            lines.push(row);
        }
    }
    lines.push(String::new());

    lines.push("**Insights**".to_string());
    lines.push(String::new());
    for insight in &section.insights {
        lines.push(format!(
            "{}. {} ({})",
            insight.rank,
            one_line(&insight.statement),
            insight.supporting_metric
        ));
    }
    lines.push(String::new());
}

fn column_names(kind: ChartKind) -> (&'static str, &'static str) {
    match kind {
        ChartKind::VolumeOverTime => ("Date", "Posts"),
        ChartKind::PlatformShare => ("Platform", "Posts"),
        ChartKind::SentimentDistribution => ("Sentiment", "Posts"),
        ChartKind::MediaTypeBreakdown => ("Media type", "Posts"),
        ChartKind::TopEngagement => ("Post", "Score"),
    }
}

fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn cell(text: &str) -> String {
    one_line(text).replace('|', "\\|")
}

#[allow(clippy::cast_precision_loss)]
fn as_value(n: usize) -> f64 {
    n as f64
}
