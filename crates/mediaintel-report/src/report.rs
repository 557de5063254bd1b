//! Report composition.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use mediaintel_analytics::summarize;
use mediaintel_core::{CanonicalRecord, ChartDataset, ChartKind, ChartSet, FilterSpec, Insight};
use mediaintel_insight::Narrative;
use serde::Serialize;

use crate::error::AssemblyError;

/// Opaque handle to an externally rendered chart image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChartImageRef(String);

impl ChartImageRef {
    #[must_use]
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Everything one report is built from.
#[derive(Debug, Clone)]
pub struct ReportInputs {
    pub filter: String,
    /// Description of the prior-period filter, when a baseline was used.
    pub baseline: Option<String>,
    pub record_count: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    /// In any order; `insights[i]` belongs to `charts[i]`.
    pub charts: Vec<ChartDataset>,
    pub insights: Vec<[Insight; 3]>,
    pub narrative: Narrative,
    /// When present, every chart needs a handle.
    pub images: Option<BTreeMap<ChartKind, ChartImageRef>>,
}

impl ReportInputs {
    /// Inputs for the filtered `records` and the charts derived from them.
    #[must_use]
    pub fn new<'a, I>(
        records: I,
        filter: &FilterSpec,
        charts: ChartSet,
        insights: [[Insight; 3]; 5],
        narrative: Narrative,
    ) -> Self
    where
        I: IntoIterator<Item = &'a CanonicalRecord>,
    {
        let summary = summarize(records);
        Self {
            filter: filter.to_string(),
            baseline: None,
            record_count: summary.record_count,
            first_date: summary.first_date,
            last_date: summary.last_date,
            charts: charts.into_array().into(),
            insights: insights.into(),
            narrative,
            images: None,
        }
    }

    #[must_use]
    pub fn with_baseline(mut self, baseline: &FilterSpec) -> Self {
        self.baseline = Some(baseline.to_string());
        self
    }

    #[must_use]
    pub fn with_images(mut self, images: BTreeMap<ChartKind, ChartImageRef>) -> Self {
        self.images = Some(images);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSection {
    pub chart: ChartDataset,
    pub insights: [Insight; 3],
    pub image: Option<ChartImageRef>,
}

/// Assembled report. Built once by [`assemble`] and not modified after.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    filter: String,
    baseline: Option<String>,
    record_count: usize,
    first_date: Option<NaiveDate>,
    last_date: Option<NaiveDate>,
    sections: Vec<ReportSection>,
    narrative: Narrative,
}

impl Report {
    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    #[must_use]
    pub fn baseline(&self) -> Option<&str> {
        self.baseline.as_deref()
    }

    #[must_use]
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    #[must_use]
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.first_date.zip(self.last_date)
    }

    /// Sections in canonical chart order.
    #[must_use]
    pub fn sections(&self) -> &[ReportSection] {
        &self.sections
    }

    #[must_use]
    pub fn narrative(&self) -> &Narrative {
        &self.narrative
    }
}

/// Combine charts, insights and narrative into a [`Report`] with sections
/// in canonical chart order.
///
/// # Errors
///
/// - [`AssemblyError::ChartCount`] unless exactly five charts are given.
/// - [`AssemblyError::MisalignedInsights`] when insight sets and charts differ in number.
/// - [`AssemblyError::DuplicateChart`] when a chart kind repeats.
/// - [`AssemblyError::InvalidRanks`] when a chart's insights are not ranked 1, 2, 3.
/// - [`AssemblyError::MissingChartImage`] when an image map lacks a chart.
pub fn assemble(inputs: ReportInputs) -> Result<Report, AssemblyError> {
    let ReportInputs {
        filter,
        baseline,
        record_count,
        first_date,
        last_date,
        charts,
        insights,
        narrative,
        mut images,
    } = inputs;

    if charts.len() != ChartKind::ALL.len() {
        return Err(AssemblyError::ChartCount {
            found: charts.len(),
        });
    }
    if insights.len() != charts.len() {
        return Err(AssemblyError::MisalignedInsights {
            charts: charts.len(),
            insights: insights.len(),
        });
    }

    let mut seen = BTreeSet::new();
    let mut sections = Vec::with_capacity(charts.len());
    for (chart, insights) in charts.into_iter().zip(insights) {
        let kind = chart.kind();
        if !seen.insert(kind) {
            return Err(AssemblyError::DuplicateChart(kind));
        }
        if insights.iter().map(|i| i.rank).ne(1..=3) {
            return Err(AssemblyError::InvalidRanks(kind));
        }
        let image = match images.as_mut() {
            Some(map) => Some(
                map.remove(&kind)
                    .ok_or(AssemblyError::MissingChartImage(kind))?,
            ),
            None => None,
        };
        sections.push(ReportSection {
            chart,
            insights,
            image,
        });
    }
    sections.sort_by_key(|s| s.chart.kind());

    tracing::debug!(
        records = record_count,
        images = sections.iter().filter(|s| s.image.is_some()).count(),
        narrative = ?narrative.source,
        "report assembled"
    );

    Ok(Report {
        filter,
        baseline,
        record_count,
        first_date,
        last_date,
        sections,
        narrative,
    })
}
