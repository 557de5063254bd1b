//! Chart datasets and the insights derived from them.

use std::str::FromStr;

use serde::Serialize;

use crate::UnknownVariant;

/// The five fixed chart kinds, declared in canonical report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    VolumeOverTime,
    PlatformShare,
    SentimentDistribution,
    MediaTypeBreakdown,
    TopEngagement,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::VolumeOverTime,
        ChartKind::PlatformShare,
        ChartKind::SentimentDistribution,
        ChartKind::MediaTypeBreakdown,
        ChartKind::TopEngagement,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ChartKind::VolumeOverTime => "volume_over_time",
            ChartKind::PlatformShare => "platform_share",
            ChartKind::SentimentDistribution => "sentiment_distribution",
            ChartKind::MediaTypeBreakdown => "media_type_breakdown",
            ChartKind::TopEngagement => "top_engagement",
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            ChartKind::VolumeOverTime => "Volume Over Time",
            ChartKind::PlatformShare => "Platform Share",
            ChartKind::SentimentDistribution => "Sentiment Distribution",
            ChartKind::MediaTypeBreakdown => "Media Type Breakdown",
            ChartKind::TopEngagement => "Top Engagement",
        }
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace(['-', ' '], "_");
        ChartKind::ALL
            .into_iter()
            .find(|k| k.as_str() == key)
            .ok_or(UnknownVariant {
                kind: "chart kind",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPoint {
    pub label: String,
    pub value: f64,
}

impl DataPoint {
    #[must_use]
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Aggregate backing one chart. Read-only once built.
///
/// Date and category charts also carry the composite engagement of each
/// bucket in `engagement`: per day in date order, per category by
/// engagement descending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataset {
    kind: ChartKind,
    points: Vec<DataPoint>,
    record_count: usize,
    total: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    engagement: Vec<DataPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    engagement_total: Option<f64>,
}

impl ChartDataset {
    /// `total` is the denominator shares are taken against: the record count
    /// for count charts, the summed composite score for top engagement.
    #[must_use]
    pub fn new(kind: ChartKind, points: Vec<DataPoint>, record_count: usize, total: f64) -> Self {
        Self {
            kind,
            points,
            record_count,
            total,
            engagement: Vec::new(),
            engagement_total: None,
        }
    }

    /// Attach per-bucket composite engagement and its sum over all records.
    #[must_use]
    pub fn with_engagement(mut self, points: Vec<DataPoint>, total: f64) -> Self {
        self.engagement = points;
        self.engagement_total = Some(total);
        self
    }

    #[must_use]
    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    #[must_use]
    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    #[must_use]
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Composite engagement per bucket; empty when not tracked.
    #[must_use]
    pub fn engagement(&self) -> &[DataPoint] {
        &self.engagement
    }

    /// Engagement summed over all records, `0.0` when not tracked.
    #[must_use]
    pub fn engagement_total(&self) -> f64 {
        self.engagement_total.unwrap_or(0.0)
    }

    /// `value / engagement_total` as a percentage, `0.0` when the total is zero.
    #[must_use]
    pub fn percent_of_engagement(&self, value: f64) -> f64 {
        let total = self.engagement_total();
        if total > 0.0 {
            value / total * 100.0
        } else {
            0.0
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }

    #[must_use]
    pub fn value_of(&self, label: &str) -> Option<f64> {
        self.points.iter().find(|p| p.label == label).map(|p| p.value)
    }

    /// `value / total` as a percentage, `0.0` when the total is zero.
    #[must_use]
    pub fn percent_of_total(&self, value: f64) -> f64 {
        if self.total > 0.0 {
            value / self.total * 100.0
        } else {
            0.0
        }
    }
}

/// Posts and composite engagement for one case-folded location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationEngagement {
    pub location: String,
    pub posts: usize,
    pub engagement: f64,
}

/// All five datasets from one aggregation pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSet {
    pub volume_over_time: ChartDataset,
    pub platform_share: ChartDataset,
    pub sentiment_distribution: ChartDataset,
    pub media_type_breakdown: ChartDataset,
    pub top_engagement: ChartDataset,
    /// Located records only; engagement descending, then posts descending,
    /// then name.
    pub locations: Vec<LocationEngagement>,
}

impl ChartSet {
    #[must_use]
    pub fn get(&self, kind: ChartKind) -> &ChartDataset {
        match kind {
            ChartKind::VolumeOverTime => &self.volume_over_time,
            ChartKind::PlatformShare => &self.platform_share,
            ChartKind::SentimentDistribution => &self.sentiment_distribution,
            ChartKind::MediaTypeBreakdown => &self.media_type_breakdown,
            ChartKind::TopEngagement => &self.top_engagement,
        }
    }

    /// Datasets in canonical order.
    #[must_use]
    pub fn iter(&self) -> [&ChartDataset; 5] {
        ChartKind::ALL.map(|k| self.get(k))
    }

    #[must_use]
    pub fn into_array(self) -> [ChartDataset; 5] {
        [
            self.volume_over_time,
            self.platform_share,
            self.sentiment_distribution,
            self.media_type_breakdown,
            self.top_engagement,
        ]
    }

    #[must_use]
    pub fn record_count(&self) -> usize {
        self.sentiment_distribution.record_count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricUnit {
    Count,
    Percent,
    /// Percentage-point difference.
    Points,
    Ratio,
    Score,
}

/// The number an insight rests on. Always produced by the rule engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricValue {
    pub value: f64,
    pub unit: MetricUnit,
}

impl MetricValue {
    #[must_use]
    pub fn count(value: f64) -> Self {
        Self {
            value,
            unit: MetricUnit::Count,
        }
    }

    #[must_use]
    pub fn percent(value: f64) -> Self {
        Self {
            value,
            unit: MetricUnit::Percent,
        }
    }

    #[must_use]
    pub fn points(value: f64) -> Self {
        Self {
            value,
            unit: MetricUnit::Points,
        }
    }

    #[must_use]
    pub fn ratio(value: f64) -> Self {
        Self {
            value,
            unit: MetricUnit::Ratio,
        }
    }

    #[must_use]
    pub fn score(value: f64) -> Self {
        Self {
            value,
            unit: MetricUnit::Score,
        }
    }
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.unit {
            MetricUnit::Count | MetricUnit::Score => f.write_str(&format_count(self.value)),
            MetricUnit::Percent => write!(f, "{:.1}%", self.value),
            MetricUnit::Points => write!(f, "{:+.1} pts", self.value),
            MetricUnit::Ratio => write!(f, "{:.2}:1", self.value),
        }
    }
}

/// Formats a value rounded to an integer with thousands separators.
#[must_use]
pub fn format_count(value: f64) -> String {
    let rounded = format!("{:.0}", value.abs());
    let mut out = String::with_capacity(rounded.len() + rounded.len() / 3 + 1);
    for (i, c) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if value < 0.0 && rounded != "0" {
        out.insert(0, '-');
    }
    out
}

/// Ranked finding for one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    /// 1 is the most significant.
    pub rank: u8,
    pub statement: String,
    pub supporting_metric: MetricValue,
    /// True when the statement text was rewritten by an AI provider.
    pub enriched: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_kind_parses_loose_spellings() {
        assert_eq!(
            "platform-share".parse::<ChartKind>().unwrap(),
            ChartKind::PlatformShare
        );
        assert_eq!(
            "Top Engagement".parse::<ChartKind>().unwrap(),
            ChartKind::TopEngagement
        );
        assert!("pie".parse::<ChartKind>().is_err());
    }

    #[test]
    fn format_count_groups_thousands() {
        assert_eq!(format_count(0.0), "0");
        assert_eq!(format_count(999.0), "999");
        assert_eq!(format_count(1_000.0), "1,000");
        assert_eq!(format_count(1_234_567.4), "1,234,567");
        assert_eq!(format_count(-12_345.0), "-12,345");
    }

    #[test]
    fn metric_value_display_by_unit() {
        assert_eq!(MetricValue::percent(45.04).to_string(), "45.0%");
        assert_eq!(MetricValue::points(-3.25).to_string(), "-3.2 pts");
        assert_eq!(MetricValue::points(4.0).to_string(), "+4.0 pts");
        assert_eq!(MetricValue::ratio(2.5).to_string(), "2.50:1");
        assert_eq!(MetricValue::count(12_000.0).to_string(), "12,000");
    }

    #[test]
    fn percent_of_total_handles_zero_total() {
        let ds = ChartDataset::new(ChartKind::PlatformShare, Vec::new(), 0, 0.0);
        assert!(ds.percent_of_total(5.0).abs() < f64::EPSILON);
        assert!(ds.is_empty());
    }

    #[test]
    fn engagement_series_is_optional() {
        let plain = ChartDataset::new(ChartKind::PlatformShare, Vec::new(), 2, 2.0);
        assert!(plain.engagement().is_empty());
        assert!(plain.engagement_total().abs() < f64::EPSILON);
        let json = serde_json::to_value(&plain).unwrap();
        assert!(json.get("engagement").is_none());

        let tracked = plain.with_engagement(vec![DataPoint::new("tiktok", 30.0)], 40.0);
        assert!((tracked.percent_of_engagement(30.0) - 75.0).abs() < 1e-9);
        let json = serde_json::to_value(&tracked).unwrap();
        assert_eq!(json["engagement_total"], 40.0);
    }

    #[test]
    fn value_of_finds_label() {
        let ds = ChartDataset::new(
            ChartKind::PlatformShare,
            vec![DataPoint::new("instagram", 3.0), DataPoint::new("tiktok", 1.0)],
            4,
            4.0,
        );
        assert_eq!(ds.value_of("tiktok"), Some(1.0));
        assert_eq!(ds.value_of("youtube"), None);
        assert!((ds.percent_of_total(3.0) - 75.0).abs() < 1e-9);
    }
}
