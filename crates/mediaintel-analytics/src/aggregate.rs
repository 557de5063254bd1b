//! Aggregation engine.
//!
//! [`aggregate`] walks the filtered records once and feeds five named
//! accumulators, one per chart kind. Each accumulator owns its bucketing and
//! sort policy; every ordering is total, so any permutation of the same
//! records produces identical datasets.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use mediaintel_core::{
    location_key, AppConfig, CanonicalRecord, ChartDataset, ChartKind, ChartSet, DataPoint,
    EngagementTotals, EngagementWeights, LocationEngagement, MediaType, Platform, Sentiment,
};

/// Default number of entries in the top-engagement chart.
pub const DEFAULT_TOP_N: usize = 5;

/// Longest caption excerpt used in a top-engagement label, in characters.
const LABEL_SNIPPET_CHARS: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateConfig {
    pub top_n: usize,
    pub weights: EngagementWeights,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            weights: EngagementWeights::default(),
        }
    }
}

impl AggregateConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            top_n: config.top_n,
            weights: config.weights,
        }
    }
}

/// Compute all five chart datasets in a single traversal.
///
/// Engagement is summed as exact integers per metric and weighted once at
/// the end, so fractional weights give the same totals in any record order.
#[must_use]
pub fn aggregate<'a, I>(records: I, config: &AggregateConfig) -> ChartSet
where
    I: IntoIterator<Item = &'a CanonicalRecord>,
{
    let weights = &config.weights;
    let mut volume = VolumeAccumulator::default();
    let mut platforms = CountAccumulator::<Platform>::default();
    let mut sentiment = SentimentAccumulator::default();
    let mut media = CountAccumulator::<MediaType>::default();
    let mut top = TopAccumulator::new(config.weights);
    let mut locations = CountAccumulator::<String>::default();
    let mut all = EngagementTotals::default();
    let mut count = 0_usize;

    for record in records {
        count += 1;
        all.add(&record.engagement);
        volume.add(record);
        platforms.add(record.platform, record);
        sentiment.add(record.sentiment);
        media.add(record.media_type, record);
        top.add(record);
        if let Some(key) = record.location.as_deref().map(location_key) {
            if !key.is_empty() {
                locations.add(key, record);
            }
        }
    }

    let engagement_total = weights.score_totals(&all);
    tracing::debug!(records = count, engagement = engagement_total, "aggregated chart datasets");

    ChartSet {
        volume_over_time: volume.finish(count, weights, engagement_total),
        platform_share: platforms
            .finish(ChartKind::PlatformShare, count, weights, Platform::as_str)
            .with_engagement_total(engagement_total),
        sentiment_distribution: sentiment.finish(count),
        media_type_breakdown: media
            .finish(ChartKind::MediaTypeBreakdown, count, weights, MediaType::as_str)
            .with_engagement_total(engagement_total),
        top_engagement: top.finish(config.top_n, count, engagement_total),
        locations: locations.finish_locations(weights),
    }
}

#[allow(clippy::cast_precision_loss)]
fn as_value(n: usize) -> f64 {
    n as f64
}

#[derive(Default)]
struct VolumeAccumulator {
    by_day: BTreeMap<NaiveDate, Bucket>,
}

impl VolumeAccumulator {
    fn add(&mut self, record: &CanonicalRecord) {
        self.by_day.entry(record.timestamp).or_default().add(record);
    }

    fn finish(self, count: usize, weights: &EngagementWeights, engagement_total: f64) -> ChartDataset {
        let mut points = Vec::with_capacity(self.by_day.len());
        let mut engagement = Vec::with_capacity(self.by_day.len());
        for (day, bucket) in self.by_day {
            let label = day.to_string();
            engagement.push(DataPoint::new(label.clone(), weights.score_totals(&bucket.totals)));
            points.push(DataPoint::new(label, as_value(bucket.posts)));
        }
        ChartDataset::new(ChartKind::VolumeOverTime, points, count, as_value(count))
            .with_engagement(engagement, engagement_total)
    }
}

/// Posts and exact engagement sums for one bucket.
#[derive(Default)]
struct Bucket {
    posts: usize,
    totals: EngagementTotals,
}

impl Bucket {
    fn add(&mut self, record: &CanonicalRecord) {
        self.posts += 1;
        self.totals.add(&record.engagement);
    }
}

/// Posts and engagement per category.
struct CountAccumulator<K> {
    buckets: BTreeMap<K, Bucket>,
}

impl<K> Default for CountAccumulator<K> {
    fn default() -> Self {
        Self {
            buckets: BTreeMap::new(),
        }
    }
}

/// A finished category: points by count and engagement by engagement.
struct Categories {
    kind: ChartKind,
    count: usize,
    points: Vec<DataPoint>,
    engagement: Vec<DataPoint>,
}

impl Categories {
    fn with_engagement_total(self, total: f64) -> ChartDataset {
        ChartDataset::new(self.kind, self.points, self.count, as_value(self.count))
            .with_engagement(self.engagement, total)
    }
}

impl<K: Ord> CountAccumulator<K> {
    fn add(&mut self, key: K, record: &CanonicalRecord) {
        self.buckets.entry(key).or_default().add(record);
    }

    /// Rows sorted by engagement descending, then posts descending, then key.
    fn scored(self, weights: &EngagementWeights) -> Vec<(K, usize, f64)> {
        let mut rows: Vec<(K, usize, f64)> = self
            .buckets
            .into_iter()
            .map(|(k, b)| (k, b.posts, weights.score_totals(&b.totals)))
            .collect();
        rows.sort_by(|a, b| {
            b.2.total_cmp(&a.2)
                .then_with(|| b.1.cmp(&a.1))
                .then_with(|| a.0.cmp(&b.0))
        });
        rows
    }
}

impl<K: Ord + Copy> CountAccumulator<K> {
    /// Points sorted by count descending, then category ascending.
    fn finish(
        self,
        kind: ChartKind,
        count: usize,
        weights: &EngagementWeights,
        label: fn(K) -> &'static str,
    ) -> Categories {
        let rows = self.scored(weights);
        let engagement = rows
            .iter()
            .map(|(k, _, e)| DataPoint::new(label(*k), *e))
            .collect();
        let mut by_count: Vec<(K, usize)> = rows.into_iter().map(|(k, n, _)| (k, n)).collect();
        by_count.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        let points = by_count
            .into_iter()
            .map(|(k, n)| DataPoint::new(label(k), as_value(n)))
            .collect();
        Categories {
            kind,
            count,
            points,
            engagement,
        }
    }
}

impl CountAccumulator<String> {
    fn finish_locations(self, weights: &EngagementWeights) -> Vec<LocationEngagement> {
        self.scored(weights)
            .into_iter()
            .map(|(location, posts, engagement)| LocationEngagement {
                location,
                posts,
                engagement,
            })
            .collect()
    }
}

#[derive(Default)]
struct SentimentAccumulator {
    counts: [usize; 3],
}

impl SentimentAccumulator {
    fn add(&mut self, sentiment: Sentiment) {
        let idx = match sentiment {
            Sentiment::Positive => 0,
            Sentiment::Neutral => 1,
            Sentiment::Negative => 2,
        };
        self.counts[idx] += 1;
    }

    /// All three buckets are always present, zero or not.
    fn finish(self, count: usize) -> ChartDataset {
        let points = Sentiment::ALL
            .into_iter()
            .zip(self.counts)
            .map(|(s, n)| DataPoint::new(s.as_str(), as_value(n)))
            .collect();
        ChartDataset::new(ChartKind::SentimentDistribution, points, count, as_value(count))
    }
}

struct TopAccumulator<'a> {
    weights: EngagementWeights,
    scored: Vec<(f64, &'a CanonicalRecord)>,
}

impl<'a> TopAccumulator<'a> {
    fn new(weights: EngagementWeights) -> Self {
        Self {
            weights,
            scored: Vec::new(),
        }
    }

    fn add(&mut self, record: &'a CanonicalRecord) {
        let score = self.weights.score(&record.engagement);
        self.scored.push((score, record));
    }

    /// `total` is the weighted sum over every record, not just the top N.
    fn finish(mut self, top_n: usize, count: usize, total: f64) -> ChartDataset {
        if top_n == 0 {
            self.scored.clear();
        } else if self.scored.len() > top_n {
            self.scored.select_nth_unstable_by(top_n - 1, rank_order);
            self.scored.truncate(top_n);
        }
        self.scored.sort_by(rank_order);

        let points = self
            .scored
            .into_iter()
            .map(|(score, record)| DataPoint::new(entity_label(record), score))
            .collect();
        ChartDataset::new(ChartKind::TopEngagement, points, count, total)
    }
}

/// Highest score first; ties go to the earliest post, then platform, then
/// text, then the remaining fields.
fn rank_order(a: &(f64, &CanonicalRecord), b: &(f64, &CanonicalRecord)) -> Ordering {
    let (sa, ra) = a;
    let (sb, rb) = b;
    sb.total_cmp(sa)
        .then_with(|| ra.timestamp.cmp(&rb.timestamp))
        .then_with(|| ra.platform.cmp(&rb.platform))
        .then_with(|| ra.raw_text.cmp(&rb.raw_text))
        .then_with(|| ra.media_type.cmp(&rb.media_type))
        .then_with(|| ra.sentiment.cmp(&rb.sentiment))
        .then_with(|| ra.location.cmp(&rb.location))
}

/// `"<date> <platform>: <caption excerpt>"`.
fn entity_label(record: &CanonicalRecord) -> String {
    let text = record.raw_text.split_whitespace().collect::<Vec<_>>().join(" ");
    let snippet = if text.is_empty() {
        "(no text)".to_string()
    } else if text.chars().count() > LABEL_SNIPPET_CHARS {
        let cut: String = text.chars().take(LABEL_SNIPPET_CHARS).collect();
        format!("{}...", cut.trim_end())
    } else {
        text
    };
    format!("{} {}: {}", record.timestamp, record.platform, snippet)
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
