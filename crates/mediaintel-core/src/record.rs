use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::UnknownVariant;

/// Social platform a post was published on.
///
/// Variant order is the alphabetical order of the labels, so the derived
/// `Ord` doubles as the name tie-break used by the aggregation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Facebook,
    Instagram,
    Other,
    Tiktok,
    Twitter,
    Youtube,
}

impl Platform {
    pub const ALL: [Platform; 6] = [
        Platform::Facebook,
        Platform::Instagram,
        Platform::Other,
        Platform::Tiktok,
        Platform::Twitter,
        Platform::Youtube,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Facebook => "facebook",
            Platform::Instagram => "instagram",
            Platform::Other => "other",
            Platform::Tiktok => "tiktok",
            Platform::Twitter => "twitter",
            Platform::Youtube => "youtube",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == lower)
            .ok_or(UnknownVariant {
                kind: "platform",
                value: s.to_string(),
            })
    }
}

/// Three-bucket sentiment. Declaration order is the fixed chart order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Sentiment::ALL
            .into_iter()
            .find(|v| v.as_str() == lower)
            .ok_or(UnknownVariant {
                kind: "sentiment",
                value: s.to_string(),
            })
    }
}

/// Content format of a post. Declaration order is alphabetical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Link,
    Other,
    Text,
    Video,
}

impl MediaType {
    pub const ALL: [MediaType; 5] = [
        MediaType::Image,
        MediaType::Link,
        MediaType::Other,
        MediaType::Text,
        MediaType::Video,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Link => "link",
            MediaType::Other => "other",
            MediaType::Text => "text",
            MediaType::Video => "video",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        MediaType::ALL
            .into_iter()
            .find(|v| v.as_str() == lower)
            .ok_or(UnknownVariant {
                kind: "media type",
                value: s.to_string(),
            })
    }
}

/// Named engagement counters carried on every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Likes,
    Shares,
    Comments,
    Views,
    Engagements,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Likes,
        Metric::Shares,
        Metric::Comments,
        Metric::Views,
        Metric::Engagements,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Likes => "likes",
            Metric::Shares => "shares",
            Metric::Comments => "comments",
            Metric::Views => "views",
            Metric::Engagements => "engagements",
        }
    }
}

/// Engagement counters. Missing counters are zero; unsigned, so never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EngagementMetrics {
    pub likes: u64,
    pub shares: u64,
    pub comments: u64,
    pub views: u64,
    /// Pre-summed engagement total, as many exports carry a single column.
    pub engagements: u64,
}

impl EngagementMetrics {
    #[must_use]
    pub fn get(&self, metric: Metric) -> u64 {
        match metric {
            Metric::Likes => self.likes,
            Metric::Shares => self.shares,
            Metric::Comments => self.comments,
            Metric::Views => self.views,
            Metric::Engagements => self.engagements,
        }
    }

    /// True when any of likes, shares or comments is non-zero.
    #[must_use]
    pub fn has_breakdown(&self) -> bool {
        self.likes > 0 || self.shares > 0 || self.comments > 0
    }

    /// The counter as it enters the composite score. The pre-summed
    /// `engagements` column only counts for records without a breakdown.
    #[must_use]
    pub fn scored(&self, metric: Metric) -> u64 {
        match metric {
            Metric::Engagements if self.has_breakdown() => 0,
            _ => self.get(metric),
        }
    }

    pub fn set(&mut self, metric: Metric, value: u64) {
        match metric {
            Metric::Likes => self.likes = value,
            Metric::Shares => self.shares = value,
            Metric::Comments => self.comments = value,
            Metric::Views => self.views = value,
            Metric::Engagements => self.engagements = value,
        }
    }
}

/// Per-metric weights for the composite engagement score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngagementWeights {
    pub likes: f64,
    pub shares: f64,
    pub comments: f64,
    pub views: f64,
    pub engagements: f64,
}

impl Default for EngagementWeights {
    fn default() -> Self {
        Self {
            likes: 1.0,
            shares: 1.0,
            comments: 1.0,
            views: 0.0,
            engagements: 1.0,
        }
    }
}

impl EngagementWeights {
    #[must_use]
    pub fn weight(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Likes => self.likes,
            Metric::Shares => self.shares,
            Metric::Comments => self.comments,
            Metric::Views => self.views,
            Metric::Engagements => self.engagements,
        }
    }

    /// Composite score: sum of `weight × counter` over all metrics, see
    /// [`EngagementMetrics::scored`].
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn score(&self, metrics: &EngagementMetrics) -> f64 {
        Metric::ALL
            .into_iter()
            .map(|m| self.weight(m) * metrics.scored(m) as f64)
            .sum()
    }

    /// Composite score of many records at once. Weights are applied to the
    /// exact integer sums, so the result does not depend on record order.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn score_totals(&self, totals: &EngagementTotals) -> f64 {
        Metric::ALL
            .into_iter()
            .map(|m| self.weight(m) * totals.get(m) as f64)
            .sum()
    }
}

/// Exact per-metric sums of the scored counters over a group of records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngagementTotals {
    likes: u128,
    shares: u128,
    comments: u128,
    views: u128,
    engagements: u128,
}

impl EngagementTotals {
    pub fn add(&mut self, metrics: &EngagementMetrics) {
        self.likes += u128::from(metrics.scored(Metric::Likes));
        self.shares += u128::from(metrics.scored(Metric::Shares));
        self.comments += u128::from(metrics.scored(Metric::Comments));
        self.views += u128::from(metrics.scored(Metric::Views));
        self.engagements += u128::from(metrics.scored(Metric::Engagements));
    }

    #[must_use]
    pub fn get(&self, metric: Metric) -> u128 {
        match metric {
            Metric::Likes => self.likes,
            Metric::Shares => self.shares,
            Metric::Comments => self.comments,
            Metric::Views => self.views,
            Metric::Engagements => self.engagements,
        }
    }
}

/// One normalized campaign-data item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub timestamp: NaiveDate,
    pub platform: Platform,
    pub sentiment: Sentiment,
    pub media_type: MediaType,
    pub engagement: EngagementMetrics,
    /// Original caption or content; may be empty.
    pub raw_text: String,
    pub location: Option<String>,
}
