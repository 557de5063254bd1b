//! Schema normalizer and validator/cleaner.
//!
//! [`normalize`] maps a [`RawTable`] onto [`CanonicalRecord`]s in one pass:
//! columns are resolved through the [`AliasTable`] once, each cell goes
//! through its field decoder, rows with an unparseable date are rejected, and
//! repeated `(timestamp, platform, raw_text)` rows are dropped as duplicates.
//! The function does no I/O and reads no clock.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use chrono::NaiveDate;
use mediaintel_core::{
    load_overrides, AppConfig, CanonicalField, CanonicalRecord, ConfigError, EngagementMetrics,
    Metric, NormalizeOverrides, Platform, SentimentThresholds,
};
use serde::Serialize;

use crate::dates::DateParser;
use crate::error::IngestError;
use crate::lexicon::Lexicon;
use crate::raw::{normalize_label, RawRow, RawTable, RawValue, BLANK};
use crate::values::{classify_media_type, classify_platform, parse_counter, SentimentInput};

/// Rejections beyond this many are counted but not kept as samples.
pub const MAX_REJECTION_SAMPLES: usize = 20;

const DEFAULT_ALIASES: &[(CanonicalField, &[&str])] = &[
    (
        CanonicalField::Timestamp,
        &[
            "date",
            "timestamp",
            "created_at",
            "tanggal",
            "published_at",
            "publish_date",
            "post_date",
            "posted_at",
            "created_time",
            "datetime",
            "time",
            "waktu",
        ],
    ),
    (
        CanonicalField::Platform,
        &[
            "platform",
            "platform_name",
            "channel",
            "network",
            "social_network",
            "media_sosial",
            "source",
        ],
    ),
    (
        CanonicalField::Sentiment,
        &[
            "sentiment",
            "sentimen",
            "sentiment_label",
            "sentiment_score",
            "polarity",
            "tone",
        ],
    ),
    (
        CanonicalField::MediaType,
        &[
            "media_type",
            "content_type",
            "jenis_media",
            "tipe_media",
            "format",
            "media",
            "type",
            "post_type",
        ],
    ),
    (
        CanonicalField::RawText,
        &[
            "text",
            "content",
            "caption",
            "message",
            "post_text",
            "body",
            "konten",
            "teks",
            "isi",
            "description",
            "post",
        ],
    ),
    (
        CanonicalField::Location,
        &["location", "lokasi", "city", "kota", "region", "country", "geo"],
    ),
    (
        CanonicalField::Likes,
        &["likes", "like_count", "likes_count", "reactions", "favorites", "suka"],
    ),
    (
        CanonicalField::Shares,
        &["shares", "share_count", "shares_count", "retweets", "reposts"],
    ),
    (
        CanonicalField::Comments,
        &[
            "comments",
            "comment_count",
            "comments_count",
            "replies",
            "komentar",
        ],
    ),
    (
        CanonicalField::Views,
        &[
            "views",
            "view_count",
            "video_views",
            "impressions",
            "reach",
            "plays",
        ],
    ),
    (
        CanonicalField::Engagements,
        &[
            "engagements",
            "engagement",
            "total_engagement",
            "total_engagements",
            "engagement_count",
            "interactions",
        ],
    ),
];

const METRIC_FIELDS: [(CanonicalField, Metric); 5] = [
    (CanonicalField::Likes, Metric::Likes),
    (CanonicalField::Shares, Metric::Shares),
    (CanonicalField::Comments, Metric::Comments),
    (CanonicalField::Views, Metric::Views),
    (CanonicalField::Engagements, Metric::Engagements),
];

/// Accepted source labels for each canonical field, in priority order.
#[derive(Debug, Clone, PartialEq)]
pub struct AliasTable {
    aliases: BTreeMap<CanonicalField, Vec<String>>,
}

impl Default for AliasTable {
    fn default() -> Self {
        Self {
            aliases: DEFAULT_ALIASES
                .iter()
                .map(|(field, labels)| {
                    (
                        *field,
                        labels.iter().map(|l| normalize_label(l)).collect(),
                    )
                })
                .collect(),
        }
    }
}

impl AliasTable {
    /// Override labels take priority over the built-in ones for their field.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &BTreeMap<CanonicalField, Vec<String>>) -> Self {
        for (field, extra) in overrides {
            let existing = self.aliases.entry(*field).or_default();
            let mut merged: Vec<String> = Vec::with_capacity(extra.len() + existing.len());
            for label in extra.iter().map(|l| normalize_label(l)).chain(existing.drain(..)) {
                if !label.is_empty() && !merged.contains(&label) {
                    merged.push(label);
                }
            }
            *existing = merged;
        }
        self
    }

    #[must_use]
    pub fn labels(&self, field: CanonicalField) -> &[String] {
        self.aliases.get(&field).map_or(&[], Vec::as_slice)
    }

    /// Assign headers to fields. Fields are visited in canonical order and
    /// each header can be claimed by one field only.
    #[must_use]
    pub fn resolve(&self, headers: &[String]) -> ColumnMapping {
        let mut claimed: HashSet<&str> = HashSet::new();
        let mut columns = BTreeMap::new();

        for field in CanonicalField::ALL {
            let hit = self.labels(field).iter().find(|label| {
                !claimed.contains(label.as_str()) && headers.iter().any(|h| h == *label)
            });
            if let Some(label) = hit {
                claimed.insert(label.as_str());
                columns.insert(field, label.clone());
            }
        }

        let ignored = headers
            .iter()
            .filter(|h| !h.is_empty() && !claimed.contains(h.as_str()))
            .cloned()
            .collect();

        ColumnMapping { columns, ignored }
    }
}

/// Which source column feeds each canonical field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColumnMapping {
    columns: BTreeMap<CanonicalField, String>,
    ignored: Vec<String>,
}

impl ColumnMapping {
    #[must_use]
    pub fn column(&self, field: CanonicalField) -> Option<&str> {
        self.columns.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn columns(&self) -> &BTreeMap<CanonicalField, String> {
        &self.columns
    }

    /// Headers that matched no field.
    #[must_use]
    pub fn ignored(&self) -> &[String] {
        &self.ignored
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    fn cell<'a>(&self, row: &'a RawRow, field: CanonicalField) -> &'a RawValue {
        match self.column(field) {
            Some(label) => row.get(label),
            None => &BLANK,
        }
    }
}

/// Static configuration for [`normalize`].
#[derive(Debug, Clone, Default)]
pub struct NormalizeConfig {
    pub aliases: AliasTable,
    pub dates: DateParser,
    pub lexicon: Lexicon,
    pub thresholds: SentimentThresholds,
}

impl NormalizeConfig {
    #[must_use]
    pub fn with_overrides(mut self, overrides: &NormalizeOverrides) -> Self {
        self.aliases = self.aliases.with_overrides(&overrides.aliases);
        self.dates = self.dates.with_preferred_formats(&overrides.date_formats);
        self.lexicon = self.lexicon.with_overrides(&overrides.keywords);
        self
    }

    #[must_use]
    pub fn with_thresholds(mut self, thresholds: SentimentThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Build from the application config, loading the override file if set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the override file cannot be read or fails
    /// validation.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let base = Self::default().with_thresholds(config.sentiment_thresholds);
        match config.normalize_path.as_deref() {
            Some(path) => Ok(base.with_overrides(&load_overrides_logged(path)?)),
            None => Ok(base),
        }
    }
}

fn load_overrides_logged(path: &Path) -> Result<NormalizeOverrides, ConfigError> {
    let overrides = load_overrides(path)?;
    tracing::info!(
        path = %path.display(),
        aliases = overrides.aliases.len(),
        date_formats = overrides.date_formats.len(),
        "loaded normalization overrides"
    );
    Ok(overrides)
}

/// Why a row did not become a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    InvalidDate,
    EmptyRow,
    Duplicate,
}

impl RejectReason {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RejectReason::InvalidDate => "invalid_date",
            RejectReason::EmptyRow => "empty_row",
            RejectReason::Duplicate => "duplicate",
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One dropped row. `row` is the 1-based data row index (header excluded).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowRejection {
    pub row: usize,
    pub reason: RejectReason,
    pub detail: String,
}

/// Counts of rows dropped during normalization.
///
/// `rejected` covers invalid rows; `duplicates` covers repeats. Both appear in
/// the `reasons` histogram.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RejectionReport {
    pub total_rows: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub duplicates: usize,
    pub reasons: BTreeMap<RejectReason, usize>,
    pub samples: Vec<RowRejection>,
}

impl RejectionReport {
    #[must_use]
    pub fn count(&self, reason: RejectReason) -> usize {
        self.reasons.get(&reason).copied().unwrap_or(0)
    }

    /// Rows that did not become records, for any reason.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.rejected + self.duplicates
    }

    fn record(&mut self, row: usize, reason: RejectReason, detail: String) {
        *self.reasons.entry(reason).or_insert(0) += 1;
        if reason == RejectReason::Duplicate {
            self.duplicates += 1;
        } else {
            self.rejected += 1;
        }
        if self.samples.len() < MAX_REJECTION_SAMPLES {
            self.samples.push(RowRejection {
                row,
                reason,
                detail,
            });
        }
    }
}

/// Output of [`normalize`].
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub records: Vec<CanonicalRecord>,
    pub rejections: RejectionReport,
    pub columns: ColumnMapping,
}

/// Normalize a raw table into canonical records.
///
/// # Errors
///
/// Returns [`IngestError::NoRecognizedColumns`] when no header matches any
/// alias, and [`IngestError::MissingColumn`] when no header maps to the
/// timestamp field. Row-level problems never fail the call; they are counted
/// in the [`RejectionReport`].
pub fn normalize(table: &RawTable, config: &NormalizeConfig) -> Result<Normalized, IngestError> {
    let columns = config.aliases.resolve(table.headers());
    if columns.is_empty() {
        return Err(IngestError::NoRecognizedColumns {
            headers: table.headers().to_vec(),
        });
    }
    if columns.column(CanonicalField::Timestamp).is_none() {
        return Err(IngestError::MissingColumn { field: "timestamp" });
    }
    tracing::debug!(
        mapped = columns.columns().len(),
        ignored = columns.ignored().len(),
        "resolved input columns"
    );

    let mut report = RejectionReport {
        total_rows: table.rows().len(),
        ..RejectionReport::default()
    };
    let mut seen: HashSet<(NaiveDate, Platform, String)> = HashSet::new();
    let mut records = Vec::with_capacity(table.rows().len());

    for (idx, row) in table.rows().iter().enumerate() {
        let row_number = idx + 1;

        let all_blank = columns
            .columns()
            .keys()
            .all(|field| columns.cell(row, *field).is_blank());
        if all_blank {
            report.record(row_number, RejectReason::EmptyRow, String::new());
            continue;
        }

        let date_cell = columns.cell(row, CanonicalField::Timestamp);
        let Some(timestamp) = config.dates.parse(date_cell) else {
            report.record(row_number, RejectReason::InvalidDate, date_cell.to_text());
            continue;
        };

        let record = decode_row(&columns, row, timestamp, config);

        let key = (record.timestamp, record.platform, record.raw_text.clone());
        if !seen.insert(key) {
            report.record(
                row_number,
                RejectReason::Duplicate,
                format!("{} {}", record.timestamp, record.platform),
            );
            continue;
        }
        records.push(record);
    }

    report.accepted = records.len();
    tracing::info!(
        total_rows = report.total_rows,
        accepted = report.accepted,
        rejected = report.rejected,
        duplicates = report.duplicates,
        "normalized input rows"
    );

    Ok(Normalized {
        records,
        rejections: report,
        columns,
    })
}

fn decode_row(
    columns: &ColumnMapping,
    row: &RawRow,
    timestamp: NaiveDate,
    config: &NormalizeConfig,
) -> CanonicalRecord {
    let raw_text = columns.cell(row, CanonicalField::RawText).to_text();

    let sentiment = SentimentInput::decode(columns.cell(row, CanonicalField::Sentiment)).bucket(
        config.thresholds,
        &config.lexicon,
        &raw_text,
    );

    let mut engagement = EngagementMetrics::default();
    for (field, metric) in METRIC_FIELDS {
        engagement.set(metric, parse_counter(columns.cell(row, field)));
    }

    let location = Some(columns.cell(row, CanonicalField::Location).to_text())
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty());

    CanonicalRecord {
        timestamp,
        platform: classify_platform(columns.cell(row, CanonicalField::Platform)),
        sentiment,
        media_type: classify_media_type(columns.cell(row, CanonicalField::MediaType)),
        engagement,
        raw_text,
        location,
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
