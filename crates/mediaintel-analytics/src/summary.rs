//! Distinct values per filter dimension, used to present filter choices.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use mediaintel_core::{location_key, CanonicalRecord, MediaType, Platform, Sentiment};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub record_count: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub platforms: BTreeMap<Platform, usize>,
    pub sentiments: BTreeMap<Sentiment, usize>,
    pub media_types: BTreeMap<MediaType, usize>,
    /// Keyed by the case-folded location; records without one are not counted.
    pub locations: BTreeMap<String, usize>,
}

#[must_use]
pub fn summarize<'a, I>(records: I) -> DatasetSummary
where
    I: IntoIterator<Item = &'a CanonicalRecord>,
{
    let mut summary = DatasetSummary::default();
    for record in records {
        summary.record_count += 1;
        summary.first_date = Some(
            summary
                .first_date
                .map_or(record.timestamp, |d| d.min(record.timestamp)),
        );
        summary.last_date = Some(
            summary
                .last_date
                .map_or(record.timestamp, |d| d.max(record.timestamp)),
        );
        *summary.platforms.entry(record.platform).or_insert(0) += 1;
        *summary.sentiments.entry(record.sentiment).or_insert(0) += 1;
        *summary.media_types.entry(record.media_type).or_insert(0) += 1;
        if let Some(location) = record.location.as_deref() {
            let key = location_key(location);
            if !key.is_empty() {
                *summary.locations.entry(key).or_insert(0) += 1;
            }
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediaintel_core::EngagementMetrics;

    fn record(d: u32, location: Option<&str>) -> CanonicalRecord {
        CanonicalRecord {
            timestamp: NaiveDate::from_ymd_opt(2024, 2, d).unwrap(),
            platform: Platform::Instagram,
            sentiment: Sentiment::Neutral,
            media_type: MediaType::Text,
            engagement: EngagementMetrics::default(),
            raw_text: String::new(),
            location: location.map(str::to_string),
        }
    }

    #[test]
    fn summary_tracks_span_and_distinct_values() {
        let records = vec![
            record(10, Some("Jakarta")),
            record(3, Some("JAKARTA")),
            record(7, None),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.record_count, 3);
        assert_eq!(summary.first_date, NaiveDate::from_ymd_opt(2024, 2, 3));
        assert_eq!(summary.last_date, NaiveDate::from_ymd_opt(2024, 2, 10));
        assert_eq!(summary.platforms.get(&Platform::Instagram), Some(&3));
        assert_eq!(summary.locations.get("jakarta"), Some(&2));
        assert_eq!(summary.locations.len(), 1);
    }

    #[test]
    fn empty_input_has_no_span() {
        let summary = summarize(Vec::<&CanonicalRecord>::new());
        assert_eq!(summary, DatasetSummary::default());
    }
}
