//! Filter engine: order-preserving selection by [`FilterSpec`].

use mediaintel_core::{location_key, CanonicalRecord, FilterSpec};

/// True when the record satisfies every restricted dimension of `spec`.
#[must_use]
pub fn matches(record: &CanonicalRecord, spec: &FilterSpec) -> bool {
    spec.date_range().is_none_or(|r| r.contains(record.timestamp))
        && spec.platforms().is_none_or(|s| s.contains(&record.platform))
        && spec.sentiments().is_none_or(|s| s.contains(&record.sentiment))
        && spec.media_types().is_none_or(|s| s.contains(&record.media_type))
        && spec.locations().is_none_or(|s| {
            record
                .location
                .as_deref()
                .is_some_and(|l| s.contains(&location_key(l)))
        })
}

/// Select matching records, keeping their input order.
pub fn apply<'a, I>(records: I, spec: &FilterSpec) -> Vec<&'a CanonicalRecord>
where
    I: IntoIterator<Item = &'a CanonicalRecord>,
{
    let mut seen = 0_usize;
    let selected: Vec<&CanonicalRecord> = records
        .into_iter()
        .inspect(|_| seen += 1)
        .filter(|r| matches(r, spec))
        .collect();

    if selected.is_empty() && seen > 0 {
        tracing::warn!(filter = %spec, candidates = seen, "filter matched no records");
    } else {
        tracing::debug!(filter = %spec, candidates = seen, matched = selected.len(), "applied filter");
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mediaintel_core::{
        DateRange, EngagementMetrics, MediaType, Platform, Sentiment,
    };

    fn record(day: u32, platform: Platform, sentiment: Sentiment, location: Option<&str>) -> CanonicalRecord {
        CanonicalRecord {
            timestamp: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            platform,
            sentiment,
            media_type: MediaType::Image,
            engagement: EngagementMetrics::default(),
            raw_text: format!("post {day}"),
            location: location.map(str::to_string),
        }
    }

    fn sample() -> Vec<CanonicalRecord> {
        vec![
            record(1, Platform::Instagram, Sentiment::Positive, Some("Jakarta")),
            record(2, Platform::Twitter, Sentiment::Negative, Some("Bandung")),
            record(3, Platform::Instagram, Sentiment::Neutral, None),
            record(4, Platform::Tiktok, Sentiment::Positive, Some("jakarta ")),
            record(5, Platform::Instagram, Sentiment::Negative, Some("Surabaya")),
        ]
    }

    fn days(selected: &[&CanonicalRecord]) -> Vec<u32> {
        use chrono::Datelike;
        selected.iter().map(|r| r.timestamp.day()).collect()
    }

    #[test]
    fn unrestricted_spec_keeps_everything_in_order() {
        let records = sample();
        assert_eq!(days(&apply(&records, &FilterSpec::new())), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn values_within_a_dimension_are_ored() {
        let records = sample();
        let spec = FilterSpec::new().with_platforms([Platform::Twitter, Platform::Tiktok]);
        assert_eq!(days(&apply(&records, &spec)), vec![2, 4]);
    }

    #[test]
    fn dimensions_are_anded() {
        let records = sample();
        let spec = FilterSpec::new()
            .with_platforms([Platform::Instagram])
            .with_sentiments([Sentiment::Negative, Sentiment::Neutral])
            .with_date_range(
                DateRange::new(NaiveDate::from_ymd_opt(2024, 5, 4), None).unwrap(),
            );
        assert_eq!(days(&apply(&records, &spec)), vec![5]);
    }

    #[test]
    fn location_matches_case_insensitively_and_skips_missing() {
        let records = sample();
        let spec = FilterSpec::new().with_locations(["JAKARTA"]);
        assert_eq!(days(&apply(&records, &spec)), vec![1, 4]);
    }

    #[test]
    fn empty_result_is_valid() {
        let records = sample();
        let spec = FilterSpec::new().with_platforms([Platform::Youtube]);
        assert!(apply(&records, &spec).is_empty());
        assert!(apply(Vec::<&CanonicalRecord>::new(), &spec).is_empty());
    }

    #[test]
    fn sequential_filters_equal_their_conjunction() {
        let records = sample();
        let a = FilterSpec::new().with_platforms([Platform::Instagram, Platform::Tiktok]);
        let b = FilterSpec::new()
            .with_platforms([Platform::Instagram])
            .with_sentiments([Sentiment::Negative]);

        let sequential = apply(apply(&records, &a), &b);
        let combined = apply(&records, &a.and(&b));
        assert_eq!(sequential, combined);
        assert_eq!(days(&combined), vec![5]);
    }

    #[test]
    fn disjoint_conjunction_matches_nothing() {
        let records = sample();
        let a = FilterSpec::new().with_platforms([Platform::Instagram]);
        let b = FilterSpec::new().with_platforms([Platform::Twitter]);
        assert!(apply(&records, &a.and(&b)).is_empty());
        assert!(apply(apply(&records, &a), &b).is_empty());
    }
}
