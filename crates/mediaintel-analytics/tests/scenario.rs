//! End-to-end check: normalized rows through filter and aggregation.

use mediaintel_analytics::{aggregate, apply, AggregateConfig};
use mediaintel_core::{FilterSpec, Platform, Sentiment};
use mediaintel_ingest::{normalize, NormalizeConfig, RawTable, RawValue, RejectReason};

fn build_table() -> RawTable {
    let mut table = RawTable::new(["Date", "Platform", "Sentiment", "Media Type", "Text", "Engagements"]);
    let others = ["tiktok", "twitter", "facebook", "youtube"];
    let sentiments = ["positive", "neutral", "negative"];

    let mut push = |cells: [String; 6]| table.push_cells(cells.map(|c| RawValue::from_text(&c)));

    for i in 0..85_usize {
        let platform = if i < 30 { "instagram" } else { others[i % others.len()] };
        push([
            format!("2024-04-{:02}", i % 30 + 1),
            platform.to_string(),
            sentiments[i % 3].to_string(),
            "video".to_string(),
            format!("caption {i}"),
            (i * 3).to_string(),
        ]);
    }
    for i in 0..10 {
        push([
            "April the somethingth".to_string(),
            "instagram".to_string(),
            "positive".to_string(),
            "image".to_string(),
            format!("bad date {i}"),
            "1".to_string(),
        ]);
    }
    for i in 0..5_usize {
        push([
            format!("2024-04-{:02}", i % 30 + 1),
            "instagram".to_string(),
            "negative".to_string(),
            "image".to_string(),
            format!("caption {i}"),
            "0".to_string(),
        ]);
    }
    table
}

#[test]
fn hundred_row_scenario() {
    let normalized = normalize(&build_table(), &NormalizeConfig::default()).expect("normalize");
    assert_eq!(normalized.records.len(), 85);
    assert_eq!(normalized.rejections.count(RejectReason::InvalidDate), 10);
    assert_eq!(normalized.rejections.count(RejectReason::Duplicate), 5);
    assert_eq!(normalized.rejections.reasons.len(), 2);

    let spec = FilterSpec::new().with_platforms([Platform::Instagram]);
    let filtered = apply(&normalized.records, &spec);
    assert_eq!(filtered.len(), 30);

    let charts = aggregate(filtered, &AggregateConfig::default());
    assert_eq!(charts.platform_share.value_of("instagram"), Some(30.0));
    assert_eq!(charts.platform_share.points().len(), 1);

    let sentiment_total: f64 = charts
        .sentiment_distribution
        .points()
        .iter()
        .map(|p| p.value)
        .sum();
    assert!((sentiment_total - 30.0).abs() < f64::EPSILON);
    assert_eq!(
        charts.sentiment_distribution.value_of(Sentiment::Positive.as_str()),
        Some(10.0)
    );
}
