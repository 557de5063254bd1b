use super::*;
use mediaintel_core::MetricUnit;

fn dataset(kind: ChartKind, points: &[(&str, f64)], record_count: usize, total: f64) -> ChartDataset {
    ChartDataset::new(
        kind,
        points.iter().map(|(l, v)| DataPoint::new(*l, *v)).collect(),
        record_count,
        total,
    )
}

fn platforms() -> ChartDataset {
    dataset(
        ChartKind::PlatformShare,
        &[("instagram", 6.0), ("tiktok", 2.0), ("twitter", 2.0)],
        10,
        10.0,
    )
}

fn assert_ranked(insights: &[Insight; 3]) {
    let ranks: Vec<u8> = insights.iter().map(|i| i.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
    assert!(insights.iter().all(|i| !i.statement.is_empty()));
    assert!(insights.iter().all(|i| !i.enriched));
}

#[test]
fn platform_share_ranks_leader_then_gap() {
    let insights = draft_insights(&platforms(), None);
    assert_ranked(&insights);

    assert_eq!(
        insights[0].statement,
        "instagram is the leading platform, accounting for 60.0% of posts (6 of 10)."
    );
    assert_eq!(insights[0].supporting_metric, MetricValue::percent(60.0));

    assert!(insights[1].statement.contains("more than twice"));
    assert_eq!(insights[1].supporting_metric.unit, MetricUnit::Points);
    assert!((insights[1].supporting_metric.value - 40.0).abs() < 1e-9);

    assert!(insights[2].statement.starts_with("twitter trails"));
}

#[test]
fn sentiment_reports_dominant_ratio_and_net() {
    let ds = dataset(
        ChartKind::SentimentDistribution,
        &[("positive", 6.0), ("neutral", 3.0), ("negative", 1.0)],
        10,
        10.0,
    );
    let insights = draft_insights(&ds, None);
    assert_ranked(&insights);
    assert_eq!(
        insights[0].statement,
        "The dominant sentiment is positive, at 60.0% of all posts."
    );
    assert_eq!(
        insights[1].statement,
        "Positive posts outnumber negative ones 6.00:1."
    );
    assert_eq!(insights[1].supporting_metric, MetricValue::ratio(6.0));
    assert_eq!(insights[2].statement, "Net sentiment stands at +50.0 pts.");
}

#[test]
fn sentiment_without_negatives_avoids_division() {
    let ds = dataset(
        ChartKind::SentimentDistribution,
        &[("positive", 4.0), ("neutral", 1.0), ("negative", 0.0)],
        5,
        5.0,
    );
    let insights = draft_insights(&ds, None);
    assert_ranked(&insights);
    assert!(insights
        .iter()
        .any(|i| i.statement == "No negative posts were recorded; all 4 opinionated posts are positive."));
    assert!(insights
        .iter()
        .all(|i| i.supporting_metric.value.is_finite()));
}

#[test]
fn volume_ranks_peak_and_trend() {
    let ds = dataset(
        ChartKind::VolumeOverTime,
        &[("2024-01-01", 10.0), ("2024-01-02", 4.0), ("2024-01-03", 15.0)],
        29,
        29.0,
    );
    let insights = draft_insights(&ds, None);
    assert_ranked(&insights);
    assert_eq!(
        insights[0].statement,
        "Peak activity was on 2024-01-03 with 15 posts (51.7% of volume)."
    );
    assert_eq!(
        insights[1].statement,
        "Daily posting volume is increasing, changing +50.0% from the first to the last day."
    );
    assert_eq!(insights[2].statement, "The quietest day was 2024-01-02 with 4 posts.");
    assert_eq!(volume_trend(&ds).map(Trend::label), Some("increasing"));
}

#[test]
fn volume_trend_needs_two_days() {
    let single = dataset(ChartKind::VolumeOverTime, &[("2024-01-01", 3.0)], 3, 3.0);
    assert_eq!(volume_trend(&single), None);
    assert_ranked(&draft_insights(&single, None));

    let flat = dataset(
        ChartKind::VolumeOverTime,
        &[("2024-01-01", 10.0), ("2024-01-02", 10.5)],
        20,
        20.5,
    );
    assert_eq!(volume_trend(&flat).map(Trend::label), Some("stable"));
}

#[test]
fn engagement_concentration_leads() {
    let ds = dataset(
        ChartKind::TopEngagement,
        &[("a", 50.0), ("b", 30.0), ("c", 20.0)],
        10,
        200.0,
    );
    let insights = draft_insights(&ds, None);
    assert_ranked(&insights);
    assert_eq!(
        insights[0].statement,
        "The top 3 posts account for 50.0% of total engagement."
    );
    assert!(insights[1].statement.starts_with("The top post (a) scored 50"));
    assert_eq!(insights[2].supporting_metric, MetricValue::score(20.0));
}

#[test]
fn baseline_adds_prior_period_comparison() {
    let prior = dataset(
        ChartKind::PlatformShare,
        &[("tiktok", 7.0), ("instagram", 3.0)],
        10,
        10.0,
    );
    let insights = draft_insights(&platforms(), Some(&prior));
    assert_ranked(&insights);
    assert_eq!(
        insights[2].statement,
        "instagram's share moved +30.0 pts versus the prior period."
    );
    assert_eq!(insights[2].supporting_metric, MetricValue::points(30.0));
}

#[test]
fn empty_baseline_is_ignored() {
    let prior = dataset(ChartKind::PlatformShare, &[], 0, 0.0);
    assert_eq!(
        draft_insights(&platforms(), Some(&prior)),
        draft_insights(&platforms(), None)
    );
}

#[test]
fn empty_dataset_still_yields_three_distinct_insights() {
    for kind in ChartKind::ALL {
        let ds = dataset(kind, &[], 0, 0.0);
        let insights = draft_insights(&ds, None);
        assert_ranked(&insights);
        assert_ne!(insights[0].statement, insights[1].statement);
        assert_ne!(insights[1].statement, insights[2].statement);
        assert!(insights
            .iter()
            .all(|i| i.supporting_metric == MetricValue::count(0.0)));
    }
}

#[test]
fn single_category_is_padded_to_three() {
    let ds = dataset(ChartKind::MediaTypeBreakdown, &[("video", 5.0)], 5, 5.0);
    let insights = draft_insights(&ds, None);
    assert_ranked(&insights);
    assert!(insights[1].statement.contains("only media type"));
}

#[test]
fn drafting_is_deterministic() {
    assert_eq!(draft_insights(&platforms(), None), draft_insights(&platforms(), None));
}

#[test]
fn describe_lists_points() {
    let text = describe(&platforms());
    assert!(text.starts_with("Platform Share over 10 records (total 10)"));
    assert!(text.contains("instagram = 6"));
}

fn with_engagement(ds: ChartDataset, points: &[(&str, f64)]) -> ChartDataset {
    let total = points.iter().map(|(_, v)| v).sum();
    ds.with_engagement(
        points.iter().map(|(l, v)| DataPoint::new(*l, *v)).collect(),
        total,
    )
}

#[test]
fn engagement_leader_outranks_post_leader_when_they_differ() {
    let ds = with_engagement(
        platforms(),
        &[("tiktok", 900.0), ("instagram", 300.0), ("twitter", 100.0)],
    );
    let insights = draft_insights(&ds, None);
    assert_ranked(&insights);
    assert_eq!(
        insights[0].statement,
        "tiktok generates the most engagement, 900 engagements (69.2% of the total), though instagram leads on posts."
    );
    assert_eq!(insights[0].supporting_metric, MetricValue::score(900.0));
    assert!(insights[1].statement.starts_with("instagram is the leading platform"));
}

#[test]
fn matching_engagement_leader_is_reported_with_its_total() {
    let ds = with_engagement(
        platforms(),
        &[("instagram", 800.0), ("tiktok", 150.0), ("twitter", 50.0)],
    );
    let insights = draft_insights(&ds, None);
    assert_eq!(
        insights[2].statement,
        "instagram also leads on engagement, generating 800 engagements (80.0% of the total)."
    );
}

#[test]
fn engagement_gap_between_top_two_is_measured() {
    let ds = with_engagement(
        dataset(
            ChartKind::PlatformShare,
            &[("instagram", 5.0), ("tiktok", 5.0)],
            10,
            10.0,
        ),
        &[("instagram", 700.0), ("tiktok", 100.0)],
    );
    let insights = draft_insights(&ds, None);
    assert!(insights
        .iter()
        .any(|i| i.statement == "instagram out-engages tiktok by 600 engagements."
            && i.supporting_metric == MetricValue::score(600.0)));
}

#[test]
fn daily_engagement_peak_and_trend_lead_volume() {
    let ds = with_engagement(
        dataset(
            ChartKind::VolumeOverTime,
            &[("2024-05-01", 5.0), ("2024-05-02", 5.0)],
            10,
            10.0,
        ),
        &[("2024-05-01", 100.0), ("2024-05-02", 400.0)],
    );
    assert_eq!(engagement_trend(&ds), Some(Trend::Increasing(300.0)));
    assert_eq!(volume_trend(&ds), Some(Trend::Stable(0.0)));

    let insights = draft_insights(&ds, None);
    assert_ranked(&insights);
    assert_eq!(
        insights[0].statement,
        "Daily engagement is increasing, changing +300.0% from the first to the last day."
    );
    assert_eq!(
        insights[1].statement,
        "Engagement peaked on 2024-05-02 with 400 engagements (80.0% of the period)."
    );
    assert!(insights[2].statement.starts_with("Peak activity was on 2024-05-01"));
}

#[test]
fn zero_engagement_adds_no_engagement_findings() {
    let ds = with_engagement(platforms(), &[("instagram", 0.0), ("tiktok", 0.0)]);
    let insights = draft_insights(&ds, None);
    assert_eq!(insights, draft_insights(&platforms(), None));
}

#[test]
fn describe_appends_engagement() {
    let ds = with_engagement(platforms(), &[("instagram", 80.0), ("tiktok", 20.0)]);
    assert!(describe(&ds).ends_with(". Engagement: instagram = 80; tiktok = 20"));
}
