//! Deterministic insight rules.
//!
//! Each chart kind yields a list of candidate findings, each with a
//! significance magnitude. Candidates are ranked by significance (stable, so
//! generation order breaks ties), the top three are kept, and generic
//! observations fill any gap. The supporting metric of every insight comes
//! from here and is never changed afterwards.

use mediaintel_core::{ChartDataset, ChartKind, DataPoint, Insight, MetricValue, Sentiment};

/// Relative change between first and last day beyond which volume is
/// called increasing or decreasing.
pub const TREND_THRESHOLD_PERCENT: f64 = 10.0;

/// Leader-to-runner-up multiple treated as dominance.
pub const DOMINANCE_MULTIPLE: f64 = 2.0;

/// Direction of daily volume from the first to the last day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trend {
    Increasing(f64),
    Decreasing(f64),
    Stable(f64),
}

impl Trend {
    #[must_use]
    pub fn change_percent(self) -> f64 {
        match self {
            Trend::Increasing(p) | Trend::Decreasing(p) | Trend::Stable(p) => p,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Trend::Increasing(_) => "increasing",
            Trend::Decreasing(_) => "decreasing",
            Trend::Stable(_) => "stable",
        }
    }
}

/// First-vs-last-day trend of a volume chart; `None` with fewer than two
/// days or an empty first day.
#[must_use]
pub fn volume_trend(dataset: &ChartDataset) -> Option<Trend> {
    trend_of(dataset.points())
}

/// First-vs-last-day trend of daily engagement, by the same rule as
/// [`volume_trend`].
#[must_use]
pub fn engagement_trend(dataset: &ChartDataset) -> Option<Trend> {
    trend_of(dataset.engagement())
}

fn trend_of(points: &[DataPoint]) -> Option<Trend> {
    if points.len() < 2 {
        return None;
    }
    let first = points.first()?.value;
    let last = points.last()?.value;
    if first <= 0.0 {
        return None;
    }
    let change = (last - first) / first * 100.0;
    Some(if change > TREND_THRESHOLD_PERCENT {
        Trend::Increasing(change)
    } else if change < -TREND_THRESHOLD_PERCENT {
        Trend::Decreasing(change)
    } else {
        Trend::Stable(change)
    })
}

/// One candidate statement before ranking.
#[derive(Debug, Clone, PartialEq)]
struct Finding {
    significance: f64,
    statement: String,
    metric: MetricValue,
}

impl Finding {
    fn new(significance: f64, statement: String, metric: MetricValue) -> Self {
        Self {
            significance,
            statement,
            metric,
        }
    }
}

/// Exactly three ranked insights for `dataset`. `baseline` is the same chart
/// computed over the prior period, when available.
#[must_use]
pub fn draft_insights(dataset: &ChartDataset, baseline: Option<&ChartDataset>) -> [Insight; 3] {
    let mut findings = if dataset.is_empty() {
        Vec::new()
    } else {
        match dataset.kind() {
            ChartKind::VolumeOverTime => volume_findings(dataset, baseline),
            ChartKind::PlatformShare => {
                category_findings(dataset, baseline, "platform", "posts")
            }
            ChartKind::SentimentDistribution => sentiment_findings(dataset, baseline),
            ChartKind::MediaTypeBreakdown => {
                category_findings(dataset, baseline, "media type", "content")
            }
            ChartKind::TopEngagement => engagement_findings(dataset, baseline),
        }
    };

    findings.retain(|f| f.significance.is_finite());
    findings.sort_by(|a, b| b.significance.total_cmp(&a.significance));

    let mut kept: Vec<Finding> = Vec::with_capacity(3);
    for finding in findings.into_iter().chain(generic_findings(dataset)) {
        if kept.len() == 3 {
            break;
        }
        if !kept.iter().any(|k| k.statement == finding.statement) {
            kept.push(finding);
        }
    }

    let mut kept = kept.into_iter();
    std::array::from_fn(|i| {
        let rank = u8::try_from(i + 1).unwrap_or(u8::MAX);
        match kept.next() {
            Some(f) => Insight {
                rank,
                statement: f.statement,
                supporting_metric: f.metric,
                enriched: false,
            },
            None => Insight {
                rank,
                statement: "No further findings.".to_string(),
                supporting_metric: MetricValue::count(0.0),
                enriched: false,
            },
        }
    })
}

/// Observations that hold for any dataset, used to pad to three.
fn generic_findings(dataset: &ChartDataset) -> Vec<Finding> {
    let title = dataset.kind().title();
    let n = dataset.record_count();
    let count = as_value(n);

    if n == 0 {
        return vec![
            Finding::new(
                0.0,
                "No records match the current filters.".to_string(),
                MetricValue::count(0.0),
            ),
            Finding::new(
                0.0,
                format!("{title} has no data points to compare."),
                MetricValue::count(0.0),
            ),
            Finding::new(
                0.0,
                format!("Widen the date range or clear filters to populate {title}."),
                MetricValue::count(0.0),
            ),
        ];
    }

    let buckets = dataset.points().iter().filter(|p| p.value > 0.0).count();
    let unit = match dataset.kind() {
        ChartKind::VolumeOverTime => "active days",
        ChartKind::TopEngagement => "ranked posts",
        _ => "categories",
    };
    vec![
        Finding::new(
            0.0,
            format!("{title} covers {} records.", MetricValue::count(count)),
            MetricValue::count(count),
        ),
        Finding::new(
            0.0,
            format!("{title} spans {buckets} {unit}."),
            MetricValue::count(as_value(buckets)),
        ),
        Finding::new(
            0.0,
            format!("{title} total is {}.", MetricValue::score(dataset.total())),
            MetricValue::score(dataset.total()),
        ),
    ]
}

fn volume_findings(dataset: &ChartDataset, baseline: Option<&ChartDataset>) -> Vec<Finding> {
    let points = dataset.points();
    let mut out = Vec::new();

    if let Some(trend) = volume_trend(dataset) {
        let change = trend.change_percent();
        let statement = match trend {
            Trend::Stable(_) => format!(
                "Daily posting volume is stable, moving {} from the first to the last day.",
                MetricValue::percent(change)
            ),
            _ => format!(
                "Daily posting volume is {}, changing {} from the first to the last day.",
                trend.label(),
                signed_percent(change)
            ),
        };
        out.push(Finding::new(
            change.abs().max(TREND_THRESHOLD_PERCENT),
            statement,
            MetricValue::percent(change),
        ));
    }

    if let Some(peak) = max_point(points) {
        let share = dataset.percent_of_total(peak.value);
        out.push(Finding::new(
            share,
            format!(
                "Peak activity was on {} with {} posts ({} of volume).",
                peak.label,
                MetricValue::count(peak.value),
                MetricValue::percent(share)
            ),
            MetricValue::count(peak.value),
        ));
    }

    if points.len() > 1 {
        if let Some(low) = min_point(points) {
            let share = dataset.percent_of_total(low.value);
            out.push(Finding::new(
                share / 2.0,
                format!(
                    "The quietest day was {} with {} posts.",
                    low.label,
                    MetricValue::count(low.value)
                ),
                MetricValue::count(low.value),
            ));
        }
        let average = dataset.total() / as_value(points.len());
        out.push(Finding::new(
            1.0,
            format!(
                "Volume averaged {:.1} posts per active day across {} days.",
                average,
                points.len()
            ),
            MetricValue::score(average),
        ));
    }

    out.extend(daily_engagement_findings(dataset));

    if let Some(prior) = baseline.filter(|b| !b.is_empty()) {
        let before = as_value(prior.record_count());
        let now = as_value(dataset.record_count());
        let change = (now - before) / before * 100.0;
        out.push(Finding::new(
            change.abs() + 5.0,
            format!(
                "Post volume {} versus the prior period ({} to {} posts).",
                changed_by(change),
                MetricValue::count(before),
                MetricValue::count(now)
            ),
            MetricValue::percent(change),
        ));
    }

    out
}

fn daily_engagement_findings(dataset: &ChartDataset) -> Vec<Finding> {
    let mut out = Vec::new();
    if dataset.engagement_total() <= 0.0 {
        return out;
    }

    if let Some(peak) = max_point(dataset.engagement()) {
        let share = dataset.percent_of_engagement(peak.value);
        out.push(Finding::new(
            share,
            format!(
                "Engagement peaked on {} with {} engagements ({} of the period).",
                peak.label,
                MetricValue::score(peak.value),
                MetricValue::percent(share)
            ),
            MetricValue::score(peak.value),
        ));
    }

    if let Some(trend) = engagement_trend(dataset) {
        let change = trend.change_percent();
        let statement = match trend {
            Trend::Stable(_) => format!(
                "Daily engagement is stable, moving {} from the first to the last day.",
                MetricValue::percent(change)
            ),
            _ => format!(
                "Daily engagement is {}, changing {} from the first to the last day.",
                trend.label(),
                signed_percent(change)
            ),
        };
        out.push(Finding::new(
            change.abs().max(TREND_THRESHOLD_PERCENT) - 1.0,
            statement,
            MetricValue::percent(change),
        ));
    }

    out
}

/// Engagement leader and gap for a category chart. `leader` is the label
/// with the most records.
fn category_engagement_findings(
    dataset: &ChartDataset,
    leader: &str,
    of_what: &str,
) -> Vec<Finding> {
    let mut out = Vec::new();
    let engagement = dataset.engagement();
    let Some(top) = engagement.first().filter(|_| dataset.engagement_total() > 0.0) else {
        return out;
    };
    let share = dataset.percent_of_engagement(top.value);

    if top.label == leader {
        out.push(Finding::new(
            share / 2.0,
            format!(
                "{} also leads on engagement, generating {} engagements ({} of the total).",
                top.label,
                MetricValue::score(top.value),
                MetricValue::percent(share)
            ),
            MetricValue::score(top.value),
        ));
    } else {
        out.push(Finding::new(
            share + 10.0,
            format!(
                "{} generates the most engagement, {} engagements ({} of the total), though {} leads on {of_what}.",
                top.label,
                MetricValue::score(top.value),
                MetricValue::percent(share),
                leader
            ),
            MetricValue::score(top.value),
        ));
    }

    if let Some(second) = engagement.get(1) {
        let gap = top.value - second.value;
        out.push(Finding::new(
            dataset.percent_of_engagement(gap) / 2.0,
            format!(
                "{} out-engages {} by {} engagements.",
                top.label,
                second.label,
                MetricValue::score(gap)
            ),
            MetricValue::score(gap),
        ));
    }

    out
}

/// Platform share and media-type breakdown share one rule set.
fn category_findings(
    dataset: &ChartDataset,
    baseline: Option<&ChartDataset>,
    noun: &str,
    of_what: &str,
) -> Vec<Finding> {
    let points = dataset.points();
    let mut out = Vec::new();
    let Some(leader) = points.first() else {
        return out;
    };
    let leader_share = dataset.percent_of_total(leader.value);

    out.push(Finding::new(
        leader_share,
        format!(
            "{} is the leading {noun}, accounting for {} of {of_what} ({} of {}).",
            leader.label,
            MetricValue::percent(leader_share),
            MetricValue::count(leader.value),
            MetricValue::count(dataset.total())
        ),
        MetricValue::percent(leader_share),
    ));

    if let Some(runner_up) = points.get(1) {
        let runner_share = dataset.percent_of_total(runner_up.value);
        let gap = leader_share - runner_share;
        let statement = if runner_up.value > 0.0
            && leader.value > runner_up.value * DOMINANCE_MULTIPLE
        {
            format!(
                "{} has more than twice the volume of {}, a gap of {}.",
                leader.label,
                runner_up.label,
                MetricValue::points(gap)
            )
        } else if gap.abs() < f64::EPSILON {
            format!(
                "{} and {} are level at {} each.",
                leader.label,
                runner_up.label,
                MetricValue::percent(leader_share)
            )
        } else {
            format!(
                "{} leads {} by {}.",
                leader.label,
                runner_up.label,
                MetricValue::points(gap)
            )
        };
        out.push(Finding::new(gap.max(1.0), statement, MetricValue::points(gap)));

        if let Some(last) = points.last().filter(|_| points.len() > 2) {
            let share = dataset.percent_of_total(last.value);
            out.push(Finding::new(
                (100.0 - share) / 10.0,
                format!(
                    "{} trails with only {} of {of_what}.",
                    last.label,
                    MetricValue::percent(share)
                ),
                MetricValue::percent(share),
            ));
        }
    } else {
        out.push(Finding::new(
            100.0,
            format!("{} is the only {noun} represented.", leader.label),
            MetricValue::percent(100.0),
        ));
    }

    out.extend(category_engagement_findings(dataset, &leader.label, of_what));

    out.push(Finding::new(
        2.0,
        format!("{} distinct {noun} values are represented.", points.len()),
        MetricValue::count(as_value(points.len())),
    ));

    if let Some(prior) = baseline.filter(|b| !b.is_empty()) {
        let before = prior
            .value_of(&leader.label)
            .map_or(0.0, |v| prior.percent_of_total(v));
        let delta = leader_share - before;
        out.push(Finding::new(
            delta.abs() + 5.0,
            format!(
                "{}'s share moved {} versus the prior period.",
                leader.label,
                MetricValue::points(delta)
            ),
            MetricValue::points(delta),
        ));
    }

    out
}

fn sentiment_findings(dataset: &ChartDataset, baseline: Option<&ChartDataset>) -> Vec<Finding> {
    let mut out = Vec::new();
    let value = |s: Sentiment| dataset.value_of(s.as_str()).unwrap_or(0.0);
    let positive = value(Sentiment::Positive);
    let negative = value(Sentiment::Negative);
    let positive_share = dataset.percent_of_total(positive);
    let negative_share = dataset.percent_of_total(negative);

    if let Some(dominant) = max_point(dataset.points()) {
        let share = dataset.percent_of_total(dominant.value);
        out.push(Finding::new(
            share,
            format!(
                "The dominant sentiment is {}, at {} of all posts.",
                dominant.label,
                MetricValue::percent(share)
            ),
            MetricValue::percent(share),
        ));
        if dominant.label != Sentiment::Negative.as_str() && negative > 0.0 {
            out.push(Finding::new(
                negative_share,
                format!(
                    "Negative sentiment makes up {} of posts.",
                    MetricValue::percent(negative_share)
                ),
                MetricValue::percent(negative_share),
            ));
        }
    }

    if positive > 0.0 && negative > 0.0 {
        let ratio = positive / negative;
        let statement = if ratio >= 1.0 {
            format!(
                "Positive posts outnumber negative ones {}.",
                MetricValue::ratio(ratio)
            )
        } else {
            format!(
                "Negative posts outnumber positive ones {}.",
                MetricValue::ratio(negative / positive)
            )
        };
        let metric = if ratio >= 1.0 {
            MetricValue::ratio(ratio)
        } else {
            MetricValue::ratio(negative / positive)
        };
        out.push(Finding::new(
            (positive_share - negative_share).abs(),
            statement,
            metric,
        ));
    } else if positive + negative > 0.0 {
        let (present, absent) = if negative > 0.0 {
            ("negative", "positive")
        } else {
            ("positive", "negative")
        };
        let opinionated = positive.max(negative);
        out.push(Finding::new(
            (positive_share - negative_share).abs(),
            format!(
                "No {absent} posts were recorded; all {} opinionated posts are {present}.",
                MetricValue::count(opinionated)
            ),
            MetricValue::count(opinionated),
        ));
    } else {
        out.push(Finding::new(
            50.0,
            "Sentiment is entirely neutral, with no positive or negative posts.".to_string(),
            MetricValue::percent(100.0),
        ));
    }

    let net = positive_share - negative_share;
    out.push(Finding::new(
        net.abs() / 2.0,
        format!("Net sentiment stands at {}.", MetricValue::points(net)),
        MetricValue::points(net),
    ));

    if let Some(prior) = baseline.filter(|b| !b.is_empty()) {
        let prior_value = |s: Sentiment| prior.value_of(s.as_str()).unwrap_or(0.0);
        let prior_net = prior.percent_of_total(prior_value(Sentiment::Positive))
            - prior.percent_of_total(prior_value(Sentiment::Negative));
        let swing = net - prior_net;
        out.push(Finding::new(
            swing.abs() + 5.0,
            format!(
                "Net sentiment swung {} versus the prior period.",
                MetricValue::points(swing)
            ),
            MetricValue::points(swing),
        ));
    }

    out
}

fn engagement_findings(dataset: &ChartDataset, baseline: Option<&ChartDataset>) -> Vec<Finding> {
    let points = dataset.points();
    let mut out = Vec::new();
    let total = dataset.total();

    if let Some(top) = points.first() {
        let share = dataset.percent_of_total(top.value);
        out.push(Finding::new(
            share.max(25.0),
            format!(
                "The top post ({}) scored {}, {} of all engagement.",
                top.label,
                MetricValue::score(top.value),
                MetricValue::percent(share)
            ),
            MetricValue::score(top.value),
        ));
    }

    if points.len() > 1 && total > 0.0 {
        let top_sum: f64 = points.iter().map(|p| p.value).sum();
        let share = dataset.percent_of_total(top_sum);
        out.push(Finding::new(
            share,
            format!(
                "The top {} posts account for {} of total engagement.",
                points.len(),
                MetricValue::percent(share)
            ),
            MetricValue::percent(share),
        ));
    }

    if total > 0.0 {
        let average = total / as_value(dataset.record_count());
        out.push(Finding::new(
            5.0,
            format!(
                "Average engagement is {} per post across {} posts.",
                MetricValue::score(average),
                MetricValue::count(as_value(dataset.record_count()))
            ),
            MetricValue::score(average),
        ));
    } else {
        out.push(Finding::new(
            30.0,
            "No engagement was recorded for the selected posts.".to_string(),
            MetricValue::score(0.0),
        ));
    }

    if let Some(prior) = baseline.filter(|b| b.total() > 0.0) {
        let change = (total - prior.total()) / prior.total() * 100.0;
        out.push(Finding::new(
            change.abs() + 5.0,
            format!(
                "Total engagement {} versus the prior period.",
                changed_by(change)
            ),
            MetricValue::percent(change),
        ));
    }

    out
}

/// Highest value; earliest point wins ties.
fn max_point(points: &[DataPoint]) -> Option<&DataPoint> {
    points
        .iter()
        .fold(None::<&DataPoint>, |best, p| match best {
            Some(b) if b.value >= p.value => Some(b),
            _ => Some(p),
        })
}

/// Lowest value; earliest point wins ties.
fn min_point(points: &[DataPoint]) -> Option<&DataPoint> {
    points
        .iter()
        .fold(None::<&DataPoint>, |best, p| match best {
            Some(b) if b.value <= p.value => Some(b),
            _ => Some(p),
        })
}

fn signed_percent(change: f64) -> String {
    format!("{change:+.1}%")
}

fn changed_by(change: f64) -> String {
    if change > 0.0 {
        format!("rose {}", signed_percent(change))
    } else if change < 0.0 {
        format!("fell {}", signed_percent(change))
    } else {
        "was unchanged".to_string()
    }
}

#[allow(clippy::cast_precision_loss)]
fn as_value(n: usize) -> f64 {
    n as f64
}

/// One-paragraph description of a dataset for provider prompts.
#[must_use]
pub fn describe(dataset: &ChartDataset) -> String {
    const MAX_POINTS: usize = 10;
    let points: Vec<String> = dataset
        .points()
        .iter()
        .take(MAX_POINTS)
        .map(|p| format!("{} = {}", p.label, MetricValue::score(p.value)))
        .collect();
    let mut out = format!(
        "{} over {} records (total {})",
        dataset.kind().title(),
        dataset.record_count(),
        MetricValue::score(dataset.total())
    );
    if !points.is_empty() {
        out.push_str(": ");
        out.push_str(&points.join("; "));
    }
    if dataset.points().len() > MAX_POINTS {
        out.push_str(&format!("; and {} more", dataset.points().len() - MAX_POINTS));
    }
    if dataset.engagement_total() > 0.0 {
        let engagement: Vec<String> = dataset
            .engagement()
            .iter()
            .take(MAX_POINTS)
            .map(|p| format!("{} = {}", p.label, MetricValue::score(p.value)))
            .collect();
        out.push_str(&format!(". Engagement: {}", engagement.join("; ")));
    }
    out
}

#[cfg(test)]
#[path = "rules_test.rs"]
mod tests;
