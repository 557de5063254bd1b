//! Executive summary and recommendations for the whole report.

use mediaintel_core::{ChartDataset, ChartSet, LocationEngagement, MetricValue, Sentiment};
use serde::Serialize;

use crate::rules::{volume_trend, Trend, DOMINANCE_MULTIPLE};
use crate::synthesizer::strip_list_marker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeSource {
    Rules,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Narrative {
    pub summary: String,
    pub recommendations: Vec<String>,
    pub source: NarrativeSource,
}

const NEGATIVE_ALERT_PERCENT: f64 = 30.0;
const POSITIVE_FLOOR_PERCENT: f64 = 50.0;
const POSITIVE_STRONG_PERCENT: f64 = 70.0;
const MEDIA_DOMINANCE_PERCENT: f64 = 70.0;
const LOCATION_FOCUS_PERCENT: f64 = 50.0;
const TOP_LOCATIONS: usize = 3;

/// Rule-based narrative.
#[must_use]
pub fn compose(charts: &ChartSet) -> Narrative {
    if charts.record_count() == 0 {
        return Narrative {
            summary: "No records match the current filters.".to_string(),
            recommendations: vec![
                "Widen the date range or clear filters to analyze campaign performance."
                    .to_string(),
            ],
            source: NarrativeSource::Rules,
        };
    }

    let signals = Signals::read(charts);
    Narrative {
        summary: signals.summary(),
        recommendations: signals.recommendations(),
        source: NarrativeSource::Rules,
    }
}

/// Split a provider reply into `Summary` and `Recommendations` sections.
///
/// A reply without a summary heading is used whole as the summary. Missing or
/// empty recommendations keep the rule list from `fallback`.
#[must_use]
pub fn parse_sections(text: &str, fallback: Narrative) -> Narrative {
    let mut section = Section::Preamble;
    let mut found_summary = false;
    let mut summary: Vec<&str> = Vec::new();
    let mut recommendations: Vec<String> = Vec::new();

    for line in text.lines() {
        if let Some((heading, rest)) = heading(line) {
            section = heading;
            found_summary |= section == Section::Summary;
            if rest.is_empty() {
                continue;
            }
            push_line(&section, rest, &mut summary, &mut recommendations);
        } else {
            push_line(&section, line, &mut summary, &mut recommendations);
        }
    }

    let summary = if found_summary && !summary.is_empty() {
        summary.join(" ")
    } else {
        text.trim().to_string()
    };
    let recommendations = if recommendations.is_empty() {
        fallback.recommendations
    } else {
        recommendations
    };

    Narrative {
        summary,
        recommendations,
        source: NarrativeSource::Ai,
    }
}

#[derive(PartialEq)]
enum Section {
    Preamble,
    Summary,
    Recommendations,
}

/// Recognize a section heading such as `**Summary:**` or `## Recommendations`,
/// returning any text that follows the colon on the same line.
fn heading(line: &str) -> Option<(Section, &str)> {
    let bare = line.trim().trim_start_matches('#').trim().trim_matches('*').trim();
    let lower = bare.to_lowercase();
    let (section, label_len) = if lower.starts_with("executive summary") {
        (Section::Summary, "executive summary".len())
    } else if lower.starts_with("summary") {
        (Section::Summary, "summary".len())
    } else if lower.starts_with("recommendations") {
        (Section::Recommendations, "recommendations".len())
    } else {
        return None;
    };
    let rest = bare.get(label_len..).unwrap_or("").trim_start_matches('*').trim();
    if rest.is_empty() {
        return Some((section, ""));
    }
    let rest = rest.strip_prefix(':')?;
    Some((section, rest.trim_start_matches('*').trim()))
}

fn push_line<'a>(
    section: &Section,
    line: &'a str,
    summary: &mut Vec<&'a str>,
    recommendations: &mut Vec<String>,
) {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return;
    }
    match section {
        Section::Preamble => {}
        Section::Summary => summary.push(trimmed),
        Section::Recommendations => {
            let item = strip_list_marker(trimmed);
            if !item.is_empty() {
                recommendations.push(item.to_string());
            }
        }
    }
}

/// The handful of figures the narrative rules read.
struct Signals<'a> {
    dominant_sentiment: Option<(&'a str, f64)>,
    positive: f64,
    negative: f64,
    trend: Option<Trend>,
    single_day: Option<&'a str>,
    platform_leader: Option<(&'a str, f64)>,
    platform_runner_up: Option<(&'a str, f64)>,
    /// Platform with the most engagement and its share of the total.
    engagement_leader: Option<(&'a str, f64)>,
    media_leader: Option<(&'a str, f64)>,
    media_kinds: usize,
    /// Ranked by engagement.
    locations: &'a [LocationEngagement],
    location_engagement: f64,
    located: usize,
}

impl<'a> Signals<'a> {
    fn read(charts: &'a ChartSet) -> Self {
        let sentiment = &charts.sentiment_distribution;
        let share = |ds: &ChartDataset, s: Sentiment| {
            ds.percent_of_total(ds.value_of(s.as_str()).unwrap_or(0.0))
        };
        let dominant_sentiment = sentiment
            .points()
            .iter()
            .fold(None::<(&str, f64)>, |best, p| match best {
                Some(b) if b.1 >= p.value => Some(b),
                _ => Some((p.label.as_str(), p.value)),
            })
            .map(|(label, v)| (label, sentiment.percent_of_total(v)));

        let volume = charts.volume_over_time.points();
        let single_day = match volume {
            [only] => Some(only.label.as_str()),
            _ => None,
        };

        let platforms = &charts.platform_share;
        let labelled = |ds: &'a ChartDataset, i: usize| {
            ds.points()
                .get(i)
                .filter(|p| p.value > 0.0)
                .map(|p| (p.label.as_str(), p.value))
        };

        let engagement_leader = platforms
            .engagement()
            .first()
            .filter(|p| p.value > 0.0)
            .map(|p| (p.label.as_str(), platforms.percent_of_engagement(p.value)));

        Self {
            dominant_sentiment,
            positive: share(sentiment, Sentiment::Positive),
            negative: share(sentiment, Sentiment::Negative),
            trend: volume_trend(&charts.volume_over_time),
            single_day,
            platform_leader: labelled(platforms, 0),
            platform_runner_up: labelled(platforms, 1),
            engagement_leader,
            media_leader: labelled(&charts.media_type_breakdown, 0)
                .map(|(l, v)| (l, charts.media_type_breakdown.percent_of_total(v))),
            media_kinds: charts
                .media_type_breakdown
                .points()
                .iter()
                .filter(|p| p.value > 0.0)
                .count(),
            locations: &charts.locations,
            location_engagement: charts.locations.iter().map(|l| l.engagement).sum(),
            located: charts.locations.iter().map(|l| l.posts).sum(),
        }
    }

    fn summary(&self) -> String {
        let mut parts = Vec::new();

        if let Some((label, share)) = self.dominant_sentiment {
            parts.push(format!(
                "Overall sentiment is predominantly {label} ({}).",
                MetricValue::percent(share)
            ));
        }

        match (self.trend, self.single_day) {
            (Some(trend), _) => parts.push(format!(
                "Posting volume is {} over the period ({:+.1}% first to last day).",
                trend.label(),
                trend.change_percent()
            )),
            (None, Some(day)) => {
                parts.push(format!("All posts fall on a single day, {day}."));
            }
            (None, None) => {}
        }

        if let Some((leader, _)) = self.platform_leader {
            match self.platform_runner_up {
                Some((runner_up, _)) => parts.push(format!(
                    "{leader} is the primary platform, followed by {runner_up}."
                )),
                None => parts.push(format!("{leader} is the only active platform.")),
            }
        }

        if let Some((leader, share)) = self.engagement_leader {
            parts.push(format!(
                "{leader} generates the most engagement ({} of the total).",
                MetricValue::percent(share)
            ));
        }

        if let Some((media, share)) = self.media_leader {
            parts.push(format!(
                "{media} is the most common media type at {}.",
                MetricValue::percent(share)
            ));
        }

        if !self.locations.is_empty() {
            let top = &self.locations[..self.locations.len().min(TOP_LOCATIONS)];
            let names: Vec<&str> = top.iter().map(|l| l.location.as_str()).collect();
            if self.location_engagement > 0.0 {
                let share = top.iter().map(|l| l.engagement).sum::<f64>()
                    / self.location_engagement
                    * 100.0;
                parts.push(format!(
                    "Top locations by engagement: {} ({} of located engagement).",
                    names.join(", "),
                    MetricValue::percent(share)
                ));
            } else {
                parts.push(format!("Top locations: {}.", names.join(", ")));
            }
        }

        parts.join(" ")
    }

    fn recommendations(&self) -> Vec<String> {
        let mut out = Vec::new();

        if self.negative > NEGATIVE_ALERT_PERCENT && self.positive < POSITIVE_FLOOR_PERCENT {
            out.push(format!(
                "Negative sentiment is {} against {} positive: set up sentiment monitoring and prepare responses to recurring complaints.",
                MetricValue::percent(self.negative),
                MetricValue::percent(self.positive)
            ));
        } else if self.positive > POSITIVE_STRONG_PERCENT {
            out.push(format!(
                "Positive sentiment is strong at {}: amplify the themes and creators driving it.",
                MetricValue::percent(self.positive)
            ));
        } else {
            out.push(
                "Sentiment is mixed: maintain current messaging and A/B test variations to lift positive response."
                    .to_string(),
            );
        }

        out.push(match self.trend {
            Some(Trend::Decreasing(_)) => {
                "Posting volume is declining: investigate content fatigue and refresh the posting calendar.".to_string()
            }
            Some(Trend::Increasing(_)) => {
                "Posting volume is rising: scale the content and channels driving growth.".to_string()
            }
            _ => "Volume is flat or too short to trend: keep collecting data before shifting budget.".to_string(),
        });

        match (self.platform_leader, self.platform_runner_up) {
            (Some((leader, lv)), Some((runner_up, rv))) if lv > rv * DOMINANCE_MULTIPLE => {
                out.push(format!(
                    "{leader} carries more than twice the volume of {runner_up}: diversify by growing presence on {runner_up}."
                ));
            }
            (Some((leader, _)), Some((runner_up, _))) => out.push(format!(
                "Optimize content format per platform, starting with {leader} and {runner_up}."
            )),
            (Some((leader, _)), None) => out.push(format!(
                "All activity is on {leader}: test a second platform to reduce channel risk."
            )),
            (None, _) => {}
        }

        match self.media_leader {
            Some((media, share)) if self.media_kinds > 1 && share > MEDIA_DOMINANCE_PERCENT => {
                out.push(format!(
                    "{media} makes up {} of content: diversify into other media types.",
                    MetricValue::percent(share)
                ));
            }
            Some(_) => out.push(
                "Analyze which media types drive engagement and shift the content mix toward them."
                    .to_string(),
            ),
            None => {}
        }

        if let Some(top) = self.locations.first() {
            let (share, measure) = if self.location_engagement > 0.0 {
                (
                    top.engagement / self.location_engagement * 100.0,
                    "engagement",
                )
            } else {
                (percent(top.posts, self.located), "posts")
            };
            if share > LOCATION_FOCUS_PERCENT {
                out.push(format!(
                    "{} accounts for {} of located {measure}: run location-specific campaigns there.",
                    top.location,
                    MetricValue::percent(share)
                ));
            } else {
                out.push(
                    "Activity is spread across locations: analyze regional nuances before targeting."
                        .to_string(),
                );
            }
        }

        out
    }
}

#[allow(clippy::cast_precision_loss)]
fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[cfg(test)]
#[path = "narrative_test.rs"]
mod tests;
