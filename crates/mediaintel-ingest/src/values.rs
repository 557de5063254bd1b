//! Per-field decoders from [`RawValue`] to canonical types.
//!
//! Each decoder is total: unknown labels map to an `Other` variant or zero,
//! never to a rejection. Only dates can reject a row.

use std::sync::LazyLock;

use mediaintel_core::{MediaType, Platform, Sentiment, SentimentThresholds};
use regex::Regex;

use crate::lexicon::Lexicon;
use crate::raw::RawValue;

static COUNTER_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)^([+-]?\d+(?:\.\d+)?)([kmb])?$").ok());

/// Map a free-form platform label to a [`Platform`].
#[must_use]
pub fn classify_platform(value: &RawValue) -> Platform {
    let label = squash(&value.to_text());
    match label.as_str() {
        "instagram" | "ig" | "insta" | "instagramreels" => Platform::Instagram,
        "twitter" | "x" | "tweet" | "xcom" | "twittercom" => Platform::Twitter,
        "tiktok" | "tt" | "douyin" => Platform::Tiktok,
        "facebook" | "fb" | "meta" | "facebookcom" => Platform::Facebook,
        "youtube" | "yt" | "youtubeshorts" | "youtubecom" => Platform::Youtube,
        _ => Platform::Other,
    }
}

/// Map a free-form content-format label to a [`MediaType`].
#[must_use]
pub fn classify_media_type(value: &RawValue) -> MediaType {
    let label = squash(&value.to_text());
    match label.as_str() {
        "image" | "images" | "photo" | "photos" | "picture" | "pic" | "img" | "carousel"
        | "album" | "gif" => MediaType::Image,
        "video" | "videos" | "reel" | "reels" | "clip" | "short" | "shorts" | "live"
        | "story" | "stories" => MediaType::Video,
        "text" | "status" | "post" | "tweet" | "caption" | "thread" => MediaType::Text,
        "link" | "links" | "url" | "article" | "share" | "sharedlink" => MediaType::Link,
        _ => MediaType::Other,
    }
}

/// Parse an engagement counter. Accepts thousands separators and `k`/`m`/`b`
/// suffixes; anything unparseable, negative, or blank is `0`.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn parse_counter(value: &RawValue) -> u64 {
    let n = match value {
        RawValue::Number(n) => *n,
        RawValue::Blank => return 0,
        RawValue::Text(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| !matches!(c, ',' | '_' | ' ' | '\u{a0}'))
                .collect();
            let Some(re) = COUNTER_RE.as_ref() else {
                return 0;
            };
            let Some(caps) = re.captures(&cleaned) else {
                return 0;
            };
            let Ok(base) = caps[1].parse::<f64>() else {
                return 0;
            };
            let multiplier = match caps.get(2).map(|m| m.as_str().to_ascii_lowercase()) {
                Some(suffix) if suffix == "k" => 1_000.0,
                Some(suffix) if suffix == "m" => 1_000_000.0,
                Some(suffix) if suffix == "b" => 1_000_000_000.0,
                _ => 1.0,
            };
            base * multiplier
        }
    };
    if !n.is_finite() || n <= 0.0 {
        return 0;
    }
    if n >= u64::MAX as f64 {
        return u64::MAX;
    }
    n.round() as u64
}

/// Sentiment cell after the decode step, before bucketing.
#[derive(Debug, Clone, PartialEq)]
pub enum SentimentInput {
    Categorical(Sentiment),
    Score(f64),
    FreeText(String),
    Missing,
}

impl SentimentInput {
    #[must_use]
    pub fn decode(value: &RawValue) -> Self {
        match value {
            RawValue::Blank => SentimentInput::Missing,
            RawValue::Number(n) if n.is_finite() => SentimentInput::Score(*n),
            RawValue::Number(_) => SentimentInput::Missing,
            RawValue::Text(s) => {
                if let Some(category) = categorical(s) {
                    SentimentInput::Categorical(category)
                } else if let Some(score) = s.trim().parse::<f64>().ok().filter(|n| n.is_finite()) {
                    SentimentInput::Score(score)
                } else {
                    SentimentInput::FreeText(s.clone())
                }
            }
        }
    }

    /// Resolve to a bucket. `fallback_text` is scored when the cell is missing.
    #[must_use]
    pub fn bucket(
        &self,
        thresholds: SentimentThresholds,
        lexicon: &Lexicon,
        fallback_text: &str,
    ) -> Sentiment {
        match self {
            SentimentInput::Categorical(s) => *s,
            SentimentInput::Score(score) => bucket_score(*score, thresholds),
            SentimentInput::FreeText(text) => bucket_score(lexicon.score(text), thresholds),
            SentimentInput::Missing => bucket_score(lexicon.score(fallback_text), thresholds),
        }
    }
}

/// Strictly above `positive` is positive, strictly below `negative` is
/// negative; the band between (inclusive) is neutral.
#[must_use]
pub fn bucket_score(score: f64, thresholds: SentimentThresholds) -> Sentiment {
    if score > thresholds.positive {
        Sentiment::Positive
    } else if score < thresholds.negative {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

fn categorical(s: &str) -> Option<Sentiment> {
    match squash(s).as_str() {
        "positive" | "pos" | "positif" | "good" => Some(Sentiment::Positive),
        "neutral" | "neu" | "netral" | "mixed" => Some(Sentiment::Neutral),
        "negative" | "neg" | "negatif" | "bad" => Some(Sentiment::Negative),
        _ => None,
    }
}

/// Lowercase and drop everything but letters and digits.
fn squash(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
