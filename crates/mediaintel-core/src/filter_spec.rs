//! The user's query over a canonical record set.

use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};
use serde::Serialize;
use thiserror::Error;

use crate::record::{MediaType, Platform, Sentiment};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("date range start {start} is after end {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
}

/// Inclusive date range; either bound may be open.
///
/// Ranges built with [`DateRange::new`] are never inverted. Intersections
/// may be empty, in which case [`DateRange::contains`] is false everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl DateRange {
    /// # Errors
    ///
    /// Returns [`FilterError::InvertedRange`] if `start` is after `end`.
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, FilterError> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(FilterError::InvertedRange { start: s, end: e });
            }
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!((self.start, self.end), (Some(s), Some(e)) if s > e)
    }

    #[must_use]
    pub fn intersect(&self, other: &DateRange) -> DateRange {
        let start = match (self.start, other.start) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        let end = match (self.end, other.end) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        DateRange { start, end }
    }

    /// The equally long window ending the day before `start`.
    ///
    /// `None` unless both bounds are set.
    #[must_use]
    pub fn preceding(&self) -> Option<DateRange> {
        let (start, end) = (self.start?, self.end?);
        if start > end {
            return None;
        }
        let span = u64::try_from((end - start).num_days()).ok()?;
        let prior_end = start.pred_opt()?;
        let prior_start = prior_end.checked_sub_days(Days::new(span))?;
        Some(DateRange {
            start: Some(prior_start),
            end: Some(prior_end),
        })
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.start, self.end) {
            (Some(s), Some(e)) => write!(f, "{s} to {e}"),
            (Some(s), None) => write!(f, "from {s}"),
            (None, Some(e)) => write!(f, "until {e}"),
            (None, None) => f.write_str("all dates"),
        }
    }
}

/// Immutable query. `None` on a dimension means no restriction.
///
/// `Some(empty)` only arises from [`FilterSpec::and`] and matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSpec {
    date_range: Option<DateRange>,
    platforms: Option<BTreeSet<Platform>>,
    sentiments: Option<BTreeSet<Sentiment>>,
    media_types: Option<BTreeSet<MediaType>>,
    locations: Option<BTreeSet<String>>,
}

fn non_empty<T: Ord>(values: impl IntoIterator<Item = T>) -> Option<BTreeSet<T>> {
    let set: BTreeSet<T> = values.into_iter().collect();
    if set.is_empty() {
        None
    } else {
        Some(set)
    }
}

fn intersect_dim<T: Ord + Clone>(
    a: Option<&BTreeSet<T>>,
    b: Option<&BTreeSet<T>>,
) -> Option<BTreeSet<T>> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.intersection(b).cloned().collect()),
        (Some(x), None) | (None, Some(x)) => Some(x.clone()),
        (None, None) => None,
    }
}

/// Location labels compare case-insensitively.
#[must_use]
pub fn location_key(location: &str) -> String {
    location.trim().to_lowercase()
}

impl FilterSpec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = if range.start.is_none() && range.end.is_none() {
            None
        } else {
            Some(range)
        };
        self
    }

    #[must_use]
    pub fn with_platforms(mut self, platforms: impl IntoIterator<Item = Platform>) -> Self {
        self.platforms = non_empty(platforms);
        self
    }

    #[must_use]
    pub fn with_sentiments(mut self, sentiments: impl IntoIterator<Item = Sentiment>) -> Self {
        self.sentiments = non_empty(sentiments);
        self
    }

    #[must_use]
    pub fn with_media_types(mut self, media_types: impl IntoIterator<Item = MediaType>) -> Self {
        self.media_types = non_empty(media_types);
        self
    }

    #[must_use]
    pub fn with_locations<S: AsRef<str>>(mut self, locations: impl IntoIterator<Item = S>) -> Self {
        self.locations = non_empty(
            locations
                .into_iter()
                .map(|l| location_key(l.as_ref()))
                .filter(|l| !l.is_empty()),
        );
        self
    }

    #[must_use]
    pub fn date_range(&self) -> Option<&DateRange> {
        self.date_range.as_ref()
    }

    #[must_use]
    pub fn platforms(&self) -> Option<&BTreeSet<Platform>> {
        self.platforms.as_ref()
    }

    #[must_use]
    pub fn sentiments(&self) -> Option<&BTreeSet<Sentiment>> {
        self.sentiments.as_ref()
    }

    #[must_use]
    pub fn media_types(&self) -> Option<&BTreeSet<MediaType>> {
        self.media_types.as_ref()
    }

    /// Lowercased location keys.
    #[must_use]
    pub fn locations(&self) -> Option<&BTreeSet<String>> {
        self.locations.as_ref()
    }

    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self == &FilterSpec::default()
    }

    /// Logical AND of two specs, dimension by dimension.
    #[must_use]
    pub fn and(&self, other: &FilterSpec) -> FilterSpec {
        let date_range = match (&self.date_range, &other.date_range) {
            (Some(a), Some(b)) => Some(a.intersect(b)),
            (Some(x), None) | (None, Some(x)) => Some(*x),
            (None, None) => None,
        };
        FilterSpec {
            date_range,
            platforms: intersect_dim(self.platforms.as_ref(), other.platforms.as_ref()),
            sentiments: intersect_dim(self.sentiments.as_ref(), other.sentiments.as_ref()),
            media_types: intersect_dim(self.media_types.as_ref(), other.media_types.as_ref()),
            locations: intersect_dim(self.locations.as_ref(), other.locations.as_ref()),
        }
    }

    /// Same spec shifted to the preceding window of equal length.
    ///
    /// `None` unless the date range is closed on both ends.
    #[must_use]
    pub fn prior_period(&self) -> Option<FilterSpec> {
        let prior = self.date_range.as_ref()?.preceding()?;
        Some(FilterSpec {
            date_range: Some(prior),
            ..self.clone()
        })
    }
}

fn join<T: std::fmt::Display>(values: &BTreeSet<T>) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl std::fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_unrestricted() {
            return f.write_str("all records");
        }
        let mut parts = Vec::new();
        if let Some(range) = &self.date_range {
            parts.push(format!("dates: {range}"));
        }
        if let Some(p) = &self.platforms {
            parts.push(format!("platforms: {}", join(p)));
        }
        if let Some(s) = &self.sentiments {
            parts.push(format!("sentiments: {}", join(s)));
        }
        if let Some(m) = &self.media_types {
            parts.push(format!("media types: {}", join(m)));
        }
        if let Some(l) = &self.locations {
            parts.push(format!("locations: {}", join(l)));
        }
        f.write_str(&parts.join("; "))
    }
}
