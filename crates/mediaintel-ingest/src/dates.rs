//! Date decoding for the `timestamp` field.
//!
//! Formats are tried in order and the first successful parse wins. Slash and
//! dash forms are month-first, so `03/04/2024` reads as 4 March;
//! `15/03/2024` still parses because the month-first attempt fails on month 15.
//! Override formats are tried before the built-in ones, so an export known to
//! be day-first can put `%d/%m/%Y` in front.

use chrono::{DateTime, Days, NaiveDate};

use crate::raw::RawValue;

/// Built-in formats, most specific and least ambiguous first.
///
/// Date-only forms precede date-time forms; chrono's `NaiveDate` parser
/// accepts time fields in the format and discards them.
pub const DEFAULT_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%Y%m%d",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M %p",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%m/%d/%y",
    "%d/%m/%y",
];

const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 2200;

/// Spreadsheet serial day zero (the 1900 date system, leap-year bug included).
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Ordered list of accepted date formats.
#[derive(Debug, Clone, PartialEq)]
pub struct DateParser {
    formats: Vec<String>,
}

impl Default for DateParser {
    fn default() -> Self {
        Self {
            formats: DEFAULT_DATE_FORMATS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl DateParser {
    /// Puts `formats` ahead of the existing ones, in the given order. A
    /// format already present moves to the front instead of repeating.
    #[must_use]
    pub fn with_preferred_formats<S: AsRef<str>>(
        mut self,
        formats: impl IntoIterator<Item = S>,
    ) -> Self {
        let mut preferred: Vec<String> = Vec::new();
        for f in formats {
            let f = f.as_ref().trim();
            if !f.is_empty() && !preferred.iter().any(|p| p == f) {
                preferred.push(f.to_string());
            }
        }
        self.formats.retain(|existing| !preferred.contains(existing));
        preferred.append(&mut self.formats);
        self.formats = preferred;
        self
    }

    #[must_use]
    pub fn formats(&self) -> &[String] {
        &self.formats
    }

    /// Decode a cell into a calendar date. `None` means reject the row.
    #[must_use]
    pub fn parse(&self, value: &RawValue) -> Option<NaiveDate> {
        match value {
            RawValue::Text(s) => self.parse_str(s),
            RawValue::Number(n) => from_serial(*n),
            RawValue::Blank => None,
        }
    }

    #[must_use]
    pub fn parse_str(&self, s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        for format in &self.formats {
            if let Ok(date) = NaiveDate::parse_from_str(s, format) {
                if plausible(date) {
                    return Some(date);
                }
            }
        }

        // Offsets are dropped: the date is kept as written, not converted.
        DateTime::parse_from_rfc3339(s)
            .or_else(|_| DateTime::parse_from_rfc2822(s))
            .ok()
            .map(|dt| dt.naive_local().date())
            .filter(|d| plausible(*d))
    }
}

fn plausible(date: NaiveDate) -> bool {
    use chrono::Datelike;
    (MIN_YEAR..=MAX_YEAR).contains(&date.year())
}

/// Spreadsheet serial number to date; the fractional time part is dropped.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn from_serial(n: f64) -> Option<NaiveDate> {
    if !n.is_finite() || n < 1.0 {
        return None;
    }
    let days = n.floor() as u64;
    let (y, m, d) = SERIAL_EPOCH;
    NaiveDate::from_ymd_opt(y, m, d)?
        .checked_add_days(Days::new(days))
        .filter(|d| plausible(*d))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn parse(s: &str) -> Option<NaiveDate> {
        DateParser::default().parse_str(s)
    }

    #[test]
    fn iso_dates() {
        assert_eq!(parse("2024-03-05"), Some(d(2024, 3, 5)));
        assert_eq!(parse("2024/03/05"), Some(d(2024, 3, 5)));
    }

    #[test]
    fn month_first_wins_when_ambiguous() {
        assert_eq!(parse("03/04/2024"), Some(d(2024, 3, 4)));
        assert_eq!(parse("03-04-2024"), Some(d(2024, 3, 4)));
        assert_eq!(parse("03/04/2024 10:15"), Some(d(2024, 3, 4)));
    }

    #[test]
    fn day_first_used_when_month_first_impossible() {
        assert_eq!(parse("15/03/2024"), Some(d(2024, 3, 15)));
        assert_eq!(parse("15/03/2024 08:30:00"), Some(d(2024, 3, 15)));
    }

    #[test]
    fn preferred_formats_make_day_first_the_default() {
        let parser = DateParser::default().with_preferred_formats(["%d/%m/%Y"]);
        assert_eq!(parser.formats()[0], "%d/%m/%Y");
        assert_eq!(parser.formats().len(), DEFAULT_DATE_FORMATS.len());
        assert_eq!(parser.parse_str("03/04/2024"), Some(d(2024, 4, 3)));
        assert_eq!(parser.parse_str("03/15/2024"), Some(d(2024, 3, 15)));
    }

    #[test]
    fn named_months() {
        assert_eq!(parse("5 Mar 2024"), Some(d(2024, 3, 5)));
        assert_eq!(parse("March 5, 2024"), Some(d(2024, 3, 5)));
        assert_eq!(parse("Mar 5 2024"), Some(d(2024, 3, 5)));
    }

    #[test]
    fn date_times_keep_the_date() {
        assert_eq!(parse("2024-03-05 23:59:59"), Some(d(2024, 3, 5)));
        assert_eq!(parse("2024-03-05T08:00:00.123"), Some(d(2024, 3, 5)));
        assert_eq!(parse("3/5/2024 11:30 PM"), Some(d(2024, 3, 5)));
    }

    #[test]
    fn rfc3339_keeps_local_date() {
        assert_eq!(parse("2024-03-05T23:30:00-05:00"), Some(d(2024, 3, 5)));
        assert_eq!(parse("2024-03-05T01:00:00Z"), Some(d(2024, 3, 5)));
    }

    #[test]
    fn two_digit_years_fall_back() {
        assert_eq!(parse("05/03/24"), Some(d(2024, 5, 3)));
        assert_eq!(parse("25/03/24"), Some(d(2024, 3, 25)));
    }

    #[test]
    fn garbage_and_blank_fail() {
        assert_eq!(parse("not a date"), None);
        assert_eq!(parse(""), None);
        assert_eq!(parse("2024-13-45"), None);
        assert_eq!(DateParser::default().parse(&RawValue::Blank), None);
    }

    #[test]
    fn implausible_years_fail() {
        assert_eq!(parse("0024-01-05"), None);
    }

    #[test]
    fn spreadsheet_serials() {
        let parser = DateParser::default();
        assert_eq!(parser.parse(&RawValue::Number(45_356.0)), Some(d(2024, 3, 5)));
        assert_eq!(parser.parse(&RawValue::Number(45_356.75)), Some(d(2024, 3, 5)));
        assert_eq!(parser.parse(&RawValue::Number(-3.0)), None);
        assert_eq!(parser.parse(&RawValue::Number(f64::NAN)), None);
    }

    #[test]
    fn preferred_formats_are_added_once() {
        let parser =
            DateParser::default().with_preferred_formats(["%d %m %Y", "%Y-%m-%d", "%d %m %Y"]);
        assert_eq!(parser.formats().len(), DEFAULT_DATE_FORMATS.len() + 1);
        assert_eq!(&parser.formats()[..2], ["%d %m %Y", "%Y-%m-%d"]);
        assert_eq!(parser.parse_str("05 03 2024"), Some(d(2024, 3, 5)));
    }
}
