//! Untyped rows as they come out of a file.

use std::collections::BTreeMap;

pub(crate) static BLANK: RawValue = RawValue::Blank;

/// One cell before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Number(f64),
    Blank,
}

impl RawValue {
    /// Trimmed text, or [`RawValue::Blank`] for whitespace-only input.
    #[must_use]
    pub fn from_text(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            RawValue::Blank
        } else {
            RawValue::Text(trimmed.to_string())
        }
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, RawValue::Blank)
    }

    /// Display form used for free-text fields. Integral numbers lose the `.0`.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            RawValue::Text(s) => s.clone(),
            RawValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{n:.0}"),
            RawValue::Number(n) => n.to_string(),
            RawValue::Blank => String::new(),
        }
    }
}

/// Canonical form of a column label: trimmed, lowercased, with whitespace,
/// hyphens, and dots collapsed to single underscores.
#[must_use]
pub fn normalize_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut pending_sep = false;
    for c in label.trim_start_matches('\u{feff}').trim().chars() {
        if c.is_whitespace() || c == '-' || c == '.' || c == '_' {
            pending_sep = !out.is_empty();
        } else {
            if pending_sep {
                out.push('_');
                pending_sep = false;
            }
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// Mapping from normalized column label to cell value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: BTreeMap<String, RawValue>,
}

impl RawRow {
    #[must_use]
    pub fn get(&self, label: &str) -> &RawValue {
        self.cells.get(label).unwrap_or(&BLANK)
    }

    pub fn insert(&mut self, label: &str, value: RawValue) {
        self.cells.entry(normalize_label(label)).or_insert(value);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<(S, RawValue)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (S, RawValue)>>(iter: I) -> Self {
        let mut row = RawRow::default();
        for (label, value) in iter {
            row.insert(label.as_ref(), value);
        }
        row
    }
}

/// Header labels plus rows keyed by those labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<RawRow>,
}

impl RawTable {
    /// Headers are stored normalized; duplicate labels keep the first column.
    #[must_use]
    pub fn new<S: AsRef<str>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers
                .into_iter()
                .map(|h| normalize_label(h.as_ref()))
                .collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row of cells positioned like the headers. Missing trailing
    /// cells are blank; extra cells are dropped.
    pub fn push_cells(&mut self, cells: impl IntoIterator<Item = RawValue>) {
        let mut row = RawRow::default();
        for (header, value) in self.headers.iter().zip(cells) {
            if !header.is_empty() {
                row.cells.entry(header.clone()).or_insert(value);
            }
        }
        self.rows.push(row);
    }

    pub fn push_row(&mut self, row: RawRow) {
        self.rows.push(row);
    }

    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    #[must_use]
    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }
}
