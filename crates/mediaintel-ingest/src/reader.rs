//! File readers. Both produce a [`RawTable`]; no typing happens here.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use csv::{ReaderBuilder, Trim};

use crate::error::IngestError;
use crate::raw::{RawTable, RawValue};

const DELIMITED_EXTENSIONS: &[&str] = &["csv", "tsv", "txt"];
const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "xlsb", "ods"];
const DELIMITER_CANDIDATES: [u8; 3] = [b',', b';', b'\t'];

/// Read a delimited-text or spreadsheet file, chosen by extension.
///
/// # Errors
///
/// Returns [`IngestError`] if the file cannot be opened, has an unsupported
/// extension, has no header row, or fails to parse.
pub fn read_path(path: &Path) -> Result<RawTable, IngestError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let table = if DELIMITED_EXTENSIONS.contains(&extension.as_str()) {
        let bytes = std::fs::read(path).map_err(|source| IngestError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let content = String::from_utf8_lossy(&bytes);
        let delimiter = if extension == "tsv" {
            Some(b'\t')
        } else {
            None
        };
        read_delimited_with(&content, delimiter)?
    } else if SPREADSHEET_EXTENSIONS.contains(&extension.as_str()) {
        read_spreadsheet(path)?
    } else {
        return Err(IngestError::UnsupportedFormat {
            path: path.display().to_string(),
            extension,
        });
    };

    tracing::info!(
        path = %path.display(),
        columns = table.headers().len(),
        rows = table.rows().len(),
        "read input file"
    );
    Ok(table)
}

/// Parse delimited text, sniffing the delimiter from the header line.
///
/// # Errors
///
/// Returns [`IngestError::EmptyFile`] when there is no header row, or
/// [`IngestError::Csv`] on malformed quoting.
pub fn read_delimited(content: &str) -> Result<RawTable, IngestError> {
    read_delimited_with(content, None)
}

fn read_delimited_with(content: &str, delimiter: Option<u8>) -> Result<RawTable, IngestError> {
    let content = content.trim_start_matches('\u{feff}');
    let delimiter = delimiter.unwrap_or_else(|| sniff_delimiter(content));

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .delimiter(delimiter)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(IngestError::EmptyFile);
    }

    let mut table = RawTable::new(&headers);
    for record in reader.records() {
        let record = record?;
        table.push_cells(record.iter().map(RawValue::from_text));
    }
    Ok(table)
}

/// Pick the candidate that occurs most often in the first non-blank line,
/// counting only characters outside double quotes. Defaults to a comma.
fn sniff_delimiter(content: &str) -> u8 {
    let Some(line) = content.lines().find(|l| !l.trim().is_empty()) else {
        return b',';
    };

    let mut counts = [0_usize; DELIMITER_CANDIDATES.len()];
    let mut in_quotes = false;
    for b in line.bytes() {
        if b == b'"' {
            in_quotes = !in_quotes;
        } else if !in_quotes {
            if let Some(i) = DELIMITER_CANDIDATES.iter().position(|&d| d == b) {
                counts[i] += 1;
            }
        }
    }

    let best = (1..counts.len()).fold(0, |best, i| if counts[i] > counts[best] { i } else { best });
    DELIMITER_CANDIDATES[best]
}

fn read_spreadsheet(path: &Path) -> Result<RawTable, IngestError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| IngestError::Spreadsheet(e.to_string()))?;

    let Some(sheet_name) = workbook.sheet_names().first().cloned() else {
        return Err(IngestError::EmptyFile);
    };
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| IngestError::Spreadsheet(format!("sheet '{sheet_name}': {e}")))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Err(IngestError::EmptyFile);
    };
    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| cell_to_value(cell).to_text())
        .collect();
    if headers.iter().all(String::is_empty) {
        return Err(IngestError::EmptyFile);
    }

    let mut table = RawTable::new(&headers);
    for row in rows {
        table.push_cells(row.iter().map(cell_to_value));
    }
    tracing::debug!(sheet = %sheet_name, "read first worksheet");
    Ok(table)
}

#[allow(clippy::cast_precision_loss)]
fn cell_to_value(cell: &Data) -> RawValue {
    match cell {
        Data::Empty | Data::Error(_) => RawValue::Blank,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => RawValue::from_text(s),
        Data::Float(f) => RawValue::Number(*f),
        Data::Int(n) => RawValue::Number(*n as f64),
        Data::Bool(b) => RawValue::Text(b.to_string()),
        Data::DateTime(dt) => RawValue::Number(dt.as_f64()),
    }
}
